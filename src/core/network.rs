use crate::error::EngineError;
use crate::layer::Layer;
use crate::neuron::Activation;

/// Forces one neuron's activation function after parameter loading.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActivationOverride {
    pub layer: usize,
    pub neuron: usize,
    pub activation: Activation,
}

/// Forces one input weight after parameter loading.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightOverride {
    pub layer: usize,
    pub neuron: usize,
    pub slot: usize,
    pub value: f32,
}

/// Policy-specific constants applied once after generic parameter loading.
/// These are trained-policy facts, not part of the network contract, so
/// they live in data rather than in `evaluate`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Calibration {
    #[cfg_attr(feature = "serde", serde(default))]
    pub activations: Vec<ActivationOverride>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub weights: Vec<WeightOverride>,
}

impl Calibration {
    /// Calibration for the pendulum actor policy: the last hidden neuron is
    /// squashed through tanh and the output neuron rescales it by 2.0
    /// (the environment's torque range) with no further nonlinearity.
    pub fn pendulum_actor() -> Self {
        Self {
            activations: vec![
                ActivationOverride {
                    layer: 3,
                    neuron: 0,
                    activation: Activation::Tanh,
                },
                ActivationOverride {
                    layer: 4,
                    neuron: 0,
                    activation: Activation::Linear,
                },
            ],
            weights: vec![WeightOverride {
                layer: 4,
                neuron: 0,
                slot: 0,
                value: 2.0,
            }],
        }
    }
}

/// A named, fixed chain of layers. The network owns every layer and,
/// transitively, every neuron; all cross-neuron references inside are plain
/// indices, so nothing here can dangle.
///
/// Lifecycle is two states: freshly constructed (weights and biases at
/// default) and ready (parameters loaded, calibration applied). `evaluate`
/// is defined in both, but only meaningful in the second.
#[derive(Debug, Clone)]
pub struct Network {
    name: String,
    layers: Vec<Layer>,
    // reused between evaluations to carry one layer's outputs to the next
    scratch: Vec<f32>,
}

impl Network {
    /// Build a chain of layers with the given neuron counts, first to last.
    /// The first entry is the input layer (arity 0, value-injected); every
    /// later layer is wired to its predecessor. A wiring failure here is a
    /// topology-definition bug and fails the whole build.
    pub fn new(name: &str, dims: &[usize]) -> Result<Self, EngineError> {
        if dims.len() < 2 {
            return Err(EngineError::DimensionMismatch {
                what: "layer chain length",
                expected: 2,
                got: dims.len(),
            });
        }

        let mut layers: Vec<Layer> = Vec::with_capacity(dims.len());
        layers.push(Layer::new(dims[0], 0));
        for pair in dims.windows(2) {
            let mut layer = Layer::new(pair[1], pair[0]);
            layer.connect_to_layer(&layers[layers.len() - 1])?;
            layers.push(layer);
        }

        Ok(Self {
            name: name.to_string(),
            layers,
            scratch: Vec::new(),
        })
    }

    /// The actor topology used by the trained policies:
    /// state -> 50 -> 10 -> 1 -> action.
    pub fn actor(name: &str, state_dim: usize, action_dim: usize) -> Result<Self, EngineError> {
        Self::new(name, &[state_dim, 50, 10, 1, action_dim])
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn input_dim(&self) -> usize {
        self.layers[0].num_neurons()
    }

    pub fn output_dim(&self) -> usize {
        self.layers[self.layers.len() - 1].num_neurons()
    }

    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn layer_mut(&mut self, index: usize) -> Option<&mut Layer> {
        self.layers.get_mut(index)
    }

    pub fn set_layer_weights(
        &mut self,
        layer: usize,
        matrix: &[Vec<f32>],
    ) -> Result<(), EngineError> {
        let len = self.layers.len();
        let target = self
            .layers
            .get_mut(layer)
            .ok_or(EngineError::OutOfRange { index: layer, len })?;
        target.set_weights(matrix)
    }

    pub fn set_layer_biases(&mut self, layer: usize, biases: &[f32]) -> Result<(), EngineError> {
        let len = self.layers.len();
        let target = self
            .layers
            .get_mut(layer)
            .ok_or(EngineError::OutOfRange { index: layer, len })?;
        target.set_biases(biases)
    }

    /// Apply post-load calibration constants. Run once after the generic
    /// parameter tables are in place.
    pub fn apply_calibration(&mut self, calibration: &Calibration) -> Result<(), EngineError> {
        for ov in &calibration.activations {
            let len = self.layers.len();
            let layer = self
                .layers
                .get_mut(ov.layer)
                .ok_or(EngineError::OutOfRange { index: ov.layer, len })?;
            let count = layer.num_neurons();
            let neuron = layer.neuron_mut(ov.neuron).ok_or(EngineError::OutOfRange {
                index: ov.neuron,
                len: count,
            })?;
            neuron.set_activation(ov.activation);
        }

        for ov in &calibration.weights {
            let len = self.layers.len();
            let layer = self
                .layers
                .get_mut(ov.layer)
                .ok_or(EngineError::OutOfRange { index: ov.layer, len })?;
            let count = layer.num_neurons();
            let neuron = layer.neuron_mut(ov.neuron).ok_or(EngineError::OutOfRange {
                index: ov.neuron,
                len: count,
            })?;
            if !neuron.set_weight(ov.slot, ov.value) {
                return Err(EngineError::OutOfRange {
                    index: ov.slot,
                    len: neuron.num_inputs(),
                });
            }
        }

        Ok(())
    }

    /// One full forward pass: inject `state` into the input layer, then
    /// propagate each later layer in strict order, each reading only
    /// outputs its predecessor already computed. Nothing is cached between
    /// calls; every call recomputes from the injected state.
    pub fn evaluate(&mut self, state: &[f32]) -> Result<Vec<f32>, EngineError> {
        self.layers[0].set_values(state)?;

        let mut scratch = core::mem::take(&mut self.scratch);
        for idx in 1..self.layers.len() {
            self.layers[idx - 1].outputs_into(&mut scratch);
            self.layers[idx].propagate(&scratch);
        }
        self.scratch = scratch;

        let mut action = Vec::with_capacity(self.output_dim());
        self.layers[self.layers.len() - 1].outputs_into(&mut action);
        Ok(action)
    }
}
