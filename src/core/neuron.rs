/// Nonlinearity applied to a neuron's internal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Activation {
    #[default]
    ReLU,
    Tanh,
    Sigmoid,
    Linear,
}

impl Activation {
    #[inline]
    pub fn apply(self, state: f32) -> f32 {
        match self {
            Activation::ReLU => {
                if state > 0.0 {
                    state
                } else {
                    0.0
                }
            }
            Activation::Tanh => state.tanh(),
            Activation::Sigmoid => 1.0 / (1.0 + (-state).exp()),
            Activation::Linear => state,
        }
    }
}

/// A continuous-state scalar neuron.
///
/// Input wiring is arena-style: each input slot holds an index into the
/// upstream layer's neuron container, never an ownership handle. Indices are
/// only meaningful relative to the layer the owning [`crate::network::Network`]
/// wires this neuron against.
#[derive(Debug, Clone)]
pub struct Neuron {
    num_inputs: usize,
    state: f32,
    output: f32,
    // inputs[slot] = index of the source neuron in the upstream layer.
    inputs: Vec<Option<usize>>,
    weights: Vec<f32>,
    bias: f32,
    // Linear blend of the previous state with the new input signal:
    // state = retention * state + (1 - retention) * signal + bias.
    // Always 0.0 in the shipped policies; kept as a tunable field.
    retention: f32,
    activation: Activation,
}

impl Neuron {
    pub fn new(num_inputs: usize, init_weight: f32, init_bias: f32) -> Self {
        Self {
            num_inputs,
            state: 0.0,
            output: 0.0,
            inputs: vec![None; num_inputs],
            weights: vec![init_weight; num_inputs],
            bias: init_bias,
            retention: 0.0,
            activation: Activation::default(),
        }
    }

    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    pub fn output(&self) -> f32 {
        self.output
    }

    /// Bind an input slot to a source neuron index in the upstream layer.
    /// Returns false when the slot is out of range. Acyclicity is the
    /// wiring caller's responsibility.
    pub fn connect(&mut self, slot: usize, source: usize) -> bool {
        match self.inputs.get_mut(slot) {
            Some(entry) => {
                *entry = Some(source);
                true
            }
            None => false,
        }
    }

    /// Recompute state and output from the upstream layer's output slice.
    /// Unwired slots contribute nothing. Mutates only this neuron.
    pub fn propagate(&mut self, upstream: &[f32]) {
        let mut signal = 0.0f32;
        for (input, weight) in self.inputs.iter().zip(&self.weights) {
            if let Some(source) = input {
                signal += upstream.get(*source).copied().unwrap_or(0.0) * weight;
            }
        }

        self.state = self.retention * self.state + (1.0 - self.retention) * signal + self.bias;
        self.output = self.activation.apply(self.state);
    }

    /// Out-of-range slots read back as 0.0 rather than failing.
    pub fn weight(&self, slot: usize) -> f32 {
        self.weights.get(slot).copied().unwrap_or(0.0)
    }

    pub fn set_weight(&mut self, slot: usize, value: f32) -> bool {
        match self.weights.get_mut(slot) {
            Some(w) => {
                *w = value;
                true
            }
            None => false,
        }
    }

    pub fn bias(&self) -> f32 {
        self.bias
    }

    pub fn set_bias(&mut self, bias: f32) {
        self.bias = bias;
    }

    pub fn activation(&self) -> Activation {
        self.activation
    }

    pub fn set_activation(&mut self, activation: Activation) {
        self.activation = activation;
    }

    pub fn retention(&self) -> f32 {
        self.retention
    }

    /// How much of the previous state carries forward on each propagation.
    /// No policy shipped so far uses a nonzero value.
    pub fn set_retention(&mut self, retention: f32) {
        self.retention = retention;
    }

    /// Directly override the output value, bypassing propagation. Only for
    /// injecting external input into a network's first layer; must not be
    /// used on a neuron that also receives propagated input.
    pub fn set_output(&mut self, value: f32) {
        self.output = value;
    }
}
