use crate::error::EngineError;
use crate::neuron::Neuron;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// A fully connected layer: an ordered run of neurons sharing one declared
/// input arity. The layer owns its neurons; the upstream layer is only
/// remembered by neuron count, wiring itself is index-based.
#[derive(Debug, Clone)]
pub struct Layer {
    neurons: Vec<Neuron>,
    num_inputs: usize,
    // Recorded on successful wiring; None until connect_to_layer succeeds.
    upstream_neurons: Option<usize>,
}

impl Layer {
    pub fn new(num_neurons: usize, num_inputs: usize) -> Self {
        Self {
            neurons: vec![Neuron::new(num_inputs, 0.0, 0.0); num_neurons],
            num_inputs,
            upstream_neurons: None,
        }
    }

    pub fn num_neurons(&self) -> usize {
        self.neurons.len()
    }

    pub fn num_inputs(&self) -> usize {
        self.num_inputs
    }

    pub fn is_wired(&self) -> bool {
        self.upstream_neurons.is_some()
    }

    pub fn neuron(&self, index: usize) -> Option<&Neuron> {
        self.neurons.get(index)
    }

    pub fn neuron_mut(&mut self, index: usize) -> Option<&mut Neuron> {
        self.neurons.get_mut(index)
    }

    /// Wire every neuron's slot j to upstream neuron j. Succeeds only when
    /// the upstream neuron count equals this layer's declared input arity;
    /// on failure nothing is mutated.
    pub fn connect_to_layer(&mut self, upstream: &Layer) -> Result<(), EngineError> {
        if upstream.num_neurons() != self.num_inputs {
            return Err(EngineError::InvalidConnection {
                expected_inputs: self.num_inputs,
                upstream_neurons: upstream.num_neurons(),
            });
        }

        for neuron in &mut self.neurons {
            for j in 0..self.num_inputs {
                neuron.connect(j, j);
            }
        }
        self.upstream_neurons = Some(upstream.num_neurons());
        Ok(())
    }

    /// Propagate every neuron against the upstream output slice. Neurons in
    /// one layer never read each other, so order does not matter; with the
    /// `parallel` feature this fans out across cores with no observable
    /// difference.
    pub fn propagate(&mut self, upstream_outputs: &[f32]) {
        #[cfg(feature = "parallel")]
        self.neurons
            .par_iter_mut()
            .for_each(|n| n.propagate(upstream_outputs));

        #[cfg(not(feature = "parallel"))]
        for neuron in &mut self.neurons {
            neuron.propagate(upstream_outputs);
        }
    }

    /// Bulk weight assignment. `matrix` is indexed `[input][neuron]`, the
    /// layout trained-parameter exports use, so the assignment transposes:
    /// `neuron[n].weight[i] = matrix[i][n]`. Dimensions are validated in
    /// full before any neuron is touched.
    pub fn set_weights(&mut self, matrix: &[Vec<f32>]) -> Result<(), EngineError> {
        if matrix.len() != self.num_inputs {
            return Err(EngineError::DimensionMismatch {
                what: "weight matrix rows",
                expected: self.num_inputs,
                got: matrix.len(),
            });
        }
        for row in matrix {
            if row.len() != self.neurons.len() {
                return Err(EngineError::DimensionMismatch {
                    what: "weight matrix columns",
                    expected: self.neurons.len(),
                    got: row.len(),
                });
            }
        }

        for (n, neuron) in self.neurons.iter_mut().enumerate() {
            for (i, row) in matrix.iter().enumerate() {
                neuron.set_weight(i, row[n]);
            }
        }
        Ok(())
    }

    pub fn set_biases(&mut self, biases: &[f32]) -> Result<(), EngineError> {
        if biases.len() != self.neurons.len() {
            return Err(EngineError::DimensionMismatch {
                what: "bias vector",
                expected: self.neurons.len(),
                got: biases.len(),
            });
        }

        for (neuron, bias) in self.neurons.iter_mut().zip(biases) {
            neuron.set_bias(*bias);
        }
        Ok(())
    }

    /// Inject external values as this layer's outputs, bypassing
    /// propagation. Only meaningful on a network's input layer.
    pub fn set_values(&mut self, values: &[f32]) -> Result<(), EngineError> {
        if values.len() != self.neurons.len() {
            return Err(EngineError::DimensionMismatch {
                what: "value vector",
                expected: self.neurons.len(),
                got: values.len(),
            });
        }

        for (neuron, value) in self.neurons.iter_mut().zip(values) {
            neuron.set_output(*value);
        }
        Ok(())
    }

    /// Collect every neuron's current output into `buf` (cleared first).
    pub fn outputs_into(&self, buf: &mut Vec<f32>) {
        buf.clear();
        buf.extend(self.neurons.iter().map(|n| n.output()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neuron::Activation;

    #[test]
    fn connect_requires_matching_arity() {
        let upstream = Layer::new(3, 0);
        let mut layer = Layer::new(2, 3);
        assert!(layer.connect_to_layer(&upstream).is_ok());
        assert!(layer.is_wired());
    }

    #[test]
    fn connect_mismatch_leaves_layer_unwired() {
        let upstream = Layer::new(4, 0);
        let mut layer = Layer::new(2, 3);

        let err = layer.connect_to_layer(&upstream).unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidConnection {
                expected_inputs: 3,
                upstream_neurons: 4,
            }
        );
        assert!(!layer.is_wired());

        // a second, valid wiring still succeeds
        let good = Layer::new(3, 0);
        assert!(layer.connect_to_layer(&good).is_ok());
    }

    #[test]
    fn set_weights_transposes_exactly() {
        let mut layer = Layer::new(2, 3);
        let matrix = vec![
            vec![1.0, 2.0], // input 0 -> neurons 0, 1
            vec![3.0, 4.0],
            vec![5.0, 6.0],
        ];
        layer.set_weights(&matrix).unwrap();

        for n in 0..2 {
            for i in 0..3 {
                assert_eq!(layer.neuron(n).unwrap().weight(i), matrix[i][n]);
            }
        }
    }

    #[test]
    fn set_weights_rejects_bad_shapes_without_mutation() {
        let mut layer = Layer::new(2, 3);
        layer
            .set_weights(&[vec![9.0, 9.0], vec![9.0, 9.0], vec![9.0, 9.0]])
            .unwrap();

        // wrong outer length
        assert!(matches!(
            layer.set_weights(&[vec![0.0, 0.0]]),
            Err(EngineError::DimensionMismatch { .. })
        ));
        // ragged inner row
        assert!(matches!(
            layer.set_weights(&[vec![0.0, 0.0], vec![0.0], vec![0.0, 0.0]]),
            Err(EngineError::DimensionMismatch { .. })
        ));

        // previous weights untouched
        for n in 0..2 {
            for i in 0..3 {
                assert_eq!(layer.neuron(n).unwrap().weight(i), 9.0);
            }
        }
    }

    #[test]
    fn set_biases_checks_length() {
        let mut layer = Layer::new(2, 1);
        assert!(layer.set_biases(&[0.1, 0.2]).is_ok());
        assert!(layer.set_biases(&[0.1]).is_err());
        assert_eq!(layer.neuron(1).unwrap().bias(), 0.2);
    }

    #[test]
    fn set_values_injects_outputs_directly() {
        let mut layer = Layer::new(3, 0);
        layer.set_values(&[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(layer.neuron(2).unwrap().output(), 3.0);

        assert!(layer.set_values(&[1.0, 2.0]).is_err());
    }

    #[test]
    fn propagate_reads_upstream_outputs() {
        let mut upstream = Layer::new(2, 0);
        upstream.set_values(&[1.0, -2.0]).unwrap();

        let mut layer = Layer::new(1, 2);
        layer.connect_to_layer(&upstream).unwrap();
        layer.set_weights(&[vec![3.0], vec![0.5]]).unwrap();
        if let Some(n) = layer.neuron_mut(0) {
            n.set_activation(Activation::Linear);
        }

        let mut outputs = Vec::new();
        upstream.outputs_into(&mut outputs);
        layer.propagate(&outputs);

        // 1.0 * 3.0 + (-2.0) * 0.5
        assert_eq!(layer.neuron(0).unwrap().output(), 2.0);
    }
}
