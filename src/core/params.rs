use serde_json::Value;

use crate::error::EngineError;
use crate::network::{Calibration, Network};

/// An in-memory view of a trained-parameter file: a JSON object mapping
/// string labels to bias vectors or weight matrices. Weight matrices are
/// stored `[input][neuron]`, the layout the training export writes.
#[derive(Debug, Clone)]
pub struct ParameterFile {
    table: serde_json::Map<String, Value>,
}

impl ParameterFile {
    pub fn from_str(text: &str) -> Result<Self, EngineError> {
        let value: Value = serde_json::from_str(text).map_err(|e| EngineError::MalformedEntry {
            label: "<file>".to_string(),
            detail: e.to_string(),
        })?;
        match value {
            Value::Object(table) => Ok(Self { table }),
            other => Err(EngineError::MalformedEntry {
                label: "<file>".to_string(),
                detail: format!("expected a JSON object at the top level, got {}", other),
            }),
        }
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(|k| k.as_str())
    }

    /// The bias vector stored under `label`.
    pub fn biases(&self, label: &str) -> Result<Vec<f32>, EngineError> {
        let entry = self
            .table
            .get(label)
            .ok_or_else(|| EngineError::MissingLabel(label.to_string()))?;
        let rows = entry.as_array().ok_or_else(|| EngineError::MalformedEntry {
            label: label.to_string(),
            detail: "expected an array of numbers".to_string(),
        })?;
        rows.iter().map(|v| scalar(label, v)).collect()
    }

    /// The `[input][neuron]` weight matrix stored under `label`. Ragged
    /// matrices are rejected here, before any layer sees them.
    pub fn weights(&self, label: &str) -> Result<Vec<Vec<f32>>, EngineError> {
        let entry = self
            .table
            .get(label)
            .ok_or_else(|| EngineError::MissingLabel(label.to_string()))?;
        let rows = entry.as_array().ok_or_else(|| EngineError::MalformedEntry {
            label: label.to_string(),
            detail: "expected an array of arrays".to_string(),
        })?;

        let mut matrix = Vec::with_capacity(rows.len());
        for row in rows {
            let row = row.as_array().ok_or_else(|| EngineError::MalformedEntry {
                label: label.to_string(),
                detail: "expected every row to be an array of numbers".to_string(),
            })?;
            let row: Vec<f32> = row
                .iter()
                .map(|v| scalar(label, v))
                .collect::<Result<_, _>>()?;
            matrix.push(row);
        }

        if let Some(first) = matrix.first() {
            let width = first.len();
            if matrix.iter().any(|row| row.len() != width) {
                return Err(EngineError::MalformedEntry {
                    label: label.to_string(),
                    detail: "ragged weight matrix".to_string(),
                });
            }
        }
        Ok(matrix)
    }
}

fn scalar(label: &str, value: &Value) -> Result<f32, EngineError> {
    value
        .as_f64()
        .map(|v| v as f32)
        .ok_or_else(|| EngineError::MalformedEntry {
            label: label.to_string(),
            detail: format!("non-numeric value {}", value),
        })
}

/// Parameter labels for one trained layer.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LayerParams {
    pub weights: String,
    pub biases: String,
}

/// Everything needed to turn a parameter file into a ready actor network:
/// topology dims, the labels of each trained layer in chain order, and the
/// post-load calibration constants.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PolicySpec {
    pub name: String,
    pub state_dim: usize,
    pub hidden: Vec<usize>,
    pub action_dim: usize,
    /// Labels applied to consecutive layers starting after the input layer.
    pub layers: Vec<LayerParams>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub calibration: Calibration,
}

impl PolicySpec {
    /// The policy shipped with the original pendulum agent.
    pub fn pendulum_actor() -> Self {
        Self {
            name: "pendulum_actor".to_string(),
            state_dim: 3,
            hidden: vec![50, 10, 1],
            action_dim: 1,
            layers: (1..=3)
                .map(|i| LayerParams {
                    weights: format!("actor_layer_{}_w", i),
                    biases: format!("actor_layer_{}_b", i),
                })
                .collect(),
            calibration: Calibration::pendulum_actor(),
        }
    }

    pub fn build(&self) -> Result<Network, EngineError> {
        let mut dims = Vec::with_capacity(self.hidden.len() + 2);
        dims.push(self.state_dim);
        dims.extend_from_slice(&self.hidden);
        dims.push(self.action_dim);
        Network::new(&self.name, &dims)
    }
}

/// Setup routine: apply every labeled weight/bias table to the network in
/// chain order, then the calibration constants. Fails fast on the first
/// tensor whose shape disagrees with the compiled topology, naming its
/// label; the target layer is left unchanged by a failed application.
pub fn load_actor(
    net: &mut Network,
    file: &ParameterFile,
    spec: &PolicySpec,
) -> Result<(), EngineError> {
    for (idx, layer) in spec.layers.iter().enumerate() {
        // layer 0 is the value-injected input layer
        let target = idx + 1;

        let weights = file.weights(&layer.weights)?;
        net.set_layer_weights(target, &weights)
            .map_err(|e| EngineError::labeled(&layer.weights, e))?;

        let biases = file.biases(&layer.biases)?;
        net.set_layer_biases(target, &biases)
            .map_err(|e| EngineError::labeled(&layer.biases, e))?;
    }

    net.apply_calibration(&spec.calibration)
}
