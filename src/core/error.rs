use core::fmt;

/// Engine-local failure conditions. All of these are non-fatal: the engine
/// reports them to the caller and leaves the target structure unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// A bulk weight/bias/value assignment disagreed with the target's
    /// declared arity or neuron count. No partial mutation happened.
    DimensionMismatch {
        what: &'static str,
        expected: usize,
        got: usize,
    },
    /// Wiring was attempted against an upstream layer whose neuron count
    /// does not match this layer's declared input arity.
    InvalidConnection {
        expected_inputs: usize,
        upstream_neurons: usize,
    },
    /// A layer, neuron or weight slot index past the end of its container.
    OutOfRange { index: usize, len: usize },
    /// The parameter file has no entry under this label.
    MissingLabel(String),
    /// The parameter file entry under this label is not a numeric vector or
    /// a rectangular numeric matrix.
    MalformedEntry { label: String, detail: String },
    /// A setup failure tagged with the parameter label being applied, so
    /// startup diagnostics can name the offending tensor.
    Labeled {
        label: String,
        cause: Box<EngineError>,
    },
}

impl EngineError {
    pub fn labeled(label: &str, cause: EngineError) -> Self {
        EngineError::Labeled {
            label: label.to_string(),
            cause: Box::new(cause),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::DimensionMismatch {
                what,
                expected,
                got,
            } => {
                write!(f, "dimension mismatch: {} expected {}, got {}", what, expected, got)
            }
            EngineError::InvalidConnection {
                expected_inputs,
                upstream_neurons,
            } => write!(
                f,
                "invalid connection: layer expects {} inputs but upstream has {} neurons",
                expected_inputs, upstream_neurons
            ),
            EngineError::OutOfRange { index, len } => {
                write!(f, "index {} out of range (len {})", index, len)
            }
            EngineError::MissingLabel(label) => {
                write!(f, "parameter file has no entry '{}'", label)
            }
            EngineError::MalformedEntry { label, detail } => {
                write!(f, "malformed parameter entry '{}': {}", label, detail)
            }
            EngineError::Labeled { label, cause } => {
                write!(f, "applying '{}': {}", label, cause)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for EngineError {}
