use std::fmt;

/// Result type for ffnet operations
pub type Result<T> = std::result::Result<T, FfnError>;

/// Main error type for the ffnet library
#[derive(Debug, Clone, PartialEq)]
pub enum FfnError {
    /// A supplied vector's dimensionality disagrees with the layer's declared size
    ShapeMismatch {
        expected: usize,
        actual: usize,
    },

    /// Propagation was called out of the initialize -> forward -> backward order
    ProtocolViolation {
        operation: &'static str,
        requires: &'static str,
    },

    /// Invalid construction parameter
    InvalidConfiguration {
        name: String,
        reason: String,
    },
}

impl fmt::Display for FfnError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FfnError::ShapeMismatch { expected, actual } => {
                write!(f, "Shape mismatch: expected {}, got {}", expected, actual)
            }
            FfnError::ProtocolViolation { operation, requires } => {
                write!(f, "Protocol violation: {} requires {}", operation, requires)
            }
            FfnError::InvalidConfiguration { name, reason } => {
                write!(f, "Invalid configuration '{}': {}", name, reason)
            }
        }
    }
}

impl std::error::Error for FfnError {}

// Helper constructors for common error patterns
impl FfnError {
    pub fn shape_mismatch(expected: usize, actual: usize) -> Self {
        FfnError::ShapeMismatch { expected, actual }
    }

    pub fn protocol_violation(operation: &'static str, requires: &'static str) -> Self {
        FfnError::ProtocolViolation { operation, requires }
    }

    pub fn invalid_configuration<S: Into<String>>(name: S, reason: S) -> Self {
        FfnError::InvalidConfiguration {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
