//! Error types for the engine

use qudit_core::CircuitError;
use qudit_gates::MatrixError;
use qudit_state::StateError;
use std::fmt;

/// Result type for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors that can occur while executing a circuit
#[derive(Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Step or cursor does not belong to the engine's circuit, or is not
    /// dereferenceable
    InvalidCursor(String),

    /// Step touches a qudit that was already measured
    AlreadyMeasured(usize),

    /// Qudit or dit index out of range
    IndexOutOfRange {
        index: usize,
        bound: usize,
    },

    /// Invalid configuration
    InvalidConfig(String),

    /// Initial state exceeds the configured memory limit
    OutOfMemory {
        requested: usize,
        limit: usize,
    },

    /// Error raised by the circuit
    Circuit(CircuitError),

    /// Error raised by a state operation
    State(StateError),

    /// Error raised by operator algebra
    Matrix(MatrixError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::InvalidCursor(msg) => write!(f, "Invalid cursor: {}", msg),
            EngineError::AlreadyMeasured(qudit) => {
                write!(f, "Qudit {} was already measured", qudit)
            }
            EngineError::IndexOutOfRange { index, bound } => {
                write!(f, "Index {} out of range, must be below {}", index, bound)
            }
            EngineError::InvalidConfig(msg) => {
                write!(f, "Invalid configuration: {}", msg)
            }
            EngineError::OutOfMemory { requested, limit } => {
                write!(
                    f,
                    "Out of memory: requested {} bytes, limit {} bytes",
                    requested, limit
                )
            }
            EngineError::Circuit(err) => write!(f, "Circuit error: {}", err),
            EngineError::State(err) => write!(f, "State error: {}", err),
            EngineError::Matrix(err) => write!(f, "Matrix error: {}", err),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Circuit(err) => Some(err),
            EngineError::State(err) => Some(err),
            EngineError::Matrix(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CircuitError> for EngineError {
    fn from(err: CircuitError) -> Self {
        match err {
            CircuitError::InvalidCursor(msg) => EngineError::InvalidCursor(msg.to_string()),
            other => EngineError::Circuit(other),
        }
    }
}

impl From<StateError> for EngineError {
    fn from(err: StateError) -> Self {
        EngineError::State(err)
    }
}

impl From<MatrixError> for EngineError {
    fn from(err: MatrixError) -> Self {
        EngineError::Matrix(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_cursor_errors_stay_cursor_errors() {
        let err: EngineError = CircuitError::InvalidCursor("cursor is past the last step").into();
        assert_eq!(err, EngineError::InvalidCursor("cursor is past the last step".to_string()));
        assert!(err.source().is_none());
    }

    #[test]
    fn test_wrapped_errors_keep_source() {
        let err: EngineError = StateError::ZeroNorm.into();
        assert!(err.to_string().starts_with("State error:"));
        assert!(err.source().is_some());

        let err: EngineError = CircuitError::AlreadyMeasured(3).into();
        assert!(err.to_string().contains('3'));
    }
}
