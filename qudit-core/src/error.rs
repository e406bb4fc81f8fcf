//! Error types for circuit construction and traversal

use thiserror::Error;

/// Which index space an out-of-range index belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSpace {
    /// Quantum register
    Qudit,
    /// Classical register
    Dit,
}

impl std::fmt::Display for IndexSpace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IndexSpace::Qudit => write!(f, "qudit"),
            IndexSpace::Dit => write!(f, "dit"),
        }
    }
}

/// Errors that can occur while building or traversing a circuit
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CircuitError {
    /// Empty operand list or zero-qudit circuit
    #[error("Invalid shape: {0}")]
    InvalidShape(&'static str),

    /// Index past the end of its register
    #[error("Invalid {space} index {index}: circuit has only {bound}")]
    IndexOutOfRange {
        space: IndexSpace,
        index: usize,
        bound: usize,
    },

    /// Qudit already scheduled for measurement
    #[error("Qudit {0} was already measured")]
    AlreadyMeasured(usize),

    /// Index repeated within a list or shared between control and target
    #[error("Duplicate index {0} in gate operands")]
    DuplicateIndex(usize),

    /// Operator or measurement basis of the wrong shape for its operands
    #[error("Operator of shape {rows}x{cols} does not act on a {expected}-dimensional space")]
    OperatorShapeMismatch {
        rows: usize,
        cols: usize,
        expected: usize,
    },

    /// Qudit dimension below 2
    #[error("Invalid qudit dimension {0}, must be at least 2")]
    InvalidDimension(usize),

    /// Cursor detached, exhausted, or advanced past the end
    #[error("Invalid cursor: {0}")]
    InvalidCursor(&'static str),

    /// Operation declared but not available
    #[error("{0} is not implemented")]
    Unimplemented(&'static str),

    /// JSON rendering failed
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl CircuitError {
    /// Create a qudit out-of-range error
    pub fn qudit_out_of_range(index: usize, nq: usize) -> Self {
        Self::IndexOutOfRange {
            space: IndexSpace::Qudit,
            index,
            bound: nq,
        }
    }

    /// Create a dit out-of-range error
    pub fn dit_out_of_range(index: usize, nc: usize) -> Self {
        Self::IndexOutOfRange {
            space: IndexSpace::Dit,
            index,
            bound: nc,
        }
    }
}

/// Result type for circuit operations
pub type Result<T> = std::result::Result<T, CircuitError>;
