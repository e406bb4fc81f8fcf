//! Error types for state vector operations

use qudit_gates::MatrixError;
use thiserror::Error;

/// Errors that can occur during state vector operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StateError {
    /// Subsystem position outside the live tensor product
    #[error("Invalid subsystem {index} for {num_qudits}-qudit state")]
    InvalidSubsystem { index: usize, num_qudits: usize },

    /// Same subsystem listed twice
    #[error("Subsystem {index} listed more than once")]
    DuplicateSubsystem { index: usize },

    /// Qudit dimension below 2
    #[error("Invalid qudit dimension {dimension}, must be at least 2")]
    InvalidDimension { dimension: usize },

    /// Dimension mismatch between operator/amplitudes and subsystems
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Operator must be square
    #[error("Operator must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    /// State would not fit in memory addressable by usize
    #[error("State with {num_qudits} qudits of dimension {dimension} is too large")]
    TooLarge { num_qudits: usize, dimension: usize },

    /// Measurement basis has no columns
    #[error("Measurement basis has no columns")]
    EmptyBasis,

    /// Operator algebra failed
    #[error("Matrix error: {0}")]
    Matrix(#[from] MatrixError),

    /// All measurement branches have zero probability
    #[error("Measurement outcome probabilities sum to zero")]
    ZeroNorm,
}

/// Result type for state vector operations
pub type Result<T> = std::result::Result<T, StateError>;
