//! Error types for matrix operations

use thiserror::Error;

/// Errors raised by [`Matrix`](crate::Matrix) constructors and products
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MatrixError {
    /// Element buffer does not match the declared shape
    #[error("Matrix data has {actual} elements, expected {rows}x{cols} = {}", rows * cols)]
    DataLength {
        rows: usize,
        cols: usize,
        actual: usize,
    },

    /// Rows of unequal length were supplied
    #[error("Row {row} has {actual} columns, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// Operation requires a square matrix
    #[error("Matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    /// Inner dimensions of a product disagree
    #[error("Cannot multiply {lhs_rows}x{lhs_cols} by {rhs_rows}x{rhs_cols}")]
    ProductShape {
        lhs_rows: usize,
        lhs_cols: usize,
        rhs_rows: usize,
        rhs_cols: usize,
    },
}

/// Result type for matrix operations
pub type Result<T> = std::result::Result<T, MatrixError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_length_message() {
        let err = MatrixError::DataLength {
            rows: 2,
            cols: 2,
            actual: 3,
        };
        let msg = err.to_string();
        assert!(msg.contains("3 elements"));
        assert!(msg.contains("2x2 = 4"));
    }

    #[test]
    fn test_not_square_message() {
        let err = MatrixError::NotSquare { rows: 2, cols: 3 };
        assert!(err.to_string().contains("2x3"));
    }
}
