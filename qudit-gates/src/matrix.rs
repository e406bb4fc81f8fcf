//! Dense complex matrices for qudit operators
//!
//! [`Matrix`] stores its elements in row-major order. Gate operators are
//! square `d^k × d^k` matrices; measurement bases may have fewer columns than
//! rows, one column per basis vector (or rank-one projector).
//!
//! # Example
//!
//! ```rust
//! use qudit_gates::{matrices, Matrix};
//!
//! let x = Matrix::from_array(&matrices::PAULI_X);
//! let xx = x.kron(&x);
//! assert_eq!(xx.rows(), 4);
//! assert!(x.pow(2).unwrap().approx_eq(&Matrix::identity(2), 1e-12));
//! ```

use crate::error::{MatrixError, Result};
use num_complex::Complex64;
use std::fmt;
use std::ops::Index;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// Dense row-major complex matrix
#[derive(Clone, Debug, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Complex64>,
}

impl Matrix {
    /// Create a matrix from a row-major element buffer
    ///
    /// # Errors
    /// Returns [`MatrixError::DataLength`] if `data.len() != rows * cols`
    pub fn new(rows: usize, cols: usize, data: Vec<Complex64>) -> Result<Self> {
        if data.len() != rows * cols {
            return Err(MatrixError::DataLength {
                rows,
                cols,
                actual: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    pub(crate) fn from_parts(rows: usize, cols: usize, data: Vec<Complex64>) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self { rows, cols, data }
    }

    /// Create a matrix from a list of rows
    ///
    /// # Errors
    /// Returns [`MatrixError::RaggedRows`] if the rows differ in length
    pub fn from_rows(rows: &[Vec<Complex64>]) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for (row, values) in rows.iter().enumerate() {
            if values.len() != cols {
                return Err(MatrixError::RaggedRows {
                    row,
                    expected: cols,
                    actual: values.len(),
                });
            }
            data.extend_from_slice(values);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Create a square matrix from a fixed-size array
    pub fn from_array<const N: usize>(array: &[[Complex64; N]; N]) -> Self {
        Self {
            rows: N,
            cols: N,
            data: array.iter().flatten().copied().collect(),
        }
    }

    /// Create a square matrix from real entries
    ///
    /// # Panics
    /// Panics if `entries.len()` is not a perfect square
    pub fn from_real(entries: &[f64]) -> Self {
        let n = (entries.len() as f64).sqrt().round() as usize;
        assert_eq!(n * n, entries.len(), "Real entries must form a square matrix");
        Self {
            rows: n,
            cols: n,
            data: entries.iter().map(|&re| Complex64::new(re, 0.0)).collect(),
        }
    }

    /// Create a zero matrix
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![ZERO; rows * cols],
        }
    }

    /// Create an `n × n` identity matrix
    pub fn identity(n: usize) -> Self {
        let mut matrix = Self::zeros(n, n);
        for i in 0..n {
            matrix.data[i * n + i] = ONE;
        }
        matrix
    }

    /// Number of rows
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Whether the matrix has as many rows as columns
    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Row-major element slice
    #[inline]
    pub fn as_slice(&self) -> &[Complex64] {
        &self.data
    }

    /// Element at `(row, col)`, or `None` if out of bounds
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<Complex64> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Copy of column `col`
    pub fn column(&self, col: usize) -> Vec<Complex64> {
        (0..self.rows).map(|r| self.data[r * self.cols + col]).collect()
    }

    /// Matrix product `self * rhs`
    ///
    /// # Errors
    /// Returns [`MatrixError::ProductShape`] if the inner dimensions differ
    pub fn matmul(&self, rhs: &Matrix) -> Result<Matrix> {
        if self.cols != rhs.rows {
            return Err(MatrixError::ProductShape {
                lhs_rows: self.rows,
                lhs_cols: self.cols,
                rhs_rows: rhs.rows,
                rhs_cols: rhs.cols,
            });
        }
        Ok(self.mul_unchecked(rhs))
    }

    fn mul_unchecked(&self, rhs: &Matrix) -> Matrix {
        let mut result = Matrix::zeros(self.rows, rhs.cols);
        for i in 0..self.rows {
            for k in 0..self.cols {
                let a_ik = self.data[i * self.cols + k];
                if a_ik == ZERO {
                    continue;
                }
                for j in 0..rhs.cols {
                    result.data[i * rhs.cols + j] += a_ik * rhs.data[k * rhs.cols + j];
                }
            }
        }
        result
    }

    /// Kronecker (tensor) product `self ⊗ rhs`
    pub fn kron(&self, rhs: &Matrix) -> Matrix {
        let rows = self.rows * rhs.rows;
        let cols = self.cols * rhs.cols;
        let mut result = Matrix::zeros(rows, cols);
        for i in 0..self.rows {
            for j in 0..self.cols {
                let a_ij = self.data[i * self.cols + j];
                for k in 0..rhs.rows {
                    for l in 0..rhs.cols {
                        let row = i * rhs.rows + k;
                        let col = j * rhs.cols + l;
                        result.data[row * cols + col] = a_ij * rhs.data[k * rhs.cols + l];
                    }
                }
            }
        }
        result
    }

    /// `n`-fold Kronecker power; `kron_pow(0)` is the `1 × 1` identity
    pub fn kron_pow(&self, n: usize) -> Matrix {
        let mut result = Matrix::identity(1);
        for _ in 0..n {
            result = result.kron(self);
        }
        result
    }

    /// Conjugate transpose
    pub fn adjoint(&self) -> Matrix {
        let mut result = Matrix::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                result.data[j * self.rows + i] = self.data[i * self.cols + j].conj();
            }
        }
        result
    }

    /// Integer matrix power by repeated squaring; `pow(0)` is the identity
    ///
    /// # Errors
    /// Returns [`MatrixError::NotSquare`] for non-square matrices
    pub fn pow(&self, exponent: usize) -> Result<Matrix> {
        if !self.is_square() {
            return Err(MatrixError::NotSquare {
                rows: self.rows,
                cols: self.cols,
            });
        }
        let mut result = Matrix::identity(self.rows);
        let mut base = self.clone();
        let mut k = exponent;
        while k > 0 {
            if k & 1 == 1 {
                result = result.mul_unchecked(&base);
            }
            k >>= 1;
            if k > 0 {
                base = base.mul_unchecked(&base);
            }
        }
        Ok(result)
    }

    /// Element-wise comparison within `tolerance`
    pub fn approx_eq(&self, other: &Matrix, tolerance: f64) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| (a - b).norm() <= tolerance)
    }

    /// Check `U†U = I` within `tolerance`
    pub fn is_unitary(&self, tolerance: f64) -> bool {
        self.is_square()
            && self
                .adjoint()
                .mul_unchecked(self)
                .approx_eq(&Matrix::identity(self.rows), tolerance)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = Complex64;

    fn index(&self, (row, col): (usize, usize)) -> &Complex64 {
        assert!(
            row < self.rows && col < self.cols,
            "Index ({}, {}) out of bounds for {}x{} matrix",
            row,
            col,
            self.rows,
            self.cols
        );
        &self.data[row * self.cols + col]
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            for c in 0..self.cols {
                if c > 0 {
                    write!(f, "  ")?;
                }
                let z = self.data[r * self.cols + c];
                write!(f, "{:.4}{:+.4}i", z.re, z.im)?;
            }
            if r + 1 < self.rows {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}
