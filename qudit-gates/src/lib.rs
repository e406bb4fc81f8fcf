//! Matrix algebra and gate library for qudit circuits
//!
//! This crate provides the operator side of the workspace:
//!
//! - [`Matrix`]: dense row-major complex matrices with product, Kronecker
//!   product, integer power and adjoint
//! - [`matrices`]: standard qubit gates as constants plus qudit generators
//!   (shift, clock, Fourier, controlled shift) for any dimension
//! - [`lookup`]: the shared named-gate table used to label circuit steps
//!
//! # Example
//!
//! ```
//! use qudit_gates::{lookup_name, matrices, Matrix};
//!
//! let h = Matrix::from_array(&matrices::HADAMARD);
//! assert!(h.is_unitary(1e-10));
//! assert_eq!(lookup_name(&h), "H");
//! ```

pub mod error;
pub mod lookup;
pub mod matrices;
pub mod matrix;

pub use error::{MatrixError, Result};
pub use lookup::{lookup_name, GateTable};
pub use matrix::Matrix;
pub use num_complex::Complex64;
