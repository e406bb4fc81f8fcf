//! Qudit state vectors with operator application and destructive measurement
//!
//! This crate provides the state side of the workspace: a dense [`Ket`]
//! over `n` qudits of dimension `d`, operator application on arbitrary
//! subsystems (optionally qudit-controlled), and measurement primitives that
//! remove the measured factors from the tensor product.
//!
//! # Layout
//!
//! Qudit 0 is the most significant digit of the amplitude index. After a
//! measurement the surviving qudits keep their relative order and close the
//! gap, so a caller tracking original indices must shift every index to the
//! right of the removed one down by one.
//!
//! # Example
//!
//! ```
//! use qudit_gates::{matrices, Matrix};
//! use qudit_state::{measure_sequential, zero_state};
//! use rand::SeedableRng;
//!
//! let mut psi = zero_state(2, 2).unwrap();
//! psi.apply(&Matrix::from_array(&matrices::HADAMARD), &[0]).unwrap();
//! psi.apply_controlled(&Matrix::from_array(&matrices::PAULI_X), &[0], &[1]).unwrap();
//!
//! let mut rng = rand::rngs::StdRng::seed_from_u64(42);
//! let m = measure_sequential(&psi, &[0, 1], &mut rng).unwrap();
//! assert_eq!(m.outcomes[0], m.outcomes[1]);
//! ```

pub mod error;
pub mod ket;
pub mod measurement;

pub use error::{Result, StateError};
pub use ket::{zero_state, Ket};
pub use measurement::{measure, measure_sequential, Measurement, SequentialMeasurement};
