//! Execution engine for qudit circuits
//!
//! This crate runs [`qudit_core::Circuit`]s against a dense
//! [`qudit_state::Ket`]. The engine executes one step at a time, tracks the
//! classical register, and keeps each original qudit index mapped to its
//! position in the state as measurements remove qudits from it.
//!
//! # Features
//!
//! - **Step-wise execution**: drive the engine from a cursor or iterator, or
//!   run the whole circuit at once
//! - **Qudit control**: quantum and classical controls raise the operator to
//!   the control value
//! - **Reproducible sampling**: seeded runs via [`EngineConfig`]
//!
//! # Example
//!
//! ```
//! use qudit_core::Circuit;
//! use qudit_gates::{matrices, Matrix};
//! use qudit_sim::{Engine, EngineConfig};
//!
//! let mut circuit = Circuit::new(1, 1, 2, None)?;
//! circuit
//!     .gate(&Matrix::from_array(&matrices::HADAMARD), 0, None)?
//!     .measure_z(0, 0, None)?;
//!
//! let mut engine = Engine::with_config(&circuit, EngineConfig::new().with_seed(7))?;
//! let counts = engine.sample(100)?;
//! assert_eq!(counts.get("0") + counts.get("1"), 100);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod result;

pub use config::EngineConfig;
pub use engine::Engine;
pub use error::{EngineError, Result};
pub use result::MeasurementCounts;
