//! Append-only qudit circuits
//!
//! A [`Circuit`] records gates and measurements over `nq` qudits of a fixed
//! dimension `d` and `nc` classical dits, in program order. Construction is
//! validated step by step: a rejected step leaves the circuit exactly as it
//! was, and measured qudits can no longer be used by later steps.
//!
//! Circuits are data only. Executing one is the job of an engine that reads
//! the timeline through [`Circuit::iter`] or a [`Cursor`].
//!
//! # Example
//!
//! ```
//! use qudit_core::{Circuit, StepType};
//! use qudit_gates::matrices;
//!
//! let d = 3;
//! let mut circuit = Circuit::new(2, 1, d, Some("qutrit pair"))?;
//! circuit
//!     .gate(&matrices::fourier(d), 0, None)?
//!     .ctrl(&matrices::shift(d), 0, 1, None)?
//!     .measure_z(0, 0, None)?
//!     .cctrl(&matrices::shift(d), 0, 1, None)?;
//!
//! let types: Vec<StepType> = circuit.iter().map(|v| v.step_type()).collect();
//! assert_eq!(types[2], StepType::Measurement);
//! println!("{}", circuit);
//! # Ok::<(), qudit_core::CircuitError>(())
//! ```

pub mod circuit;
pub mod cursor;
pub mod dump;
pub mod error;
pub mod step;

pub use circuit::Circuit;
pub use cursor::{Cursor, Iter, StepView};
pub use error::{CircuitError, IndexSpace, Result};
pub use step::{
    Arity, ControlShape, GateKind, GateOp, GateStep, Indices, MeasureKind, MeasureOp, MeasureStep, Step,
    StepType,
};
