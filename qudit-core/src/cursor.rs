//! Read-only traversal of a circuit timeline
//!
//! [`Cursor`] is a bounds-checked position in the timeline that reports
//! misuse as [`CircuitError::InvalidCursor`] instead of panicking.
//! [`Iter`] is the plain Rust iterator over the same sequence. Both yield
//! [`StepView`]s, which remember the circuit they came from so an engine can
//! refuse steps from another circuit.

use crate::circuit::Circuit;
use crate::error::{CircuitError, Result};
use crate::step::{Step, StepType};
use std::fmt;

/// A step together with its circuit and timeline position
#[derive(Clone, Copy, Debug)]
pub struct StepView<'c> {
    circuit: &'c Circuit,
    ip: usize,
    step: &'c Step,
}

impl<'c> StepView<'c> {
    /// Circuit the step belongs to
    #[inline]
    pub fn circuit(&self) -> &'c Circuit {
        self.circuit
    }

    /// Timeline position
    #[inline]
    pub fn ip(&self) -> usize {
        self.ip
    }

    #[inline]
    pub fn step(&self) -> &'c Step {
        self.step
    }

    #[inline]
    pub fn step_type(&self) -> StepType {
        self.step.step_type()
    }
}

impl fmt::Display for StepView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.circuit.step_count().to_string().len() + 1;
        write!(f, "{:<width$}", self.ip, width = width)?;
        match self.step {
            Step::Gate(gate) => write!(f, "{}", gate),
            Step::Measurement(measurement) => write!(f, "|> {}", measurement),
        }
    }
}

/// Bounds-checked forward cursor over a circuit timeline
///
/// A default cursor is detached from any circuit and can be neither
/// dereferenced nor advanced.
///
/// # Example
/// ```
/// use qudit_core::{Circuit, CircuitError};
/// use qudit_gates::{matrices, Matrix};
///
/// let mut circuit = Circuit::new(1, 1, 2, None).unwrap();
/// circuit.gate(&Matrix::from_array(&matrices::HADAMARD), 0, None).unwrap();
///
/// let mut cursor = circuit.begin();
/// assert_eq!(cursor.get().unwrap().ip(), 0);
/// cursor.advance().unwrap();
/// assert_eq!(cursor, circuit.end());
/// assert!(matches!(cursor.get(), Err(CircuitError::InvalidCursor(_))));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Cursor<'c> {
    circuit: Option<&'c Circuit>,
    ip: usize,
}

impl<'c> Cursor<'c> {
    pub(crate) fn new(circuit: &'c Circuit, ip: usize) -> Self {
        Self {
            circuit: Some(circuit),
            ip,
        }
    }

    /// Circuit being traversed; `None` when detached
    #[inline]
    pub fn circuit(&self) -> Option<&'c Circuit> {
        self.circuit
    }

    /// Timeline position
    #[inline]
    pub fn ip(&self) -> usize {
        self.ip
    }

    /// Whether the cursor is one past the last step
    pub fn is_end(&self) -> bool {
        self.circuit.map_or(true, |c| self.ip >= c.step_count())
    }

    /// View of the current step
    ///
    /// # Errors
    /// Returns [`CircuitError::InvalidCursor`] if the cursor is detached or
    /// exhausted
    pub fn get(&self) -> Result<StepView<'c>> {
        let circuit = self
            .circuit
            .ok_or(CircuitError::InvalidCursor("cursor is not attached to a circuit"))?;
        let step = circuit
            .step(self.ip)
            .ok_or(CircuitError::InvalidCursor("cursor is past the last step"))?;
        Ok(StepView {
            circuit,
            ip: self.ip,
            step,
        })
    }

    /// Move to the next step
    ///
    /// # Errors
    /// Returns [`CircuitError::InvalidCursor`] if the cursor is detached, the
    /// circuit is empty, or the cursor is already at the end
    pub fn advance(&mut self) -> Result<()> {
        let circuit = self
            .circuit
            .ok_or(CircuitError::InvalidCursor("cursor is not attached to a circuit"))?;
        if circuit.step_count() == 0 {
            return Err(CircuitError::InvalidCursor("circuit has no steps"));
        }
        if self.ip >= circuit.step_count() {
            return Err(CircuitError::InvalidCursor("cursor advanced past the end"));
        }
        self.ip += 1;
        Ok(())
    }
}

impl PartialEq for Cursor<'_> {
    fn eq(&self, other: &Self) -> bool {
        let same_circuit = match (self.circuit, other.circuit) {
            (Some(a), Some(b)) => std::ptr::eq(a, b),
            (None, None) => true,
            _ => false,
        };
        same_circuit && self.ip == other.ip
    }
}

impl Eq for Cursor<'_> {}

/// Iterator over the steps of a circuit
#[derive(Clone, Debug)]
pub struct Iter<'c> {
    circuit: &'c Circuit,
    ip: usize,
}

impl<'c> Iter<'c> {
    pub(crate) fn new(circuit: &'c Circuit) -> Self {
        Self { circuit, ip: 0 }
    }
}

impl<'c> Iterator for Iter<'c> {
    type Item = StepView<'c>;

    fn next(&mut self) -> Option<StepView<'c>> {
        let step = self.circuit.step(self.ip)?;
        let view = StepView {
            circuit: self.circuit,
            ip: self.ip,
            step,
        };
        self.ip += 1;
        Some(view)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.circuit.step_count().saturating_sub(self.ip);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use qudit_gates::{matrices, Matrix};

    fn sample() -> Circuit {
        let mut circuit = Circuit::new(2, 1, 2, None).unwrap();
        circuit
            .gate(&Matrix::from_array(&matrices::HADAMARD), 0, None)
            .unwrap()
            .measure_z(0, 0, None)
            .unwrap()
            .gate(&Matrix::from_array(&matrices::PAULI_X), 1, None)
            .unwrap();
        circuit
    }

    #[test]
    fn test_cursor_walk() {
        let circuit = sample();
        let mut cursor = circuit.begin();
        let mut seen = Vec::new();
        while cursor != circuit.end() {
            seen.push(cursor.get().unwrap().step_type());
            cursor.advance().unwrap();
        }
        assert_eq!(seen, vec![StepType::Gate, StepType::Measurement, StepType::Gate]);
        assert!(cursor.is_end());
        assert!(matches!(cursor.advance(), Err(CircuitError::InvalidCursor(_))));
        assert!(matches!(cursor.get(), Err(CircuitError::InvalidCursor(_))));
    }

    #[test]
    fn test_detached_cursor() {
        let mut cursor = Cursor::default();
        assert!(cursor.circuit().is_none());
        assert!(cursor.get().is_err());
        assert!(cursor.advance().is_err());
        assert_eq!(cursor, Cursor::default());
    }

    #[test]
    fn test_empty_circuit_cursor() {
        let circuit = Circuit::new(1, 0, 2, None).unwrap();
        let mut cursor = circuit.begin();
        assert_eq!(cursor, circuit.end());
        assert_eq!(
            cursor.advance().unwrap_err(),
            CircuitError::InvalidCursor("circuit has no steps")
        );
    }

    #[test]
    fn test_cursor_equality_uses_identity() {
        let a = sample();
        let b = a.clone();
        assert_eq!(a.begin(), a.begin());
        assert_ne!(a.begin(), b.begin());
        assert_ne!(a.begin(), a.end());
        assert_ne!(a.begin(), Cursor::default());
    }

    #[test]
    fn test_iter_matches_cursor() {
        let circuit = sample();
        let iter = circuit.iter();
        assert_eq!(iter.len(), 3);
        let ips: Vec<usize> = (&circuit).into_iter().map(|v| v.ip()).collect();
        assert_eq!(ips, vec![0, 1, 2]);
        for view in &circuit {
            assert!(std::ptr::eq(view.circuit(), &circuit));
            assert!(std::ptr::eq(view.step(), &circuit.steps()[view.ip()]));
        }
    }

    #[test]
    fn test_view_display() {
        let circuit = sample();
        let lines: Vec<String> = circuit.iter().map(|v| v.to_string()).collect();
        assert_eq!(lines[0], "0 SINGLE, target = [0], name = \"H\"");
        assert_eq!(lines[1], "1 |> MEASURE_Z, target = [0], c_reg = 0, name = \"Measure Z\"");
    }
}
