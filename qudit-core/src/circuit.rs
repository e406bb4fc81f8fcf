//! Qudit circuit representation
//!
//! A [`Circuit`] is an append-only program over `nq` qudits of dimension `d`
//! and `nc` classical dits. Every mutator validates its operands first and
//! leaves the circuit untouched on error, so a failed append is never
//! observed. Measurements mark their qudits as measured when they are
//! scheduled; no later step may touch those qudits.

use crate::cursor::{Cursor, Iter};
use crate::error::{CircuitError, Result};
use crate::step::{Arity, ControlShape, GateOp, GateStep, Indices, MeasureOp, MeasureStep, Step};
use qudit_gates::{lookup_name, Matrix};
use tracing::{trace, warn};

/// Control operands of a gate, used during validation
#[derive(Clone, Copy)]
enum Control<'a> {
    None,
    Quantum(&'a [usize]),
    Classical(&'a [usize]),
}

/// A qudit circuit
///
/// # Example
/// ```
/// use qudit_core::Circuit;
/// use qudit_gates::{matrices, Matrix};
///
/// let h = Matrix::from_array(&matrices::HADAMARD);
/// let x = Matrix::from_array(&matrices::PAULI_X);
///
/// let mut circuit = Circuit::new(2, 2, 2, Some("bell")).unwrap();
/// circuit
///     .gate(&h, 0, None)?
///     .ctrl(&x, 0, 1, None)?
///     .measure_z(0, 0, None)?
///     .measure_z(1, 1, None)?;
///
/// assert_eq!(circuit.step_count(), 4);
/// assert_eq!(circuit.measured(), vec![0, 1]);
/// # Ok::<(), qudit_core::CircuitError>(())
/// ```
#[derive(Clone, Debug)]
pub struct Circuit {
    nq: usize,
    nc: usize,
    d: usize,
    name: String,
    measured: Vec<bool>,
    steps: Vec<Step>,
    gate_count: usize,
    measurement_count: usize,
}

impl Circuit {
    /// Create an empty circuit
    ///
    /// # Errors
    /// Returns [`CircuitError::InvalidShape`] if `nq == 0` and
    /// [`CircuitError::InvalidDimension`] if `d < 2`
    pub fn new(nq: usize, nc: usize, d: usize, name: Option<&str>) -> Result<Self> {
        if nq == 0 {
            return Err(CircuitError::InvalidShape("circuit must have at least one qudit"));
        }
        if d < 2 {
            return Err(CircuitError::InvalidDimension(d));
        }
        Ok(Self {
            nq,
            nc,
            d,
            name: name.unwrap_or_default().to_string(),
            measured: vec![false; nq],
            steps: Vec::new(),
            gate_count: 0,
            measurement_count: 0,
        })
    }

    /// Number of qudits
    #[inline]
    pub fn nq(&self) -> usize {
        self.nq
    }

    /// Number of classical dits
    #[inline]
    pub fn nc(&self) -> usize {
        self.nc
    }

    /// Qudit dimension
    #[inline]
    pub fn d(&self) -> usize {
        self.d
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether qudit `i` has been scheduled for measurement
    ///
    /// # Errors
    /// Returns error if `i >= nq`
    pub fn is_measured(&self, i: usize) -> Result<bool> {
        self.measured
            .get(i)
            .copied()
            .ok_or_else(|| CircuitError::qudit_out_of_range(i, self.nq))
    }

    /// Indices of measured qudits, ascending
    pub fn measured(&self) -> Vec<usize> {
        (0..self.nq).filter(|&i| self.measured[i]).collect()
    }

    /// Indices of qudits not yet measured, ascending
    pub fn non_measured(&self) -> Vec<usize> {
        (0..self.nq).filter(|&i| !self.measured[i]).collect()
    }

    #[inline]
    pub fn gate_count(&self) -> usize {
        self.gate_count
    }

    #[inline]
    pub fn measurement_count(&self) -> usize {
        self.measurement_count
    }

    /// Total number of steps; always `gate_count() + measurement_count()`
    #[inline]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Gate steps in timeline order
    pub fn gates(&self) -> impl Iterator<Item = &GateStep> {
        self.steps.iter().filter_map(Step::as_gate)
    }

    /// Measurement steps in timeline order
    pub fn measurements(&self) -> impl Iterator<Item = &MeasureStep> {
        self.steps.iter().filter_map(Step::as_measurement)
    }

    /// Full timeline
    #[inline]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Step at timeline position `ip`
    #[inline]
    pub fn step(&self, ip: usize) -> Option<&Step> {
        self.steps.get(ip)
    }

    /// Cursor at the first step
    pub fn begin(&self) -> Cursor<'_> {
        Cursor::new(self, 0)
    }

    /// Cursor one past the last step
    pub fn end(&self) -> Cursor<'_> {
        Cursor::new(self, self.steps.len())
    }

    /// Iterate over the timeline
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self)
    }

    // gates

    /// Single-qudit gate on qudit `i`
    ///
    /// # Errors
    /// Returns error if `i` is invalid or measured, or `u` is not `d × d`
    pub fn gate(&mut self, u: &Matrix, i: usize, name: Option<&str>) -> Result<&mut Self> {
        self.validate_gate(Control::None, &[i], u, 1)?;
        self.push_gate(
            GateOp::Unitary {
                arity: Arity::Single,
                target: Indices::from_slice(&[i]),
            },
            u,
            name,
        );
        Ok(self)
    }

    /// Two-qudit gate on qudits `i`, `j`; `i` is the most significant factor
    pub fn gate2(&mut self, u: &Matrix, i: usize, j: usize, name: Option<&str>) -> Result<&mut Self> {
        self.validate_gate(Control::None, &[i, j], u, 2)?;
        self.push_gate(
            GateOp::Unitary {
                arity: Arity::Two,
                target: Indices::from_slice(&[i, j]),
            },
            u,
            name,
        );
        Ok(self)
    }

    /// Three-qudit gate on qudits `i`, `j`, `k`
    pub fn gate3(&mut self, u: &Matrix, i: usize, j: usize, k: usize, name: Option<&str>) -> Result<&mut Self> {
        self.validate_gate(Control::None, &[i, j, k], u, 3)?;
        self.push_gate(
            GateOp::Unitary {
                arity: Arity::Three,
                target: Indices::from_slice(&[i, j, k]),
            },
            u,
            name,
        );
        Ok(self)
    }

    /// Same single-qudit gate on each of `target`
    pub fn gate_fan(&mut self, u: &Matrix, target: &[usize], name: Option<&str>) -> Result<&mut Self> {
        self.validate_gate(Control::None, target, u, 1)?;
        self.push_gate(
            GateOp::Fan {
                target: Indices::from_slice(target),
            },
            u,
            name,
        );
        Ok(self)
    }

    /// Same single-qudit gate on every qudit not yet measured
    pub fn gate_fan_all(&mut self, u: &Matrix, name: Option<&str>) -> Result<&mut Self> {
        let target = self.non_measured();
        if target.is_empty() {
            return Err(self.reject(CircuitError::InvalidShape("every qudit is already measured")));
        }
        self.gate_fan(u, &target, name)
    }

    /// Joint `d^k × d^k` gate on `target`
    pub fn gate_custom(&mut self, u: &Matrix, target: &[usize], name: Option<&str>) -> Result<&mut Self> {
        self.validate_gate(Control::None, target, u, target.len())?;
        self.push_gate(
            GateOp::Unitary {
                arity: Arity::Custom,
                target: Indices::from_slice(target),
            },
            u,
            name,
        );
        Ok(self)
    }

    /// Quantum Fourier transform; not available
    ///
    /// # Errors
    /// Always returns [`CircuitError::Unimplemented`]
    pub fn qft(&mut self, _target: &[usize], _name: Option<&str>) -> Result<&mut Self> {
        Err(self.reject(CircuitError::Unimplemented("QFT")))
    }

    /// Inverse quantum Fourier transform; not available
    ///
    /// # Errors
    /// Always returns [`CircuitError::Unimplemented`]
    pub fn tfq(&mut self, _target: &[usize], _name: Option<&str>) -> Result<&mut Self> {
        Err(self.reject(CircuitError::Unimplemented("TFQ")))
    }

    // quantum control

    /// Single-qudit gate on `target` controlled by qudit `ctrl`
    ///
    /// For qudits the gate applied is `u^k` where `k` is the value of the
    /// control.
    pub fn ctrl(&mut self, u: &Matrix, ctrl: usize, target: usize, name: Option<&str>) -> Result<&mut Self> {
        self.controlled(u, ControlShape::SingleCtrlSingleTarget, &[ctrl], &[target], name)
    }

    /// Single-qudit gate on each of `target`, controlled by qudit `ctrl`
    pub fn ctrl_multi_target(
        &mut self,
        u: &Matrix,
        ctrl: usize,
        target: &[usize],
        name: Option<&str>,
    ) -> Result<&mut Self> {
        self.controlled(u, ControlShape::SingleCtrlMultipleTarget, &[ctrl], target, name)
    }

    /// Single-qudit gate on `target`, controlled by every qudit in `ctrl`
    pub fn multi_ctrl(&mut self, u: &Matrix, ctrl: &[usize], target: usize, name: Option<&str>) -> Result<&mut Self> {
        self.controlled(u, ControlShape::MultipleCtrlSingleTarget, ctrl, &[target], name)
    }

    /// Single-qudit gate on each of `target`, controlled by every qudit in `ctrl`
    pub fn multi_ctrl_multi_target(
        &mut self,
        u: &Matrix,
        ctrl: &[usize],
        target: &[usize],
        name: Option<&str>,
    ) -> Result<&mut Self> {
        self.controlled(u, ControlShape::MultipleCtrlMultipleTarget, ctrl, target, name)
    }

    /// Joint `d^k × d^k` gate on `target`, controlled by every qudit in `ctrl`
    pub fn ctrl_custom(
        &mut self,
        u: &Matrix,
        ctrl: &[usize],
        target: &[usize],
        name: Option<&str>,
    ) -> Result<&mut Self> {
        self.controlled(u, ControlShape::Custom, ctrl, target, name)
    }

    fn controlled(
        &mut self,
        u: &Matrix,
        shape: ControlShape,
        ctrl: &[usize],
        target: &[usize],
        name: Option<&str>,
    ) -> Result<&mut Self> {
        self.validate_gate(Control::Quantum(ctrl), target, u, operator_arity(shape, target))?;
        self.push_gate(
            GateOp::Controlled {
                shape,
                ctrl: Indices::from_slice(ctrl),
                target: Indices::from_slice(target),
            },
            u,
            name,
        );
        Ok(self)
    }

    // classical control

    /// Single-qudit gate on `target` controlled by classical dit `ctrl_dit`
    ///
    /// At execution the gate applied is `u^k` where `k` is the value of the
    /// dit.
    pub fn cctrl(&mut self, u: &Matrix, ctrl_dit: usize, target: usize, name: Option<&str>) -> Result<&mut Self> {
        self.classically_controlled(u, ControlShape::SingleCtrlSingleTarget, &[ctrl_dit], &[target], name)
    }

    /// Single-qudit gate on each of `target`, controlled by dit `ctrl_dit`
    pub fn cctrl_multi_target(
        &mut self,
        u: &Matrix,
        ctrl_dit: usize,
        target: &[usize],
        name: Option<&str>,
    ) -> Result<&mut Self> {
        self.classically_controlled(u, ControlShape::SingleCtrlMultipleTarget, &[ctrl_dit], target, name)
    }

    /// Single-qudit gate on `target`, controlled by every dit in `ctrl_dits`
    pub fn multi_cctrl(
        &mut self,
        u: &Matrix,
        ctrl_dits: &[usize],
        target: usize,
        name: Option<&str>,
    ) -> Result<&mut Self> {
        self.classically_controlled(u, ControlShape::MultipleCtrlSingleTarget, ctrl_dits, &[target], name)
    }

    /// Single-qudit gate on each of `target`, controlled by every dit in `ctrl_dits`
    pub fn multi_cctrl_multi_target(
        &mut self,
        u: &Matrix,
        ctrl_dits: &[usize],
        target: &[usize],
        name: Option<&str>,
    ) -> Result<&mut Self> {
        self.classically_controlled(u, ControlShape::MultipleCtrlMultipleTarget, ctrl_dits, target, name)
    }

    /// Joint `d^k × d^k` gate on `target`, controlled by every dit in `ctrl_dits`
    pub fn cctrl_custom(
        &mut self,
        u: &Matrix,
        ctrl_dits: &[usize],
        target: &[usize],
        name: Option<&str>,
    ) -> Result<&mut Self> {
        self.classically_controlled(u, ControlShape::Custom, ctrl_dits, target, name)
    }

    fn classically_controlled(
        &mut self,
        u: &Matrix,
        shape: ControlShape,
        ctrl_dits: &[usize],
        target: &[usize],
        name: Option<&str>,
    ) -> Result<&mut Self> {
        self.validate_gate(Control::Classical(ctrl_dits), target, u, operator_arity(shape, target))?;
        self.push_gate(
            GateOp::ClassicallyControlled {
                shape,
                ctrl_dits: Indices::from_slice(ctrl_dits),
                target: Indices::from_slice(target),
            },
            u,
            name,
        );
        Ok(self)
    }

    // measurements

    /// Computational-basis measurement of qudit `target` into dit `c_reg`
    pub fn measure_z(&mut self, target: usize, c_reg: usize, name: Option<&str>) -> Result<&mut Self> {
        self.validate_measurement(&[target], c_reg, None)?;
        let name = match name {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => "Measure Z".to_string(),
        };
        self.push_measurement(MeasureOp::Z { target }, c_reg, name);
        Ok(self)
    }

    /// Measurement of qudit `target` in the basis given by the columns of `basis`
    pub fn measure_v(&mut self, basis: &Matrix, target: usize, c_reg: usize, name: Option<&str>) -> Result<&mut Self> {
        self.validate_measurement(&[target], c_reg, Some(basis))?;
        let name = label(basis, name);
        self.push_measurement(
            MeasureOp::V {
                basis: basis.clone(),
                target,
            },
            c_reg,
            name,
        );
        Ok(self)
    }

    /// Joint measurement of `target` in the basis given by the columns of `basis`
    pub fn measure_v_many(
        &mut self,
        basis: &Matrix,
        target: &[usize],
        c_reg: usize,
        name: Option<&str>,
    ) -> Result<&mut Self> {
        self.validate_measurement(target, c_reg, Some(basis))?;
        let name = label(basis, name);
        self.push_measurement(
            MeasureOp::VMany {
                basis: basis.clone(),
                target: Indices::from_slice(target),
            },
            c_reg,
            name,
        );
        Ok(self)
    }

    // validation

    fn reject(&self, err: CircuitError) -> CircuitError {
        warn!(step = self.steps.len(), error = %err, "rejected circuit step");
        err
    }

    fn validate_gate(&self, ctrl: Control<'_>, target: &[usize], u: &Matrix, arity: usize) -> Result<()> {
        self.check_gate(ctrl, target, u, arity).map_err(|err| self.reject(err))
    }

    fn check_gate(&self, ctrl: Control<'_>, target: &[usize], u: &Matrix, arity: usize) -> Result<()> {
        if target.is_empty() {
            return Err(CircuitError::InvalidShape("empty target list"));
        }
        const NONE: &[usize] = &[];
        let (qudit_ctrl, dit_ctrl) = match ctrl {
            Control::None => (NONE, NONE),
            Control::Quantum(c) | Control::Classical(c) if c.is_empty() => {
                return Err(CircuitError::InvalidShape("empty control list"));
            }
            Control::Quantum(c) => (c, NONE),
            Control::Classical(c) => (NONE, c),
        };

        let qudits = || qudit_ctrl.iter().chain(target).copied();
        if let Some(i) = qudits().find(|&i| i >= self.nq) {
            return Err(CircuitError::qudit_out_of_range(i, self.nq));
        }
        if let Some(&i) = dit_ctrl.iter().find(|&&i| i >= self.nc) {
            return Err(CircuitError::dit_out_of_range(i, self.nc));
        }
        if let Some(i) = qudits().find(|&i| self.measured[i]) {
            return Err(CircuitError::AlreadyMeasured(i));
        }
        check_no_duplicates(qudit_ctrl)?;
        check_no_duplicates(dit_ctrl)?;
        check_no_duplicates(target)?;
        if let Some(&i) = qudit_ctrl.iter().find(|i| target.contains(i)) {
            return Err(CircuitError::DuplicateIndex(i));
        }

        let expected = self.operand_dim(arity);
        if !u.is_square() || Some(u.rows()) != expected {
            return Err(CircuitError::OperatorShapeMismatch {
                rows: u.rows(),
                cols: u.cols(),
                expected: expected.unwrap_or(usize::MAX),
            });
        }
        Ok(())
    }

    fn validate_measurement(&self, target: &[usize], c_reg: usize, basis: Option<&Matrix>) -> Result<()> {
        self.check_measurement(target, c_reg, basis).map_err(|err| self.reject(err))
    }

    fn check_measurement(&self, target: &[usize], c_reg: usize, basis: Option<&Matrix>) -> Result<()> {
        if target.is_empty() {
            return Err(CircuitError::InvalidShape("empty target list"));
        }
        if let Some(&i) = target.iter().find(|&&i| i >= self.nq) {
            return Err(CircuitError::qudit_out_of_range(i, self.nq));
        }
        if c_reg >= self.nc {
            return Err(CircuitError::dit_out_of_range(c_reg, self.nc));
        }
        if let Some(&i) = target.iter().find(|&&i| self.measured[i]) {
            return Err(CircuitError::AlreadyMeasured(i));
        }
        check_no_duplicates(target)?;

        if let Some(basis) = basis {
            let expected = self.operand_dim(target.len());
            let fits = expected.map_or(false, |rows| {
                basis.rows() == rows && basis.cols() >= 1 && basis.cols() <= rows
            });
            if !fits {
                return Err(CircuitError::OperatorShapeMismatch {
                    rows: basis.rows(),
                    cols: basis.cols(),
                    expected: expected.unwrap_or(usize::MAX),
                });
            }
            if basis.as_slice().iter().all(|c| c.norm_sqr() == 0.0) {
                return Err(CircuitError::InvalidShape("measurement basis has no nonzero column"));
            }
        }
        Ok(())
    }

    /// `d^k`, or `None` on overflow
    fn operand_dim(&self, k: usize) -> Option<usize> {
        u32::try_from(k).ok().and_then(|k| self.d.checked_pow(k))
    }

    // append

    fn push_gate(&mut self, op: GateOp, u: &Matrix, name: Option<&str>) {
        let step = GateStep::new(op, u.clone(), label(u, name));
        trace!(step = self.steps.len(), gate = %step, "appended gate");
        self.steps.push(Step::Gate(step));
        self.gate_count += 1;
    }

    fn push_measurement(&mut self, op: MeasureOp, c_reg: usize, name: String) {
        let step = MeasureStep::new(op, c_reg, name);
        for &i in step.target() {
            self.measured[i] = true;
        }
        trace!(step = self.steps.len(), measurement = %step, "appended measurement");
        self.steps.push(Step::Measurement(step));
        self.measurement_count += 1;
    }
}

impl<'c> IntoIterator for &'c Circuit {
    type Item = crate::cursor::StepView<'c>;
    type IntoIter = Iter<'c>;

    fn into_iter(self) -> Iter<'c> {
        self.iter()
    }
}

/// Number of qudits the stored operator acts on
fn operator_arity(shape: ControlShape, target: &[usize]) -> usize {
    match shape {
        ControlShape::Custom => target.len(),
        _ => 1,
    }
}

/// Caller label, or the table name of `u` when none (or an empty one) is given
fn label(u: &Matrix, name: Option<&str>) -> String {
    match name {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => lookup_name(u),
    }
}

fn check_no_duplicates(indices: &[usize]) -> Result<()> {
    for (pos, i) in indices.iter().enumerate() {
        if indices[..pos].contains(i) {
            return Err(CircuitError::DuplicateIndex(*i));
        }
    }
    Ok(())
}
