//! Circuit steps
//!
//! A circuit is a single ordered sequence of [`Step`]s, each either a gate or
//! a measurement. The shape of a step (which operands it has and how the
//! engine interprets them) is carried by the enum variant, so a step can
//! never hold operands that contradict its kind.

use qudit_gates::Matrix;
use smallvec::SmallVec;
use std::fmt;

/// Short list of qudit or dit indices
pub type Indices = SmallVec<[usize; 4]>;

/// Whether a step is a gate or a measurement
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepType {
    Gate,
    Measurement,
}

impl fmt::Display for StepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepType::Gate => write!(f, "GATE"),
            StepType::Measurement => write!(f, "MEASUREMENT"),
        }
    }
}

/// Number of qudits a plain unitary acts on
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Arity {
    Single,
    Two,
    Three,
    /// Joint unitary over an arbitrary target list
    Custom,
}

/// Control topology of a controlled gate
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControlShape {
    SingleCtrlSingleTarget,
    SingleCtrlMultipleTarget,
    MultipleCtrlSingleTarget,
    MultipleCtrlMultipleTarget,
    /// Joint `d^k × d^k` operator on all targets
    Custom,
}

impl ControlShape {
    /// Whether a single-qudit operator is broadcast over several targets
    pub fn broadcasts(self) -> bool {
        matches!(
            self,
            ControlShape::SingleCtrlMultipleTarget | ControlShape::MultipleCtrlMultipleTarget
        )
    }
}

/// Flat tag of a gate step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GateKind {
    Single,
    Two,
    Three,
    Custom,
    Fan,
    Qft,
    Tfq,
    SingleCtrlSingleTarget,
    SingleCtrlMultipleTarget,
    MultipleCtrlSingleTarget,
    MultipleCtrlMultipleTarget,
    CustomCtrl,
    SingleCctrlSingleTarget,
    SingleCctrlMultipleTarget,
    MultipleCctrlSingleTarget,
    MultipleCctrlMultipleTarget,
    CustomCctrl,
}

impl GateKind {
    /// Upper-case tag used in text and JSON dumps
    pub fn as_str(self) -> &'static str {
        match self {
            GateKind::Single => "SINGLE",
            GateKind::Two => "TWO",
            GateKind::Three => "THREE",
            GateKind::Custom => "CUSTOM",
            GateKind::Fan => "FAN",
            GateKind::Qft => "QFT",
            GateKind::Tfq => "TFQ",
            GateKind::SingleCtrlSingleTarget => "SINGLE_CTRL_SINGLE_TARGET",
            GateKind::SingleCtrlMultipleTarget => "SINGLE_CTRL_MULTIPLE_TARGET",
            GateKind::MultipleCtrlSingleTarget => "MULTIPLE_CTRL_SINGLE_TARGET",
            GateKind::MultipleCtrlMultipleTarget => "MULTIPLE_CTRL_MULTIPLE_TARGET",
            GateKind::CustomCtrl => "CUSTOM_CTRL",
            GateKind::SingleCctrlSingleTarget => "SINGLE_cCTRL_SINGLE_TARGET",
            GateKind::SingleCctrlMultipleTarget => "SINGLE_cCTRL_MULTIPLE_TARGET",
            GateKind::MultipleCctrlSingleTarget => "MULTIPLE_cCTRL_SINGLE_TARGET",
            GateKind::MultipleCctrlMultipleTarget => "MULTIPLE_cCTRL_MULTIPLE_TARGET",
            GateKind::CustomCctrl => "CUSTOM_cCTRL",
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operands of a gate step
#[derive(Clone, Debug, PartialEq)]
pub enum GateOp {
    /// Plain unitary on `target`, first target most significant
    Unitary { arity: Arity, target: Indices },
    /// Same single-qudit unitary on every target independently
    Fan { target: Indices },
    /// Controlled on quantum registers
    Controlled {
        shape: ControlShape,
        ctrl: Indices,
        target: Indices,
    },
    /// Controlled on classical registers
    ClassicallyControlled {
        shape: ControlShape,
        ctrl_dits: Indices,
        target: Indices,
    },
}

impl GateOp {
    /// Flat kind tag
    pub fn kind(&self) -> GateKind {
        match self {
            GateOp::Unitary { arity, .. } => match arity {
                Arity::Single => GateKind::Single,
                Arity::Two => GateKind::Two,
                Arity::Three => GateKind::Three,
                Arity::Custom => GateKind::Custom,
            },
            GateOp::Fan { .. } => GateKind::Fan,
            GateOp::Controlled { shape, .. } => match shape {
                ControlShape::SingleCtrlSingleTarget => GateKind::SingleCtrlSingleTarget,
                ControlShape::SingleCtrlMultipleTarget => GateKind::SingleCtrlMultipleTarget,
                ControlShape::MultipleCtrlSingleTarget => GateKind::MultipleCtrlSingleTarget,
                ControlShape::MultipleCtrlMultipleTarget => GateKind::MultipleCtrlMultipleTarget,
                ControlShape::Custom => GateKind::CustomCtrl,
            },
            GateOp::ClassicallyControlled { shape, .. } => match shape {
                ControlShape::SingleCtrlSingleTarget => GateKind::SingleCctrlSingleTarget,
                ControlShape::SingleCtrlMultipleTarget => GateKind::SingleCctrlMultipleTarget,
                ControlShape::MultipleCtrlSingleTarget => GateKind::MultipleCctrlSingleTarget,
                ControlShape::MultipleCtrlMultipleTarget => GateKind::MultipleCctrlMultipleTarget,
                ControlShape::Custom => GateKind::CustomCctrl,
            },
        }
    }

    /// Control indices (qudits or dits); empty for uncontrolled gates
    pub fn ctrl(&self) -> &[usize] {
        match self {
            GateOp::Controlled { ctrl, .. } => ctrl.as_slice(),
            GateOp::ClassicallyControlled { ctrl_dits, .. } => ctrl_dits.as_slice(),
            GateOp::Unitary { .. } | GateOp::Fan { .. } => &[],
        }
    }

    /// Target qudits
    pub fn target(&self) -> &[usize] {
        match self {
            GateOp::Unitary { target, .. }
            | GateOp::Fan { target }
            | GateOp::Controlled { target, .. }
            | GateOp::ClassicallyControlled { target, .. } => target.as_slice(),
        }
    }
}

/// A gate in the circuit timeline
#[derive(Clone, Debug, PartialEq)]
pub struct GateStep {
    op: GateOp,
    operator: Matrix,
    name: String,
}

impl GateStep {
    pub(crate) fn new(op: GateOp, operator: Matrix, name: String) -> Self {
        Self { op, operator, name }
    }

    /// Operands
    #[inline]
    pub fn op(&self) -> &GateOp {
        &self.op
    }

    /// Flat kind tag
    #[inline]
    pub fn kind(&self) -> GateKind {
        self.op.kind()
    }

    /// Operator as supplied when the step was appended
    #[inline]
    pub fn operator(&self) -> &Matrix {
        &self.operator
    }

    #[inline]
    pub fn ctrl(&self) -> &[usize] {
        self.op.ctrl()
    }

    #[inline]
    pub fn target(&self) -> &[usize] {
        self.op.target()
    }

    /// Label, possibly empty
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for GateStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, ", self.kind())?;
        if !self.ctrl().is_empty() {
            write!(f, "ctrl = {}, ", DispIndices(self.ctrl()))?;
        }
        write!(f, "target = {}, name = \"{}\"", DispIndices(self.target()), self.name)
    }
}

/// Flat tag of a measurement step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MeasureKind {
    /// Computational basis, one qudit
    Z,
    /// Supplied basis, one qudit
    V,
    /// Supplied basis, joint over several qudits
    VMany,
}

impl MeasureKind {
    /// Upper-case tag used in text and JSON dumps
    pub fn as_str(self) -> &'static str {
        match self {
            MeasureKind::Z => "MEASURE_Z",
            MeasureKind::V => "MEASURE_V",
            MeasureKind::VMany => "MEASURE_V_MANY",
        }
    }
}

impl fmt::Display for MeasureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operands of a measurement step
#[derive(Clone, Debug, PartialEq)]
pub enum MeasureOp {
    Z { target: usize },
    /// Columns of `basis` are the basis vectors or rank-one projectors
    V { basis: Matrix, target: usize },
    VMany { basis: Matrix, target: Indices },
}

/// A measurement in the circuit timeline
#[derive(Clone, Debug, PartialEq)]
pub struct MeasureStep {
    op: MeasureOp,
    c_reg: usize,
    name: String,
}

impl MeasureStep {
    pub(crate) fn new(op: MeasureOp, c_reg: usize, name: String) -> Self {
        Self { op, c_reg, name }
    }

    #[inline]
    pub fn op(&self) -> &MeasureOp {
        &self.op
    }

    pub fn kind(&self) -> MeasureKind {
        match self.op {
            MeasureOp::Z { .. } => MeasureKind::Z,
            MeasureOp::V { .. } => MeasureKind::V,
            MeasureOp::VMany { .. } => MeasureKind::VMany,
        }
    }

    /// Basis matrix; `None` for computational-basis measurement
    pub fn basis(&self) -> Option<&Matrix> {
        match &self.op {
            MeasureOp::Z { .. } => None,
            MeasureOp::V { basis, .. } | MeasureOp::VMany { basis, .. } => Some(basis),
        }
    }

    /// Measured qudits
    pub fn target(&self) -> &[usize] {
        match &self.op {
            MeasureOp::Z { target } | MeasureOp::V { target, .. } => std::slice::from_ref(target),
            MeasureOp::VMany { target, .. } => target.as_slice(),
        }
    }

    /// Classical register receiving the outcome
    #[inline]
    pub fn c_reg(&self) -> usize {
        self.c_reg
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for MeasureStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, target = {}, c_reg = {}, name = \"{}\"",
            self.kind(),
            DispIndices(self.target()),
            self.c_reg,
            self.name
        )
    }
}

/// One entry of the circuit timeline
#[derive(Clone, Debug, PartialEq)]
pub enum Step {
    Gate(GateStep),
    Measurement(MeasureStep),
}

impl Step {
    pub fn step_type(&self) -> StepType {
        match self {
            Step::Gate(_) => StepType::Gate,
            Step::Measurement(_) => StepType::Measurement,
        }
    }

    pub fn as_gate(&self) -> Option<&GateStep> {
        match self {
            Step::Gate(gate) => Some(gate),
            Step::Measurement(_) => None,
        }
    }

    pub fn as_measurement(&self) -> Option<&MeasureStep> {
        match self {
            Step::Measurement(measurement) => Some(measurement),
            Step::Gate(_) => None,
        }
    }

    /// Label of the underlying gate or measurement
    pub fn name(&self) -> &str {
        match self {
            Step::Gate(gate) => gate.name(),
            Step::Measurement(measurement) => measurement.name(),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Gate(gate) => gate.fmt(f),
            Step::Measurement(measurement) => measurement.fmt(f),
        }
    }
}

/// Renders an index list as `[0, 1, 2]`
pub(crate) struct DispIndices<'a>(pub &'a [usize]);

impl fmt::Display for DispIndices<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", index)?;
        }
        write!(f, "]")
    }
}
