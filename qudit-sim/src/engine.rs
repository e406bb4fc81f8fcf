//! Circuit execution engine
//!
//! The [`Engine`] interprets a borrowed [`Circuit`] one step at a time
//! against a live state vector. Measurements physically remove qudits from
//! the state, so the engine keeps `position_of`: for every original qudit
//! index, its current position in the shrinking tensor product, or `None`
//! once it has been measured. Unmeasured positions always form the compact
//! range `0..k` in original index order.
//!
//! # Example
//!
//! ```
//! use qudit_core::Circuit;
//! use qudit_gates::{matrices, Matrix};
//! use qudit_sim::{Engine, EngineConfig};
//!
//! let mut circuit = Circuit::new(2, 2, 2, None).unwrap();
//! circuit
//!     .gate(&Matrix::from_array(&matrices::HADAMARD), 0, None).unwrap()
//!     .ctrl(&Matrix::from_array(&matrices::PAULI_X), 0, 1, None).unwrap()
//!     .measure_z(0, 0, None).unwrap()
//!     .measure_z(1, 1, None).unwrap();
//!
//! let mut engine = Engine::with_config(&circuit, EngineConfig::new().with_seed(1)).unwrap();
//! engine.run().unwrap();
//! assert_eq!(engine.dits()[0], engine.dits()[1]);
//! ```

use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::result::MeasurementCounts;
use qudit_core::{Circuit, ControlShape, Cursor, GateOp, GateStep, Indices, MeasureOp, MeasureStep, Step, StepView};
use qudit_gates::{Complex64, Matrix};
use qudit_state::{measure, measure_sequential, zero_state, Ket};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use tracing::{debug, trace};

/// Interpreter for a single circuit
#[derive(Debug)]
pub struct Engine<'c> {
    circuit: &'c Circuit,
    config: EngineConfig,
    psi: Ket,
    dits: Vec<usize>,
    probs: Vec<f64>,
    position_of: Vec<Option<usize>>,
    rng: StdRng,
}

impl<'c> Engine<'c> {
    /// Create an engine with the default configuration
    ///
    /// # Errors
    /// Returns error if the initial state cannot be allocated
    pub fn new(circuit: &'c Circuit) -> Result<Self> {
        Self::with_config(circuit, EngineConfig::default())
    }

    /// Create an engine with a custom configuration
    ///
    /// # Errors
    /// Returns error if the configuration is invalid or the initial state
    /// exceeds the memory limit
    pub fn with_config(circuit: &'c Circuit, config: EngineConfig) -> Result<Self> {
        config.validate().map_err(EngineError::InvalidConfig)?;
        check_memory(circuit, &config)?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        debug!(
            nq = circuit.nq(),
            nc = circuit.nc(),
            d = circuit.d(),
            seed = ?config.seed,
            "creating engine"
        );

        Ok(Self {
            circuit,
            psi: zero_state(circuit.nq(), circuit.d())?,
            dits: vec![0; circuit.nc()],
            probs: vec![0.0; circuit.nc()],
            position_of: (0..circuit.nq()).map(Some).collect(),
            config,
            rng,
        })
    }

    /// Restore the idle state: `|0...0⟩`, zero dits and probabilities, and
    /// the identity remapping
    ///
    /// The random number generator keeps its position.
    pub fn reset(&mut self) -> Result<()> {
        self.psi = zero_state(self.circuit.nq(), self.circuit.d())?;
        self.dits.iter_mut().for_each(|dit| *dit = 0);
        self.probs.iter_mut().for_each(|p| *p = 0.0);
        for (i, position) in self.position_of.iter_mut().enumerate() {
            *position = Some(i);
        }
        Ok(())
    }

    #[inline]
    pub fn circuit(&self) -> &'c Circuit {
        self.circuit
    }

    #[inline]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Live state over the unmeasured qudits
    #[inline]
    pub fn psi(&self) -> &Ket {
        &self.psi
    }

    /// Classical register
    #[inline]
    pub fn dits(&self) -> &[usize] {
        &self.dits
    }

    /// Value of dit `i`
    ///
    /// # Errors
    /// Returns error if `i >= nc`
    pub fn dit(&self, i: usize) -> Result<usize> {
        self.dits.get(i).copied().ok_or(EngineError::IndexOutOfRange {
            index: i,
            bound: self.dits.len(),
        })
    }

    /// Overwrite dit `i`, e.g. to drive classically controlled gates
    ///
    /// # Errors
    /// Returns error if `i >= nc`
    pub fn set_dit(&mut self, i: usize, value: usize) -> Result<&mut Self> {
        let bound = self.dits.len();
        let dit = self
            .dits
            .get_mut(i)
            .ok_or(EngineError::IndexOutOfRange { index: i, bound })?;
        *dit = value;
        Ok(self)
    }

    /// Probability of the outcome stored in each dit
    #[inline]
    pub fn probs(&self) -> &[f64] {
        &self.probs
    }

    /// Whether qudit `i` has been measured during execution
    ///
    /// # Errors
    /// Returns error if `i >= nq`
    pub fn is_measured(&self, i: usize) -> Result<bool> {
        self.position_of(i).map(|p| p.is_none())
    }

    /// Original indices of qudits measured so far
    pub fn measured(&self) -> Vec<usize> {
        (0..self.position_of.len())
            .filter(|&i| self.position_of[i].is_none())
            .collect()
    }

    /// Original indices of qudits still in the live state
    pub fn non_measured(&self) -> Vec<usize> {
        (0..self.position_of.len())
            .filter(|&i| self.position_of[i].is_some())
            .collect()
    }

    /// Current position of original qudit `i`; `None` once measured
    ///
    /// # Errors
    /// Returns error if `i >= nq`
    pub fn position_of(&self, i: usize) -> Result<Option<usize>> {
        self.position_of.get(i).copied().ok_or(EngineError::IndexOutOfRange {
            index: i,
            bound: self.position_of.len(),
        })
    }

    /// Execute the step under `cursor`
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidCursor`] if the cursor is detached,
    /// exhausted, or belongs to another circuit
    pub fn execute_cursor(&mut self, cursor: &Cursor<'_>) -> Result<()> {
        let view = cursor.get()?;
        self.execute(view)
    }

    /// Execute one step
    ///
    /// # Errors
    /// Returns [`EngineError::InvalidCursor`] if the step comes from another
    /// circuit, or any error raised by the state operations
    pub fn execute(&mut self, view: StepView<'_>) -> Result<()> {
        if !std::ptr::eq(view.circuit(), self.circuit) {
            return Err(EngineError::InvalidCursor(
                "step belongs to a different circuit".to_string(),
            ));
        }
        match view.step() {
            Step::Gate(gate) => self.execute_gate(view.ip(), gate),
            Step::Measurement(measurement) => self.execute_measurement(view.ip(), measurement),
        }
    }

    /// Execute every step of the circuit, starting from the current state
    pub fn run(&mut self) -> Result<()> {
        let circuit = self.circuit;
        for view in circuit {
            self.execute(view)?;
        }
        Ok(())
    }

    /// Reset and run the circuit `shots` times, tallying the classical
    /// register after each run
    pub fn sample(&mut self, shots: usize) -> Result<MeasurementCounts> {
        let mut counts = MeasurementCounts::new();
        for _ in 0..shots {
            self.reset()?;
            self.run()?;
            counts.record(MeasurementCounts::key(&self.dits));
        }
        debug!(shots, outcomes = counts.num_outcomes(), "sampling finished");
        Ok(counts)
    }

    fn execute_gate(&mut self, ip: usize, gate: &GateStep) -> Result<()> {
        let target = self.positions(gate.target())?;
        let u = gate.operator();
        debug!(step = ip, kind = %gate.kind(), name = gate.name(), ?target, "executing gate");

        match gate.op() {
            GateOp::Unitary { .. } => self.psi.apply(u, &target)?,
            GateOp::Fan { .. } => {
                for &t in &target {
                    self.psi.apply(u, &[t])?;
                }
            }
            GateOp::Controlled { shape, ctrl, .. } => {
                let ctrl = self.positions(ctrl)?;
                let op = broadcast(u, *shape, target.len());
                self.psi.apply_controlled(&op, &ctrl, &target)?;
            }
            GateOp::ClassicallyControlled { shape, ctrl_dits, .. } => {
                if self.dits.is_empty() {
                    let op = broadcast(u, *shape, target.len());
                    self.psi.apply(&op, &target)?;
                    return Ok(());
                }
                match self.agreed_dit(ctrl_dits)? {
                    Some(k) => {
                        let powered = u.pow(k)?;
                        let op = broadcast(&powered, *shape, target.len());
                        self.psi.apply(&op, &target)?;
                    }
                    None => debug!(step = ip, "classical controls disagree, skipping"),
                }
            }
        }
        Ok(())
    }

    fn execute_measurement(&mut self, ip: usize, measurement: &MeasureStep) -> Result<()> {
        let target = self.positions(measurement.target())?;
        let c_reg = measurement.c_reg();
        if c_reg >= self.dits.len() {
            return Err(EngineError::IndexOutOfRange {
                index: c_reg,
                bound: self.dits.len(),
            });
        }

        let (outcome, probability) = match measurement.op() {
            MeasureOp::Z { .. } => {
                let result = measure_sequential(&self.psi, &target, &mut self.rng)?;
                self.psi = result.state;
                (result.outcomes[0], result.probability)
            }
            MeasureOp::V { basis, .. } | MeasureOp::VMany { basis, .. } => {
                let result = measure(&self.psi, basis, &target, &mut self.rng)?;
                let outcome = result.outcome;
                let probability = result.probability();
                self.psi = result.into_state();
                (outcome, probability)
            }
        };
        self.dits[c_reg] = outcome;
        self.probs[c_reg] = probability;
        debug!(
            step = ip,
            kind = %measurement.kind(),
            c_reg,
            outcome,
            probability,
            "measured"
        );

        for &q in measurement.target() {
            self.commit(q);
        }
        Ok(())
    }

    /// Mark original qudit `i` measured and close the gap it leaves
    fn commit(&mut self, i: usize) {
        self.position_of[i] = None;
        for position in self.position_of[i..].iter_mut().flatten() {
            *position -= 1;
        }
        trace!(qudit = i, position_of = ?self.position_of, "remapped positions");
    }

    fn positions(&self, qudits: &[usize]) -> Result<Indices> {
        qudits
            .iter()
            .map(|&q| match self.position_of.get(q) {
                Some(Some(position)) => Ok(*position),
                Some(None) => Err(EngineError::AlreadyMeasured(q)),
                None => Err(EngineError::IndexOutOfRange {
                    index: q,
                    bound: self.position_of.len(),
                }),
            })
            .collect()
    }

    /// Common value of the control dits, if they all agree
    fn agreed_dit(&self, ctrl_dits: &[usize]) -> Result<Option<usize>> {
        let mut values = ctrl_dits.iter().map(|&i| self.dit(i));
        let first = match values.next() {
            Some(first) => first?,
            None => return Ok(None),
        };
        for value in values {
            if value? != first {
                return Ok(None);
            }
        }
        Ok(Some(first))
    }

    /// JSON rendering of the engine state
    ///
    /// # Errors
    /// Returns error if rendering fails
    pub fn to_json(&self) -> Result<String> {
        let dump = EngineDump {
            measured: self.measured(),
            dits: &self.dits,
            probs: &self.probs,
        };
        serde_json::to_string(&dump)
            .map_err(|e| EngineError::Circuit(qudit_core::CircuitError::SerializationError(e.to_string())))
    }
}

/// Single-qudit operators of broadcasting shapes act as `U ⊗ ... ⊗ U`
fn broadcast(u: &Matrix, shape: ControlShape, targets: usize) -> Cow<'_, Matrix> {
    if shape.broadcasts() {
        Cow::Owned(u.kron_pow(targets))
    } else {
        Cow::Borrowed(u)
    }
}

fn check_memory(circuit: &Circuit, config: &EngineConfig) -> Result<()> {
    if config.memory_limit == 0 {
        return Ok(());
    }
    let requested = u32::try_from(circuit.nq())
        .ok()
        .and_then(|n| circuit.d().checked_pow(n))
        .and_then(|len| len.checked_mul(std::mem::size_of::<Complex64>()))
        .unwrap_or(usize::MAX);
    if requested > config.memory_limit {
        return Err(EngineError::OutOfMemory {
            requested,
            limit: config.memory_limit,
        });
    }
    Ok(())
}

#[derive(Serialize)]
struct EngineDump<'a> {
    measured: Vec<usize>,
    dits: &'a [usize],
    probs: &'a [f64],
}

struct DispList<'a, T>(&'a [T]);

impl<T: fmt::Display> fmt::Display for DispList<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, item) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item)?;
        }
        write!(f, "]")
    }
}

impl fmt::Display for Engine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "measured: {}", DispList(&self.measured()))?;
        writeln!(f, "dits: {}", DispList(&self.dits))?;
        write!(f, "probs: {}", DispList(&self.probs))
    }
}
