//! Text and JSON dumps of a circuit
//!
//! Both formats are diagnostic only and are never parsed back.

use crate::circuit::Circuit;
use crate::error::{CircuitError, Result};
use crate::step::{DispIndices, Step};
use serde::Serialize;
use std::fmt;

#[derive(Serialize)]
struct CircuitDump<'a> {
    nq: usize,
    nc: usize,
    d: usize,
    name: &'a str,
    steps: Vec<StepDump<'a>>,
    #[serde(rename = "measured positions")]
    measured: Vec<usize>,
    #[serde(rename = "non-measured positions")]
    non_measured: Vec<usize>,
}

#[derive(Serialize)]
struct StepDump<'a> {
    step: usize,
    #[serde(rename = "type")]
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    ctrl: Option<&'a [usize]>,
    target: &'a [usize],
    #[serde(skip_serializing_if = "Option::is_none")]
    c_reg: Option<usize>,
    name: &'a str,
}

impl<'a> StepDump<'a> {
    fn new(ip: usize, step: &'a Step) -> Self {
        match step {
            Step::Gate(gate) => Self {
                step: ip,
                kind: gate.kind().as_str(),
                ctrl: Some(gate.ctrl()).filter(|c| !c.is_empty()),
                target: gate.target(),
                c_reg: None,
                name: gate.name(),
            },
            Step::Measurement(measurement) => Self {
                step: ip,
                kind: measurement.kind().as_str(),
                ctrl: None,
                target: measurement.target(),
                c_reg: Some(measurement.c_reg()),
                name: measurement.name(),
            },
        }
    }
}

impl Circuit {
    /// JSON rendering of the circuit
    ///
    /// # Errors
    /// Returns [`CircuitError::SerializationError`] if rendering fails
    pub fn to_json(&self) -> Result<String> {
        let dump = CircuitDump {
            nq: self.nq(),
            nc: self.nc(),
            d: self.d(),
            name: self.name(),
            steps: self
                .steps()
                .iter()
                .enumerate()
                .map(|(ip, step)| StepDump::new(ip, step))
                .collect(),
            measured: self.measured(),
            non_measured: self.non_measured(),
        };
        serde_json::to_string(&dump).map_err(|e| CircuitError::SerializationError(e.to_string()))
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "nq = {}, nc = {}, d = {}, name = \"{}\"",
            self.nq(),
            self.nc(),
            self.d(),
            self.name()
        )?;
        for view in self {
            writeln!(f, "{}", view)?;
        }
        writeln!(f, "measured positions: {}", DispIndices(&self.measured()))?;
        write!(f, "non-measured positions: {}", DispIndices(&self.non_measured()))
    }
}
