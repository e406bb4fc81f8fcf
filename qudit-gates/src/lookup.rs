//! Named-gate lookup table
//!
//! Maps operator matrices back to conventional gate names. Circuits use it to
//! label steps appended without an explicit name; the label is cosmetic and
//! never affects execution.
//!
//! The qubit table is built once per process and shared read-only. Qudit
//! generators (`Xd`, `Zd`, `Fd`) are matched against the dimension of the
//! queried matrix on demand.
//!
//! # Example
//!
//! ```rust
//! use qudit_gates::{lookup_name, matrices, Matrix};
//!
//! assert_eq!(lookup_name(&Matrix::from_array(&matrices::HADAMARD)), "H");
//! assert_eq!(lookup_name(&matrices::shift(3)), "Xd");
//! assert_eq!(lookup_name(&Matrix::from_real(&[0.6, 0.8, 0.8, -0.6])), "");
//! ```

use crate::matrices::{self, *};
use crate::Matrix;
use std::sync::OnceLock;

/// Tolerance used when comparing a candidate against table entries
pub const LOOKUP_TOLERANCE: f64 = 1e-10;

/// Largest single-qudit dimension matched against the generated qudit gates
pub const MAX_QUDIT_LOOKUP_DIM: usize = 16;

/// Table of named operators
#[derive(Debug)]
pub struct GateTable {
    entries: Vec<(&'static str, Matrix)>,
}

impl GateTable {
    /// Build the standard qubit table
    pub fn standard() -> Self {
        let entries = vec![
            ("Id2", Matrix::from_array(&IDENTITY)),
            ("H", Matrix::from_array(&HADAMARD)),
            ("X", Matrix::from_array(&PAULI_X)),
            ("Y", Matrix::from_array(&PAULI_Y)),
            ("Z", Matrix::from_array(&PAULI_Z)),
            ("S", Matrix::from_array(&S_GATE)),
            ("S†", Matrix::from_array(&S_GATE_DAGGER)),
            ("T", Matrix::from_array(&T_GATE)),
            ("T†", Matrix::from_array(&T_GATE_DAGGER)),
            ("CNOT", Matrix::from_array(&CNOT)),
            ("CZ", Matrix::from_array(&CZ)),
            ("SWAP", Matrix::from_array(&SWAP)),
            ("TOFFOLI", Matrix::from_array(&TOFFOLI)),
            ("FREDKIN", Matrix::from_array(&FREDKIN)),
        ];
        Self { entries }
    }

    /// Process-wide shared table
    pub fn global() -> &'static GateTable {
        static TABLE: OnceLock<GateTable> = OnceLock::new();
        TABLE.get_or_init(GateTable::standard)
    }

    /// Name of the first entry matching `matrix`
    pub fn name_of(&self, matrix: &Matrix) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(_, candidate)| candidate.approx_eq(matrix, LOOKUP_TOLERANCE))
            .map(|(name, _)| *name)
    }

    /// Number of named entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn qudit_name(matrix: &Matrix) -> Option<&'static str> {
    let d = matrix.rows();
    if !matrix.is_square() || d < 2 || d > MAX_QUDIT_LOOKUP_DIM {
        return None;
    }
    if matrix.approx_eq(&Matrix::identity(d), LOOKUP_TOLERANCE) {
        Some("Id")
    } else if matrix.approx_eq(&matrices::shift(d), LOOKUP_TOLERANCE) {
        Some("Xd")
    } else if matrix.approx_eq(&matrices::clock(d), LOOKUP_TOLERANCE) {
        Some("Zd")
    } else if matrix.approx_eq(&matrices::fourier(d), LOOKUP_TOLERANCE) {
        Some("Fd")
    } else {
        None
    }
}

/// Best-effort conventional name of `matrix`; empty when unknown
pub fn lookup_name(matrix: &Matrix) -> String {
    GateTable::global()
        .name_of(matrix)
        .or_else(|| qudit_name(matrix))
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qubit_names() {
        assert_eq!(lookup_name(&Matrix::from_array(&PAULI_X)), "X");
        assert_eq!(lookup_name(&Matrix::from_array(&CNOT)), "CNOT");
        assert_eq!(lookup_name(&Matrix::from_array(&TOFFOLI)), "TOFFOLI");
        assert_eq!(lookup_name(&Matrix::from_array(&T_GATE_DAGGER)), "T†");
    }

    #[test]
    fn test_qubit_names_win_over_qudit_generators() {
        assert_eq!(lookup_name(&matrices::shift(2)), "X");
        assert_eq!(lookup_name(&matrices::fourier(2)), "H");
        assert_eq!(lookup_name(&Matrix::identity(2)), "Id2");
    }

    #[test]
    fn test_qudit_names() {
        assert_eq!(lookup_name(&matrices::shift(5)), "Xd");
        assert_eq!(lookup_name(&matrices::clock(3)), "Zd");
        assert_eq!(lookup_name(&matrices::fourier(4)), "Fd");
        assert_eq!(lookup_name(&Matrix::identity(3)), "Id");
    }

    #[test]
    fn test_unknown_and_non_square() {
        assert_eq!(lookup_name(&matrices::controlled_shift(3)), "");
        assert_eq!(lookup_name(&Matrix::zeros(2, 1)), "");
    }

    #[test]
    fn test_global_table_is_shared() {
        let a = GateTable::global() as *const GateTable;
        let b = GateTable::global() as *const GateTable;
        assert_eq!(a, b);
        assert!(!GateTable::global().is_empty());
        assert_eq!(GateTable::global().len(), 14);
    }
}
