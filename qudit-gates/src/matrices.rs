//! Standard gate matrices
//!
//! Qubit gates are compile-time constants. Qudit generalisations (shift,
//! clock, Fourier) depend on the dimension and are built on demand.

use crate::Matrix;
use num_complex::Complex64;
use std::f64::consts::PI;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);
const NEG_I: Complex64 = Complex64::new(0.0, -1.0);
const NEG_ONE: Complex64 = Complex64::new(-1.0, 0.0);

const INV_SQRT2: f64 = std::f64::consts::FRAC_1_SQRT_2;

/// Hadamard gate
/// H = 1/√2 * [[1,  1],
///             [1, -1]]
pub const HADAMARD: [[Complex64; 2]; 2] = [
    [Complex64::new(INV_SQRT2, 0.0), Complex64::new(INV_SQRT2, 0.0)],
    [Complex64::new(INV_SQRT2, 0.0), Complex64::new(-INV_SQRT2, 0.0)],
];

/// Pauli-X (NOT)
pub const PAULI_X: [[Complex64; 2]; 2] = [[ZERO, ONE], [ONE, ZERO]];

/// Pauli-Y
pub const PAULI_Y: [[Complex64; 2]; 2] = [[ZERO, NEG_I], [I, ZERO]];

/// Pauli-Z
pub const PAULI_Z: [[Complex64; 2]; 2] = [[ONE, ZERO], [ZERO, NEG_ONE]];

/// Single-qubit identity
pub const IDENTITY: [[Complex64; 2]; 2] = [[ONE, ZERO], [ZERO, ONE]];

/// S = diag(1, i)
pub const S_GATE: [[Complex64; 2]; 2] = [[ONE, ZERO], [ZERO, I]];

/// S† = diag(1, -i)
pub const S_GATE_DAGGER: [[Complex64; 2]; 2] = [[ONE, ZERO], [ZERO, NEG_I]];

/// T = diag(1, e^(iπ/4))
pub const T_GATE: [[Complex64; 2]; 2] = [
    [ONE, ZERO],
    [ZERO, Complex64::new(INV_SQRT2, INV_SQRT2)],
];

/// T† = diag(1, e^(-iπ/4))
pub const T_GATE_DAGGER: [[Complex64; 2]; 2] = [
    [ONE, ZERO],
    [ZERO, Complex64::new(INV_SQRT2, -INV_SQRT2)],
];

/// CNOT with the first qubit as control
pub const CNOT: [[Complex64; 4]; 4] = [
    [ONE, ZERO, ZERO, ZERO],
    [ZERO, ONE, ZERO, ZERO],
    [ZERO, ZERO, ZERO, ONE],
    [ZERO, ZERO, ONE, ZERO],
];

/// Controlled-Z
pub const CZ: [[Complex64; 4]; 4] = [
    [ONE, ZERO, ZERO, ZERO],
    [ZERO, ONE, ZERO, ZERO],
    [ZERO, ZERO, ONE, ZERO],
    [ZERO, ZERO, ZERO, NEG_ONE],
];

/// SWAP
pub const SWAP: [[Complex64; 4]; 4] = [
    [ONE, ZERO, ZERO, ZERO],
    [ZERO, ZERO, ONE, ZERO],
    [ZERO, ONE, ZERO, ZERO],
    [ZERO, ZERO, ZERO, ONE],
];

/// Toffoli (CCNOT), controls on the first two qubits
pub const TOFFOLI: [[Complex64; 8]; 8] = [
    [ONE, ZERO, ZERO, ZERO, ZERO, ZERO, ZERO, ZERO],
    [ZERO, ONE, ZERO, ZERO, ZERO, ZERO, ZERO, ZERO],
    [ZERO, ZERO, ONE, ZERO, ZERO, ZERO, ZERO, ZERO],
    [ZERO, ZERO, ZERO, ONE, ZERO, ZERO, ZERO, ZERO],
    [ZERO, ZERO, ZERO, ZERO, ONE, ZERO, ZERO, ZERO],
    [ZERO, ZERO, ZERO, ZERO, ZERO, ONE, ZERO, ZERO],
    [ZERO, ZERO, ZERO, ZERO, ZERO, ZERO, ZERO, ONE],
    [ZERO, ZERO, ZERO, ZERO, ZERO, ZERO, ONE, ZERO],
];

/// Fredkin (CSWAP), control on the first qubit
pub const FREDKIN: [[Complex64; 8]; 8] = [
    [ONE, ZERO, ZERO, ZERO, ZERO, ZERO, ZERO, ZERO],
    [ZERO, ONE, ZERO, ZERO, ZERO, ZERO, ZERO, ZERO],
    [ZERO, ZERO, ONE, ZERO, ZERO, ZERO, ZERO, ZERO],
    [ZERO, ZERO, ZERO, ONE, ZERO, ZERO, ZERO, ZERO],
    [ZERO, ZERO, ZERO, ZERO, ONE, ZERO, ZERO, ZERO],
    [ZERO, ZERO, ZERO, ZERO, ZERO, ZERO, ONE, ZERO],
    [ZERO, ZERO, ZERO, ZERO, ZERO, ONE, ZERO, ZERO],
    [ZERO, ZERO, ZERO, ZERO, ZERO, ZERO, ZERO, ONE],
];

/// Generalised Pauli X for dimension `d`: |j⟩ ↦ |j+1 mod d⟩
pub fn shift(d: usize) -> Matrix {
    let mut data = vec![ZERO; d * d];
    for j in 0..d {
        data[((j + 1) % d) * d + j] = ONE;
    }
    Matrix::from_parts(d, d, data)
}

/// Generalised Pauli Z for dimension `d`: |j⟩ ↦ ω^j |j⟩ with ω = e^(2πi/d)
pub fn clock(d: usize) -> Matrix {
    let mut data = vec![ZERO; d * d];
    for j in 0..d {
        data[j * d + j] = Complex64::from_polar(1.0, 2.0 * PI * j as f64 / d as f64);
    }
    Matrix::from_parts(d, d, data)
}

/// Quantum Fourier transform on a single qudit of dimension `d`
///
/// Equals [`HADAMARD`] for `d = 2`.
pub fn fourier(d: usize) -> Matrix {
    let norm = 1.0 / (d as f64).sqrt();
    let mut data = Vec::with_capacity(d * d);
    for j in 0..d {
        for k in 0..d {
            let phase = 2.0 * PI * ((j * k) % d) as f64 / d as f64;
            data.push(Complex64::from_polar(norm, phase));
        }
    }
    Matrix::from_parts(d, d, data)
}

/// Qudit controlled-shift on two qudits of dimension `d`: |a, b⟩ ↦ |a, a+b mod d⟩
///
/// Equals [`CNOT`] for `d = 2`.
pub fn controlled_shift(d: usize) -> Matrix {
    let n = d * d;
    let mut data = vec![ZERO; n * n];
    for a in 0..d {
        for b in 0..d {
            let col = a * d + b;
            let row = a * d + (a + b) % d;
            data[row * n + col] = ONE;
        }
    }
    Matrix::from_parts(n, n, data)
}
