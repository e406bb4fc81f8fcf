//! Dense qudit state vectors
//!
//! A [`Ket`] holds the `d^n` amplitudes of `n` qudits of dimension `d`. The
//! first qudit is the most significant digit of the amplitude index, so the
//! basis state `|j_0 j_1 ... j_{n-1}⟩` lives at `Σ j_q d^(n-1-q)`.
//!
//! Operators act on *positions* in the live tensor product. Destructive
//! measurement (see [`crate::measurement`]) removes factors, so callers that
//! address qudits by their original index must remap them first.

use crate::error::{Result, StateError};
use num_complex::Complex64;
use qudit_gates::Matrix;
use smallvec::SmallVec;
use std::fmt;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// Per-subsystem strides, inline for the common few-target case
pub(crate) type Strides = SmallVec<[usize; 4]>;

/// Dense state vector over `n` qudits of dimension `d`
#[derive(Clone, Debug, PartialEq)]
pub struct Ket {
    num_qudits: usize,
    dim: usize,
    amplitudes: Vec<Complex64>,
}

/// Canonical initial state `|0...0⟩`
///
/// # Errors
/// Returns error if `d < 2` or `d^n` overflows
pub fn zero_state(num_qudits: usize, d: usize) -> Result<Ket> {
    Ket::zero(num_qudits, d)
}

pub(crate) fn checked_len(num_qudits: usize, d: usize) -> Result<usize> {
    if d < 2 {
        return Err(StateError::InvalidDimension { dimension: d });
    }
    u32::try_from(num_qudits)
        .ok()
        .and_then(|n| d.checked_pow(n))
        .ok_or(StateError::TooLarge {
            num_qudits,
            dimension: d,
        })
}

impl Ket {
    /// Create `|0...0⟩` over `num_qudits` qudits of dimension `d`
    ///
    /// # Errors
    /// Returns error if `d < 2` or `d^n` overflows
    ///
    /// # Example
    /// ```
    /// use qudit_state::Ket;
    ///
    /// let psi = Ket::zero(3, 2).unwrap();
    /// assert_eq!(psi.len(), 8);
    /// assert_eq!(psi.amplitudes()[0].re, 1.0);
    /// ```
    pub fn zero(num_qudits: usize, d: usize) -> Result<Self> {
        let len = checked_len(num_qudits, d)?;
        let mut amplitudes = vec![ZERO; len];
        amplitudes[0] = ONE;
        Ok(Self {
            num_qudits,
            dim: d,
            amplitudes,
        })
    }

    /// Computational basis state with the given digits
    ///
    /// # Errors
    /// Returns error if a digit is `>= d`
    pub fn basis(digits: &[usize], d: usize) -> Result<Self> {
        let len = checked_len(digits.len(), d)?;
        let mut index = 0;
        for &digit in digits {
            if digit >= d {
                return Err(StateError::DimensionMismatch {
                    expected: d,
                    actual: digit,
                });
            }
            index = index * d + digit;
        }
        let mut amplitudes = vec![ZERO; len];
        amplitudes[index] = ONE;
        Ok(Self {
            num_qudits: digits.len(),
            dim: d,
            amplitudes,
        })
    }

    /// Wrap existing amplitudes without normalising them
    ///
    /// # Errors
    /// Returns error if `amplitudes.len() != d^num_qudits`
    pub fn from_amplitudes(num_qudits: usize, d: usize, amplitudes: Vec<Complex64>) -> Result<Self> {
        let len = checked_len(num_qudits, d)?;
        if amplitudes.len() != len {
            return Err(StateError::DimensionMismatch {
                expected: len,
                actual: amplitudes.len(),
            });
        }
        Ok(Self {
            num_qudits,
            dim: d,
            amplitudes,
        })
    }

    /// Number of qudits in the live tensor product
    #[inline]
    pub fn num_qudits(&self) -> usize {
        self.num_qudits
    }

    /// Qudit dimension
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of amplitudes, `d^n`
    #[inline]
    pub fn len(&self) -> usize {
        self.amplitudes.len()
    }

    /// Always false; a ket has at least one amplitude
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.amplitudes.is_empty()
    }

    /// Amplitude slice
    #[inline]
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// Euclidean norm
    pub fn norm(&self) -> f64 {
        self.amplitudes.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt()
    }

    /// Check the norm is 1 within `tolerance`
    pub fn is_normalized(&self, tolerance: f64) -> bool {
        (self.norm() - 1.0).abs() <= tolerance
    }

    /// Probability of each computational basis state
    pub fn probabilities(&self) -> Vec<f64> {
        self.amplitudes.iter().map(Complex64::norm_sqr).collect()
    }

    /// Element-wise comparison within `tolerance`
    pub fn approx_eq(&self, other: &Ket, tolerance: f64) -> bool {
        self.dim == other.dim
            && self.num_qudits == other.num_qudits
            && self
                .amplitudes
                .iter()
                .zip(&other.amplitudes)
                .all(|(a, b)| (a - b).norm() <= tolerance)
    }

    /// Stride of the digit at `position`
    #[inline]
    pub(crate) fn stride(&self, position: usize) -> usize {
        let mut stride = 1;
        for _ in position + 1..self.num_qudits {
            stride *= self.dim;
        }
        stride
    }

    #[inline]
    pub(crate) fn digit(&self, index: usize, stride: usize) -> usize {
        (index / stride) % self.dim
    }

    pub(crate) fn check_subsystems(&self, positions: &[usize]) -> Result<()> {
        for (i, &p) in positions.iter().enumerate() {
            if p >= self.num_qudits {
                return Err(StateError::InvalidSubsystem {
                    index: p,
                    num_qudits: self.num_qudits,
                });
            }
            if positions[..i].contains(&p) {
                return Err(StateError::DuplicateSubsystem { index: p });
            }
        }
        Ok(())
    }

    pub(crate) fn strides_of(&self, positions: &[usize]) -> Strides {
        positions.iter().map(|&p| self.stride(p)).collect()
    }

    /// Whether every listed digit of `index` is zero
    #[inline]
    pub(crate) fn is_block_base(&self, index: usize, strides: &[usize]) -> bool {
        strides.iter().all(|&s| self.digit(index, s) == 0)
    }

    fn check_operator(&self, op: &Matrix, num_targets: usize) -> Result<()> {
        if !op.is_square() {
            return Err(StateError::NotSquare {
                rows: op.rows(),
                cols: op.cols(),
            });
        }
        let expected = checked_len(num_targets, self.dim)?;
        if op.rows() != expected {
            return Err(StateError::DimensionMismatch {
                expected,
                actual: op.rows(),
            });
        }
        Ok(())
    }

    /// Apply a `d^k × d^k` operator to the qudits at `targets`
    ///
    /// The first target is the most significant factor of the operator's
    /// index.
    ///
    /// # Errors
    /// Returns error if a target is out of range or repeated, or if the
    /// operator does not match `d^|targets|`
    ///
    /// # Example
    /// ```
    /// use qudit_gates::{matrices, Matrix};
    /// use qudit_state::Ket;
    ///
    /// let mut psi = Ket::zero(2, 2).unwrap();
    /// psi.apply(&Matrix::from_array(&matrices::PAULI_X), &[1]).unwrap();
    /// assert_eq!(psi.amplitudes()[1].re, 1.0);
    /// ```
    pub fn apply(&mut self, op: &Matrix, targets: &[usize]) -> Result<()> {
        self.check_subsystems(targets)?;
        self.check_operator(op, targets.len())?;
        let strides = self.strides_of(targets);
        let offsets = block_offsets(&strides, self.dim);
        for base in 0..self.amplitudes.len() {
            if self.is_block_base(base, &strides) {
                self.apply_block(op, base, &offsets);
            }
        }
        Ok(())
    }

    /// Apply `op^k` to `targets` on every branch where all `ctrl` qudits hold
    /// the same value `k`
    ///
    /// For qubits this is the usual controlled gate: `op` fires when every
    /// control is `|1⟩`. With no controls the operator is applied directly.
    ///
    /// # Errors
    /// Returns error if positions are invalid, overlap, or the operator does
    /// not match `d^|targets|`
    pub fn apply_controlled(&mut self, op: &Matrix, ctrl: &[usize], targets: &[usize]) -> Result<()> {
        if ctrl.is_empty() {
            return self.apply(op, targets);
        }
        let all: Vec<usize> = ctrl.iter().chain(targets).copied().collect();
        self.check_subsystems(&all)?;
        self.check_operator(op, targets.len())?;

        let ctrl_strides = self.strides_of(ctrl);
        let target_strides = self.strides_of(targets);
        let offsets = block_offsets(&target_strides, self.dim);
        let ctrl_step: usize = ctrl_strides.iter().sum();

        let mut power = Matrix::identity(op.rows());
        for k in 1..self.dim {
            power = power.matmul(op)?;
            for base in 0..self.amplitudes.len() {
                if self.is_block_base(base, &ctrl_strides) && self.is_block_base(base, &target_strides) {
                    self.apply_block(&power, base + k * ctrl_step, &offsets);
                }
            }
        }
        Ok(())
    }

    fn apply_block(&mut self, op: &Matrix, base: usize, offsets: &[usize]) {
        let block: SmallVec<[Complex64; 8]> = offsets.iter().map(|&o| self.amplitudes[base + o]).collect();
        let n = offsets.len();
        let elements = op.as_slice();
        for (row, &offset) in offsets.iter().enumerate() {
            let mut acc = ZERO;
            for (col, amp) in block.iter().enumerate() {
                acc += elements[row * n + col] * amp;
            }
            self.amplitudes[base + offset] = acc;
        }
    }
}

/// Offsets of the `d^k` amplitudes of one target block relative to its base
///
/// Offset `j` corresponds to the `j`-th basis state of the targets, the
/// first target being the most significant digit.
pub(crate) fn block_offsets(strides: &[usize], d: usize) -> Vec<usize> {
    let mut offsets = vec![0usize];
    for &stride in strides {
        offsets = offsets
            .iter()
            .flat_map(|&o| (0..d).map(move |digit| o + digit * stride))
            .collect();
    }
    offsets
}

impl fmt::Display for Ket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ket({} qudits, d = {})[", self.num_qudits, self.dim)?;
        for (i, a) in self.amplitudes.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:.4}{:+.4}i", a.re, a.im)?;
        }
        write!(f, "]")
    }
}
