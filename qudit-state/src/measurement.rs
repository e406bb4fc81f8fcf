//! Destructive measurement of qudit subsystems
//!
//! Both primitives physically remove the measured tensor factors: a branch
//! state of an `n`-qudit ket measured on `k` targets lives on the remaining
//! `n - k` qudits, in their original relative order.
//!
//! - [`measure`]: rank-one measurement against the columns of a basis
//!   matrix; every branch is returned and one outcome is sampled
//! - [`measure_sequential`]: computational-basis measurement of several
//!   qudits one after another

use crate::error::{Result, StateError};
use crate::ket::{block_offsets, checked_len, Ket};
use num_complex::Complex64;
use qudit_gates::Matrix;
use rand::Rng;

const ZERO: Complex64 = Complex64::new(0.0, 0.0);

/// Branch probabilities below this are treated as zero
pub const PROBABILITY_EPSILON: f64 = 1e-14;

/// Result of a basis measurement
#[derive(Clone, Debug)]
pub struct Measurement {
    /// Sampled outcome index (column of the basis)
    pub outcome: usize,
    /// Probability of every outcome
    pub probabilities: Vec<f64>,
    /// Normalised post-measurement state of every branch
    pub states: Vec<Ket>,
}

impl Measurement {
    /// Probability of the sampled outcome
    pub fn probability(&self) -> f64 {
        self.probabilities[self.outcome]
    }

    /// Post-measurement state of the sampled outcome
    pub fn state(&self) -> &Ket {
        &self.states[self.outcome]
    }

    /// Take the post-measurement state of the sampled outcome
    pub fn into_state(mut self) -> Ket {
        self.states.swap_remove(self.outcome)
    }
}

/// Result of a computational-basis measurement of several qudits
#[derive(Clone, Debug)]
pub struct SequentialMeasurement {
    /// Observed digit per target, in the order the targets were given
    pub outcomes: Vec<usize>,
    /// Joint probability of the observed digits
    pub probability: f64,
    /// Post-measurement state on the unmeasured qudits
    pub state: Ket,
}

/// Measure the qudits at `targets` against the columns of `basis`
///
/// `basis` is `d^k × m` with `1 <= m <= d^k`, `k = targets.len()`. Outcome
/// `c` projects onto column `c`; the first target is the most significant
/// digit of the row index. Branches with zero probability are returned
/// unnormalised (all zeros).
///
/// # Errors
/// Returns error if targets are invalid, the basis shape does not match, or
/// every branch has zero probability
///
/// # Example
/// ```
/// use qudit_gates::Matrix;
/// use qudit_state::{measure, Ket};
///
/// let psi = Ket::basis(&[1, 0], 2).unwrap();
/// let mut rng = rand::thread_rng();
/// let m = measure(&psi, &Matrix::identity(2), &[0], &mut rng).unwrap();
/// assert_eq!(m.outcome, 1);
/// assert_eq!(m.state().num_qudits(), 1);
/// ```
pub fn measure<R: Rng + ?Sized>(psi: &Ket, basis: &Matrix, targets: &[usize], rng: &mut R) -> Result<Measurement> {
    psi.check_subsystems(targets)?;
    let rows = checked_len(targets.len(), psi.dim())?;
    if basis.rows() != rows {
        return Err(StateError::DimensionMismatch {
            expected: rows,
            actual: basis.rows(),
        });
    }
    if basis.cols() == 0 {
        return Err(StateError::EmptyBasis);
    }
    if basis.cols() > rows {
        return Err(StateError::DimensionMismatch {
            expected: rows,
            actual: basis.cols(),
        });
    }

    let target_strides = psi.strides_of(targets);
    let offsets = block_offsets(&target_strides, psi.dim());
    let bases: Vec<usize> = (0..psi.len())
        .filter(|&i| psi.is_block_base(i, &target_strides))
        .collect();
    let remaining = psi.num_qudits() - targets.len();
    let amplitudes = psi.amplitudes();
    let elements = basis.as_slice();
    let m = basis.cols();

    let mut probabilities = Vec::with_capacity(m);
    let mut branches = Vec::with_capacity(m);
    for c in 0..m {
        let branch: Vec<Complex64> = bases
            .iter()
            .map(|&base| {
                offsets
                    .iter()
                    .enumerate()
                    .fold(ZERO, |acc, (j, &o)| acc + elements[j * m + c].conj() * amplitudes[base + o])
            })
            .collect();
        probabilities.push(branch.iter().map(Complex64::norm_sqr).sum::<f64>());
        branches.push(branch);
    }

    let total: f64 = probabilities.iter().sum();
    if total <= PROBABILITY_EPSILON {
        return Err(StateError::ZeroNorm);
    }
    let outcome = sample_index(&probabilities, total, rng);

    let states = branches
        .into_iter()
        .zip(&probabilities)
        .map(|(mut branch, &p)| {
            if p > PROBABILITY_EPSILON {
                let scale = 1.0 / p.sqrt();
                branch.iter_mut().for_each(|a| *a *= scale);
            }
            Ket::from_amplitudes(remaining, psi.dim(), branch)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Measurement {
        outcome,
        probabilities,
        states,
    })
}

/// Measure each qudit at `targets` in the computational basis
///
/// Targets are collapsed from the highest position down so removing one
/// factor never shifts a target that is still pending.
///
/// # Errors
/// Returns error if targets are invalid or the state has zero norm
pub fn measure_sequential<R: Rng + ?Sized>(
    psi: &Ket,
    targets: &[usize],
    rng: &mut R,
) -> Result<SequentialMeasurement> {
    psi.check_subsystems(targets)?;

    let mut order: Vec<usize> = (0..targets.len()).collect();
    order.sort_unstable_by(|&a, &b| targets[b].cmp(&targets[a]));

    let z = Matrix::identity(psi.dim());
    let mut outcomes = vec![0; targets.len()];
    let mut probability = 1.0;
    let mut state = psi.clone();
    for slot in order {
        let m = measure(&state, &z, &[targets[slot]], rng)?;
        outcomes[slot] = m.outcome;
        probability *= m.probability();
        state = m.into_state();
    }

    Ok(SequentialMeasurement {
        outcomes,
        probability,
        state,
    })
}

fn sample_index<R: Rng + ?Sized>(probabilities: &[f64], total: f64, rng: &mut R) -> usize {
    let r = rng.gen::<f64>() * total;
    let mut cumulative = 0.0;
    let mut last_nonzero = 0;
    for (i, &p) in probabilities.iter().enumerate() {
        if p <= PROBABILITY_EPSILON {
            continue;
        }
        cumulative += p;
        last_nonzero = i;
        if r < cumulative {
            return i;
        }
    }
    last_nonzero
}
