//! End-to-end scenarios for the execution engine

use approx::assert_relative_eq;
use qudit_core::Circuit;
use qudit_gates::{matrices, Matrix};
use qudit_sim::{Engine, EngineConfig, EngineError};
use qudit_state::Ket;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

const EPSILON: f64 = 1e-10;

fn h() -> Matrix {
    Matrix::from_array(&matrices::HADAMARD)
}

fn x() -> Matrix {
    Matrix::from_array(&matrices::PAULI_X)
}

fn z() -> Matrix {
    Matrix::from_array(&matrices::PAULI_Z)
}

#[test]
fn test_bell_pair_outcomes_are_correlated() {
    let mut circuit = Circuit::new(2, 2, 2, Some("bell")).unwrap();
    circuit
        .gate(&h(), 0, None)
        .unwrap()
        .ctrl(&x(), 0, 1, None)
        .unwrap()
        .measure_z(0, 0, None)
        .unwrap()
        .measure_z(1, 1, None)
        .unwrap();

    let mut engine = Engine::with_config(&circuit, EngineConfig::new().with_seed(2024)).unwrap();
    let shots = 2000;
    let counts = engine.sample(shots).unwrap();

    assert_eq!(counts.get("01") + counts.get("10"), 0);
    assert_eq!(counts.get("00") + counts.get("11"), shots);
    assert!((counts.probability("00") - 0.5).abs() < 0.05);
    assert!((counts.probability("11") - 0.5).abs() < 0.05);

    // first measurement is a coin flip, the second is then certain
    assert_relative_eq!(engine.probs()[0], 0.5, epsilon = EPSILON);
    assert_relative_eq!(engine.probs()[1], 1.0, epsilon = EPSILON);
}

#[test]
fn test_classical_controls_must_agree() {
    let mut circuit = Circuit::new(1, 2, 2, None).unwrap();
    circuit.multi_cctrl(&x(), &[0, 1], 0, None).unwrap();

    let mut engine = Engine::with_config(&circuit, EngineConfig::debug()).unwrap();
    engine.set_dit(0, 1).unwrap().set_dit(1, 1).unwrap();
    engine.run().unwrap();
    assert!(engine.psi().approx_eq(&Ket::basis(&[1], 2).unwrap(), EPSILON));

    engine.reset().unwrap();
    engine.set_dit(0, 1).unwrap().set_dit(1, 0).unwrap();
    let before = engine.psi().clone();
    engine.run().unwrap();
    assert_eq!(engine.psi(), &before);

    // both zero: X^0 is the identity
    engine.reset().unwrap();
    engine.run().unwrap();
    assert!(engine.psi().approx_eq(&Ket::basis(&[0], 2).unwrap(), EPSILON));
}

#[test]
fn test_measurement_does_not_block_other_qudits() {
    let mut circuit = Circuit::new(3, 1, 2, None).unwrap();
    circuit
        .measure_z(0, 0, None)
        .unwrap()
        .gate(&x(), 1, None)
        .unwrap()
        .ctrl(&x(), 1, 2, None)
        .unwrap();

    let mut engine = Engine::with_config(&circuit, EngineConfig::debug()).unwrap();
    let mut cursor = circuit.begin();

    assert_eq!(engine.position_of(1), Ok(Some(1)));
    assert_eq!(engine.position_of(2), Ok(Some(2)));

    engine.execute_cursor(&cursor).unwrap();
    cursor.advance().unwrap();
    assert_eq!(engine.position_of(0), Ok(None));
    assert_eq!(engine.position_of(1), Ok(Some(0)));
    assert_eq!(engine.position_of(2), Ok(Some(1)));
    assert_eq!(engine.dit(0), Ok(0));

    while cursor != circuit.end() {
        engine.execute_cursor(&cursor).unwrap();
        cursor.advance().unwrap();
    }
    assert!(engine.psi().approx_eq(&Ket::basis(&[1, 1], 2).unwrap(), EPSILON));
    assert!(matches!(
        engine.execute_cursor(&cursor),
        Err(EngineError::InvalidCursor(_))
    ));
}

#[test]
fn test_overlapping_ctrl_and_target_never_reaches_engine() {
    let mut circuit = Circuit::new(2, 0, 2, None).unwrap();
    assert!(circuit.ctrl(&x(), 0, 0, None).is_err());
    assert_eq!(circuit.step_count(), 0);

    let mut engine = Engine::new(&circuit).unwrap();
    engine.run().unwrap();
    assert!(engine.psi().approx_eq(&Ket::zero(2, 2).unwrap(), EPSILON));
}

#[test]
fn test_remapping_is_rank_among_survivors() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for nq in 2..=6 {
        for d in [2, 3] {
            if nq == 6 && d == 3 {
                continue;
            }
            for _ in 0..8 {
                let digits: Vec<usize> = (0..nq).map(|_| rng.gen_range(0..d)).collect();
                let mut order: Vec<usize> = (0..nq).collect();
                order.shuffle(&mut rng);

                let mut circuit = Circuit::new(nq, nq, d, None).unwrap();
                let shift = matrices::shift(d);
                for (q, &digit) in digits.iter().enumerate() {
                    for _ in 0..digit {
                        circuit.gate(&shift, q, None).unwrap();
                    }
                }
                for &q in &order {
                    circuit.measure_z(q, q, None).unwrap();
                }

                let mut engine =
                    Engine::with_config(&circuit, EngineConfig::new().with_seed(rng.gen())).unwrap();
                let mut measured = vec![false; nq];
                for view in &circuit {
                    engine.execute(view).unwrap();
                    if let Some(m) = view.step().as_measurement() {
                        measured[m.target()[0]] = true;
                    }

                    let mut rank = 0;
                    let mut survivors = Vec::new();
                    for q in 0..nq {
                        if measured[q] {
                            assert_eq!(engine.position_of(q), Ok(None));
                        } else {
                            assert_eq!(engine.position_of(q), Ok(Some(rank)));
                            survivors.push(digits[q]);
                            rank += 1;
                        }
                    }
                    let expected = Ket::basis(&survivors, d).unwrap();
                    assert!(engine.psi().approx_eq(&expected, EPSILON));
                }
                assert_eq!(engine.dits(), digits.as_slice());
                assert!(engine.non_measured().is_empty());
            }
        }
    }
}

#[test]
fn test_teleportation_moves_the_state() {
    // |ψ⟩ = cos θ |0⟩ + sin θ |1⟩ on qudit 0, teleported to qudit 2
    let theta: f64 = 0.3;
    let prep = Matrix::from_real(&[theta.cos(), -theta.sin(), theta.sin(), theta.cos()]);

    let mut circuit = Circuit::new(3, 2, 2, Some("teleport")).unwrap();
    circuit
        .gate(&prep, 0, Some("prep"))
        .unwrap()
        .gate(&h(), 1, None)
        .unwrap()
        .ctrl(&x(), 1, 2, None)
        .unwrap()
        .ctrl(&x(), 0, 1, None)
        .unwrap()
        .gate(&h(), 0, None)
        .unwrap()
        .measure_z(0, 0, None)
        .unwrap()
        .measure_z(1, 1, None)
        .unwrap()
        .cctrl(&x(), 1, 2, None)
        .unwrap()
        .cctrl(&z(), 0, 2, None)
        .unwrap();

    for seed in 0..16 {
        let mut engine = Engine::with_config(&circuit, EngineConfig::new().with_seed(seed)).unwrap();
        engine.run().unwrap();

        assert_eq!(engine.non_measured(), vec![2]);
        assert_eq!(engine.position_of(2), Ok(Some(0)));
        let amps = engine.psi().amplitudes();
        assert_relative_eq!(amps[0].re, theta.cos(), epsilon = EPSILON);
        assert_relative_eq!(amps[1].re, theta.sin(), epsilon = EPSILON);
        assert_relative_eq!(engine.probs()[0], 0.5, epsilon = EPSILON);
    }
}

#[test]
fn test_qutrit_controlled_shift_entangles() {
    let d = 3;
    let mut circuit = Circuit::new(2, 2, d, None).unwrap();
    circuit
        .gate(&matrices::fourier(d), 0, None)
        .unwrap()
        .ctrl(&matrices::shift(d), 0, 1, None)
        .unwrap()
        .measure_z(1, 1, None)
        .unwrap()
        .measure_z(0, 0, None)
        .unwrap();

    let mut engine = Engine::with_config(&circuit, EngineConfig::debug()).unwrap();
    let counts = engine.sample(300).unwrap();
    for (outcome, _) in counts.sorted() {
        let digits: Vec<char> = outcome.chars().collect();
        assert_eq!(digits[0], digits[1]);
    }
    assert_eq!(counts.num_outcomes(), 3);
}

/// Two joint 4-qubit measurements; `first` and `second` are the prepared
/// basis indices of qubits 0..4 and 4..8
fn joint_register_circuit(first: usize, second: usize) -> Circuit {
    let mut circuit = Circuit::new(8, 2, 2, None).unwrap();
    for (offset, value) in [(0, first), (4, second)] {
        for bit in 0..4 {
            if (value >> (3 - bit)) & 1 == 1 {
                circuit.gate(&x(), offset + bit, None).unwrap();
            }
        }
    }
    circuit
        .measure_v_many(&Matrix::identity(16), &[0, 1, 2, 3], 0, None)
        .unwrap()
        .measure_v_many(&Matrix::identity(16), &[4, 5, 6, 7], 1, None)
        .unwrap();
    circuit
}

#[test]
fn test_sample_keeps_multi_digit_outcomes_apart() {
    let forward = joint_register_circuit(1, 11);
    let mut engine = Engine::with_config(&forward, EngineConfig::debug()).unwrap();
    let counts = engine.sample(20).unwrap();
    assert_eq!(engine.dits(), &[1, 11]);
    assert_eq!(counts.get("1,11"), 20);

    let backward = joint_register_circuit(11, 1);
    let mut engine = Engine::with_config(&backward, EngineConfig::debug()).unwrap();
    let counts = engine.sample(20).unwrap();
    assert_eq!(counts.get("11,1"), 20);
    assert_eq!(counts.get("1,11"), 0);
}

#[test]
fn test_sample_counts_every_joint_outcome() {
    let mut circuit = Circuit::new(8, 2, 2, None).unwrap();
    circuit
        .gate_fan_all(&h(), None)
        .unwrap()
        .measure_v_many(&Matrix::identity(16), &[0, 1, 2, 3], 0, None)
        .unwrap()
        .measure_v_many(&Matrix::identity(16), &[4, 5, 6, 7], 1, None)
        .unwrap();

    let shots = 6000;
    let mut engine = Engine::with_config(&circuit, EngineConfig::new().with_seed(7)).unwrap();
    let counts = engine.sample(shots).unwrap();

    assert_eq!(counts.total_shots(), shots);
    assert_eq!(counts.num_outcomes(), 256);
    for (outcome, _) in counts.sorted() {
        let dits: Vec<usize> = if outcome.contains(',') {
            outcome.split(',').map(|dit| dit.parse().unwrap()).collect()
        } else {
            outcome.chars().map(|dit| dit.to_digit(10).unwrap() as usize).collect()
        };
        assert_eq!(dits.len(), 2);
        assert!(dits.iter().all(|&dit| dit < 16));
        assert_eq!(outcome, qudit_sim::MeasurementCounts::key(&dits));
    }
}

#[test]
fn test_engine_accessors_are_idempotent() {
    let mut circuit = Circuit::new(2, 1, 2, None).unwrap();
    circuit.gate(&h(), 0, None).unwrap().measure_z(0, 0, None).unwrap();

    let mut engine = Engine::with_config(&circuit, EngineConfig::debug()).unwrap();
    engine.run().unwrap();

    assert_eq!(engine.measured(), engine.measured());
    assert_eq!(engine.dits(), engine.dits());
    assert_eq!(engine.to_string(), engine.to_string());
    assert_eq!(engine.to_json().unwrap(), engine.to_json().unwrap());
    assert_eq!(engine.psi(), engine.psi());
}
