//! Integration tests for circuit construction and traversal

use qudit_core::{Circuit, CircuitError, GateKind, StepType};
use qudit_gates::{matrices, Matrix};

fn h() -> Matrix {
    Matrix::from_array(&matrices::HADAMARD)
}

fn x() -> Matrix {
    Matrix::from_array(&matrices::PAULI_X)
}

/// Snapshot of everything observable through the read accessors
fn snapshot(circuit: &Circuit) -> (String, String, Vec<usize>, usize, usize) {
    (
        circuit.to_string(),
        circuit.to_json().unwrap(),
        circuit.measured(),
        circuit.gate_count(),
        circuit.measurement_count(),
    )
}

fn assert_timeline_consistent(circuit: &Circuit) {
    assert_eq!(circuit.step_count(), circuit.gate_count() + circuit.measurement_count());

    let gate_tags = circuit.iter().filter(|v| v.step_type() == StepType::Gate).count();
    assert_eq!(gate_tags, circuit.gate_count());

    // the i-th gate tag is the i-th gate
    let mut gates = circuit.gates();
    for view in circuit.iter().filter(|v| v.step_type() == StepType::Gate) {
        let gate = gates.next().unwrap();
        assert!(std::ptr::eq(view.step().as_gate().unwrap(), gate));
    }
    assert!(gates.next().is_none());

    let mut measurements = circuit.measurements();
    for view in circuit.iter().filter(|v| v.step_type() == StepType::Measurement) {
        let measurement = measurements.next().unwrap();
        assert!(std::ptr::eq(view.step().as_measurement().unwrap(), measurement));
    }
    assert!(measurements.next().is_none());
}

#[test]
fn test_timeline_stays_consistent_across_interleaving() {
    let mut circuit = Circuit::new(6, 6, 2, None).unwrap();
    assert_timeline_consistent(&circuit);

    for q in 0..6 {
        circuit.gate(&h(), q, None).unwrap();
        assert_timeline_consistent(&circuit);
        if q % 2 == 1 {
            circuit.measure_z(q - 1, q - 1, None).unwrap();
            assert_timeline_consistent(&circuit);
        }
        if q >= 3 {
            circuit.cctrl(&x(), 0, q, None).unwrap();
            assert_timeline_consistent(&circuit);
        }
    }
    circuit.gate_fan_all(&x(), None).unwrap();
    assert_timeline_consistent(&circuit);

    assert_eq!(circuit.measured(), vec![0, 2, 4]);
    assert_eq!(circuit.non_measured(), vec![1, 3, 5]);
}

#[test]
fn test_failed_append_leaves_circuit_unchanged() {
    let mut circuit = Circuit::new(3, 2, 2, Some("strong")).unwrap();
    circuit
        .gate(&h(), 0, None)
        .unwrap()
        .ctrl(&x(), 0, 1, None)
        .unwrap()
        .measure_z(0, 0, None)
        .unwrap();
    let before = snapshot(&circuit);

    let failures = [
        circuit.gate(&h(), 3, None).map(|_| ()),
        circuit.gate(&h(), 0, None).map(|_| ()),
        circuit.gate2(&x(), 1, 2, None).map(|_| ()),
        circuit.gate_fan(&h(), &[1, 1], None).map(|_| ()),
        circuit.gate_custom(&h(), &[], None).map(|_| ()),
        circuit.ctrl(&x(), 2, 2, None).map(|_| ()),
        circuit.multi_ctrl_multi_target(&x(), &[1], &[0, 2], None).map(|_| ()),
        circuit.cctrl(&x(), 2, 1, None).map(|_| ()),
        circuit.measure_z(1, 2, None).map(|_| ()),
        circuit.measure_v_many(&Matrix::identity(2), &[1, 2], 1, None).map(|_| ()),
        circuit.qft(&[1, 2], None).map(|_| ()),
    ];
    assert!(failures.iter().all(Result::is_err));
    assert_eq!(snapshot(&circuit), before);
}

#[test]
fn test_measured_bits_are_monotonic() {
    let mut circuit = Circuit::new(4, 4, 3, None).unwrap();
    let mut seen = Vec::new();
    for &q in &[2, 0, 3, 1] {
        circuit.measure_z(q, q, None).unwrap();
        seen.push(q);
        seen.sort_unstable();
        assert_eq!(circuit.measured(), seen);
        for &m in &seen {
            assert_eq!(circuit.is_measured(m), Ok(true));
            assert_eq!(circuit.measure_z(m, 0, None).unwrap_err(), CircuitError::AlreadyMeasured(m));
        }
    }
}

#[test]
fn test_ctrl_on_its_own_target_is_rejected() {
    let mut circuit = Circuit::new(2, 0, 2, None).unwrap();
    let err = circuit.ctrl(&x(), 1, 1, None).unwrap_err();
    assert_eq!(err, CircuitError::DuplicateIndex(1));
    assert_eq!(circuit.step_count(), 0);
    assert!(circuit.measured().is_empty());
}

#[test]
fn test_accessors_are_idempotent() {
    let mut circuit = Circuit::new(3, 1, 2, None).unwrap();
    circuit
        .gate(&h(), 2, None)
        .unwrap()
        .multi_ctrl(&x(), &[2, 0], 1, None)
        .unwrap()
        .measure_z(1, 0, None)
        .unwrap();

    let first = snapshot(&circuit);
    let second = snapshot(&circuit);
    assert_eq!(first, second);
    assert_eq!(circuit.non_measured(), circuit.non_measured());
    assert_eq!(circuit.step(1).map(|s| s.name()), Some("X"));
}

#[test]
fn test_qudit_circuit_kinds() {
    let d = 4;
    let mut circuit = Circuit::new(3, 1, d, None).unwrap();
    circuit
        .gate(&matrices::fourier(d), 0, None)
        .unwrap()
        .gate2(&matrices::controlled_shift(d), 0, 1, None)
        .unwrap()
        .ctrl_custom(&matrices::controlled_shift(d), &[2], &[0, 1], None)
        .unwrap();

    let kinds: Vec<GateKind> = circuit.gates().map(|g| g.kind()).collect();
    assert_eq!(kinds, vec![GateKind::Single, GateKind::Two, GateKind::CustomCtrl]);
    assert_eq!(circuit.gates().next().map(|g| g.name()), Some("Fd"));
}
