use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use qudit_gates::{matrices, Matrix};
use qudit_state::{measure, measure_sequential, zero_state, Ket};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn spread_state(num_qudits: usize, d: usize) -> Ket {
    let mut psi = zero_state(num_qudits, d).unwrap();
    let f = matrices::fourier(d);
    for q in 0..num_qudits {
        psi.apply(&f, &[q]).unwrap();
    }
    psi
}

fn bench_single_qudit_gate(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_qudit_gate");

    for &(n, d) in [(10, 2), (16, 2), (6, 3), (10, 3)].iter() {
        let size = zero_state(n, d).unwrap().len();
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", n, d)),
            &(n, d),
            |b, &(n, d)| {
                let mut psi = spread_state(n, d);
                let x = matrices::shift(d);
                b.iter(|| psi.apply(black_box(&x), &[n / 2]).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_controlled_gate(c: &mut Criterion) {
    let mut group = c.benchmark_group("controlled_gate");

    for &(n, d) in [(12, 2), (8, 3)].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}x{}", n, d)),
            &(n, d),
            |b, &(n, d)| {
                let mut psi = spread_state(n, d);
                let x = matrices::shift(d);
                b.iter(|| psi.apply_controlled(black_box(&x), &[0], &[n - 1]).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_two_qudit_gate(c: &mut Criterion) {
    let mut group = c.benchmark_group("two_qudit_gate");
    let cnot = Matrix::from_array(&matrices::CNOT);

    for n in [10, 14].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(n), n, |b, &n| {
            let mut psi = spread_state(n, 2);
            b.iter(|| psi.apply(black_box(&cnot), &[n - 1, 0]).unwrap());
        });
    }

    group.finish();
}

fn bench_measurement(c: &mut Criterion) {
    let mut group = c.benchmark_group("measurement");

    for n in [8, 12].iter() {
        let psi = spread_state(*n, 2);
        let z = Matrix::identity(2);

        group.bench_with_input(BenchmarkId::new("basis", n), n, |b, &n| {
            let mut rng = StdRng::seed_from_u64(123);
            b.iter(|| measure(black_box(&psi), &z, &[n / 2], &mut rng).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("sequential", n), n, |b, &n| {
            let mut rng = StdRng::seed_from_u64(123);
            let targets: Vec<usize> = (0..n).step_by(2).collect();
            b.iter(|| measure_sequential(black_box(&psi), &targets, &mut rng).unwrap());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_single_qudit_gate,
    bench_controlled_gate,
    bench_two_qudit_gate,
    bench_measurement,
);
criterion_main!(benches);
