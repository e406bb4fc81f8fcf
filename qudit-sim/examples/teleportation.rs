//! Quantum teleportation, stepped one instruction at a time
//!
//! Run with `RUST_LOG=debug` to see every executed step and measurement.

use qudit_core::Circuit;
use qudit_gates::{matrices, Matrix};
use qudit_sim::{Engine, EngineConfig};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let h = Matrix::from_array(&matrices::HADAMARD);
    let x = Matrix::from_array(&matrices::PAULI_X);
    let z = Matrix::from_array(&matrices::PAULI_Z);

    // state to teleport: cos(θ)|0⟩ + sin(θ)|1⟩
    let theta: f64 = 0.4;
    let prep = Matrix::from_real(&[theta.cos(), -theta.sin(), theta.sin(), theta.cos()]);

    let mut circuit = Circuit::new(3, 2, 2, Some("teleportation"))?;
    circuit
        .gate(&prep, 0, Some("Ry"))?
        .gate(&h, 1, None)?
        .ctrl(&x, 1, 2, None)?
        .ctrl(&x, 0, 1, None)?
        .gate(&h, 0, None)?
        .measure_z(0, 0, None)?
        .measure_z(1, 1, None)?
        .cctrl(&x, 1, 2, None)?
        .cctrl(&z, 0, 2, None)?;

    println!("=== Circuit ===");
    println!("{}", circuit);
    println!();

    let mut engine = Engine::with_config(&circuit, EngineConfig::new().with_seed(7))?;
    let mut cursor = circuit.begin();
    while cursor != circuit.end() {
        let view = cursor.get()?;
        engine.execute(view)?;
        println!("{:<60} live qudits: {:?}", view.to_string(), engine.non_measured());
        cursor.advance()?;
    }

    println!();
    println!("=== Engine ===");
    println!("{}", engine);
    println!();

    let amps = engine.psi().amplitudes();
    println!("Teleported state on qudit 2:");
    println!("  expected: {:.6}|0⟩ + {:.6}|1⟩", theta.cos(), theta.sin());
    println!("  got:      {:.6}|0⟩ + {:.6}|1⟩", amps[0].re, amps[1].re);

    println!();
    println!("JSON: {}", circuit.to_json()?);
    Ok(())
}
