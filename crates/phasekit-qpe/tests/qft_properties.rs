//! Structural and round-trip properties of the QFT builders.

use phasekit_adapter_sim::SimulatorBackend;
use phasekit_ir::{Circuit, QubitId};
use phasekit_qpe::{inverse_qft, qft, qft_rotations, swap_registers};
use proptest::prelude::*;

fn names(circuit: &Circuit) -> Vec<String> {
    circuit.instructions().map(|i| i.name().to_string()).collect()
}

/// Prepare basis state `value` on qubits `0..n`, qubit 0 least significant.
fn basis_state(n: u32, value: u64) -> Circuit {
    let mut circuit = Circuit::with_size("basis", n, 0);
    for q in 0..n {
        if (value >> q) & 1 == 1 {
            circuit.x(QubitId(q)).unwrap();
        }
    }
    circuit
}

proptest! {
    #[test]
    fn rotations_then_swaps_have_expected_counts(n in 1u32..=12) {
        let mut circuit = Circuit::with_size("qft", n, 0);
        qft_rotations(&mut circuit, n).unwrap();
        let rotations = names(&circuit);

        let hadamards = rotations.iter().filter(|name| *name == "h").count();
        let phases = rotations.iter().filter(|name| *name == "cp").count();
        prop_assert_eq!(hadamards, n as usize);
        prop_assert_eq!(phases, (n * (n - 1) / 2) as usize);
        prop_assert_eq!(rotations.len(), hadamards + phases);

        swap_registers(&mut circuit, n).unwrap();
        let all = names(&circuit);
        let swaps = &all[rotations.len()..];
        prop_assert_eq!(swaps.len(), (n / 2) as usize);
        prop_assert!(swaps.iter().all(|name| name == "swap"));
    }

    #[test]
    fn independent_builds_are_identical(n in 0u32..=10) {
        let mut a = Circuit::with_size("a", n, 0);
        let mut b = Circuit::with_size("b", n, 0);
        qft(&mut a, n).unwrap();
        qft(&mut b, n).unwrap();

        let ops_a: Vec<_> = a.instructions().cloned().collect();
        let ops_b: Vec<_> = b.instructions().cloned().collect();
        prop_assert_eq!(ops_a, ops_b);
    }

    #[test]
    fn inverse_qft_flattens_to_reversed_inverse(n in 1u32..=8) {
        let mut forward = Circuit::with_size("qft", n, 0);
        qft(&mut forward, n).unwrap();
        let expected: Vec<_> = forward.inverse().unwrap().instructions().cloned().collect();

        let mut host = Circuit::with_size("host", n + 1, 0);
        let flat = inverse_qft(&mut host, n).unwrap();
        let got: Vec<_> = flat.instructions().cloned().collect();
        prop_assert_eq!(got, expected);
        prop_assert_eq!(host.num_ops(), 1);
    }

    #[test]
    fn qft_round_trip_restores_basis_state(n in 1u32..=6, seed in any::<u64>()) {
        let value = seed % (1u64 << n);
        let mut circuit = basis_state(n, value);
        qft(&mut circuit, n).unwrap();
        let flat = inverse_qft(&mut circuit, n).unwrap();

        let probabilities = SimulatorBackend::new().probabilities(&flat).unwrap();
        let key = format!("{value:0width$b}", width = n as usize);
        prop_assert_eq!(probabilities.len(), 1);
        prop_assert!((probabilities[&key] - 1.0).abs() < 1e-9);
    }
}

#[test]
fn qft_of_zero_is_uniform() {
    let n = 4;
    let mut circuit = Circuit::with_size("uniform", n, 0);
    qft(&mut circuit, n).unwrap();

    let probabilities = SimulatorBackend::new().probabilities(&circuit).unwrap();
    assert_eq!(probabilities.len(), 16);
    for p in probabilities.values() {
        assert!((p - 1.0 / 16.0).abs() < 1e-9);
    }
}

#[test]
fn inverse_qft_on_wider_circuit_leaves_other_qubits() {
    // The extra qubit is flipped and must survive the round trip untouched.
    let mut circuit = basis_state(4, 0b1010);
    qft(&mut circuit, 3).unwrap();
    let flat = inverse_qft(&mut circuit, 3).unwrap();

    let probabilities = SimulatorBackend::new().probabilities(&flat).unwrap();
    assert!((probabilities["1010"] - 1.0).abs() < 1e-9);
}
