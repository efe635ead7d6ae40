//! Property-based tests for circuit inversion and decomposition.

use phasekit_ir::{Circuit, Instruction, QubitId};
use proptest::prelude::*;

/// Gate operations that can be applied to a circuit.
#[derive(Debug, Clone)]
enum GateOp {
    H(u32),
    S(u32),
    T(u32),
    Rz(f64, u32),
    Cx(u32, u32),
    Cp(f64, u32, u32),
    Swap(u32, u32),
}

impl GateOp {
    fn apply(self, circuit: &mut Circuit) {
        let _ = match self {
            GateOp::H(q) => circuit.h(QubitId(q)),
            GateOp::S(q) => circuit.s(QubitId(q)),
            GateOp::T(q) => circuit.t(QubitId(q)),
            GateOp::Rz(theta, q) => circuit.rz(theta, QubitId(q)),
            GateOp::Cx(a, b) => circuit.cx(QubitId(a), QubitId(b)),
            GateOp::Cp(lambda, a, b) => circuit.cp(lambda, QubitId(a), QubitId(b)),
            GateOp::Swap(a, b) => circuit.swap(QubitId(a), QubitId(b)),
        };
    }
}

/// Generate a random gate operation for a circuit with given number of qubits.
///
/// Two-qubit operands may coincide; the builder rejects those and the
/// circuit simply skips the gate.
fn arb_gate_op(num_qubits: u32) -> impl Strategy<Value = GateOp> {
    let q = 0..num_qubits;
    let angle = -6.0f64..6.0;
    prop_oneof![
        q.clone().prop_map(GateOp::H),
        q.clone().prop_map(GateOp::S),
        q.clone().prop_map(GateOp::T),
        (angle.clone(), q.clone()).prop_map(|(t, q)| GateOp::Rz(t, q)),
        (q.clone(), q.clone()).prop_map(|(a, b)| GateOp::Cx(a, b)),
        (angle, q.clone(), q.clone()).prop_map(|(l, a, b)| GateOp::Cp(l, a, b)),
        (q.clone(), q).prop_map(|(a, b)| GateOp::Swap(a, b)),
    ]
}

/// Random unitary circuits over 2-5 qubits.
fn arb_unitary_circuit() -> impl Strategy<Value = Circuit> {
    (2_u32..=5).prop_flat_map(|num_qubits| {
        prop::collection::vec(arb_gate_op(num_qubits), 0..=20).prop_map(move |ops| {
            let mut circuit = Circuit::with_size("block", num_qubits, 0);
            for op in ops {
                op.apply(&mut circuit);
            }
            circuit
        })
    })
}

fn ops(circuit: &Circuit) -> Vec<Instruction> {
    circuit.instructions().cloned().collect()
}

proptest! {
    #[test]
    fn double_inverse_is_identity(circuit in arb_unitary_circuit()) {
        let twice = circuit.inverse().unwrap().inverse().unwrap();
        prop_assert_eq!(twice.name(), circuit.name());
        prop_assert_eq!(ops(&twice), ops(&circuit));
    }

    #[test]
    fn inverse_reverses_operands(circuit in arb_unitary_circuit()) {
        let inverse = circuit.inverse().unwrap();
        let forward: Vec<_> = circuit.instructions().map(|i| i.qubits.clone()).collect();
        let mut backward: Vec<_> = inverse.instructions().map(|i| i.qubits.clone()).collect();
        backward.reverse();
        prop_assert_eq!(forward, backward);
    }

    #[test]
    fn decompose_remaps_through_offset(circuit in arb_unitary_circuit(), offset in 0u32..3) {
        let width = u32::try_from(circuit.num_qubits()).unwrap();
        let mut host = Circuit::with_size("host", width + offset, 0);
        host.append(&circuit, (0..width).map(|q| QubitId(q + offset))).unwrap();
        prop_assert_eq!(host.num_ops(), 1);

        let flat = host.decompose().unwrap();
        let layout: Vec<QubitId> = (0..width).map(|q| QubitId(q + offset)).collect();
        let expected: Vec<_> = circuit
            .instructions()
            .map(|i| i.remap_qubits(&layout).unwrap())
            .collect();
        prop_assert_eq!(ops(&flat), expected);
    }
}
