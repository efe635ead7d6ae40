//! Quantum Fourier transform builders.
//!
//! All builders act on qubits `0..n` of the circuit they are given and fail
//! with [`IrError::QubitNotFound`](phasekit_ir::IrError::QubitNotFound) if the
//! circuit is narrower than `n`.

use std::f64::consts::PI;

use phasekit_ir::{Circuit, IrResult, QubitId};

/// Append the rotation part of the QFT (no final swaps) to qubits `0..n`.
///
/// Levels run from the top qubit down: each applies a Hadamard to qubit
/// `top` and then, for every lower qubit `q`, a controlled phase of
/// `π/2^(top-q)` with `q` as control and `top` as target.
pub fn qft_rotations(circuit: &mut Circuit, n: u32) -> IrResult<&mut Circuit> {
    for top in (0..n).rev() {
        circuit.h(QubitId(top))?;
        for q in 0..top {
            let angle = PI / f64::from(top - q).exp2();
            circuit.cp(angle, QubitId(q), QubitId(top))?;
        }
    }
    Ok(circuit)
}

/// Reverse the order of qubits `0..n` with pairwise swaps.
pub fn swap_registers(circuit: &mut Circuit, n: u32) -> IrResult<&mut Circuit> {
    for i in 0..n / 2 {
        circuit.swap(QubitId(i), QubitId(n - 1 - i))?;
    }
    Ok(circuit)
}

/// Append the full `n`-qubit QFT to qubits `0..n`.
pub fn qft(circuit: &mut Circuit, n: u32) -> IrResult<&mut Circuit> {
    qft_rotations(circuit, n)?;
    swap_registers(circuit, n)
}

/// Append the inverse `n`-qubit QFT to qubits `0..n` of `circuit`.
///
/// The inverse is spliced in as a single composite gate named `qft_dg`, so
/// `circuit` itself keeps the nested form. The return value is a flattened
/// copy of the whole circuit with only primitive gates.
pub fn inverse_qft(circuit: &mut Circuit, n: u32) -> IrResult<Circuit> {
    if n > 0 {
        let mut forward = Circuit::with_size("qft", n, 0);
        qft(&mut forward, n)?;
        circuit.append(&forward.inverse()?, (0..n).map(QubitId))?;
    }
    circuit.decompose()
}
