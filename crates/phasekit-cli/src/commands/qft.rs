//! QFT command implementation.

use anyhow::Result;
use console::style;
use phasekit_ir::Circuit;
use phasekit_qpe::{draw_circuit, inverse_qft, qft};

/// Build the `qubits`-wide (inverse) QFT on its own.
pub fn build(qubits: u32, inverse: bool) -> Result<Circuit> {
    let mut circuit = Circuit::with_size("qft", qubits, 0);
    if inverse {
        Ok(inverse_qft(&mut circuit, qubits)?)
    } else {
        qft(&mut circuit, qubits)?;
        Ok(circuit)
    }
}

/// Execute the qft command.
pub fn execute(qubits: u32, inverse: bool) -> Result<()> {
    let circuit = build(qubits, inverse)?;

    let title = if inverse { "Inverse QFT" } else { "QFT" };
    eprintln!(
        "{} {} on {} qubits: {} gates, depth {}",
        style("→").cyan().bold(),
        style(title).green(),
        qubits,
        circuit.num_ops(),
        circuit.depth()
    );
    print!("{}", draw_circuit(&circuit));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_and_inverse_sizes() {
        let forward = build(4, false).unwrap();
        let inverse = build(4, true).unwrap();
        assert_eq!(forward.num_ops(), inverse.num_ops());
        assert_eq!(forward.count_ops(), inverse.count_ops());
        assert_eq!(inverse.instructions().next().unwrap().name(), "swap");
    }
}
