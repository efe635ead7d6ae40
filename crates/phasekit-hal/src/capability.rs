//! What a backend can run.
//!
//! The estimator reads [`Capabilities::num_qubits`] to bound the number of
//! counting qubits, and backends use [`GateSet`] to reject circuits they
//! cannot execute before any work is queued.

use serde::{Deserialize, Serialize};

/// Static description of a backend, fixed when it is constructed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    pub name: String,
    /// Widest register the backend will accept.
    pub num_qubits: u32,
    pub gate_set: GateSet,
    /// Upper bound on shots per job.
    pub max_shots: u32,
    pub is_simulator: bool,
}

impl Capabilities {
    /// A statevector simulator over `num_qubits` with every IR gate available.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            gate_set: GateSet::simulator(),
            max_shots: 100_000,
            is_simulator: true,
        }
    }

    /// Register width left for counting qubits once `ancillas` are reserved.
    pub fn free_qubits(&self, ancillas: u32) -> u32 {
        self.num_qubits.saturating_sub(ancillas)
    }
}

/// Gate names a backend executes, in IR naming (`h`, `cp`, `crz`, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GateSet {
    pub single_qubit: Vec<String>,
    pub two_qubit: Vec<String>,
}

impl GateSet {
    /// Every standard gate of the circuit IR.
    pub fn simulator() -> Self {
        let names = |list: &[&str]| list.iter().map(|g| (*g).to_string()).collect();
        Self {
            single_qubit: names(&["id", "x", "z", "h", "s", "sdg", "t", "tdg", "rz", "p"]),
            two_qubit: names(&["cx", "cz", "swap", "crz", "cp"]),
        }
    }

    pub fn contains(&self, gate: &str) -> bool {
        self.single_qubit
            .iter()
            .chain(&self.two_qubit)
            .any(|g| g == gate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simulator_capabilities() {
        let caps = Capabilities::simulator(10);
        assert!(caps.is_simulator);
        assert_eq!(caps.num_qubits, 10);
        assert_eq!(caps.max_shots, 100_000);
        assert!(caps.gate_set.contains("h"));
        assert!(caps.gate_set.contains("cp"));
        assert!(caps.gate_set.contains("crz"));
        assert!(!caps.gate_set.contains("ccx"));
    }

    #[test]
    fn test_free_qubits() {
        let caps = Capabilities::simulator(6);
        assert_eq!(caps.free_qubits(1), 5);
        assert_eq!(Capabilities::simulator(0).free_qubits(1), 0);
    }

    #[test]
    fn test_empty_gate_set_accepts_nothing() {
        assert!(!GateSet::default().contains("h"));
    }
}
