//! Estimator settings.

use serde::{Deserialize, Serialize};

/// Shots used when none are requested explicitly.
pub const DEFAULT_SHOTS: u32 = 2048;

/// Counting qubits used when none are requested explicitly.
pub const DEFAULT_PRECISION: u32 = 5;

/// Largest supported number of counting qubits.
///
/// Counting qubit `k` carries `2^k` controlled rotations, so both the gate
/// count and the statevector double with every extra bit. At 14 bits a run
/// is about 2^14 rotations over 2^15 amplitudes; much beyond that the
/// simulation stops finishing in reasonable time.
pub const MAX_PRECISION: u32 = 14;

/// How to pick between outcomes with the same count.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Prefer the smallest integer value.
    #[default]
    Smallest,
    /// Prefer the largest integer value.
    Largest,
}

/// Settings for a phase-estimation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EstimatorConfig {
    /// Number of circuit executions to sample.
    pub shots: u32,
    /// Rule for equally frequent outcomes.
    #[serde(default)]
    pub tie_break: TieBreak,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            shots: DEFAULT_SHOTS,
            tie_break: TieBreak::default(),
        }
    }
}

impl EstimatorConfig {
    /// Set the shot count.
    #[must_use]
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = shots;
        self
    }

    /// Set the tie-break rule.
    #[must_use]
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EstimatorConfig::default();
        assert_eq!(config.shots, 2048);
        assert_eq!(config.tie_break, TieBreak::Smallest);
    }

    #[test]
    fn test_tie_break_defaults_when_missing() {
        let config: EstimatorConfig = serde_json::from_str(r#"{"shots": 64}"#).unwrap();
        assert_eq!(config, EstimatorConfig::default().with_shots(64));

        let config: EstimatorConfig =
            serde_json::from_str(r#"{"shots": 8, "tie_break": "largest"}"#).unwrap();
        assert_eq!(config.tie_break, TieBreak::Largest);
    }
}
