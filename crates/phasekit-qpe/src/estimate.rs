//! The phase-estimation driver.

use std::f64::consts::PI;

use phasekit_hal::{Backend, Counts};
use phasekit_ir::Circuit;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::config::{EstimatorConfig, MAX_PRECISION, TieBreak};
use crate::error::{QpeError, QpeResult};
use crate::qft::inverse_qft;
use crate::render::{NullRenderer, Renderer};

/// Outcome of one phase-estimation run.
#[derive(Debug, Clone, Serialize)]
pub struct PhaseEstimate {
    /// Estimated phase, a multiple of `1/2^precision`.
    pub phase: f64,
    /// Number of counting qubits.
    pub precision: u32,
    /// The selected outcome, classical bit 0 rightmost.
    pub bitstring: String,
    /// Integer value of `bitstring`.
    pub value: u64,
    /// Shots that produced the selected outcome.
    pub count: u64,
    /// Total shots executed.
    pub shots: u32,
    /// Full outcome histogram.
    pub counts: Counts,
}

impl PhaseEstimate {
    /// Fraction of shots that produced the selected outcome.
    #[allow(clippy::cast_precision_loss)]
    pub fn confidence(&self) -> f64 {
        if self.shots == 0 {
            return 0.0;
        }
        self.count as f64 / f64::from(self.shots)
    }
}

/// Build the phase-estimation circuit for `phase` with `precision` counting
/// qubits.
///
/// Qubits `0..precision` form the `count` register, qubit `precision` is the
/// eigenstate qubit held in |1⟩, and counting qubit `k` is measured into
/// classical bit `k`. The inverse QFT is already flattened into primitive
/// gates.
pub fn build_circuit(phase: f64, precision: u32) -> QpeResult<Circuit> {
    check_phase(phase)?;
    check_precision(precision, MAX_PRECISION)?;

    let mut circuit = Circuit::new("qpe");
    let counting = circuit.add_qreg("count", precision);
    let eigen = circuit.add_qreg("eigen", 1)[0];
    let clbits = circuit.add_creg("c", precision);

    circuit.x(eigen)?;
    for &q in &counting {
        circuit.h(q)?;
    }

    // Counting qubit k picks up the eigenphase 2^k times.
    let angle = 4.0 * PI * phase;
    for (k, &q) in counting.iter().enumerate() {
        for _ in 0..1u64 << k {
            circuit.crz(angle, q, eigen)?;
        }
    }
    circuit.barrier_all()?;

    let mut circuit = inverse_qft(&mut circuit, precision)?;
    circuit.barrier_all()?;
    for (&q, &c) in counting.iter().zip(&clbits) {
        circuit.measure(q, c)?;
    }

    debug!(
        qubits = circuit.num_qubits(),
        ops = circuit.num_ops(),
        depth = circuit.depth(),
        "built phase-estimation circuit"
    );
    Ok(circuit)
}

/// Estimate `phase` on `backend` with default settings and no rendering.
pub async fn estimate(phase: f64, precision: u32, backend: &dyn Backend) -> QpeResult<f64> {
    let result = estimate_with(
        phase,
        precision,
        backend,
        &EstimatorConfig::default(),
        &mut NullRenderer,
    )
    .await?;
    Ok(result.phase)
}

/// Build, render, execute and read out one phase estimation.
///
/// The circuit is handed to `renderer` before submission and the counts
/// after the job completes.
#[instrument(skip(backend, config, renderer), fields(backend = backend.name(), shots = config.shots))]
pub async fn estimate_with(
    phase: f64,
    precision: u32,
    backend: &dyn Backend,
    config: &EstimatorConfig,
    renderer: &mut dyn Renderer,
) -> QpeResult<PhaseEstimate> {
    if config.shots == 0 {
        return Err(QpeError::InvalidShots(config.shots));
    }
    let backend_limit = backend.capabilities().free_qubits(1);
    check_precision(precision, MAX_PRECISION.min(backend_limit))?;

    let circuit = build_circuit(phase, precision)?;
    renderer.circuit(&circuit)?;

    let job_id = backend.submit(&circuit, config.shots).await?;
    let result = backend.wait(&job_id).await?;
    renderer.histogram(&result.counts)?;

    let (bitstring, value) = select_outcome(&result.counts, config.tie_break)?;
    let count = result.counts.get(bitstring);
    let estimate = PhaseEstimate {
        phase: to_phase(value, precision),
        precision,
        bitstring: bitstring.to_string(),
        value,
        count,
        shots: result.shots,
        counts: result.counts.clone(),
    };

    info!(
        job = %job_id,
        bitstring = %estimate.bitstring,
        count,
        phase = estimate.phase,
        "phase estimated"
    );
    Ok(estimate)
}

/// Pick the most frequent outcome and its integer value.
///
/// Equal counts are resolved by `tie_break`, which compares integer values
/// rather than the iteration order of `counts`.
pub fn select_outcome(counts: &Counts, tie_break: TieBreak) -> QpeResult<(&str, u64)> {
    let mut best: Option<(&str, u64, u64)> = None;
    for (bitstring, &count) in counts.iter() {
        let value = parse_outcome(bitstring)?;
        let wins = match best {
            None => true,
            Some((_, best_value, best_count)) => {
                count > best_count
                    || (count == best_count
                        && match tie_break {
                            TieBreak::Smallest => value < best_value,
                            TieBreak::Largest => value > best_value,
                        })
            }
        };
        if wins {
            best = Some((bitstring.as_str(), value, count));
        }
    }
    best.map(|(bitstring, value, _)| (bitstring, value))
        .ok_or(QpeError::EmptyResult)
}

fn parse_outcome(bitstring: &str) -> QpeResult<u64> {
    let malformed = || QpeError::MalformedOutcome(bitstring.to_string());
    if bitstring.is_empty() || !bitstring.bytes().all(|b| b == b'0' || b == b'1') {
        return Err(malformed());
    }
    u64::from_str_radix(bitstring, 2).map_err(|_| malformed())
}

#[allow(clippy::cast_precision_loss)]
fn to_phase(value: u64, precision: u32) -> f64 {
    value as f64 / f64::from(precision).exp2()
}

fn check_phase(phase: f64) -> QpeResult<()> {
    if phase.is_finite() && (0.0..1.0).contains(&phase) {
        Ok(())
    } else {
        Err(QpeError::InvalidPhase(phase))
    }
}

fn check_precision(precision: u32, max: u32) -> QpeResult<()> {
    if (1..=max).contains(&precision) {
        Ok(())
    } else {
        Err(QpeError::InvalidPrecision { precision, max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phasekit_ir::{InstructionKind, QubitId, StandardGate};

    #[test]
    fn test_circuit_layout() {
        let circuit = build_circuit(1.0 / 11.0, 5).unwrap();
        assert_eq!(circuit.num_qubits(), 6);
        assert_eq!(circuit.num_clbits(), 5);

        let counts = circuit.count_ops();
        assert_eq!(counts["x"], 1);
        // Five preparation Hadamards plus five from the inverse QFT.
        assert_eq!(counts["h"], 10);
        assert_eq!(counts["crz"], 31);
        assert_eq!(counts["cp"], 10);
        assert_eq!(counts["swap"], 2);
        assert_eq!(counts["barrier"], 2);
        assert_eq!(counts["measure"], 5);
        assert!(!counts.contains_key("qft_dg"));
    }

    #[test]
    fn test_crz_angle_and_targets() {
        let phase = 0.25;
        let circuit = build_circuit(phase, 3).unwrap();
        let rotations: Vec<_> = circuit
            .instructions()
            .filter(|i| matches!(i.as_standard(), Some(StandardGate::CRz(_))))
            .collect();
        assert_eq!(rotations.len(), 1 + 2 + 4);
        for inst in &rotations {
            assert_eq!(inst.qubits[1], QubitId(3));
            let Some(StandardGate::CRz(angle)) = inst.as_standard() else {
                unreachable!()
            };
            assert!((angle.as_f64().unwrap() - PI).abs() < 1e-12);
        }
        let controls: Vec<u32> = rotations.iter().map(|i| i.qubits[0].0).collect();
        assert_eq!(controls, vec![0, 1, 1, 2, 2, 2, 2]);
    }

    #[test]
    fn test_measurements_map_counting_qubits() {
        let circuit = build_circuit(0.5, 4).unwrap();
        let measured: Vec<(u32, u32)> = circuit
            .instructions()
            .filter(|i| matches!(i.kind, InstructionKind::Measure))
            .map(|i| (i.qubits[0].0, i.clbits[0].0))
            .collect();
        assert_eq!(measured, vec![(0, 0), (1, 1), (2, 2), (3, 3)]);
        assert!(circuit.instructions().last().unwrap().is_measure());
    }

    #[test]
    fn test_build_rejects_bad_input() {
        assert!(matches!(
            build_circuit(0.5, 0),
            Err(QpeError::InvalidPrecision { precision: 0, .. })
        ));
        assert!(matches!(
            build_circuit(0.5, MAX_PRECISION + 1),
            Err(QpeError::InvalidPrecision { .. })
        ));
        assert!(matches!(build_circuit(1.0, 3), Err(QpeError::InvalidPhase(_))));
        assert!(matches!(build_circuit(-0.1, 3), Err(QpeError::InvalidPhase(_))));
        assert!(matches!(
            build_circuit(f64::NAN, 3),
            Err(QpeError::InvalidPhase(_))
        ));
    }

    #[test]
    fn test_select_outcome_prefers_count() {
        let counts: Counts = [("00011", 1900u64), ("00010", 100), ("00100", 48)]
            .into_iter()
            .collect();
        assert_eq!(
            select_outcome(&counts, TieBreak::Smallest).unwrap(),
            ("00011", 3)
        );
    }

    #[test]
    fn test_select_outcome_tie_break() {
        let counts: Counts = [("110", 5u64), ("011", 5), ("001", 2)].into_iter().collect();
        assert_eq!(select_outcome(&counts, TieBreak::Smallest).unwrap(), ("011", 3));
        assert_eq!(select_outcome(&counts, TieBreak::Largest).unwrap(), ("110", 6));
    }

    #[test]
    fn test_select_outcome_errors() {
        assert!(matches!(
            select_outcome(&Counts::new(), TieBreak::Smallest),
            Err(QpeError::EmptyResult)
        ));
        let counts: Counts = [("01x", 1u64)].into_iter().collect();
        assert!(matches!(
            select_outcome(&counts, TieBreak::Smallest),
            Err(QpeError::MalformedOutcome(s)) if s == "01x"
        ));
        let counts: Counts = [("+1", 1u64)].into_iter().collect();
        assert!(select_outcome(&counts, TieBreak::Smallest).is_err());
    }

    #[test]
    fn test_to_phase() {
        assert_eq!(to_phase(3, 5), 3.0 / 32.0);
        assert_eq!(to_phase(0, 1), 0.0);
        assert_eq!(to_phase(1, 1), 0.5);
    }
}
