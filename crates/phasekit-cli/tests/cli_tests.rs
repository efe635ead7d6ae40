//! CLI pipeline tests.
//!
//! The CLI is a binary crate, so these tests drive the same library calls
//! the commands make: a simulator configured through `BackendConfig`
//! extras, the estimate driver with a text renderer, and the QFT drawing.
//! Argument parsing is covered by the unit tests in `main.rs`.

use phasekit_adapter_sim::SimulatorBackend;
use phasekit_hal::{Backend, BackendConfig, BackendFactory, HalError};
use phasekit_ir::Circuit;
use phasekit_qpe::{
    DEFAULT_PRECISION, DEFAULT_SHOTS, EstimatorConfig, NullRenderer, TextRenderer, draw_circuit,
    estimate_with, inverse_qft, qft,
};

fn seeded(seed: u64) -> SimulatorBackend {
    let config = BackendConfig::new("simulator").with_extra("seed", serde_json::json!(seed));
    SimulatorBackend::from_config(config).unwrap()
}

// ============================================================================
// Default estimate run
// ============================================================================

mod estimate_command {
    use super::*;

    #[tokio::test]
    async fn test_default_run_prints_three_thirty_seconds() {
        let backend = seeded(2024);
        let config = EstimatorConfig::default().with_shots(DEFAULT_SHOTS);
        let estimate = estimate_with(
            1.0 / 11.0,
            DEFAULT_PRECISION,
            &backend,
            &config,
            &mut NullRenderer,
        )
        .await
        .unwrap();

        // The command prints the bare float.
        assert_eq!(format!("{}", estimate.phase), "0.09375");
    }

    #[tokio::test]
    async fn test_json_output_shape() {
        let backend = seeded(1);
        let config = EstimatorConfig::default().with_shots(128);
        let estimate = estimate_with(0.375, 3, &backend, &config, &mut NullRenderer)
            .await
            .unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string_pretty(&estimate).unwrap()).unwrap();
        assert_eq!(json["phase"], 0.375);
        assert_eq!(json["precision"], 3);
        assert_eq!(json["bitstring"], "011");
        assert_eq!(json["value"], 3);
        assert_eq!(json["count"], 128);
        assert_eq!(json["shots"], 128);
        assert!(json["counts"].is_object());
    }

    #[tokio::test]
    async fn test_draw_and_histogram_output() {
        let backend = seeded(3);
        let config = EstimatorConfig::default().with_shots(16);
        let mut renderer = TextRenderer::new(Vec::new())
            .with_circuits(true)
            .with_histograms(false);

        estimate_with(0.5, 2, &backend, &config, &mut renderer)
            .await
            .unwrap();
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(out.contains("count[1]: "));
        assert!(!out.contains("Results"));
    }

    #[tokio::test]
    async fn test_seeded_runs_match() {
        let config = EstimatorConfig::default().with_shots(512);
        let a = estimate_with(0.3, 4, &seeded(8), &config, &mut NullRenderer)
            .await
            .unwrap();
        let b = estimate_with(0.3, 4, &seeded(8), &config, &mut NullRenderer)
            .await
            .unwrap();
        assert_eq!(a.counts, b.counts);
        assert_eq!(a.phase, b.phase);
    }
}

// ============================================================================
// Backend configuration
// ============================================================================

mod backend_config {
    use super::*;

    #[tokio::test]
    async fn test_simulator_is_available() {
        let backend = seeded(0);
        assert!(backend.availability().await.unwrap().is_available);
        assert_eq!(backend.name(), "simulator");
    }

    #[test]
    fn test_bad_seed_is_rejected() {
        let config = BackendConfig::new("simulator").with_extra("seed", serde_json::json!("x"));
        let err = SimulatorBackend::from_config(config).err().unwrap();
        assert!(matches!(err, HalError::Configuration(_)));
    }
}

// ============================================================================
// QFT drawing
// ============================================================================

mod qft_command {
    use super::*;

    #[test]
    fn test_forward_drawing() {
        let mut circuit = Circuit::with_size("qft", 3, 0);
        qft(&mut circuit, 3).unwrap();
        let text = draw_circuit(&circuit);

        assert_eq!(text.lines().count(), 5);
        assert!(text.contains("P(π/2)"));
        assert!(text.contains("P(π/4)"));
        assert_eq!(text.matches('×').count(), 2);
    }

    #[test]
    fn test_inverse_drawing_has_negated_angles() {
        let mut circuit = Circuit::with_size("qft", 3, 0);
        let flat = inverse_qft(&mut circuit, 3).unwrap();
        let text = draw_circuit(&flat);

        assert!(text.contains("P(-π/2)"));
        assert!(text.contains("P(-π/4)"));
        assert!(!text.contains("qft_dg"));
    }
}
