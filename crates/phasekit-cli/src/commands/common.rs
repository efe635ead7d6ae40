//! Common utilities for CLI commands.

use std::time::Duration;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use phasekit_adapter_sim::SimulatorBackend;
use phasekit_hal::{Backend, BackendConfig, BackendFactory};
use tracing::debug;

/// Build a simulator wide enough for `precision` counting qubits plus the
/// eigenstate qubit, seeding its sampler when `seed` is given.
pub fn simulator(seed: Option<u64>, precision: u32) -> Result<SimulatorBackend> {
    let mut config = BackendConfig::new("simulator")
        .with_extra("max_qubits", serde_json::json!(precision + 1));
    if let Some(seed) = seed {
        config = config.with_extra("seed", serde_json::json!(seed));
    }
    let backend = SimulatorBackend::from_config(config)?;
    debug!(
        qubits = backend.capabilities().num_qubits,
        seeded = seed.is_some(),
        "simulator ready"
    );
    Ok(backend)
}

/// A spinner on stderr, or a hidden one when `visible` is false.
pub fn spinner(message: &'static str, visible: bool) -> Result<ProgressBar> {
    if !visible {
        return Ok(ProgressBar::hidden());
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    Ok(spinner)
}
