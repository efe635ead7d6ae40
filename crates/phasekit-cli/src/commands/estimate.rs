//! Default command: estimate a phase and print it.

use anyhow::Result;
use console::Term;
use phasekit_hal::Backend;
use phasekit_qpe::{EstimatorConfig, TextRenderer, estimate_with};

use super::common::{simulator, spinner};
use crate::EstimateArgs;

/// Execute the estimate command.
pub async fn execute(args: &EstimateArgs) -> Result<()> {
    let backend = simulator(args.seed, args.precision)?;

    let availability = backend.availability().await?;
    if !availability.is_available {
        anyhow::bail!("Backend '{}' is not available", backend.name());
    }

    let config = EstimatorConfig::default().with_shots(args.shots);
    let mut renderer = TextRenderer::new(std::io::stderr())
        .with_circuits(args.draw)
        .with_histograms(args.histogram);

    // Rendering writes to stderr too, so the spinner only runs without it.
    let show_spinner = !args.draw && !args.histogram && Term::stderr().is_term();
    let progress = spinner("Estimating phase...", show_spinner)?;
    let estimate = estimate_with(
        args.phase,
        args.precision,
        &backend,
        &config,
        &mut renderer,
    )
    .await;
    progress.finish_and_clear();
    let estimate = estimate?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&estimate)?);
    } else {
        println!("{}", estimate.phase);
    }
    Ok(())
}
