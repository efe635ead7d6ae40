//! phasekit Command-Line Interface
//!
//! Runs quantum phase estimation on the local simulator. With no arguments
//! it estimates φ = 1/11 with five counting qubits and 2048 shots and prints
//! the estimate as a single number on stdout. Diagrams, histograms and logs
//! go to stderr.
//!
//! ```text
//! $ phasekit
//! 0.09375
//! $ phasekit --phase 3/8 -n 4 --histogram --seed 1
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::{Args, Parser, Subcommand};
use console::style;
use phasekit_qpe::{DEFAULT_PRECISION, DEFAULT_SHOTS, MAX_PRECISION};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{estimate, qft, version};

/// phasekit - quantum phase estimation on a local statevector simulator
#[derive(Parser, Debug)]
#[command(name = "phasekit")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(flatten)]
    estimate: EstimateArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options for the default estimate run.
#[derive(Args, Debug, Clone)]
pub struct EstimateArgs {
    /// Phase to estimate in [0, 1), as a decimal or a fraction like 3/8
    #[arg(long, default_value = "1/11", value_parser = parse_phase)]
    pub phase: f64,

    /// Number of counting qubits
    #[arg(
        short = 'n',
        long,
        default_value_t = DEFAULT_PRECISION,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_PRECISION))
    )]
    pub precision: u32,

    /// Number of shots
    #[arg(short, long, default_value_t = DEFAULT_SHOTS, env = "PHASEKIT_SHOTS")]
    pub shots: u32,

    /// Seed for reproducible shot sampling
    #[arg(long, env = "PHASEKIT_SEED")]
    pub seed: Option<u64>,

    /// Print the circuit diagram to stderr
    #[arg(long)]
    pub draw: bool,

    /// Print the outcome histogram to stderr
    #[arg(long)]
    pub histogram: bool,

    /// Print the full result as JSON instead of the bare estimate
    #[arg(long)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Draw the quantum Fourier transform circuit
    Qft {
        /// Number of qubits
        #[arg(
            short = 'n',
            long,
            default_value_t = 3,
            value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_PRECISION))
        )]
        qubits: u32,

        /// Draw the inverse transform
        #[arg(long)]
        inverse: bool,
    },

    /// Show version information
    Version,
}

/// Accept `0.25` as well as `1/4`.
fn parse_phase(raw: &str) -> Result<f64, String> {
    let value = match raw.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num
                .trim()
                .parse()
                .map_err(|_| format!("invalid numerator in '{raw}'"))?;
            let den: f64 = den
                .trim()
                .parse()
                .map_err(|_| format!("invalid denominator in '{raw}'"))?;
            if den == 0.0 {
                return Err(format!("zero denominator in '{raw}'"));
            }
            num / den
        }
        None => raw
            .trim()
            .parse()
            .map_err(|_| format!("invalid phase '{raw}'"))?,
    };

    if value.is_finite() && (0.0..1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("phase {value} is not in [0, 1)"))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    let result = match cli.command {
        None => estimate::execute(&cli.estimate).await,
        Some(Commands::Qft { qubits, inverse }) => qft::execute(qubits, inverse),
        Some(Commands::Version) => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
