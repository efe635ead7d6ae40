//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - Quantum phase estimation on a local simulator",
        style("phasekit").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  phasekit-ir           Circuit intermediate representation");
    println!("  phasekit-hal          Backend abstraction layer");
    println!("  phasekit-adapter-sim  Statevector simulator backend");
    println!("  phasekit-qpe          QFT and phase estimation");
    println!("  phasekit-cli          Command-line interface");
    println!();
    println!("License: {}", style(env!("CARGO_PKG_LICENSE")).dim());
}
