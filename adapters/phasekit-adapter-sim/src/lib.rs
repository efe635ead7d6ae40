//! Local statevector simulator for phasekit.
//!
//! [`SimulatorBackend`] implements [`phasekit_hal::Backend`]. A job evolves
//! one dense statevector through the circuit and then draws every shot from
//! the final distribution, so 2048 shots cost one pass over the gates plus
//! 2048 binary searches.
//!
//! Memory is `16 · 2^n` bytes, which is why the default register limit is 20
//! qubits (16 MiB). Measurements must come last on each qubit; anything
//! acting on a measured qubit is rejected at submission.
//!
//! Sampling is reproducible with [`SimulatorBackend::with_seed`], and
//! [`SimulatorBackend::probabilities`] returns the exact distribution with
//! no sampling at all.
//!
//! # Example
//!
//! ```ignore
//! use phasekit_adapter_sim::SimulatorBackend;
//! use phasekit_hal::Backend;
//! use phasekit_ir::{Circuit, ClbitId, QubitId};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SimulatorBackend::with_seed(42);
//!
//!     let mut circuit = Circuit::with_size("flip", 2, 2);
//!     circuit.x(QubitId(0))?;
//!     circuit.measure(QubitId(0), ClbitId(0))?;
//!     circuit.measure(QubitId(1), ClbitId(1))?;
//!
//!     let job_id = backend.submit(&circuit, 1000).await?;
//!     let result = backend.wait(&job_id).await?;
//!     assert_eq!(result.counts.get("01"), 1000);
//!
//!     Ok(())
//! }
//! ```

mod simulator;
mod statevector;

pub use simulator::SimulatorBackend;
