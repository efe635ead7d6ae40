//! phasekit Quantum Phase Estimation
//!
//! This crate builds quantum Fourier transform circuits and runs quantum
//! phase estimation (QPE) on any [`phasekit_hal::Backend`].
//!
//! # Overview
//!
//! Given an eigenphase φ ∈ [0, 1) and `n` counting qubits, [`estimate`]
//! builds the QPE circuit, executes it and interprets the most frequent
//! outcome as a binary fraction, so the result is a multiple of `1/2^n`.
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`qft_rotations`] | Hadamards and controlled phases, no swaps |
//! | [`swap_registers`] | Reverse qubit order |
//! | [`qft`] | Full QFT on qubits `0..n` |
//! | [`inverse_qft`] | Splice the inverse QFT in and return a flattened copy |
//! | [`build_circuit`] | The complete QPE circuit |
//! | [`estimate`] / [`estimate_with`] | Execute and read out |
//!
//! # Example
//!
//! ```ignore
//! use phasekit_adapter_sim::SimulatorBackend;
//! use phasekit_qpe::estimate;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SimulatorBackend::new();
//!     let phase = estimate(1.0 / 11.0, 5, &backend).await?;
//!     println!("{phase}"); // 0.09375 = 3/32 with high probability
//!     Ok(())
//! }
//! ```
//!
//! # Outcome Selection
//!
//! Bitstrings follow the HAL convention: classical bit 0 is the rightmost
//! character. Equally frequent outcomes are resolved by [`TieBreak`], which
//! defaults to the smallest integer value.

pub mod config;
pub mod error;
pub mod estimate;
pub mod qft;
pub mod render;

pub use config::{DEFAULT_PRECISION, DEFAULT_SHOTS, EstimatorConfig, MAX_PRECISION, TieBreak};
pub use error::{QpeError, QpeResult};
pub use estimate::{PhaseEstimate, build_circuit, estimate, estimate_with, select_outcome};
pub use qft::{inverse_qft, qft, qft_rotations, swap_registers};
pub use render::{NullRenderer, Renderer, TextRenderer, draw_circuit, format_angle, format_histogram};
