//! Error types for phase estimation.

use phasekit_hal::HalError;
use phasekit_ir::IrError;
use thiserror::Error;

/// Errors that can occur while building or running a phase estimation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QpeError {
    /// Number of counting qubits is out of range.
    #[error("Precision {precision} is out of range (expected 1..={max})")]
    InvalidPrecision {
        /// The requested number of counting qubits.
        precision: u32,
        /// Largest precision allowed here.
        max: u32,
    },

    /// Phase is not a finite number in [0, 1).
    #[error("Phase {0} is not in [0, 1)")]
    InvalidPhase(f64),

    /// Shot count is zero.
    #[error("Shot count must be at least 1, got {0}")]
    InvalidShots(u32),

    /// The backend returned no outcomes.
    #[error("Backend returned no measurement outcomes")]
    EmptyResult,

    /// A measured key is not a binary string.
    #[error("Malformed measurement outcome '{0}'")]
    MalformedOutcome(String),

    /// Failed to write a rendering.
    #[error("Rendering failed: {0}")]
    Render(#[from] std::io::Error),

    /// Circuit construction failed.
    #[error(transparent)]
    Ir(#[from] IrError),

    /// Backend execution failed.
    #[error(transparent)]
    Hal(#[from] HalError),
}

/// Result type for phase estimation.
pub type QpeResult<T> = Result<T, QpeError>;
