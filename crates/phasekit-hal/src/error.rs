//! Backend-side failures.

use thiserror::Error;

/// Everything a [`Backend`](crate::Backend) can report back to a caller.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// The circuit failed backend validation.
    #[error("circuit rejected by backend: {0}")]
    InvalidCircuit(String),

    /// More qubits than the backend simulates.
    #[error("circuit too large for backend: {0}")]
    CircuitTooLarge(String),

    /// Shot count outside `1..=max_shots`.
    #[error("shot count out of range: {0}")]
    InvalidShots(String),

    /// No job with this id was ever submitted.
    #[error("unknown job '{0}'")]
    JobNotFound(String),

    /// The job ran and failed.
    #[error("job failed: {0}")]
    JobFailed(String),

    #[error("job was cancelled before completing")]
    JobCancelled,

    /// `wait` gave up polling.
    #[error("gave up waiting for job '{0}'")]
    Timeout(String),

    /// A `BackendConfig` entry had the wrong shape or range.
    #[error("bad backend configuration: {0}")]
    Configuration(String),

    /// Anything else the backend wants to surface.
    #[error("backend error: {0}")]
    Backend(String),
}

/// Shorthand for results carrying a [`HalError`].
pub type HalResult<T> = Result<T, HalError>;
