//! The [`Backend`] trait and how backends are configured.
//!
//! A run goes `validate` (optional) → `submit` → `wait`. `wait` is provided
//! and polls `status` until the job ends, so a backend only has to
//! implement the individual steps. Backends that finish inside `submit`,
//! like the local simulator, return from the first poll.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use phasekit_ir::Circuit;

use crate::capability::Capabilities;
use crate::error::{HalError, HalResult};
use crate::job::{JobId, JobStatus};
use crate::result::ExecutionResult;

/// Delay between `status` polls in [`Backend::wait`].
pub const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Polls before [`Backend::wait`] reports a timeout (five minutes).
pub const MAX_POLLS: u32 = 6_000;

/// Name plus free-form settings, deserializable from
/// `{"name": "simulator", "seed": 7}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub name: String,
    /// Every other key, read by the backend's [`BackendFactory`].
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl BackendConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            extra: serde_json::Map::new(),
        }
    }

    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }

    /// `Ok(None)` when `key` is absent or null, a configuration error when
    /// it is anything but a non-negative integer.
    pub fn extra_u64(&self, key: &str) -> HalResult<Option<u64>> {
        match self.extra.get(key) {
            None | Some(serde_json::Value::Null) => Ok(None),
            Some(value) => value.as_u64().map(Some).ok_or_else(|| {
                HalError::Configuration(format!(
                    "'{key}' must be a non-negative integer, got {value}"
                ))
            }),
        }
    }
}

/// Something that can run a measured circuit and report counts.
///
/// Implementations must keep job status monotone: once `status` reports
/// `Completed`, `Failed` or `Cancelled` it keeps reporting it, and `result`
/// succeeds exactly for `Completed` jobs. `capabilities` is fixed for the
/// lifetime of the backend.
#[async_trait]
pub trait Backend: Send + Sync {
    fn name(&self) -> &str;

    fn capabilities(&self) -> &Capabilities;

    async fn availability(&self) -> HalResult<BackendAvailability>;

    /// Every reason `circuit` would be refused, without running it.
    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult>;

    /// Queue `circuit` for `shots` repetitions.
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId>;

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus>;

    /// Counts of a `Completed` job.
    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult>;

    /// Stop a pending job. Cancelling a finished job changes nothing.
    async fn cancel(&self, job_id: &JobId) -> HalResult<()>;

    /// Poll every [`POLL_INTERVAL`] until the job ends, giving up after
    /// [`MAX_POLLS`] attempts.
    async fn wait(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        for attempt in 0..MAX_POLLS {
            match self.status(job_id).await? {
                JobStatus::Completed => return self.result(job_id).await,
                JobStatus::Failed(msg) => return Err(HalError::JobFailed(msg)),
                JobStatus::Cancelled => return Err(HalError::JobCancelled),
                JobStatus::Queued | JobStatus::Running => {
                    debug!(job = %job_id, attempt, "job pending");
                    tokio::time::sleep(POLL_INTERVAL).await;
                }
            }
        }

        Err(HalError::Timeout(job_id.0.clone()))
    }
}

/// Whether a backend will take jobs right now.
#[derive(Debug, Clone)]
pub struct BackendAvailability {
    pub is_available: bool,
    /// Jobs ahead of a new submission, when known.
    pub queue_depth: Option<u32>,
    /// Why the backend is down, or any other note worth showing.
    pub status_message: Option<String>,
}

impl BackendAvailability {
    /// Availability of a backend that never queues, such as a local simulator.
    pub fn always_available() -> Self {
        Self {
            is_available: true,
            queue_depth: Some(0),
            status_message: None,
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            is_available: false,
            queue_depth: None,
            status_message: Some(reason.into()),
        }
    }
}

#[derive(Debug, Clone)]
pub enum ValidationResult {
    Valid,
    Invalid { reasons: Vec<String> },
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// The rejection reasons, joined for display.
    pub fn reasons(&self) -> Option<String> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid { reasons } => Some(reasons.join("; ")),
        }
    }
}

/// Construction from a [`BackendConfig`], used by the CLI.
pub trait BackendFactory: Backend + Sized {
    fn from_config(config: BackendConfig) -> HalResult<Self>;
}
