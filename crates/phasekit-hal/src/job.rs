//! Job identifiers, status and bookkeeping.
//!
//! A job starts `Queued`, may pass through `Running`, and ends in exactly one
//! of `Completed`, `Failed` or `Cancelled`. Once a job has ended its status
//! no longer changes.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Opaque handle returned by [`Backend::submit`](crate::Backend::submit).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a job is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Completed,
    /// Carries the backend's failure message.
    Failed(String),
    Cancelled,
}

impl JobStatus {
    /// `true` for `Completed`, `Failed` and `Cancelled`.
    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, JobStatus::Queued | JobStatus::Running)
    }

    pub fn is_success(&self) -> bool {
        *self == JobStatus::Completed
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Queued => f.write_str("queued"),
            JobStatus::Running => f.write_str("running"),
            JobStatus::Completed => f.write_str("completed"),
            JobStatus::Failed(reason) => write!(f, "failed ({reason})"),
            JobStatus::Cancelled => f.write_str("cancelled"),
        }
    }
}

/// A submitted job and its timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: JobId,
    pub status: JobStatus,
    pub shots: u32,
    /// Name of the backend that accepted the job.
    pub backend: String,
    pub submitted_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Job {
    /// A freshly queued job.
    pub fn queued(id: JobId, shots: u32, backend: impl Into<String>) -> Self {
        Self {
            id,
            status: JobStatus::Queued,
            shots,
            backend: backend.into(),
            submitted_at: Utc::now(),
            started_at: None,
            finished_at: None,
        }
    }

    /// Move to `status`, stamping the start and finish times the first time
    /// they are reached.
    ///
    /// Returns `false` and leaves the job alone if it has already ended.
    pub fn advance(&mut self, status: JobStatus) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        let now = Utc::now();
        if status == JobStatus::Running {
            self.started_at.get_or_insert(now);
        }
        if status.is_terminal() {
            self.finished_at = Some(now);
        }
        self.status = status;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_and_terminal_partition() {
        let all = [
            JobStatus::Queued,
            JobStatus::Running,
            JobStatus::Completed,
            JobStatus::Failed("x".into()),
            JobStatus::Cancelled,
        ];
        for status in &all {
            assert_ne!(status.is_pending(), status.is_terminal(), "{status}");
        }
        assert!(JobStatus::Completed.is_success());
        assert!(!JobStatus::Cancelled.is_success());
    }

    #[test]
    fn test_advance_stamps_times() {
        let mut job = Job::queued(JobId::new("job-1"), 2048, "simulator");
        assert!(job.started_at.is_none());

        assert!(job.advance(JobStatus::Running));
        assert!(job.started_at.is_some());
        assert!(job.finished_at.is_none());

        assert!(job.advance(JobStatus::Completed));
        assert!(job.finished_at.is_some());
        assert!(job.started_at <= job.finished_at);
    }

    #[test]
    fn test_terminal_status_is_final() {
        let mut job = Job::queued(JobId::new("job-2"), 1, "simulator");
        job.advance(JobStatus::Completed);
        assert!(!job.advance(JobStatus::Cancelled));
        assert_eq!(job.status, JobStatus::Completed);
    }

    #[test]
    fn test_display() {
        assert_eq!(JobStatus::Failed("boom".into()).to_string(), "failed (boom)");
        assert_eq!(JobId::new("abc").to_string(), "abc");
    }
}
