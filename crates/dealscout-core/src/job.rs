//! Job lifecycle types.
//!
//! A job is created in the `running` state at submission time, has its
//! counters mutated only by the orchestrator while the pipeline runs, and
//! transitions to exactly one terminal state (`completed` or `failed`),
//! after which it is read-only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    /// `true` once the job can no longer change.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Pending => write!(f, "pending"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

/// One scraping job's bookkeeping record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub job_id: Uuid,
    pub status: JobStatus,
    pub started_at: DateTime<Utc>,
    /// Set only when the job reaches a terminal state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Cards discovered in the listing after full materialization.
    pub total_cards: u32,
    pub successful_extractions: u32,
    pub failed_extractions: u32,
    /// Human-readable failure reason; set only on `failed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Job {
    /// A fresh job in the `running` state, started now.
    #[must_use]
    pub fn running(job_id: Uuid) -> Self {
        Self {
            job_id,
            status: JobStatus::Running,
            started_at: Utc::now(),
            completed_at: None,
            total_cards: 0,
            successful_extractions: 0,
            failed_extractions: 0,
            error: None,
        }
    }

    /// Transition to `completed` and stamp the completion time.
    pub fn complete(&mut self) {
        self.status = JobStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    /// Transition to `failed` with a human-readable reason.
    pub fn fail(&mut self, error: impl Into<String>) {
        self.status = JobStatus::Failed;
        self.completed_at = Some(Utc::now());
        self.error = Some(error.into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&JobStatus::Running).unwrap(),
            "\"running\""
        );
        assert_eq!(
            serde_json::to_string(&JobStatus::Completed).unwrap(),
            "\"completed\""
        );
    }

    #[test]
    fn running_and_pending_are_not_terminal() {
        assert!(!JobStatus::Pending.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Completed.is_terminal());
        assert!(JobStatus::Failed.is_terminal());
    }

    #[test]
    fn fresh_job_is_running_with_zeroed_counters() {
        let job = Job::running(Uuid::new_v4());
        assert_eq!(job.status, JobStatus::Running);
        assert_eq!(job.total_cards, 0);
        assert_eq!(job.successful_extractions, 0);
        assert_eq!(job.failed_extractions, 0);
        assert!(job.completed_at.is_none());
        assert!(job.error.is_none());
    }

    #[test]
    fn complete_stamps_completed_at_and_leaves_error_unset() {
        let mut job = Job::running(Uuid::new_v4());
        job.complete();
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.completed_at.is_some());
        assert!(job.error.is_none());
    }

    #[test]
    fn fail_records_the_error_string() {
        let mut job = Job::running(Uuid::new_v4());
        job.fail("webdriver session could not be created");
        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.completed_at.is_some());
        assert_eq!(
            job.error.as_deref(),
            Some("webdriver session could not be created")
        );
    }

    #[test]
    fn error_field_is_omitted_from_json_until_failed() {
        let job = Job::running(Uuid::new_v4());
        let json = serde_json::to_string(&job).unwrap();
        assert!(!json.contains("\"error\""));
        assert!(!json.contains("\"completed_at\""));
    }
}
