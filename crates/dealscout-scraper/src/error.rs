use thiserror::Error;
use uuid::Uuid;

use dealscout_browser::BrowserError;
use dealscout_core::JobStatus;

/// Fatal pipeline errors. One of these aborts the whole job; its display
/// string becomes the job's `error` field.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("browser error: {0}")]
    Browser(#[from] BrowserError),

    #[error("listing view did not render within {timeout_ms}ms")]
    ListingUnavailable { timeout_ms: u64 },
}

/// Per-card soft failures. Counted against the job's failure counter and
/// logged; a card failure never aborts the run.
#[derive(Debug, Error)]
pub enum CardFailure {
    #[error("card {index} is no longer resolvable in the listing")]
    Vanished { index: usize },

    #[error("card {index} has no readable display name")]
    NameUnavailable { index: usize },

    #[error("no popup trigger in card {index} became clickable")]
    TriggerExhausted { index: usize },

    #[error("popup dialog did not appear for card {index}")]
    PopupTimeout { index: usize },

    #[error("popup for card {index} produced no records")]
    EmptyExtraction { index: usize },

    #[error("browser interaction failed on card {index}: {source}")]
    Browser {
        index: usize,
        #[source]
        source: BrowserError,
    },
}

/// Errors surfaced by the orchestrator's public operations.
#[derive(Debug, Error)]
pub enum JobError {
    #[error("a scraping job is already in progress: {job_id}")]
    Conflict { job_id: Uuid },

    #[error("unknown job id: {job_id}")]
    NotFound { job_id: Uuid },

    #[error("job {job_id} is {status}; results are not ready")]
    NotReady { job_id: Uuid, status: JobStatus },
}
