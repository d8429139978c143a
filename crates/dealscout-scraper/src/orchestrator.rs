//! Job orchestrator.
//!
//! Owns the single-running-job invariant and the job registry, and
//! sequences the pipeline on a background task. The current-job slot is
//! instance state, not a process global: tests construct a fresh
//! orchestrator per case.

use std::sync::{Arc, Mutex};

use uuid::Uuid;

use dealscout_browser::PageProvider;
use dealscout_core::{DealRecord, Job, JobStatus};

use crate::error::{JobError, ScrapeError};
use crate::runner::{run_pipeline, RunSettings};
use crate::store::JobStore;

/// Accepts job submissions and serves status/result lookups.
#[derive(Clone)]
pub struct Orchestrator {
    provider: Arc<dyn PageProvider>,
    settings: Arc<RunSettings>,
    store: JobStore,
    /// The at-most-one-running-job slot, checked and set atomically at
    /// submission and cleared on every pipeline exit path.
    current: Arc<Mutex<Option<Uuid>>>,
}

impl Orchestrator {
    #[must_use]
    pub fn new(provider: Arc<dyn PageProvider>, settings: RunSettings) -> Self {
        Self {
            provider,
            settings: Arc::new(settings),
            store: JobStore::new(),
            current: Arc::new(Mutex::new(None)),
        }
    }

    /// Starts a new scraping job and returns its id immediately; the
    /// pipeline runs on a background task and the caller polls for
    /// completion.
    ///
    /// `limit` bounds the number of successfully extracted cards and is
    /// clamped to `[1, max_limit]`.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::Conflict`] carrying the running job's id when
    /// one is already in progress.
    pub fn submit(&self, limit: u32) -> Result<Uuid, JobError> {
        let limit = limit.clamp(1, self.settings.max_limit);

        let job_id = {
            let mut slot = self.current.lock().expect("current-job slot poisoned");
            if let Some(running) = *slot {
                return Err(JobError::Conflict { job_id: running });
            }
            let job_id = Uuid::new_v4();
            *slot = Some(job_id);
            job_id
        };

        self.store.insert_job(Job::running(job_id));
        tracing::info!(%job_id, limit, "scraping job accepted");

        let provider = Arc::clone(&self.provider);
        let settings = Arc::clone(&self.settings);
        let store = self.store.clone();
        let current = Arc::clone(&self.current);
        tokio::spawn(async move {
            run_job(provider, &settings, &store, job_id, limit).await;
            *current.lock().expect("current-job slot poisoned") = None;
        });

        Ok(job_id)
    }

    /// Current snapshot of a job's status and counters.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::NotFound`] for an unknown id.
    pub fn status(&self, job_id: Uuid) -> Result<Job, JobError> {
        self.store.job(job_id).ok_or(JobError::NotFound { job_id })
    }

    /// The completed job's deal sequence.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::NotFound`] for an unknown id and
    /// [`JobError::NotReady`] while the job has not completed; partial
    /// results are never returned.
    pub fn results(&self, job_id: Uuid) -> Result<Vec<DealRecord>, JobError> {
        let job = self.store.job(job_id).ok_or(JobError::NotFound { job_id })?;
        if job.status != JobStatus::Completed {
            return Err(JobError::NotReady {
                job_id,
                status: job.status,
            });
        }
        Ok(self.store.deals(job_id).unwrap_or_default())
    }
}

/// Runs the pipeline for one job and records its terminal state.
async fn run_job(
    provider: Arc<dyn PageProvider>,
    settings: &RunSettings,
    store: &JobStore,
    job_id: Uuid,
    limit: u32,
) {
    match acquire_and_run(provider.as_ref(), settings, limit).await {
        Ok(outcome) => {
            tracing::info!(
                %job_id,
                total = outcome.total_cards,
                ok = outcome.successes,
                failed = outcome.failures,
                records = outcome.records.len(),
                "scraping job completed"
            );
            store.store_deals(job_id, outcome.records);
            store.update_job(job_id, |job| {
                job.total_cards = outcome.total_cards;
                job.successful_extractions = outcome.successes;
                job.failed_extractions = outcome.failures;
                job.complete();
            });
        }
        Err(e) => {
            tracing::error!(%job_id, error = %e, "scraping job failed");
            store.update_job(job_id, |job| job.fail(e.to_string()));
        }
    }
}

/// Acquires a page, runs the pipeline, and closes the page on both the
/// success and the failure path.
async fn acquire_and_run(
    provider: &dyn PageProvider,
    settings: &RunSettings,
    limit: u32,
) -> Result<crate::card::HarvestOutcome, ScrapeError> {
    let page = provider.acquire().await?;
    let result = run_pipeline(page.as_ref(), settings, limit).await;
    if let Err(e) = page.close().await {
        tracing::warn!(error = %e, "failed to close browser page");
    }
    result
}
