//! In-memory job registry.
//!
//! One entry per job id, plus one write-once deal sequence per completed
//! job. The orchestrator is the only writer; readers get snapshots.
//! Swapping in a database-backed registry means reimplementing exactly
//! this surface.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use uuid::Uuid;

use dealscout_core::{DealRecord, Job};

#[derive(Clone, Default)]
pub struct JobStore {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    jobs: RwLock<HashMap<Uuid, Job>>,
    deals: RwLock<HashMap<Uuid, Vec<DealRecord>>>,
}

impl JobStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_job(&self, job: Job) {
        self.inner
            .jobs
            .write()
            .expect("job registry lock poisoned")
            .insert(job.job_id, job);
    }

    /// Applies `mutate` to the stored job, if present. Returns whether the
    /// job existed.
    pub fn update_job<F>(&self, job_id: Uuid, mutate: F) -> bool
    where
        F: FnOnce(&mut Job),
    {
        let mut jobs = self.inner.jobs.write().expect("job registry lock poisoned");
        match jobs.get_mut(&job_id) {
            Some(job) => {
                mutate(job);
                true
            }
            None => false,
        }
    }

    /// Snapshot of the job record, if known.
    #[must_use]
    pub fn job(&self, job_id: Uuid) -> Option<Job> {
        self.inner
            .jobs
            .read()
            .expect("job registry lock poisoned")
            .get(&job_id)
            .cloned()
    }

    /// Stores a completed job's deal sequence. Write-once per job id.
    pub fn store_deals(&self, job_id: Uuid, deals: Vec<DealRecord>) {
        self.inner
            .deals
            .write()
            .expect("deal registry lock poisoned")
            .insert(job_id, deals);
    }

    #[must_use]
    pub fn deals(&self, job_id: Uuid) -> Option<Vec<DealRecord>> {
        self.inner
            .deals
            .read()
            .expect("deal registry lock poisoned")
            .get(&job_id)
            .cloned()
    }
}
