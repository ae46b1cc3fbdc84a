//! In-memory job metadata and result store
//!
//! One entry per crawl job: the lifecycle record plus the append-only list
//! of page results. Queries hand out clones of immutable data, so readers
//! never observe a job mid-mutation.

use crate::crawler::{CrawlJob, PageResult};
use crate::{Result, SiteGaugeError};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;

/// Lifecycle state of a crawl job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Pending,
    Running,
    Completed,
    Failed,
}

/// Metadata for one crawl job
#[derive(Debug, Clone, Serialize)]
pub struct JobRecord {
    pub job_id: String,
    pub seed_url: String,
    pub max_depth: u32,
    pub max_pages: usize,
    pub state: JobState,
    pub pages_crawled: usize,
    pub created_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,

    /// Failure message, only set in the `Failed` state
    pub error: Option<String>,
}

struct JobEntry {
    record: JobRecord,
    results: Vec<PageResult>,
}

/// Registry of all jobs known to this process
#[derive(Default)]
pub struct JobStore {
    jobs: Mutex<HashMap<String, JobEntry>>,
}

impl JobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new job in the `Pending` state
    pub fn register(&self, job: &CrawlJob) {
        let record = JobRecord {
            job_id: job.id.clone(),
            seed_url: job.seed_url.to_string(),
            max_depth: job.max_depth,
            max_pages: job.max_pages,
            state: JobState::Pending,
            pages_crawled: 0,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            error: None,
        };

        self.jobs.lock().unwrap().insert(
            job.id.clone(),
            JobEntry {
                record,
                results: Vec::new(),
            },
        );
    }

    /// Marks a job as running
    pub fn mark_running(&self, job_id: &str) -> Result<()> {
        self.update(job_id, |record| {
            record.state = JobState::Running;
            record.started_at = Some(Utc::now());
        })
    }

    /// Marks a job as completed with its final page count
    pub fn mark_completed(&self, job_id: &str, pages_crawled: usize) -> Result<()> {
        self.update(job_id, |record| {
            record.state = JobState::Completed;
            record.pages_crawled = pages_crawled;
            record.completed_at = Some(Utc::now());
        })
    }

    /// Marks a job as failed; already-appended results remain readable
    pub fn mark_failed(&self, job_id: &str, message: &str) -> Result<()> {
        self.update(job_id, |record| {
            record.state = JobState::Failed;
            record.error = Some(message.to_string());
            record.completed_at = Some(Utc::now());
        })
    }

    /// Appends one page result and bumps the crawled counter
    pub fn append_result(&self, job_id: &str, result: PageResult) -> Result<()> {
        let mut jobs = self.jobs.lock().unwrap();
        let entry = jobs
            .get_mut(job_id)
            .ok_or_else(|| SiteGaugeError::UnknownJob(job_id.to_string()))?;

        entry.results.push(result);
        entry.record.pages_crawled = entry.results.len();
        Ok(())
    }

    /// Returns the metadata for a job
    pub fn metadata(&self, job_id: &str) -> Option<JobRecord> {
        self.jobs
            .lock()
            .unwrap()
            .get(job_id)
            .map(|entry| entry.record.clone())
    }

    /// Returns all page results for a job, in emission order
    pub fn results(&self, job_id: &str) -> Vec<PageResult> {
        self.jobs
            .lock()
            .unwrap()
            .get(job_id)
            .map(|entry| entry.results.clone())
            .unwrap_or_default()
    }

    /// Returns a single page by exact URL
    pub fn page(&self, job_id: &str, url: &str) -> Option<PageResult> {
        self.jobs
            .lock()
            .unwrap()
            .get(job_id)
            .and_then(|entry| entry.results.iter().find(|page| page.url == url).cloned())
    }

    /// Number of page results recorded for a job
    pub fn page_count(&self, job_id: &str) -> usize {
        self.jobs
            .lock()
            .unwrap()
            .get(job_id)
            .map(|entry| entry.results.len())
            .unwrap_or(0)
    }

    /// All known job records, newest first
    pub fn all_jobs(&self) -> Vec<JobRecord> {
        let mut records: Vec<_> = self
            .jobs
            .lock()
            .unwrap()
            .values()
            .map(|entry| entry.record.clone())
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }

    /// Removes a job and its results
    pub fn remove(&self, job_id: &str) {
        self.jobs.lock().unwrap().remove(job_id);
    }

    fn update(&self, job_id: &str, apply: impl FnOnce(&mut JobRecord)) -> Result<()> {
        let mut jobs = self.jobs.lock().unwrap();
        let entry = jobs
            .get_mut(job_id)
            .ok_or_else(|| SiteGaugeError::UnknownJob(job_id.to_string()))?;
        apply(&mut entry.record);
        Ok(())
    }
}
