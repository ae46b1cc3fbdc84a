//! Crawl job tracking
//!
//! An in-memory registry of jobs and their emitted page results. Nothing is
//! persisted: restarting the process forgets every job, by design.

mod store;

pub use store::{JobRecord, JobState, JobStore};
