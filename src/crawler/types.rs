//! Crawl job and result types

use crate::audit::TechnicalIssue;
use crate::extract::PageSeoMetrics;
use crate::fetch::SpeedMetrics;
use crate::score::{IssueCodeBreakdown, ScoreBreakdown};
use crate::url::normalize_url;
use crate::SiteGaugeError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use url::Url;
use uuid::Uuid;

/// One crawl request: seed, budgets, identity
///
/// Immutable once started; restarting means creating a new job.
#[derive(Debug, Clone)]
pub struct CrawlJob {
    /// Unique job identifier
    pub id: String,

    /// Normalized seed URL; its hostname defines what counts as internal
    pub seed_url: Url,

    /// Maximum link depth from the seed (seed is depth 0)
    pub max_depth: u32,

    /// Maximum number of pages fetched for this job
    pub max_pages: usize,
}

impl CrawlJob {
    pub const DEFAULT_MAX_DEPTH: u32 = 2;
    pub const DEFAULT_MAX_PAGES: usize = 50;

    const MAX_DEPTH_LIMIT: u32 = 10;
    const MAX_PAGES_LIMIT: usize = 1000;

    /// Creates a job with a generated id
    pub fn new(seed_url: &str, max_depth: u32, max_pages: usize) -> Result<Self, SiteGaugeError> {
        let seed_url = normalize_url(seed_url)?;

        if max_depth < 1 || max_depth > Self::MAX_DEPTH_LIMIT {
            return Err(SiteGaugeError::InvalidJob(format!(
                "max_depth must be between 1 and {}, got {}",
                Self::MAX_DEPTH_LIMIT,
                max_depth
            )));
        }

        if max_pages < 1 || max_pages > Self::MAX_PAGES_LIMIT {
            return Err(SiteGaugeError::InvalidJob(format!(
                "max_pages must be between 1 and {}, got {}",
                Self::MAX_PAGES_LIMIT,
                max_pages
            )));
        }

        Ok(Self {
            id: Uuid::new_v4().to_string(),
            seed_url,
            max_depth,
            max_pages,
        })
    }

    /// Replaces the generated id, for callers that track their own
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// Everything known about one fetched page
///
/// Created once by the orchestrator and never mutated afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct PageResult {
    pub url: String,
    pub status: u16,
    pub byte_size: usize,
    pub elapsed_ms: u64,
    pub crawled_at: DateTime<Utc>,

    /// Depth at which the page was discovered
    pub depth: u32,

    pub title: Option<String>,
    pub indexable: bool,

    /// Audit findings for this page
    pub issues: Vec<TechnicalIssue>,

    /// Labels of audit checks that ran clean
    pub passed_checks: Vec<&'static str>,

    /// Issue-based SEO score, the value site scores average over
    pub seo_score: u32,

    /// Deductions grouped by issue code
    pub issue_breakdown: Vec<IssueCodeBreakdown>,

    pub score_breakdown: Option<ScoreBreakdown>,
    pub seo_metrics: Option<PageSeoMetrics>,
    pub speed: Option<SpeedMetrics>,

    /// Whether the browser-render fallback produced this result
    pub used_render_fallback: bool,
}

/// Events emitted while a crawl runs
///
/// Exactly one terminal event (`Completed` or `Failed`) ends the stream.
#[derive(Debug)]
pub enum CrawlEvent {
    /// One page finished the full pipeline
    Page(Box<PageResult>),

    /// A fetch failed; the crawl continues
    PageFailed { url: String, error: String },

    /// Frontier exhausted, budget reached, or job cancelled
    Completed { pages_crawled: usize },

    /// Orchestrator-level fault; emitted results remain valid
    Failed { message: String },
}

/// Terminal state of one crawl
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrawlOutcome {
    Completed { pages_crawled: usize },
    Failed { message: String },
}
