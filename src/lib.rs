//! SiteGauge: an SEO site crawler and audit engine
//!
//! This crate crawls a website breadth-first from a seed URL, extracts
//! structural SEO signals from each page, runs a battery of technical and
//! content audits, and aggregates per-page and per-site health scores.

pub mod audit;
pub mod config;
pub mod crawler;
pub mod extract;
pub mod fetch;
pub mod job;
pub mod report;
pub mod score;
pub mod url;

use thiserror::Error;

/// Main error type for SiteGauge operations
#[derive(Debug, Error)]
pub enum SiteGaugeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Invalid crawl job: {0}")]
    InvalidJob(String),

    #[error("Unknown job: {0}")]
    UnknownJob(String),

    #[error("Crawl job failed: {0}")]
    JobFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Errors raised by a fetch engine for a single URL
///
/// These are per-page failures: the orchestrator records them and keeps
/// crawling. Only engine-level unavailability escalates to a job failure.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error for {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Could not connect to {url}: {message}")]
    Unreachable { url: String, message: String },

    #[error("Too many redirects from {url}")]
    RedirectLimit { url: String },

    #[error("Redirect loop detected at {url}")]
    RedirectLoop { url: String },

    #[error("Redirect from {url} has a missing or invalid Location header")]
    MissingLocation { url: String },

    #[error("Rendered fetch unavailable: {reason}")]
    RenderUnavailable { reason: String },

    #[error("Rendered fetch failed for {url}: {message}")]
    RenderFailed { url: String, message: String },
}

/// Result type alias for SiteGauge operations
pub type Result<T> = std::result::Result<T, SiteGaugeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use audit::{IssueSeverity, TechnicalIssue};
pub use config::Config;
pub use crawler::{start_crawl, CrawlEvent, CrawlJob, CrawlOutcome, PageResult};
pub use fetch::{FetchEngine, FetchedPage, HttpFetchEngine};
pub use job::{JobState, JobStore};
pub use score::ScoreBreakdown;
