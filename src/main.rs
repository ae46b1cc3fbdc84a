//! SiteGauge main entry point
//!
//! Command-line interface for the SiteGauge SEO crawler.

use anyhow::Context;
use clap::Parser;
use sitegauge::config::{load_config_with_hash, Config};
use sitegauge::crawler::{start_crawl, CrawlEvent, CrawlJob};
use sitegauge::fetch::HttpFetchEngine;
use sitegauge::job::JobStore;
use sitegauge::report::{print_summary, write_markdown_report};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// SiteGauge: crawl a website and score its SEO health
///
/// Crawls breadth-first from the seed URL, audits every page for technical
/// and content problems, and aggregates per-page scores into a site score.
#[derive(Parser, Debug)]
#[command(name = "sitegauge")]
#[command(version)]
#[command(about = "Crawl a website and score its SEO health", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from
    #[arg(value_name = "URL")]
    seed_url: String,

    /// Maximum link depth from the seed (default from config, 2)
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Maximum number of pages to crawl (default from config, 50)
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write a markdown report to this path
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Write crawl results as JSON to this path
    #[arg(long, value_name = "FILE")]
    json: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?;
            tracing::info!("Configuration loaded from {} (hash: {})", path.display(), hash);
            config
        }
        None => Config::default(),
    };

    let max_depth = cli.max_depth.unwrap_or(config.crawler.default_max_depth);
    let max_pages = cli.max_pages.unwrap_or(config.crawler.default_max_pages);

    let job = CrawlJob::new(&cli.seed_url, max_depth, max_pages)?;
    tracing::info!(
        "Crawling {} (job {}, max depth {}, max pages {})",
        job.seed_url,
        job.id,
        job.max_depth,
        job.max_pages
    );

    let engine = HttpFetchEngine::new(
        &config.user_agent.header_value(),
        config.crawler.fetch_timeout_secs,
        config.crawler.connect_timeout_secs,
    )
    .context("Failed to build HTTP client")?;

    let store = JobStore::new();
    store.register(&job);
    store.mark_running(&job.id)?;

    let job_id = job.id.clone();
    let mut handle = start_crawl(job, Arc::new(engine), config.render_fallback.clone());

    let mut failed_fetches = 0usize;
    while let Some(event) = handle.next_event().await {
        match event {
            CrawlEvent::Page(page) => {
                tracing::info!(
                    "[{}] {} (overall {})",
                    page.status,
                    page.url,
                    page.score_breakdown
                        .map(|b| b.overall_score.to_string())
                        .unwrap_or_else(|| "-".to_string())
                );
                store.append_result(&job_id, *page)?;
            }
            CrawlEvent::PageFailed { url, error } => {
                failed_fetches += 1;
                tracing::warn!("Failed to fetch {}: {}", url, error);
            }
            CrawlEvent::Completed { pages_crawled } => {
                store.mark_completed(&job_id, pages_crawled)?;
            }
            CrawlEvent::Failed { message } => {
                store.mark_failed(&job_id, &message)?;
            }
        }
    }

    let record = store
        .metadata(&job_id)
        .context("Job record disappeared from store")?;
    let results = store.results(&job_id);

    if failed_fetches > 0 {
        tracing::warn!("{} pages could not be fetched", failed_fetches);
    }

    if !cli.quiet {
        print_summary(&record, &results);
    }

    let report_path = cli
        .report
        .or_else(|| config.output.report_path.as_ref().map(PathBuf::from));
    if let Some(path) = report_path {
        write_markdown_report(&record, &results, &path)?;
        println!("Report written to {}", path.display());
    }

    let json_path = cli
        .json
        .or_else(|| config.output.json_path.as_ref().map(PathBuf::from));
    if let Some(path) = json_path {
        let payload = serde_json::json!({
            "job": &record,
            "pages": &results,
        });
        std::fs::write(&path, serde_json::to_string_pretty(&payload)?)?;
        println!("JSON results written to {}", path.display());
    }

    if let Some(error) = record.error {
        anyhow::bail!("Crawl failed: {}", error);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sitegauge=info,warn"),
            1 => EnvFilter::new("sitegauge=debug,info"),
            2 => EnvFilter::new("sitegauge=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
