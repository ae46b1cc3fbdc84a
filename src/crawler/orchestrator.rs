//! The crawl orchestrator
//!
//! Runs one job as a single spawned task: pop the earliest frontier entry,
//! fetch it (with the render-fallback decision), run the metric/audit/score
//! pipeline, emit the result, and enqueue newly discovered internal links.
//! Because the per-page pipeline is sequential inside one task, events leave
//! the channel in exact traversal order.

use crate::audit::{run_audits, AuditInputs, LinkStatus};
use crate::config::RenderFallbackConfig;
use crate::crawler::fallback::{should_use_render_fallback, RenderBudget};
use crate::crawler::frontier::{Frontier, FrontierEntry};
use crate::crawler::types::{CrawlEvent, CrawlJob, CrawlOutcome, PageResult};
use crate::extract::{extract_links, extract_metrics, extract_title, is_indexable, robots_meta_content};
use crate::fetch::{FetchEngine, FetchedPage, SpeedMetrics};
use crate::score::{content_score, technical_score, ScoreBreakdown};
use crate::url::{is_internal_url, normalize_url};
use chrono::Utc;
use scraper::Html;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use url::Url;

/// Capacity of the event channel between orchestrator and consumer
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Handle to a running crawl
///
/// Dropping the handle stops the crawl: the orchestrator exits as soon as it
/// fails to deliver the next event.
pub struct CrawlHandle {
    /// Id of the job this handle belongs to
    pub job_id: String,

    events: mpsc::Receiver<CrawlEvent>,
    cancel: Arc<AtomicBool>,
}

impl CrawlHandle {
    /// Receives the next crawl event, `None` after the terminal event
    pub async fn next_event(&mut self) -> Option<CrawlEvent> {
        self.events.recv().await
    }

    /// Requests cancellation
    ///
    /// Honored between frontier pops; the in-flight page still completes
    /// and is emitted before the crawl winds down.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::SeqCst);
    }

    /// Drains the event stream into the full result list and the outcome
    pub async fn collect(mut self) -> (Vec<PageResult>, CrawlOutcome) {
        let mut pages = Vec::new();
        let mut outcome = CrawlOutcome::Completed { pages_crawled: 0 };

        while let Some(event) = self.events.recv().await {
            match event {
                CrawlEvent::Page(page) => pages.push(*page),
                CrawlEvent::PageFailed { .. } => {}
                CrawlEvent::Completed { pages_crawled } => {
                    outcome = CrawlOutcome::Completed { pages_crawled };
                }
                CrawlEvent::Failed { message } => {
                    outcome = CrawlOutcome::Failed { message };
                }
            }
        }

        (pages, outcome)
    }
}

/// Starts a crawl job on a background task
///
/// Returns immediately; results arrive as [`CrawlEvent`]s on the handle.
/// Each job owns its frontier, visited set and render budget, so any number
/// of jobs can run independently.
pub fn start_crawl(
    job: CrawlJob,
    engine: Arc<dyn FetchEngine>,
    fallback: RenderFallbackConfig,
) -> CrawlHandle {
    let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let cancel = Arc::new(AtomicBool::new(false));
    let job_id = job.id.clone();

    let orchestrator = Orchestrator {
        job,
        engine,
        fallback,
        events: events_tx,
        cancel: Arc::clone(&cancel),
    };

    tokio::spawn(orchestrator.run());

    CrawlHandle {
        job_id,
        events: events_rx,
        cancel,
    }
}

struct Orchestrator {
    job: CrawlJob,
    engine: Arc<dyn FetchEngine>,
    fallback: RenderFallbackConfig,
    events: mpsc::Sender<CrawlEvent>,
    cancel: Arc<AtomicBool>,
}

impl Orchestrator {
    async fn run(self) {
        tracing::info!(
            "Starting crawl {} for {} (max_depth={}, max_pages={})",
            self.job.id,
            self.job.seed_url,
            self.job.max_depth,
            self.job.max_pages
        );

        let outcome = self.crawl().await;

        let event = match outcome {
            CrawlOutcome::Completed { pages_crawled } => {
                tracing::info!(
                    "Crawl {} completed: {} pages crawled",
                    self.job.id,
                    pages_crawled
                );
                CrawlEvent::Completed { pages_crawled }
            }
            CrawlOutcome::Failed { message } => {
                tracing::error!("Crawl {} failed: {}", self.job.id, message);
                CrawlEvent::Failed { message }
            }
        };

        let _ = self.events.send(event).await;
    }

    async fn crawl(&self) -> CrawlOutcome {
        let mut frontier = Frontier::new();
        frontier.push(self.job.seed_url.clone(), 0);

        let mut budget = RenderBudget::new(self.fallback.max_speed_measurements);
        // Statuses of URLs already fetched in this job, for the broken-link audit
        let mut status_ledger: HashMap<String, u16> = HashMap::new();

        let mut pages_crawled = 0usize;
        let mut fetch_attempts = 0usize;
        let mut fetch_failures = 0usize;

        loop {
            if pages_crawled >= self.job.max_pages {
                tracing::info!("Page budget of {} reached", self.job.max_pages);
                break;
            }

            if self.cancel.load(Ordering::SeqCst) {
                tracing::info!("Crawl {} cancelled", self.job.id);
                break;
            }

            let entry = match frontier.pop() {
                Some(entry) => entry,
                None => {
                    tracing::debug!("Frontier is empty, crawl complete");
                    break;
                }
            };

            tracing::debug!("Processing {} at depth {}", entry.url, entry.depth);
            fetch_attempts += 1;

            let fetched = match self.engine.fetch(&entry.url).await {
                Ok(page) => page,
                Err(e) => {
                    fetch_failures += 1;
                    tracing::warn!("Fetch failed for {}: {}", entry.url, e);
                    let failed = CrawlEvent::PageFailed {
                        url: entry.url.to_string(),
                        error: e.to_string(),
                    };
                    if self.events.send(failed).await.is_err() {
                        return CrawlOutcome::Completed { pages_crawled };
                    }
                    continue;
                }
            };

            let (page, used_render_fallback, speed) =
                self.apply_render_fallback(&entry.url, fetched, &mut budget).await;

            status_ledger.insert(entry.url.to_string(), page.status);
            if page.final_url != entry.url {
                status_ledger.insert(page.final_url.to_string(), page.status);
            }

            let (result, links) = analyze_page(
                &self.job,
                &entry,
                &page,
                used_render_fallback,
                speed,
                &status_ledger,
            );

            pages_crawled += 1;
            if self
                .events
                .send(CrawlEvent::Page(Box::new(result)))
                .await
                .is_err()
            {
                // Consumer is gone; stop crawling
                return CrawlOutcome::Completed { pages_crawled };
            }

            if entry.depth < self.job.max_depth {
                self.enqueue_links(&mut frontier, &links, entry.depth + 1);
            }
        }

        if pages_crawled == 0 && fetch_attempts > 0 && fetch_failures == fetch_attempts {
            CrawlOutcome::Failed {
                message: format!(
                    "fetch engine unreachable: all {} fetch attempts failed",
                    fetch_attempts
                ),
            }
        } else {
            CrawlOutcome::Completed { pages_crawled }
        }
    }

    /// Applies the render-fallback decision to a lightweight fetch result
    ///
    /// On a successful re-fetch the rendered page fully replaces the
    /// lightweight one; on failure the original is kept and the fallback
    /// flag stays unset.
    async fn apply_render_fallback(
        &self,
        url: &Url,
        lightweight: FetchedPage,
        budget: &mut RenderBudget,
    ) -> (FetchedPage, bool, Option<SpeedMetrics>) {
        if !should_use_render_fallback(
            lightweight.status,
            lightweight.byte_size,
            self.fallback.min_html_bytes,
        ) {
            return (lightweight, false, None);
        }

        let collect_speed = budget.can_measure();
        tracing::info!(
            "Retrying {} with render fallback (HTML too small: {} bytes)",
            url,
            lightweight.byte_size
        );

        match self.engine.fetch_rendered(url, collect_speed).await {
            Ok(rendered) => {
                tracing::info!(
                    "Render fallback succeeded for {}, new HTML size: {} bytes",
                    url,
                    rendered.page.byte_size
                );
                if rendered.speed.is_some() {
                    budget.record_measurement();
                }
                (rendered.page, true, rendered.speed)
            }
            Err(e) => {
                tracing::debug!(
                    "Render fallback failed for {}, keeping lightweight result: {}",
                    url,
                    e
                );
                (lightweight, false, None)
            }
        }
    }

    /// Normalizes, filters and enqueues links discovered on a page
    fn enqueue_links(&self, frontier: &mut Frontier, links: &[Url], depth: u32) {
        for link in links {
            let normalized = match normalize_url(link.as_str()) {
                Ok(url) => url,
                // Malformed discovered URLs are silently dropped
                Err(_) => continue,
            };

            if !is_internal_url(&normalized, &self.job.seed_url) {
                continue;
            }

            if frontier.push(normalized, depth) {
                tracing::trace!("Enqueued {} at depth {}", link, depth);
            }
        }
    }
}

/// Runs the full synchronous analysis pipeline for one fetched page
///
/// Parsing, metrics, audits and scoring all happen here, in one place,
/// because the parsed document must not be held across an await point.
fn analyze_page(
    job: &CrawlJob,
    entry: &FrontierEntry,
    page: &FetchedPage,
    used_render_fallback: bool,
    speed: Option<SpeedMetrics>,
    status_ledger: &HashMap<String, u16>,
) -> (PageResult, Vec<Url>) {
    let document = Html::parse_document(&page.body);

    let title = extract_title(&document);
    let metrics = extract_metrics(&document, &entry.url);
    let indexable = is_indexable(&document);
    let robots_meta = robots_meta_content(&document);

    // Links are only followed from successful responses; an error page's
    // navigation would otherwise leak into the frontier.
    let links = if (200..300).contains(&page.status) {
        extract_links(&document, &page.final_url)
    } else {
        Vec::new()
    };

    let known_statuses = outgoing_link_statuses(job, &links, status_ledger);

    let audit = run_audits(&AuditInputs {
        page_url: &entry.url,
        document: &document,
        outgoing_links: if known_statuses.is_empty() {
            None
        } else {
            Some(&known_statuses)
        },
        redirect_history: if page.redirect_history.is_empty() {
            None
        } else {
            Some(&page.redirect_history)
        },
        robots_meta: robots_meta.as_deref(),
        is_internal_page: true,
    });

    let technical = technical_score(&audit.issues);
    let content = content_score(&metrics);
    let breakdown = ScoreBreakdown::new(technical.technical_score, content.content_score);

    let result = PageResult {
        url: entry.url.to_string(),
        status: page.status,
        byte_size: page.byte_size,
        elapsed_ms: page.elapsed_ms,
        crawled_at: Utc::now(),
        depth: entry.depth,
        title,
        indexable,
        issues: audit.issues,
        passed_checks: audit.passed_checks,
        seo_score: technical.technical_score,
        issue_breakdown: technical.breakdown,
        score_breakdown: Some(breakdown),
        seo_metrics: Some(metrics),
        speed,
        used_render_fallback,
    };

    (result, links)
}

/// Looks up already-known statuses for a page's internal outgoing links
///
/// Only URLs fetched earlier in this job have a status; everything else is
/// unknown and stays out of the list, so the broken-link audit abstains on
/// pages with no known outgoing statuses at all.
fn outgoing_link_statuses(
    job: &CrawlJob,
    links: &[Url],
    status_ledger: &HashMap<String, u16>,
) -> Vec<LinkStatus> {
    let mut statuses = Vec::new();

    for link in links {
        if !is_internal_url(link, &job.seed_url) {
            continue;
        }

        if let Ok(normalized) = normalize_url(link.as_str()) {
            if let Some(&status) = status_ledger.get(normalized.as_str()) {
                statuses.push(LinkStatus {
                    url: normalized.to_string(),
                    status,
                });
            }
        }
    }

    statuses
}
