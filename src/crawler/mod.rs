//! Crawl orchestration
//!
//! Drives a breadth-first traversal of one site: frontier management,
//! depth/page budgets, the render-fallback decision per page, and the
//! metric/audit/score pipeline. One completed-page event is emitted per
//! processed URL, in traversal order.

mod fallback;
mod frontier;
mod orchestrator;
mod types;

pub use fallback::{
    should_use_render_fallback, RenderBudget, DEFAULT_MAX_SPEED_MEASUREMENTS,
    RENDER_MIN_HTML_BYTES,
};
pub use frontier::{Frontier, FrontierEntry};
pub use orchestrator::{start_crawl, CrawlHandle};
pub use types::{CrawlEvent, CrawlJob, CrawlOutcome, PageResult};
