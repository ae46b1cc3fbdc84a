//! Markup extraction for SiteGauge
//!
//! Everything that reads a parsed HTML document lives here: candidate link
//! extraction for the frontier, structural SEO metrics, and the indexability
//! check.

mod indexability;
mod links;
mod metrics;

pub use indexability::{is_indexable, robots_meta_content};
pub use links::{extract_links, extract_title};
pub use metrics::{extract_metrics, PageSeoMetrics};
