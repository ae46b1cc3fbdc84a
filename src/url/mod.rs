//! URL handling for SiteGauge
//!
//! Provides the normalization used to deduplicate frontier entries and the
//! internal-URL check that keeps the crawl on the seed's hostname.

mod internal;
mod normalize;

pub use internal::is_internal_url;
pub use normalize::normalize_url;
