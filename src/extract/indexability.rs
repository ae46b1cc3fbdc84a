//! Indexability detection
//!
//! A page is indexable unless a robots or googlebot meta tag carries a
//! `noindex` directive.

use scraper::{Html, Selector};

/// Checks whether the page allows search engine indexing
pub fn is_indexable(document: &Html) -> bool {
    let robots = meta_content(document, "robots").unwrap_or_default();
    let googlebot = meta_content(document, "googlebot").unwrap_or_default();

    !robots.to_lowercase().contains("noindex") && !googlebot.to_lowercase().contains("noindex")
}

/// Returns the robots meta content, or None when the tag is absent
///
/// Absence matters to the noindex audit: a missing tag means the audit
/// abstains, while an empty content attribute means the audit runs and
/// passes.
pub fn robots_meta_content(document: &Html) -> Option<String> {
    meta_content(document, "robots")
}

fn meta_content(document: &Html, name: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"meta[name="{}"]"#, name)).ok()?;

    document
        .select(&selector)
        .next()
        .map(|el| el.value().attr("content").unwrap_or("").to_string())
}
