//! Candidate link extraction
//!
//! Pulls follow-candidate hyperlinks and the page title out of a parsed
//! document. Domain filtering happens later in the orchestrator; this module
//! only rejects links that can never be crawled.

use scraper::{Html, Selector};
use url::Url;

/// Extracts all followable links from a document as absolute URLs
///
/// **Excluded:**
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links (same page anchors)
/// - `<a href="..." download>` links
/// - Anything that fails to resolve against the base URL
///
/// Malformed hrefs are silently dropped; a bad link on a page is not an
/// error condition for the crawl.
pub fn extract_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Extracts the page title from the document
pub fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded.
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let lower = href.to_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url)
            } else {
                None
            }
        }
        Err(_) => None,
    }
}
