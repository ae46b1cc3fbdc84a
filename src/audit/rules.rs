//! Individual audit rules
//!
//! Every rule takes the full [`AuditInputs`] and returns `Some(issues)` when
//! it evaluated or `None` when its required signal was absent. Rules never
//! fail; a page with unparseable markup simply audits as an empty document.

use crate::audit::{AuditInputs, IssueSeverity, TechnicalIssue};
use scraper::Selector;

/// Stable issue codes
pub mod codes {
    pub const MISSING_TITLE: &str = "MISSING_TITLE";
    pub const EMPTY_TITLE: &str = "EMPTY_TITLE";
    pub const MISSING_META_DESCRIPTION: &str = "MISSING_META_DESCRIPTION";
    pub const EMPTY_META_DESCRIPTION: &str = "EMPTY_META_DESCRIPTION";
    pub const MULTIPLE_H1_TAGS: &str = "MULTIPLE_H1_TAGS";
    pub const MISSING_CANONICAL: &str = "MISSING_CANONICAL";
    pub const CROSS_DOMAIN_CANONICAL: &str = "CROSS_DOMAIN_CANONICAL";
    pub const INVALID_CANONICAL: &str = "INVALID_CANONICAL";
    pub const BROKEN_LINK_4XX: &str = "BROKEN_LINK_4XX";
    pub const BROKEN_LINK_5XX: &str = "BROKEN_LINK_5XX";
    pub const REDIRECT_CHAIN: &str = "REDIRECT_CHAIN";
    pub const NOINDEX_INTERNAL_PAGE: &str = "NOINDEX_INTERNAL_PAGE";
    pub const NOINDEX_PAGE: &str = "NOINDEX_PAGE";
}

fn issue(
    code: &'static str,
    severity: IssueSeverity,
    message: String,
    inputs: &AuditInputs,
) -> TechnicalIssue {
    TechnicalIssue {
        code,
        severity,
        message,
        page_url: inputs.page_url.to_string(),
    }
}

/// Missing or empty `<title>` — error either way
pub(super) fn audit_title(inputs: &AuditInputs) -> Option<Vec<TechnicalIssue>> {
    let selector = Selector::parse("title").ok()?;
    let mut issues = Vec::new();

    match inputs.document.select(&selector).next() {
        None => issues.push(issue(
            codes::MISSING_TITLE,
            IssueSeverity::Error,
            "Page is missing <title> tag".to_string(),
            inputs,
        )),
        Some(el) => {
            let text = el.text().collect::<String>();
            if text.trim().is_empty() {
                issues.push(issue(
                    codes::EMPTY_TITLE,
                    IssueSeverity::Error,
                    "Page has empty <title> tag".to_string(),
                    inputs,
                ));
            }
        }
    }

    Some(issues)
}

/// Missing meta description tag, or one with empty content — warning
pub(super) fn audit_meta_description(inputs: &AuditInputs) -> Option<Vec<TechnicalIssue>> {
    let selector = Selector::parse(r#"meta[name="description"]"#).ok()?;
    let mut issues = Vec::new();

    match inputs.document.select(&selector).next() {
        None => issues.push(issue(
            codes::MISSING_META_DESCRIPTION,
            IssueSeverity::Warning,
            "Page is missing meta description".to_string(),
            inputs,
        )),
        Some(el) => {
            let content = el.value().attr("content").unwrap_or("").trim();
            if content.is_empty() {
                issues.push(issue(
                    codes::EMPTY_META_DESCRIPTION,
                    IssueSeverity::Warning,
                    "Page has empty meta description content attribute".to_string(),
                    inputs,
                ));
            }
        }
    }

    Some(issues)
}

/// More than one H1 — warning
pub(super) fn audit_h1(inputs: &AuditInputs) -> Option<Vec<TechnicalIssue>> {
    let selector = Selector::parse("h1").ok()?;
    let h1_count = inputs.document.select(&selector).count();
    let mut issues = Vec::new();

    if h1_count > 1 {
        issues.push(issue(
            codes::MULTIPLE_H1_TAGS,
            IssueSeverity::Warning,
            format!("Page has {} H1 tags (should have exactly 1)", h1_count),
            inputs,
        ));
    }

    Some(issues)
}

/// Canonical link: missing (warning), unparseable (error), or pointing at a
/// different hostname (error)
pub(super) fn audit_canonical(inputs: &AuditInputs) -> Option<Vec<TechnicalIssue>> {
    let selector = Selector::parse(r#"link[rel="canonical"]"#).ok()?;
    let mut issues = Vec::new();

    match inputs.document.select(&selector).next() {
        None => issues.push(issue(
            codes::MISSING_CANONICAL,
            IssueSeverity::Warning,
            "Page is missing canonical link".to_string(),
            inputs,
        )),
        Some(el) => {
            // A canonical tag without an href is left alone
            if let Some(href) = el.value().attr("href") {
                match inputs.page_url.join(href) {
                    Ok(canonical_url) => {
                        let same_host =
                            match (canonical_url.host_str(), inputs.page_url.host_str()) {
                                (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
                                _ => false,
                            };
                        if !same_host {
                            issues.push(issue(
                                codes::CROSS_DOMAIN_CANONICAL,
                                IssueSeverity::Error,
                                format!("Canonical points to different domain: {}", canonical_url),
                                inputs,
                            ));
                        }
                    }
                    Err(_) => issues.push(issue(
                        codes::INVALID_CANONICAL,
                        IssueSeverity::Error,
                        format!("Invalid canonical URL: {}", href),
                        inputs,
                    )),
                }
            }
        }
    }

    Some(issues)
}

/// Outgoing links answering 4xx (warning) or 5xx (error)
///
/// Abstains when no link statuses were collected.
pub(super) fn audit_broken_links(inputs: &AuditInputs) -> Option<Vec<TechnicalIssue>> {
    let links = inputs.outgoing_links?;
    let mut issues = Vec::new();

    for link in links {
        if (400..500).contains(&link.status) {
            issues.push(issue(
                codes::BROKEN_LINK_4XX,
                IssueSeverity::Warning,
                format!("Link returns {} status: {}", link.status, link.url),
                inputs,
            ));
        } else if link.status >= 500 {
            issues.push(issue(
                codes::BROKEN_LINK_5XX,
                IssueSeverity::Error,
                format!("Link returns {} status: {}", link.status, link.url),
                inputs,
            ));
        }
    }

    Some(issues)
}

/// Redirect chains longer than one hop; more than two hops escalates to error
///
/// Abstains when no redirect history was collected.
pub(super) fn audit_redirect_chains(inputs: &AuditInputs) -> Option<Vec<TechnicalIssue>> {
    let history = inputs.redirect_history?;
    if history.is_empty() {
        return None;
    }

    let mut issues = Vec::new();
    let chain_length = history.len();

    if chain_length > 1 {
        let severity = if chain_length > 2 {
            IssueSeverity::Error
        } else {
            IssueSeverity::Warning
        };
        let final_url = &history[chain_length - 1].to;

        issues.push(issue(
            codes::REDIRECT_CHAIN,
            severity,
            format!(
                "Redirect chain detected: {} redirects leading to {}",
                chain_length, final_url
            ),
            inputs,
        ));
    }

    Some(issues)
}

/// A noindex directive: error on internal pages, warning otherwise
///
/// Abstains when no robots meta content was collected.
pub(super) fn audit_noindex(inputs: &AuditInputs) -> Option<Vec<TechnicalIssue>> {
    let robots = inputs.robots_meta?;
    let mut issues = Vec::new();

    if robots.to_lowercase().contains("noindex") {
        if inputs.is_internal_page {
            issues.push(issue(
                codes::NOINDEX_INTERNAL_PAGE,
                IssueSeverity::Error,
                "Internal page has noindex directive".to_string(),
                inputs,
            ));
        } else {
            issues.push(issue(
                codes::NOINDEX_PAGE,
                IssueSeverity::Warning,
                "Page has noindex directive".to_string(),
                inputs,
            ));
        }
    }

    Some(issues)
}
