//! Site-level aggregation
//!
//! All summaries are recomputed on demand from the immutable page result
//! set; nothing is accumulated incrementally. Pages missing an optional
//! signal are excluded from that average's denominator, never counted as
//! zero.

use crate::audit::IssueSeverity;
use crate::crawler::PageResult;
use serde::Serialize;

/// Site-wide SEO health summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteScoreSummary {
    /// `round(mean of per-page seo score)`, 0 for an empty site
    pub site_score: u32,

    pub total_issues: usize,
    pub errors_count: usize,
    pub warnings_count: usize,
}

/// Averages of the per-page score breakdowns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteSeoAverages {
    pub average_technical_score: u32,
    pub average_content_score: u32,
    pub average_overall_score: u32,

    /// Pages that carried a score breakdown
    pub pages_scored: usize,
}

/// Averages of the collected page speed timings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SiteSpeedSummary {
    pub average_ttfb_ms: u64,
    pub average_dom_load_ms: u64,
    pub average_total_load_ms: u64,

    /// Pages that carried any nonzero speed timing
    pub pages_with_speed_data: usize,
}

fn round_mean(sum: u64, count: usize) -> u64 {
    (sum as f64 / count as f64).round() as u64
}

/// Aggregates the per-page seo scores and issue counts for one job
pub fn site_score(pages: &[PageResult]) -> SiteScoreSummary {
    if pages.is_empty() {
        return SiteScoreSummary {
            site_score: 0,
            total_issues: 0,
            errors_count: 0,
            warnings_count: 0,
        };
    }

    let mut total_score: u64 = 0;
    let mut total_issues = 0;
    let mut errors_count = 0;
    let mut warnings_count = 0;

    for page in pages {
        total_score += page.seo_score as u64;
        total_issues += page.issues.len();

        for issue in &page.issues {
            match issue.severity {
                IssueSeverity::Error => errors_count += 1,
                IssueSeverity::Warning => warnings_count += 1,
            }
        }
    }

    SiteScoreSummary {
        site_score: round_mean(total_score, pages.len()) as u32,
        total_issues,
        errors_count,
        warnings_count,
    }
}

/// Averages technical/content/overall scores over pages with a breakdown
pub fn site_seo_averages(pages: &[PageResult]) -> SiteSeoAverages {
    let scored: Vec<_> = pages
        .iter()
        .filter_map(|page| page.score_breakdown.as_ref())
        .collect();

    if scored.is_empty() {
        return SiteSeoAverages {
            average_technical_score: 0,
            average_content_score: 0,
            average_overall_score: 0,
            pages_scored: 0,
        };
    }

    let count = scored.len();
    let technical: u64 = scored.iter().map(|b| b.technical_score as u64).sum();
    let content: u64 = scored.iter().map(|b| b.content_score as u64).sum();
    let overall: u64 = scored.iter().map(|b| b.overall_score as u64).sum();

    SiteSeoAverages {
        average_technical_score: round_mean(technical, count) as u32,
        average_content_score: round_mean(content, count) as u32,
        average_overall_score: round_mean(overall, count) as u32,
        pages_scored: count,
    }
}

/// Averages speed timings over pages that collected any
pub fn site_speed(pages: &[PageResult]) -> SiteSpeedSummary {
    let with_speed: Vec<_> = pages
        .iter()
        .filter_map(|page| page.speed.as_ref())
        .filter(|s| s.ttfb_ms > 0 || s.dom_load_ms > 0 || s.total_load_ms > 0)
        .collect();

    if with_speed.is_empty() {
        return SiteSpeedSummary {
            average_ttfb_ms: 0,
            average_dom_load_ms: 0,
            average_total_load_ms: 0,
            pages_with_speed_data: 0,
        };
    }

    let count = with_speed.len();
    let ttfb: u64 = with_speed.iter().map(|s| s.ttfb_ms).sum();
    let dom: u64 = with_speed.iter().map(|s| s.dom_load_ms).sum();
    let total: u64 = with_speed.iter().map(|s| s.total_load_ms).sum();

    SiteSpeedSummary {
        average_ttfb_ms: round_mean(ttfb, count),
        average_dom_load_ms: round_mean(dom, count),
        average_total_load_ms: round_mean(total, count),
        pages_with_speed_data: count,
    }
}

/// Site-wide image alt coverage, `None` when no page had images
pub fn site_alt_coverage_percent(pages: &[PageResult]) -> Option<f64> {
    let mut with_alt = 0usize;
    let mut without_alt = 0usize;

    for page in pages {
        if let Some(metrics) = &page.seo_metrics {
            with_alt += metrics.images_with_alt;
            without_alt += metrics.images_without_alt;
        }
    }

    let total = with_alt + without_alt;
    if total == 0 {
        None
    } else {
        Some(with_alt as f64 / total as f64 * 100.0)
    }
}
