//! Markdown report generation
//!
//! Renders one job's results as a markdown document: site scores, issue
//! frequencies, and a per-page table with the lowest-scoring pages called
//! out.

use crate::crawler::PageResult;
use crate::job::JobRecord;
use crate::score::{site_alt_coverage_percent, site_score, site_seo_averages, site_speed};
use crate::Result;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes the markdown report to a file
pub fn write_markdown_report(
    record: &JobRecord,
    pages: &[PageResult],
    output_path: &Path,
) -> Result<()> {
    let markdown = format_site_report(record, pages);

    let mut file = File::create(output_path)?;
    file.write_all(markdown.as_bytes())?;

    Ok(())
}

/// Formats a full crawl report as markdown
pub fn format_site_report(record: &JobRecord, pages: &[PageResult]) -> String {
    let mut md = String::new();

    md.push_str("# SiteGauge Crawl Report\n\n");

    md.push_str("## Job\n\n");
    md.push_str(&format!("- **Job ID**: {}\n", record.job_id));
    md.push_str(&format!("- **Seed URL**: {}\n", record.seed_url));
    md.push_str(&format!("- **Max depth**: {}\n", record.max_depth));
    md.push_str(&format!("- **Max pages**: {}\n", record.max_pages));
    md.push_str(&format!("- **State**: {:?}\n", record.state));
    if let Some(error) = &record.error {
        md.push_str(&format!("- **Error**: {}\n", error));
    }
    md.push('\n');

    let score = site_score(pages);
    let averages = site_seo_averages(pages);

    md.push_str("## Site Health\n\n");
    md.push_str(&format!("- **Site score**: {}/100\n", score.site_score));
    md.push_str(&format!(
        "- **Issues**: {} ({} errors, {} warnings)\n",
        score.total_issues, score.errors_count, score.warnings_count
    ));
    if averages.pages_scored > 0 {
        md.push_str(&format!(
            "- **Averages**: technical {}, content {}, overall {}\n",
            averages.average_technical_score,
            averages.average_content_score,
            averages.average_overall_score
        ));
    }
    match site_alt_coverage_percent(pages) {
        Some(coverage) => {
            md.push_str(&format!("- **Image alt coverage**: {:.1}%\n", coverage));
        }
        None => md.push_str("- **Image alt coverage**: n/a (no images found)\n"),
    }
    md.push('\n');

    let speed = site_speed(pages);
    if speed.pages_with_speed_data > 0 {
        md.push_str("## Speed\n\n");
        md.push_str(&format!(
            "Averages over {} measured pages:\n\n",
            speed.pages_with_speed_data
        ));
        md.push_str(&format!("- **TTFB**: {} ms\n", speed.average_ttfb_ms));
        md.push_str(&format!("- **DOM load**: {} ms\n", speed.average_dom_load_ms));
        md.push_str(&format!(
            "- **Total load**: {} ms\n",
            speed.average_total_load_ms
        ));
        md.push('\n');
    }

    let issue_counts = issue_counts_by_code(pages);
    if !issue_counts.is_empty() {
        md.push_str("## Issues by Code\n\n");
        md.push_str("| Code | Count |\n");
        md.push_str("|------|-------|\n");
        for (code, count) in &issue_counts {
            md.push_str(&format!("| {} | {} |\n", code, count));
        }
        md.push('\n');
    }

    if !pages.is_empty() {
        md.push_str("## Pages\n\n");
        md.push_str("| URL | Depth | Status | Overall | Technical | Content | Issues |\n");
        md.push_str("|-----|-------|--------|---------|-----------|---------|--------|\n");
        for page in pages {
            let (overall, technical, content) = match &page.score_breakdown {
                Some(b) => (
                    b.overall_score.to_string(),
                    b.technical_score.to_string(),
                    b.content_score.to_string(),
                ),
                None => ("-".to_string(), "-".to_string(), "-".to_string()),
            };
            md.push_str(&format!(
                "| {} | {} | {} | {} | {} | {} | {} |\n",
                page.url,
                page.depth,
                page.status,
                overall,
                technical,
                content,
                page.issues.len()
            ));
        }
        md.push('\n');
    }

    let worst = worst_pages(pages, 5);
    if !worst.is_empty() {
        md.push_str("## Lowest Scoring Pages\n\n");
        for page in worst {
            let overall = page
                .score_breakdown
                .map(|b| b.overall_score.to_string())
                .unwrap_or_else(|| "-".to_string());
            md.push_str(&format!("- **{}** (overall {})\n", page.url, overall));
            for issue in &page.issues {
                md.push_str(&format!("  - `{}`: {}\n", issue.code, issue.message));
            }
        }
        md.push('\n');
    }

    md
}

/// Aggregates issue counts by code across all pages, sorted by code
fn issue_counts_by_code(pages: &[PageResult]) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();

    for page in pages {
        for issue in &page.issues {
            *counts.entry(issue.code).or_insert(0) += 1;
        }
    }

    counts
}

/// The `limit` pages with the lowest overall scores, worst first
fn worst_pages(pages: &[PageResult], limit: usize) -> Vec<&PageResult> {
    let mut scored: Vec<&PageResult> = pages
        .iter()
        .filter(|page| page.score_breakdown.is_some())
        .collect();

    scored.sort_by_key(|page| page.score_breakdown.map(|b| b.overall_score).unwrap_or(0));
    scored.truncate(limit);
    scored
}
