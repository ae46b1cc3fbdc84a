//! Report generation
//!
//! Human-facing views over a finished job's immutable result set: a stdout
//! summary and a markdown report. Both are pure functions of the job record
//! and its page results.

mod markdown;

pub use markdown::{format_site_report, write_markdown_report};

use crate::crawler::PageResult;
use crate::job::JobRecord;
use crate::score::{site_alt_coverage_percent, site_score, site_seo_averages, site_speed};

/// Prints a crawl summary to stdout
pub fn print_summary(record: &JobRecord, pages: &[PageResult]) {
    let score = site_score(pages);
    let averages = site_seo_averages(pages);
    let speed = site_speed(pages);

    println!("=== Crawl Summary ===\n");

    println!("Job: {}", record.job_id);
    println!("Seed: {}", record.seed_url);
    println!("State: {:?}", record.state);
    if let Some(error) = &record.error {
        println!("Error: {}", error);
    }
    println!();

    println!("Pages crawled: {}", pages.len());
    println!(
        "Render fallback used: {}",
        pages.iter().filter(|p| p.used_render_fallback).count()
    );
    println!();

    println!("Site score: {}/100", score.site_score);
    println!(
        "Issues: {} total ({} errors, {} warnings)",
        score.total_issues, score.errors_count, score.warnings_count
    );
    println!();

    if averages.pages_scored > 0 {
        println!("Average technical score: {}", averages.average_technical_score);
        println!("Average content score: {}", averages.average_content_score);
        println!("Average overall score: {}", averages.average_overall_score);
    }

    match site_alt_coverage_percent(pages) {
        Some(coverage) => println!("Image alt coverage: {:.1}%", coverage),
        None => println!("Image alt coverage: n/a (no images found)"),
    }

    if speed.pages_with_speed_data > 0 {
        println!();
        println!(
            "Speed (avg over {} measured pages): TTFB {}ms, DOM {}ms, total {}ms",
            speed.pages_with_speed_data,
            speed.average_ttfb_ms,
            speed.average_dom_load_ms,
            speed.average_total_load_ms
        );
    }
}
