//! Content score computation
//!
//! A fixed, ordered rule table over the page's structural metrics. Every
//! rule is evaluated independently; there is no short-circuiting, so the
//! same metrics always produce the same deduction list.

use crate::audit::IssueSeverity;
use crate::extract::PageSeoMetrics;
use crate::score::{clamp_score, ScoreDeduction, STARTING_SCORE};

/// Optimal title length range, in characters
const TITLE_LENGTH_RANGE: (usize, usize) = (30, 65);

/// Minimum word count before a page counts as thin content
const THIN_CONTENT_WORDS: usize = 300;

/// Minimum acceptable image alt-text coverage, in percent
const MIN_ALT_COVERAGE_PERCENT: f64 = 80.0;

/// One content scoring rule
pub struct ContentScoreRule {
    pub reason: &'static str,
    pub deduction: u32,
    pub check: fn(&PageSeoMetrics) -> bool,
}

/// The fixed content rule table, evaluated in order
pub static CONTENT_SCORE_RULES: &[ContentScoreRule] = &[
    ContentScoreRule {
        reason: "Missing title tag",
        deduction: 10,
        check: |m| m.title_length == 0,
    },
    ContentScoreRule {
        reason: "Title length not optimal (should be 30-65 characters)",
        deduction: 5,
        check: |m| {
            m.title_length > 0
                && (m.title_length < TITLE_LENGTH_RANGE.0 || m.title_length > TITLE_LENGTH_RANGE.1)
        },
    },
    ContentScoreRule {
        reason: "Missing meta description",
        deduction: 5,
        check: |m| m.meta_description_length == 0,
    },
    ContentScoreRule {
        reason: "Word count below 300 (thin content)",
        deduction: 10,
        check: |m| m.word_count < THIN_CONTENT_WORDS,
    },
    ContentScoreRule {
        reason: "Multiple H1 tags found (should have only one)",
        deduction: 5,
        check: |m| m.h1_count > 1,
    },
    ContentScoreRule {
        reason: "Image alt text coverage below 80%",
        deduction: 5,
        check: |m| match m.alt_coverage_percent() {
            Some(coverage) => coverage < MIN_ALT_COVERAGE_PERCENT,
            None => false,
        },
    },
];

/// Content score plus the deductions that produced it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentScoreResult {
    pub content_score: u32,
    pub deductions: Vec<ScoreDeduction>,
}

/// Scores a page's content quality from its structural metrics
pub fn content_score(metrics: &PageSeoMetrics) -> ContentScoreResult {
    let mut score = STARTING_SCORE;
    let mut deductions = Vec::new();

    for rule in CONTENT_SCORE_RULES {
        if (rule.check)(metrics) {
            score -= rule.deduction as i32;

            deductions.push(ScoreDeduction {
                reason: rule.reason.to_string(),
                severity: if rule.deduction >= 10 {
                    IssueSeverity::Error
                } else {
                    IssueSeverity::Warning
                },
                points_deducted: rule.deduction,
            });
        }
    }

    ContentScoreResult {
        content_score: clamp_score(score),
        deductions,
    }
}
