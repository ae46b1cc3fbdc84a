//! Technical score computation
//!
//! Start at 100, subtract 10 per error and 5 per warning, clamp to [0, 100].
//! The per-code breakdown groups deductions by issue code in first-seen
//! order so reports stay deterministic.

use crate::audit::{IssueSeverity, TechnicalIssue};
use crate::score::{clamp_score, ERROR_DEDUCTION, STARTING_SCORE, WARNING_DEDUCTION};
use serde::Serialize;

/// Deductions grouped by issue code
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssueCodeBreakdown {
    pub code: &'static str,
    pub count: u32,
    pub points_deducted: u32,
}

/// Technical score plus its per-code breakdown
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechnicalScoreResult {
    pub technical_score: u32,
    pub breakdown: Vec<IssueCodeBreakdown>,
}

fn deduction_for(severity: IssueSeverity) -> i32 {
    match severity {
        IssueSeverity::Error => ERROR_DEDUCTION,
        IssueSeverity::Warning => WARNING_DEDUCTION,
    }
}

/// Scores a page from its technical issues
pub fn technical_score(issues: &[TechnicalIssue]) -> TechnicalScoreResult {
    let mut score = STARTING_SCORE;
    let mut breakdown: Vec<IssueCodeBreakdown> = Vec::new();

    for issue in issues {
        let deduction = deduction_for(issue.severity);
        score -= deduction;

        match breakdown.iter_mut().find(|b| b.code == issue.code) {
            Some(entry) => {
                entry.count += 1;
                entry.points_deducted += deduction as u32;
            }
            None => breakdown.push(IssueCodeBreakdown {
                code: issue.code,
                count: 1,
                points_deducted: deduction as u32,
            }),
        }
    }

    TechnicalScoreResult {
        technical_score: clamp_score(score),
        breakdown,
    }
}
