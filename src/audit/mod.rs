//! Technical audit engine
//!
//! Runs a fixed, ordered table of independent rule checks against a parsed
//! page and its crawl-time signals. Each rule is pure: given the same inputs
//! it produces the same issues. Rules whose optional input is absent abstain
//! entirely; an abstained rule earns no pass credit.

mod rules;

pub use rules::codes;

use crate::fetch::RedirectHop;
use scraper::Html;
use serde::Serialize;
use url::Url;

/// Severity of a technical issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Error,
    Warning,
}

/// A single audit finding against one page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TechnicalIssue {
    /// Stable identifier, e.g. `MISSING_TITLE`
    pub code: &'static str,

    pub severity: IssueSeverity,

    /// Human-readable description
    pub message: String,

    /// URL of the audited page
    pub page_url: String,
}

/// Known HTTP status of one outgoing link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkStatus {
    pub url: String,
    pub status: u16,
}

/// Everything the audit rules may look at for one page
///
/// `outgoing_links`, `redirect_history` and `robots_meta` are out-of-band
/// signals the orchestrator may or may not have; `None` makes the dependent
/// rule abstain.
pub struct AuditInputs<'a> {
    pub page_url: &'a Url,
    pub document: &'a Html,
    pub outgoing_links: Option<&'a [LinkStatus]>,
    pub redirect_history: Option<&'a [RedirectHop]>,
    pub robots_meta: Option<&'a str>,
    pub is_internal_page: bool,
}

/// Issues found plus the labels of checks that ran clean
#[derive(Debug, Clone, Default)]
pub struct AuditOutcome {
    pub issues: Vec<TechnicalIssue>,
    pub passed_checks: Vec<&'static str>,
}

/// One entry of the audit rule table
///
/// `run` returns `None` when the rule abstained (missing optional input) and
/// `Some(issues)` when it evaluated.
struct AuditCheck {
    label: &'static str,
    run: fn(&AuditInputs) -> Option<Vec<TechnicalIssue>>,
}

/// The fixed rule table, evaluated in order
static AUDIT_CHECKS: &[AuditCheck] = &[
    AuditCheck {
        label: "title",
        run: rules::audit_title,
    },
    AuditCheck {
        label: "meta-description",
        run: rules::audit_meta_description,
    },
    AuditCheck {
        label: "h1",
        run: rules::audit_h1,
    },
    AuditCheck {
        label: "canonical",
        run: rules::audit_canonical,
    },
    AuditCheck {
        label: "broken-links",
        run: rules::audit_broken_links,
    },
    AuditCheck {
        label: "redirect-chains",
        run: rules::audit_redirect_chains,
    },
    AuditCheck {
        label: "noindex",
        run: rules::audit_noindex,
    },
];

/// Runs every audit rule against one page
///
/// A rule earns pass credit only when it ran and contributed zero issues.
pub fn run_audits(inputs: &AuditInputs) -> AuditOutcome {
    let mut outcome = AuditOutcome::default();

    for check in AUDIT_CHECKS {
        match (check.run)(inputs) {
            Some(issues) if issues.is_empty() => outcome.passed_checks.push(check.label),
            Some(issues) => outcome.issues.extend(issues),
            None => {}
        }
    }

    outcome
}
