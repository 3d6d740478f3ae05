use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dualgen_diff::{DiffSummary, DiffType, Mismatch, Severity, VerdictLabel};

/// The adjudication result.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub verdict: VerdictLabel,
    /// In `[0, 1]`.
    pub confidence: f64,
    pub semantically_equivalent: bool,
    pub diffs: Vec<Mismatch>,
    /// One human-readable line.
    pub summary: String,
    pub timestamp: DateTime<Utc>,
}

impl Verdict {
    /// Derive label, equivalence and confidence from the diffs.
    ///
    /// | diffs                                   | verdict       | eq.   | conf. |
    /// |-----------------------------------------|---------------|-------|-------|
    /// | none                                    | MATCH         | true  | 1.0   |
    /// | any critical                            | MISMATCH      | false | 0.95  |
    /// | majors, all of them unverified behavior | INCONCLUSIVE  | false | 0.5   |
    /// | any other major                         | PARTIAL_MATCH | false | 0.8   |
    /// | minor or info only                      | MATCH         | true  | 0.9   |
    pub fn from_diffs(diffs: Vec<Mismatch>) -> Self {
        let counts = DiffSummary::count(&diffs);
        let unverified_only = diffs
            .iter()
            .filter(|d| d.severity == Severity::Major)
            .all(|d| d.diff_type == DiffType::UnverifiedBehavior);
        let (verdict, semantically_equivalent, confidence) = if diffs.is_empty() {
            (VerdictLabel::Match, true, 1.0)
        } else if counts.critical > 0 {
            (VerdictLabel::Mismatch, false, 0.95)
        } else if counts.major > 0 && unverified_only {
            (VerdictLabel::Inconclusive, false, 0.5)
        } else if counts.major > 0 {
            (VerdictLabel::PartialMatch, false, 0.8)
        } else {
            (VerdictLabel::Match, true, 0.9)
        };
        let summary = format!(
            "{verdict}: {} difference(s) ({} critical, {} major, {} minor, {} info)",
            counts.total, counts.critical, counts.major, counts.minor, counts.info
        );
        Self {
            verdict,
            confidence,
            semantically_equivalent,
            diffs,
            summary,
            timestamp: Utc::now(),
        }
    }

    /// An internal fault. Never equivalent, zero confidence.
    pub fn error(message: impl Into<String>, diffs: Vec<Mismatch>) -> Self {
        Self {
            verdict: VerdictLabel::Error,
            confidence: 0.0,
            semantically_equivalent: false,
            diffs,
            summary: format!("ERROR: {}", message.into()),
            timestamp: Utc::now(),
        }
    }
}
