//! Mismatches, summaries and verdict labels.

use std::fmt;

use serde::{Deserialize, Serialize};

/// How serious a mismatch is.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    Major,
    Minor,
    Info,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Major => "major",
            Self::Minor => "minor",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What kind of difference was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiffType {
    MissingFile,
    ExtraFile,
    HashMismatch,
    ContentDiff,
    MetadataDiff,
    EquivalentVariant,
    IdentifierRename,
    UnverifiedBehavior,
    SemanticDiff,
}

impl DiffType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingFile => "MISSING_FILE",
            Self::ExtraFile => "EXTRA_FILE",
            Self::HashMismatch => "HASH_MISMATCH",
            Self::ContentDiff => "CONTENT_DIFF",
            Self::MetadataDiff => "METADATA_DIFF",
            Self::EquivalentVariant => "EQUIVALENT_VARIANT",
            Self::IdentifierRename => "IDENTIFIER_RENAME",
            Self::UnverifiedBehavior => "UNVERIFIED_BEHAVIOR",
            Self::SemanticDiff => "SEMANTIC_DIFF",
        }
    }
}

impl fmt::Display for DiffType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First differing line on each side (1-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub left_line: usize,
    pub right_line: usize,
}

/// The differing text on each side.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Excerpt {
    pub before: String,
    pub after: String,
}

impl Excerpt {
    /// Cap both sides at `limit` characters.
    pub fn truncated(mut self, limit: usize) -> Self {
        self.before = truncate(&self.before, limit);
        self.after = truncate(&self.after, limit);
        self
    }
}

fn truncate(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

/// One difference between two bundles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mismatch {
    /// File path, or `None` for bundle-level findings.
    pub path: Option<String>,
    pub diff_type: DiffType,
    pub severity: Severity,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<Excerpt>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Mismatch {
    pub fn new(
        path: Option<&str>,
        diff_type: DiffType,
        severity: Severity,
        description: impl Into<String>,
    ) -> Self {
        Self {
            path: path.map(str::to_string),
            diff_type,
            severity,
            description: description.into(),
            excerpt: None,
            location: None,
        }
    }

    pub fn with_excerpt(mut self, excerpt: Option<Excerpt>) -> Self {
        self.excerpt = excerpt;
        self
    }

    pub fn with_location(mut self, location: Option<Location>) -> Self {
        self.location = location;
        self
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.diff_type)?;
        if let Some(path) = &self.path {
            write!(f, " {path}")?;
        }
        write!(f, ": {}", self.description)
    }
}

/// Per-severity counts plus the two match flags.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffSummary {
    pub total: usize,
    pub critical: usize,
    pub major: usize,
    pub minor: usize,
    pub info: usize,
    /// Both bundles hold the same set of paths.
    pub files_match: bool,
    /// The aggregate bundle hashes are equal.
    pub hash_match: bool,
}

impl DiffSummary {
    /// Count severities. The flags are left `false`.
    pub fn count(mismatches: &[Mismatch]) -> Self {
        let mut summary = Self {
            total: mismatches.len(),
            ..Self::default()
        };
        for m in mismatches {
            match m.severity {
                Severity::Critical => summary.critical += 1,
                Severity::Major => summary.major += 1,
                Severity::Minor => summary.minor += 1,
                Severity::Info => summary.info += 1,
            }
        }
        summary
    }
}

/// Outcome label shared by diff reports and adjudication verdicts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VerdictLabel {
    Match,
    PartialMatch,
    Mismatch,
    Error,
    Inconclusive,
}

impl VerdictLabel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Match => "MATCH",
            Self::PartialMatch => "PARTIAL_MATCH",
            Self::Mismatch => "MISMATCH",
            Self::Error => "ERROR",
            Self::Inconclusive => "INCONCLUSIVE",
        }
    }
}

impl fmt::Display for VerdictLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mismatches between two bundles, their summary and derived verdict.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffReport {
    pub left_generator: String,
    pub right_generator: String,
    pub mismatches: Vec<Mismatch>,
    pub summary: DiffSummary,
    pub verdict: VerdictLabel,
}

/// MATCH without critical or major mismatches, MISMATCH with any critical
/// one, PARTIAL_MATCH otherwise.
pub fn derive_verdict(summary: &DiffSummary) -> VerdictLabel {
    if summary.critical > 0 {
        VerdictLabel::Mismatch
    } else if summary.major > 0 {
        VerdictLabel::PartialMatch
    } else {
        VerdictLabel::Match
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(severity: Severity) -> Mismatch {
        Mismatch::new(Some("a.ts"), DiffType::ContentDiff, severity, "x")
    }

    #[test]
    fn verdict_from_counts() {
        let summary = DiffSummary::count(&[]);
        assert_eq!(derive_verdict(&summary), VerdictLabel::Match);

        let summary = DiffSummary::count(&[m(Severity::Minor), m(Severity::Info)]);
        assert_eq!(derive_verdict(&summary), VerdictLabel::Match);

        let summary = DiffSummary::count(&[m(Severity::Major), m(Severity::Minor)]);
        assert_eq!(derive_verdict(&summary), VerdictLabel::PartialMatch);

        let summary = DiffSummary::count(&[m(Severity::Major), m(Severity::Critical)]);
        assert_eq!(derive_verdict(&summary), VerdictLabel::Mismatch);
    }

    #[test]
    fn counts_by_severity() {
        let summary = DiffSummary::count(&[m(Severity::Major), m(Severity::Major), m(Severity::Info)]);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.major, 2);
        assert_eq!(summary.info, 1);
        assert_eq!(summary.critical, 0);
    }

    #[test]
    fn excerpt_truncation_respects_chars() {
        let excerpt = Excerpt {
            before: "ééééé".into(),
            after: "ab".into(),
        }
        .truncated(3);
        assert_eq!(excerpt.before, "ééé…");
        assert_eq!(excerpt.after, "ab");
    }

    #[test]
    fn wire_names() {
        assert_eq!(
            serde_json::to_string(&DiffType::HashMismatch).unwrap(),
            "\"HASH_MISMATCH\""
        );
        assert_eq!(
            serde_json::to_string(&VerdictLabel::PartialMatch).unwrap(),
            "\"PARTIAL_MATCH\""
        );
        assert_eq!(serde_json::to_string(&Severity::Critical).unwrap(), "\"critical\"");
    }

    #[test]
    fn display_reads_well() {
        let text = m(Severity::Major).to_string();
        assert_eq!(text, "[major] CONTENT_DIFF a.ts: x");
    }
}
