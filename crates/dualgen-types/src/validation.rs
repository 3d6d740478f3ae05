use std::fmt;

use serde::{Deserialize, Serialize};

/// Result of validating a configuration document.
///
/// Errors block generation; warnings never do. Both lists are always
/// returned in full so a caller can show everything at once.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<ValidationIssue>,
}

impl ValidationReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no errors were recorded. Warnings do not count.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Record a blocking error.
    pub fn error(&mut self, code: IssueCode, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ValidationIssue::new(code, field, message));
    }

    /// Record a non-blocking warning.
    pub fn warn(&mut self, code: IssueCode, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ValidationIssue::new(code, field, message));
    }

    /// Returns `true` if any error or warning carries `code`.
    pub fn has_code(&self, code: IssueCode) -> bool {
        self.errors
            .iter()
            .chain(self.warnings.iter())
            .any(|issue| issue.code == code)
    }
}

/// A single validation finding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub code: IssueCode,
    /// Dotted path of the offending field, e.g. `thresholds.low`.
    pub field: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(code: IssueCode, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.field, self.message)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    MissingVersion,
    MissingProjectName,
    InvalidThresholds,
    WeightSum,
    InvalidApprovalThreshold,
    ScoreOutOfRange,
    UnknownRequiredLevel,
    EmptyValidationLevels,
    FieldType,
    Syntax,
}

impl IssueCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingVersion => "MISSING_VERSION",
            Self::MissingProjectName => "MISSING_PROJECT_NAME",
            Self::InvalidThresholds => "INVALID_THRESHOLDS",
            Self::WeightSum => "WEIGHT_SUM",
            Self::InvalidApprovalThreshold => "INVALID_APPROVAL_THRESHOLD",
            Self::ScoreOutOfRange => "SCORE_OUT_OF_RANGE",
            Self::UnknownRequiredLevel => "UNKNOWN_REQUIRED_LEVEL",
            Self::EmptyValidationLevels => "EMPTY_VALIDATION_LEVELS",
            Self::FieldType => "FIELD_TYPE",
            Self::Syntax => "SYNTAX",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
