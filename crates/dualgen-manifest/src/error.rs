//! Error types for the manifest crate.

use std::path::PathBuf;

use dualgen_types::{GenerationError, IssueCode, TypeError, ValidationReport};

/// Errors that can occur while loading a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// The manifest file is missing or unreadable.
    #[error("manifest not found at {path}: {source}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The text does not follow the document structure.
    #[error("syntax error on line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// The document parsed but failed validation.
    #[error("manifest invalid: {} error(s), {} warning(s)", .0.errors.len(), .0.warnings.len())]
    Invalid(ValidationReport),

    /// Hashing the configuration failed.
    #[error("hash error: {0}")]
    Hash(#[from] TypeError),
}

impl ManifestError {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }
}

impl From<ManifestError> for GenerationError {
    fn from(err: ManifestError) -> Self {
        match err {
            ManifestError::NotFound { path, source } => GenerationError::ConfigurationNotFound {
                path,
                reason: source.to_string(),
            },
            ManifestError::Invalid(report) => GenerationError::ConfigurationInvalid(report),
            ManifestError::Syntax { line, message } => {
                let mut report = ValidationReport::new();
                report.error(IssueCode::Syntax, format!("line {line}"), message);
                GenerationError::ConfigurationInvalid(report)
            }
            ManifestError::Hash(e) => GenerationError::internal("manifest", e.to_string()),
        }
    }
}

/// Convenience alias for manifest results.
pub type ManifestResult<T> = Result<T, ManifestError>;
