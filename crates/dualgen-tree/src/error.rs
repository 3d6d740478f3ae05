//! Error types for the tree generator.

use dualgen_types::{GenerationError, IssueCode, ValidationReport};

use crate::extract::ExtractError;

/// Errors raised while extracting, building or serializing.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// A pattern failed to compile.
    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// A line could not be placed by the extraction patterns.
    #[error("line {}: {}", .0.line, .0.message)]
    Extract(ExtractError),

    /// Writing text failed.
    #[error("format error: {0}")]
    Format(#[from] std::fmt::Error),

    /// A string literal could not be encoded.
    #[error("string encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

impl From<TreeError> for GenerationError {
    fn from(err: TreeError) -> Self {
        match err {
            TreeError::Extract(e) => {
                let mut report = ValidationReport::new();
                report.error(IssueCode::Syntax, format!("line {}", e.line), e.message);
                GenerationError::ConfigurationInvalid(report)
            }
            other => GenerationError::internal("tree", other.to_string()),
        }
    }
}

/// Convenience alias for tree results.
pub type TreeResult<T> = Result<T, TreeError>;
