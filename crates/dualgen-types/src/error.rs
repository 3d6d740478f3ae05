use std::path::PathBuf;

use thiserror::Error;

use crate::validation::ValidationReport;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid hex string: {0}")]
    InvalidHex(String),

    #[error("invalid byte length: expected {expected}, got {actual}")]
    InvalidLength { expected: usize, actual: usize },

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Errors a generator can return instead of a bundle.
///
/// A generator either returns a complete bundle or one of these; it never
/// returns a partial bundle.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The configuration file is missing or unreadable.
    #[error("configuration not found at {path}: {reason}")]
    ConfigurationNotFound { path: PathBuf, reason: String },

    /// The configuration parsed but failed validation.
    #[error("configuration invalid: {} error(s), {} warning(s)", .0.errors.len(), .0.warnings.len())]
    ConfigurationInvalid(ValidationReport),

    /// An unexpected fault while reading or rendering.
    #[error("generation failed in {stage}: {message}")]
    Internal { stage: String, message: String },
}

impl GenerationError {
    /// Create an internal error with a stage name and message.
    pub fn internal(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Internal {
            stage: stage.into(),
            message: message.into(),
        }
    }

    /// The validation report, if this is a validation failure.
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            Self::ConfigurationInvalid(report) => Some(report),
            _ => None,
        }
    }
}

impl From<TypeError> for GenerationError {
    fn from(err: TypeError) -> Self {
        Self::internal("hashing", err.to_string())
    }
}

/// Convenience alias for generator results.
pub type GenerationResult<T> = Result<T, GenerationError>;
