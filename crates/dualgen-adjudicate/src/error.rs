//! Error types for the adjudicator.

use dualgen_diff::DiffError;

use crate::lexer::LexError;

/// Errors returned to the caller.
///
/// Differences between bundles are never errors; neither are internal faults,
/// which surface as an `ERROR` verdict instead.
#[derive(Debug, thiserror::Error)]
pub enum AdjudicationError {
    /// A bundle argument was not supplied.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Convenience alias for adjudication results.
pub type AdjudicationResult<T> = Result<T, AdjudicationError>;

/// A fault inside the comparison. Reported through the verdict, never as
/// a match.
#[derive(Debug, thiserror::Error)]
pub enum AdjudicationFault {
    /// A generated file is not valid TypeScript at the token level, such as
    /// an unterminated string. This is a problem with the bundle content, not
    /// with the adjudicator, but it still yields `ERROR`: with no token
    /// stream there is nothing to compare, so neither `MATCH` nor `MISMATCH`
    /// can be justified.
    #[error("{path} ({side}) cannot be tokenized: {source}")]
    Lex {
        path: String,
        side: &'static str,
        #[source]
        source: LexError,
    },

    #[error(transparent)]
    Diff(#[from] DiffError),
}
