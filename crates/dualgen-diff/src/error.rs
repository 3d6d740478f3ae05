//! Error types for the diff crate.

/// Errors that can occur while comparing bundles.
///
/// Differences between bundles are never errors; they are reported as
/// mismatches.
#[derive(Debug, thiserror::Error)]
pub enum DiffError {
    /// The export-name pattern failed to compile.
    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
