//! Diff Builder for dualgen.
//!
//! Compares two generation bundles file by file and reports every difference
//! as a [`Mismatch`] with a severity. The comparison is purely structural:
//! content hashes, line counts, exported names and bundle metadata. Deciding
//! whether a difference matters is left to the adjudicator.
//!
//! # Key Types
//!
//! - [`DiffReport`] / [`DiffSummary`] -- Mismatches with per-severity counts
//! - [`Mismatch`] / [`DiffType`] / [`Severity`] -- One classified difference
//! - [`LineDiff`] / [`DiffHunk`] / [`DiffLine`] -- Line-level file diff
//! - [`VerdictLabel`] -- Outcome label derived from a summary

pub mod builder;
pub mod error;
pub mod exports;
pub mod line_diff;
pub mod model;

pub use builder::{build_diff, compare_file_sets, compare_metadata, summarize, EXCERPT_LIMIT};
pub use error::{DiffError, DiffResult};
pub use exports::ExportScanner;
pub use line_diff::{diff_lines, DiffHunk, DiffLine, LineDiff};
pub use model::{
    derive_verdict, DiffReport, DiffSummary, DiffType, Excerpt, Location, Mismatch, Severity,
    VerdictLabel,
};
