//! Adjudicator for dualgen.
//!
//! Decides whether two generation bundles mean the same thing. File-set and
//! metadata findings come from the diff builder; every shared file whose
//! content differs is normalized according to [`ComparisonOptions`] and then
//! walked up an equivalence ladder. Differences the ladder cannot explain are
//! classified as renames, unverifiable behavior changes or semantic
//! differences, and the diffs are folded into a [`Verdict`] with a confidence.
//!
//! # Key Types
//!
//! - [`Adjudicator`] -- Runs one comparison under fixed options
//! - [`ComparisonOptions`] / [`Mode`] -- Normalization and rule selection
//! - [`Verdict`] -- Label, confidence, equivalence flag and diffs
//! - [`Rung`] -- One step of the equivalence ladder

pub mod adjudicator;
pub mod classify;
pub mod error;
pub mod ladder;
pub mod lexer;
pub mod normalize;
pub mod options;
pub mod verdict;

pub use adjudicator::Adjudicator;
pub use error::{AdjudicationError, AdjudicationFault, AdjudicationResult};
pub use ladder::{reconcile, Reconciled, Rung};
pub use lexer::{tokenize, LexError, Lexeme, Token};
pub use options::{ComparisonOptions, Mode};
pub use verdict::Verdict;
