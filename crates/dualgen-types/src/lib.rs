//! Foundation types for dualgen.
//!
//! Every other dualgen crate depends on `dualgen-types`. It holds the shapes
//! that form the contract between the two generators and the comparators:
//! the Generation Bundle, its files and metadata, the content digests that
//! address them, and the validation issues reported for a configuration.
//!
//! # Key Types
//!
//! - [`ContentDigest`] — BLAKE3 content address, hex-encoded on the wire
//! - [`ContentHasher`] — domain-separated hasher producing digests
//! - [`GeneratedFile`] / [`GenerationBundle`] — one generator's output
//! - [`BundleBuilder`] — assembles files into a sealed bundle
//! - [`Generator`] — the seam both generators implement
//! - [`ValidationReport`] / [`ValidationIssue`] — configuration checks

pub mod bundle;
pub mod digest;
pub mod error;
pub mod generator;
pub mod hasher;
pub mod validation;

pub use bundle::{BundleBuilder, BundleMetadata, FileCategory, GeneratedFile, GenerationBundle};
pub use digest::ContentDigest;
pub use error::{GenerationError, GenerationResult, TypeError};
pub use generator::{Generator, GeneratorIdentity};
pub use hasher::ContentHasher;
pub use validation::{IssueCode, ValidationIssue, ValidationReport};
