//! Manifest parser for dualgen.
//!
//! Reads the configuration document with a small, deterministic reader: not a
//! general YAML implementation, but the subset the document format uses.
//! Nesting comes from indentation, list items start with `- `, inline `#`
//! comments and surrounding quotes are stripped, and scalars are coerced by
//! fixed lexical rules.
//!
//! ```rust
//! use dualgen_manifest::parse_manifest;
//!
//! let manifest = parse_manifest("version: 2.0.0\nproject:\n  name: lumen\n").unwrap();
//! assert_eq!(manifest.config.project.name, "lumen");
//! assert!(manifest.report.warnings.is_empty());
//! ```

pub mod error;
pub mod loader;
pub mod reader;
pub mod scalar;

pub use error::{ManifestError, ManifestResult};
pub use loader::{load_manifest, parse_manifest, Manifest};
pub use reader::{parse_document, Document, Node};
