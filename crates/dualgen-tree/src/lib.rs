//! Generator B for dualgen.
//!
//! Reads the configuration text with its own regular-expression patterns,
//! resolves the findings through the shared default table, builds every
//! artifact as a tree of [`Node`]s and serializes the tree with one generic
//! function. It shares no parsing or rendering code with the direct generator,
//! so a divergence in either implementation shows up when the two bundles are
//! compared.
//!
//! ```rust
//! use dualgen_tree::TreeGenerator;
//! use dualgen_types::Generator;
//!
//! let generator = TreeGenerator::default();
//! let bundle = generator
//!     .generate_from_str("version: 2.0.0\nproject:\n  name: lumen\n")
//!     .unwrap();
//! assert_eq!(bundle.files.len(), 5);
//! assert!(bundle.files[0].content.starts_with("/**"));
//! ```

pub mod build;
pub mod error;
pub mod extract;
pub mod generator;
pub mod node;
pub mod serialize;

pub use error::{TreeError, TreeResult};
pub use extract::{extract, Extraction, Patterns};
pub use generator::TreeGenerator;
pub use node::{Expr, Module, Node, Param, Stmt, Value};
pub use serialize::serialize;
