//! Generator A for dualgen.
//!
//! Loads the configuration through `dualgen-manifest` and writes each
//! TypeScript artifact directly as text, in a fixed order: `types.ts`,
//! `constants.ts`, `validators.ts`, `config.ts`, `index.ts`.
//!
//! ```rust
//! use dualgen_direct::DirectGenerator;
//! use dualgen_types::Generator;
//!
//! let generator = DirectGenerator::default();
//! let bundle = generator
//!     .generate_from_str("version: 2.0.0\nproject:\n  name: lumen\n")
//!     .unwrap();
//! assert_eq!(bundle.files.len(), 5);
//! assert_eq!(bundle.files[0].path, "types.ts");
//! ```

pub mod generator;
mod literal;
mod render;

pub use generator::DirectGenerator;
