use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bundle::GenerationBundle;
use crate::error::GenerationResult;

/// Name and version stamped into every bundle a generator produces.
///
/// Injected at construction rather than read from module constants, so two
/// instances of the same generator can run side by side under different
/// identities.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GeneratorIdentity {
    name: String,
    version: String,
}

impl GeneratorIdentity {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for GeneratorIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.name, self.version)
    }
}

/// A code generator: configuration document in, sealed bundle out.
///
/// Implementations must be deterministic. Identical input text yields
/// byte-identical files and an identical bundle hash.
pub trait Generator: Send + Sync {
    /// The identity this generator stamps into its bundles.
    fn identity(&self) -> &GeneratorIdentity;

    /// Generate from configuration text already in memory.
    fn generate_from_str(&self, text: &str) -> GenerationResult<GenerationBundle>;

    /// Read the configuration file at `path` and generate from it.
    fn generate(&self, path: &Path) -> GenerationResult<GenerationBundle> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            crate::error::GenerationError::ConfigurationNotFound {
                path: path.to_path_buf(),
                reason: e.to_string(),
            }
        })?;
        self.generate_from_str(&text)
    }
}
