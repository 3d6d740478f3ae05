use std::time::Instant;

use tracing::{debug, info, warn};

use dualgen_config::resolve;
use dualgen_types::{
    BundleBuilder, GenerationBundle, GenerationError, GenerationResult, Generator,
    GeneratorIdentity,
};

use crate::build::{modules, Context};
use crate::error::TreeError;
use crate::extract::{extract, Patterns};
use crate::serialize::serialize;

/// Name stamped into bundles by [`TreeGenerator::default`].
pub const DEFAULT_NAME: &str = "dualgen-tree";

/// Extracts, builds a node tree, and serializes it.
#[derive(Clone, Debug)]
pub struct TreeGenerator {
    identity: GeneratorIdentity,
}

impl TreeGenerator {
    pub fn new(identity: GeneratorIdentity) -> Self {
        Self { identity }
    }
}

impl Default for TreeGenerator {
    fn default() -> Self {
        Self::new(GeneratorIdentity::new(DEFAULT_NAME, env!("CARGO_PKG_VERSION")))
    }
}

impl Generator for TreeGenerator {
    fn identity(&self) -> &GeneratorIdentity {
        &self.identity
    }

    fn generate_from_str(&self, text: &str) -> GenerationResult<GenerationBundle> {
        let started = Instant::now();
        let patterns = Patterns::compile().map_err(TreeError::from)?;
        let extraction = extract(&patterns, text).map_err(TreeError::Extract)?;

        let (config, report) = resolve(&extraction).validated();
        for issue in &report.warnings {
            warn!(code = %issue.code, field = %issue.field, "{}", issue.message);
        }
        if !report.is_valid() {
            return Err(GenerationError::ConfigurationInvalid(report));
        }
        let config_hash = config.canonical_hash()?;
        debug!(generator = %self.identity, hash = %config_hash.short_hex(), "configuration extracted");

        let cx = Context {
            identity: &self.identity,
            config: &config,
            config_hash: &config_hash,
        };
        let mut builder =
            BundleBuilder::new(self.identity.clone(), config_hash).started_at(started);
        for (module, category) in modules(&cx) {
            let text = serialize(&module)?;
            builder.add_file(module.path, text, category)?;
        }

        let bundle = builder.finish()?;
        info!(
            generator = %self.identity,
            files = bundle.files.len(),
            hash = %bundle.hash.short_hex(),
            "bundle generated"
        );
        Ok(bundle)
    }
}
