use std::time::Instant;

use tracing::{debug, info};

use dualgen_manifest::{parse_manifest, Manifest};
use dualgen_types::{
    BundleBuilder, FileCategory, GenerationBundle, GenerationError, GenerationResult, Generator,
    GeneratorIdentity,
};

use crate::render::{self, Header, RenderResult};

/// Name stamped into bundles by [`DirectGenerator::default`].
pub const DEFAULT_NAME: &str = "dualgen-direct";

/// Renders artifacts straight from a loaded [`Manifest`].
#[derive(Clone, Debug)]
pub struct DirectGenerator {
    identity: GeneratorIdentity,
}

impl DirectGenerator {
    pub fn new(identity: GeneratorIdentity) -> Self {
        Self { identity }
    }

    /// Render a manifest that is already loaded.
    pub fn render(&self, manifest: &Manifest) -> GenerationResult<GenerationBundle> {
        self.render_since(manifest, Instant::now())
    }

    fn render_since(
        &self,
        manifest: &Manifest,
        started: Instant,
    ) -> GenerationResult<GenerationBundle> {
        let header = Header {
            identity: &self.identity,
            config: &manifest.config,
        };
        let mut builder =
            BundleBuilder::new(self.identity.clone(), manifest.hash).started_at(started);

        builder.add_file(
            "types.ts",
            rendered("types.ts", render::types(&header))?,
            FileCategory::Types,
        )?;
        builder.add_file(
            "constants.ts",
            rendered("constants.ts", render::constants(&header, &manifest.hash))?,
            FileCategory::Constants,
        )?;
        builder.add_file(
            "validators.ts",
            rendered("validators.ts", render::validators(&header))?,
            FileCategory::Validators,
        )?;
        builder.add_file(
            "config.ts",
            rendered("config.ts", render::runtime_config(&header))?,
            FileCategory::Config,
        )?;
        builder.add_file(
            "index.ts",
            rendered("index.ts", render::index(&header))?,
            FileCategory::Index,
        )?;

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

impl Default for DirectGenerator {
    fn default() -> Self {
        Self::new(GeneratorIdentity::new(DEFAULT_NAME, env!("CARGO_PKG_VERSION")))
    }
}

fn rendered(path: &str, result: RenderResult) -> GenerationResult<String> {
    result.map_err(|e| GenerationError::internal(format!("render {path}"), e.to_string()))
}

impl Generator for DirectGenerator {
    fn identity(&self) -> &GeneratorIdentity {
        &self.identity
    }

    fn generate_from_str(&self, text: &str) -> GenerationResult<GenerationBundle> {
        let started = Instant::now();
        let manifest = parse_manifest(text)?;
        debug!(
            generator = %self.identity,
            warnings = manifest.report.warnings.len(),
            "configuration loaded"
        );
        self.render_since(&manifest, started)
    }
}
