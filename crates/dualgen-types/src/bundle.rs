use std::collections::BTreeSet;
use std::fmt;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::digest::ContentDigest;
use crate::error::{GenerationError, GenerationResult};
use crate::generator::GeneratorIdentity;
use crate::hasher::ContentHasher;

// ---------------------------------------------------------------------------
// GeneratedFile
// ---------------------------------------------------------------------------

/// What role a generated file plays in the output module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Types,
    Constants,
    Validators,
    Config,
    Index,
}

impl fmt::Display for FileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Types => "types",
            Self::Constants => "constants",
            Self::Validators => "validators",
            Self::Config => "config",
            Self::Index => "index",
        };
        f.write_str(s)
    }
}

/// One file emitted by a generator. Never mutated after creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
    pub hash: ContentDigest,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<FileCategory>,
}

impl GeneratedFile {
    /// Create a file, hashing its content.
    pub fn new(
        path: impl Into<String>,
        content: impl Into<String>,
        category: Option<FileCategory>,
    ) -> Self {
        let content = content.into();
        Self {
            path: path.into(),
            hash: ContentHasher::FILE.hash(content.as_bytes()),
            content,
            category,
        }
    }

    /// Number of lines in the content.
    pub fn line_count(&self) -> usize {
        self.content.lines().count()
    }

    /// Returns `true` if the stored hash matches the content.
    pub fn verify(&self) -> bool {
        ContentHasher::FILE.verify(self.content.as_bytes(), &self.hash)
    }
}

// ---------------------------------------------------------------------------
// GenerationBundle
// ---------------------------------------------------------------------------

/// Run metadata. The only place wall-clock values are allowed to appear.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BundleMetadata {
    pub timestamp: DateTime<Utc>,
    pub generator: String,
    pub generator_version: String,
    pub config_hash: ContentDigest,
    pub duration_ms: u64,
    pub file_count: usize,
}

/// The complete output of one generator run.
///
/// `hash` covers every `(path, file hash)` pair in emission order followed by
/// the configuration hash. Timestamp and duration are excluded, so two runs
/// over the same input produce the same bundle hash.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationBundle {
    pub files: Vec<GeneratedFile>,
    pub metadata: BundleMetadata,
    pub hash: ContentDigest,
}

impl GenerationBundle {
    /// Look up a file by path.
    pub fn file(&self, path: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.path == path)
    }

    /// The set of file paths in this bundle.
    pub fn paths(&self) -> BTreeSet<&str> {
        self.files.iter().map(|f| f.path.as_str()).collect()
    }

    /// Recompute the aggregate hash from the files and configuration hash.
    pub fn compute_hash(files: &[GeneratedFile], config_hash: &ContentDigest) -> ContentDigest {
        let mut parts: Vec<&[u8]> = Vec::with_capacity(files.len() * 2 + 1);
        for file in files {
            parts.push(file.path.as_bytes());
            parts.push(file.hash.as_bytes());
        }
        parts.push(config_hash.as_bytes());
        ContentHasher::BUNDLE.hash_parts(parts)
    }

    /// Returns `true` if every file hash and the aggregate hash are consistent.
    pub fn verify(&self) -> bool {
        self.files.iter().all(GeneratedFile::verify)
            && self.metadata.file_count == self.files.len()
            && Self::compute_hash(&self.files, &self.metadata.config_hash) == self.hash
    }
}

// ---------------------------------------------------------------------------
// BundleBuilder
// ---------------------------------------------------------------------------

/// Collects generated files and seals them into a [`GenerationBundle`].
///
/// Paths must be unique; a duplicate is an internal generator fault.
pub struct BundleBuilder {
    identity: GeneratorIdentity,
    config_hash: ContentDigest,
    files: Vec<GeneratedFile>,
    started: Instant,
}

impl BundleBuilder {
    pub fn new(identity: GeneratorIdentity, config_hash: ContentDigest) -> Self {
        Self {
            identity,
            config_hash,
            files: Vec::new(),
            started: Instant::now(),
        }
    }

    /// Restart the duration clock, e.g. when the builder is created after
    /// the configuration was read.
    pub fn started_at(mut self, started: Instant) -> Self {
        self.started = started;
        self
    }

    /// Append a file in emission order.
    pub fn add_file(
        &mut self,
        path: impl Into<String>,
        content: impl Into<String>,
        category: FileCategory,
    ) -> GenerationResult<()> {
        let path = path.into();
        if self.files.iter().any(|f| f.path == path) {
            return Err(GenerationError::internal(
                "bundle",
                format!("duplicate file path '{path}'"),
            ));
        }
        self.files.push(GeneratedFile::new(path, content, Some(category)));
        Ok(())
    }

    /// Seal the bundle.
    pub fn finish(self) -> GenerationResult<GenerationBundle> {
        if self.files.is_empty() {
            return Err(GenerationError::internal("bundle", "no files were generated"));
        }
        let hash = GenerationBundle::compute_hash(&self.files, &self.config_hash);
        let metadata = BundleMetadata {
            timestamp: Utc::now(),
            generator: self.identity.name().to_string(),
            generator_version: self.identity.version().to_string(),
            config_hash: self.config_hash,
            duration_ms: self.started.elapsed().as_millis() as u64,
            file_count: self.files.len(),
        };
        Ok(GenerationBundle {
            files: self.files,
            metadata,
            hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn identity() -> GeneratorIdentity {
        GeneratorIdentity::new("test-gen", "1.0.0")
    }

    fn config_hash() -> ContentDigest {
        ContentHasher::CONFIG.hash(b"config")
    }

    fn build(files: &[(&str, &str)]) -> GenerationBundle {
        let mut builder = BundleBuilder::new(identity(), config_hash());
        for (path, content) in files {
            builder.add_file(*path, *content, FileCategory::Index).unwrap();
        }
        builder.finish().unwrap()
    }

    #[test]
    fn bundle_hash_ignores_timestamp() {
        let a = build(&[("index.ts", "export const foo = 1;")]);
        std::thread::sleep(std::time::Duration::from_millis(2));
        let b = build(&[("index.ts", "export const foo = 1;")]);
        assert_eq!(a.hash, b.hash);
    }

    #[test]
    fn bundle_hash_tracks_content() {
        let a = build(&[("index.ts", "export const foo = 1;")]);
        let b = build(&[("index.ts", "export const foo = 2;")]);
        assert_ne!(a.hash, b.hash);
    }

    #[test]
    fn bundle_hash_tracks_config_hash() {
        let files = vec![GeneratedFile::new("a.ts", "x", None)];
        let h1 = GenerationBundle::compute_hash(&files, &config_hash());
        let h2 = GenerationBundle::compute_hash(&files, &ContentHasher::CONFIG.hash(b"other"));
        assert_ne!(h1, h2);
    }

    #[test]
    fn duplicate_path_is_rejected() {
        let mut builder = BundleBuilder::new(identity(), config_hash());
        builder.add_file("a.ts", "1", FileCategory::Types).unwrap();
        let err = builder.add_file("a.ts", "2", FileCategory::Types).unwrap_err();
        assert!(matches!(err, GenerationError::Internal { .. }));
    }

    #[test]
    fn empty_bundle_is_rejected() {
        let builder = BundleBuilder::new(identity(), config_hash());
        assert!(builder.finish().is_err());
    }

    #[test]
    fn metadata_reflects_identity_and_count() {
        let bundle = build(&[("a.ts", "1"), ("b.ts", "2")]);
        assert_eq!(bundle.metadata.generator, "test-gen");
        assert_eq!(bundle.metadata.generator_version, "1.0.0");
        assert_eq!(bundle.metadata.file_count, 2);
        assert_eq!(bundle.metadata.config_hash, config_hash());
        assert!(bundle.verify());
    }

    #[test]
    fn verify_detects_edited_content() {
        let mut bundle = build(&[("a.ts", "1")]);
        bundle.files[0].content.push('!');
        assert!(!bundle.verify());
    }

    #[test]
    fn json_shape_is_files_metadata_hash() {
        let bundle = build(&[("index.ts", "export const foo = 1;")]);
        let value = serde_json::to_value(&bundle).unwrap();
        let obj = value.as_object().unwrap();
        assert!(obj.contains_key("files"));
        assert!(obj.contains_key("metadata"));
        assert!(obj.contains_key("hash"));
        assert!(value["metadata"].get("configHash").is_some());
        assert!(value["metadata"].get("fileCount").is_some());

        let back: GenerationBundle = serde_json::from_value(value).unwrap();
        assert_eq!(back, bundle);
    }

    #[test]
    fn lookup_and_paths() {
        let bundle = build(&[("a.ts", "1\n2\n"), ("b.ts", "3")]);
        assert_eq!(bundle.file("a.ts").unwrap().line_count(), 2);
        assert!(bundle.file("c.ts").is_none());
        assert_eq!(bundle.paths().into_iter().collect::<Vec<_>>(), vec!["a.ts", "b.ts"]);
    }

    proptest! {
        #[test]
        fn bundle_hash_is_deterministic(
            files in proptest::collection::btree_map("[a-z]{1,8}\\.ts", ".{0,40}", 1..6),
        ) {
            let files: Vec<(&str, &str)> =
                files.iter().map(|(p, c)| (p.as_str(), c.as_str())).collect();
            let first = build(&files);
            let second = build(&files);
            prop_assert_eq!(first.hash, second.hash);
            prop_assert!(first.verify());
        }
    }
}
