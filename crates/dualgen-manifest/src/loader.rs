//! Parse, resolve and validate a manifest in one step.

use std::path::Path;

use tracing::{debug, info, warn};

use dualgen_config::{resolve, Configuration};
use dualgen_types::{ContentDigest, ValidationReport};

use crate::error::{ManifestError, ManifestResult};
use crate::reader::parse_document;

/// A loaded, validated configuration.
#[derive(Clone, Debug)]
pub struct Manifest {
    pub config: Configuration,
    /// Canonical hash of `config`.
    pub hash: ContentDigest,
    /// Warnings raised while loading. Never contains errors.
    pub report: ValidationReport,
}

/// Parse manifest text. Validation errors fail the load; warnings are kept
/// on the returned [`Manifest`].
pub fn parse_manifest(text: &str) -> ManifestResult<Manifest> {
    let document = parse_document(text)?;
    let (config, report) = resolve(&document).validated();

    for issue in &report.warnings {
        warn!(code = %issue.code, field = %issue.field, "{}", issue.message);
    }
    if !report.is_valid() {
        debug!(errors = report.errors.len(), "manifest failed validation");
        return Err(ManifestError::Invalid(report));
    }

    let hash = config.canonical_hash()?;
    info!(
        version = %config.version,
        project = %config.project.name,
        hash = %hash.short_hex(),
        "manifest loaded"
    );
    Ok(Manifest {
        config,
        hash,
        report,
    })
}

/// Read and parse the manifest at `path`.
pub fn load_manifest(path: impl AsRef<Path>) -> ManifestResult<Manifest> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ManifestError::NotFound {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = text.len(), "manifest read");
    parse_manifest(&text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dualgen_types::IssueCode;
    use proptest::prelude::*;

    const FULL: &str = "\
version: 2.0.0
project:
  name: lumen
  description: Frequency scoring
thresholds:
  critical: 0.3
  low: 0.5
  nominal: 0.7
  optimal: 0.9
weights:
  governance: 0.30
  architecture: 0.25
  implementation: 0.25
  validation: 0.20
";

    #[test]
    fn clean_manifest_has_no_findings() {
        let manifest = parse_manifest(FULL).unwrap();
        assert!(manifest.report.errors.is_empty());
        assert!(manifest.report.warnings.is_empty());
        assert_eq!(manifest.config.thresholds.nominal, 0.7);
        assert_eq!(manifest.config.project.description, "Frequency scoring");
    }

    #[test]
    fn misordered_thresholds_fail_with_one_error() {
        let text = FULL.replace("critical: 0.3", "critical: 0.6");
        match parse_manifest(&text).unwrap_err() {
            ManifestError::Invalid(report) => {
                assert_eq!(report.errors.len(), 1);
                assert_eq!(report.errors[0].code, IssueCode::InvalidThresholds);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn weight_sum_warning_does_not_block() {
        let text = FULL.replace("validation: 0.20", "validation: 0.30");
        let manifest = parse_manifest(&text).unwrap();
        assert_eq!(manifest.report.warnings.len(), 1);
        assert_eq!(manifest.report.warnings[0].code, IssueCode::WeightSum);
    }

    #[test]
    fn key_order_does_not_change_hash() {
        let reordered = "\
weights:
  validation: 0.20
  implementation: 0.25
  architecture: 0.25
  governance: 0.30
thresholds:
  optimal: 0.9
  nominal: 0.7
  low: 0.5
  critical: 0.3
project:
  description: Frequency scoring
  name: lumen
version: 2.0.0
";
        let a = parse_manifest(FULL).unwrap();
        let b = parse_manifest(reordered).unwrap();
        assert_eq!(a.hash, b.hash);
    }

    #[test]
    fn omitted_defaults_hash_like_explicit_defaults() {
        let minimal = "version: 2.0.0\nproject:\n  name: lumen\n  description: Frequency scoring\n";
        assert_eq!(
            parse_manifest(minimal).unwrap().hash,
            parse_manifest(FULL).unwrap().hash
        );
    }

    #[test]
    fn value_change_changes_hash() {
        let changed = FULL.replace("optimal: 0.9", "optimal: 0.95");
        assert_ne!(
            parse_manifest(FULL).unwrap().hash,
            parse_manifest(&changed).unwrap().hash
        );
    }

    #[test]
    fn syntax_error_surfaces_line() {
        let err = parse_manifest("version: 1\nproject\n").unwrap_err();
        assert!(matches!(err, ManifestError::Syntax { line: 2, .. }));
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_manifest(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ManifestError::NotFound { .. }));
    }

    #[test]
    fn loads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dualgen.yaml");
        std::fs::write(&path, FULL).unwrap();
        let manifest = load_manifest(&path).unwrap();
        assert_eq!(manifest.config.project.name, "lumen");
    }

    proptest! {
        #[test]
        fn parsing_is_deterministic(
            critical in 0.0f64..0.2,
            low in 0.25f64..0.45,
            name in "p[a-z]{0,11}",
        ) {
            let text = FULL
                .replace("critical: 0.3", &format!("critical: {critical}"))
                .replace("low: 0.5", &format!("low: {low}"))
                .replace("name: lumen", &format!("name: {name}"));
            let a = parse_manifest(&text).unwrap();
            let b = parse_manifest(&text).unwrap();
            prop_assert_eq!(a.hash, b.hash);
            prop_assert_eq!(a.config, b.config);
        }
    }
}
