//! Bundle comparison.

use tracing::debug;

use dualgen_types::{GeneratedFile, GenerationBundle};

use crate::error::DiffResult;
use crate::exports::ExportScanner;
use crate::line_diff::diff_lines;
use crate::model::{derive_verdict, DiffReport, DiffSummary, DiffType, Mismatch, Severity};

/// Excerpts in a diff report are capped at this many characters per side.
pub const EXCERPT_LIMIT: usize = 400;

/// Compare two bundles. `left` is the reference side: a path only in `left`
/// is missing from `right`.
pub fn build_diff(left: &GenerationBundle, right: &GenerationBundle) -> DiffResult<DiffReport> {
    let scanner = ExportScanner::new()?;
    let mut mismatches = compare_file_sets(left, right);

    for file in &left.files {
        if let Some(other) = right.file(&file.path) {
            mismatches.extend(compare_files(&scanner, file, other));
        }
    }
    mismatches.extend(compare_metadata(left, right));

    let summary = summarize(left, right, &mismatches);
    let verdict = derive_verdict(&summary);
    debug!(
        total = summary.total,
        critical = summary.critical,
        major = summary.major,
        %verdict,
        "diff built"
    );
    Ok(DiffReport {
        left_generator: left.metadata.generator.clone(),
        right_generator: right.metadata.generator.clone(),
        mismatches,
        summary,
        verdict,
    })
}

/// One critical mismatch per path present on one side only.
pub fn compare_file_sets(left: &GenerationBundle, right: &GenerationBundle) -> Vec<Mismatch> {
    let left_paths = left.paths();
    let right_paths = right.paths();
    let missing = left_paths.difference(&right_paths).map(|path| {
        Mismatch::new(
            Some(*path),
            DiffType::MissingFile,
            Severity::Critical,
            format!("{path} is missing from {}", right.metadata.generator),
        )
    });
    let extra = right_paths.difference(&left_paths).map(|path| {
        Mismatch::new(
            Some(*path),
            DiffType::ExtraFile,
            Severity::Critical,
            format!("{path} is only produced by {}", right.metadata.generator),
        )
    });
    missing.chain(extra).collect()
}

fn compare_files(scanner: &ExportScanner, left: &GeneratedFile, right: &GeneratedFile) -> Vec<Mismatch> {
    if left.hash == right.hash {
        return Vec::new();
    }
    let path = Some(left.path.as_str());
    let lines = diff_lines(&left.content, &right.content, 3);
    let mut out = vec![Mismatch::new(
        path,
        DiffType::HashMismatch,
        Severity::Major,
        format!(
            "content hashes differ ({} vs {}): {} line(s) removed, {} added",
            left.hash.short_hex(),
            right.hash.short_hex(),
            lines.deletions(),
            lines.additions()
        ),
    )
    .with_excerpt(lines.first_excerpt().map(|e| e.truncated(EXCERPT_LIMIT)))
    .with_location(lines.first_location())];

    if lines.left_lines != lines.right_lines {
        out.push(Mismatch::new(
            path,
            DiffType::ContentDiff,
            Severity::Minor,
            format!(
                "line counts differ: {} vs {}",
                lines.left_lines, lines.right_lines
            ),
        ));
    }

    let left_exports = scanner.names(&left.content);
    let right_exports = scanner.names(&right.content);
    for name in left_exports.symmetric_difference(&right_exports) {
        let side = if left_exports.contains(name) { "left" } else { "right" };
        out.push(Mismatch::new(
            path,
            DiffType::ContentDiff,
            Severity::Major,
            format!("export '{name}' is declared only on the {side} side"),
        ));
    }
    out
}

/// Version and generator differences are informational; a configuration hash
/// difference means the two bundles were not generated from the same input.
pub fn compare_metadata(left: &GenerationBundle, right: &GenerationBundle) -> Vec<Mismatch> {
    let (l, r) = (&left.metadata, &right.metadata);
    let mut out = Vec::new();
    if l.generator_version != r.generator_version {
        out.push(Mismatch::new(
            None,
            DiffType::MetadataDiff,
            Severity::Info,
            format!(
                "generator versions differ: {} vs {}",
                l.generator_version, r.generator_version
            ),
        ));
    }
    if l.generator != r.generator {
        out.push(Mismatch::new(
            None,
            DiffType::MetadataDiff,
            Severity::Info,
            format!("generators differ as expected: {} vs {}", l.generator, r.generator),
        ));
    }
    if l.config_hash != r.config_hash {
        out.push(Mismatch::new(
            None,
            DiffType::MetadataDiff,
            Severity::Major,
            format!(
                "configuration hashes differ ({} vs {}); the bundles were not generated from the same input",
                l.config_hash.short_hex(),
                r.config_hash.short_hex()
            ),
        ));
    }
    out
}

/// Severity counts plus the file-set and bundle-hash flags.
pub fn summarize(
    left: &GenerationBundle,
    right: &GenerationBundle,
    mismatches: &[Mismatch],
) -> DiffSummary {
    DiffSummary {
        files_match: left.paths() == right.paths(),
        hash_match: left.hash == right.hash,
        ..DiffSummary::count(mismatches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::VerdictLabel;
    use dualgen_types::{BundleBuilder, ContentHasher, FileCategory, GeneratorIdentity};

    fn bundle(generator: &str, config: &[u8], files: &[(&str, &str)]) -> GenerationBundle {
        let mut builder = BundleBuilder::new(
            GeneratorIdentity::new(generator, "1.0.0"),
            ContentHasher::CONFIG.hash(config),
        );
        for (path, content) in files {
            builder.add_file(*path, *content, FileCategory::Index).unwrap();
        }
        builder.finish().unwrap()
    }

    fn of_type(report: &DiffReport, diff_type: DiffType) -> Vec<&Mismatch> {
        report
            .mismatches
            .iter()
            .filter(|m| m.diff_type == diff_type)
            .collect()
    }

    #[test]
    fn identical_bundles_have_no_mismatches() {
        let a = bundle("g", b"cfg", &[("index.ts", "export const foo = 1;\n")]);
        let report = build_diff(&a, &a.clone()).unwrap();
        assert!(report.mismatches.is_empty());
        assert!(report.summary.files_match);
        assert!(report.summary.hash_match);
        assert_eq!(report.verdict, VerdictLabel::Match);
    }

    #[test]
    fn missing_file_is_critical() {
        let a = bundle("g", b"cfg", &[("a.ts", "x\n"), ("b.ts", "y\n")]);
        let b = bundle("g", b"cfg", &[("a.ts", "x\n")]);
        let report = build_diff(&a, &b).unwrap();
        let missing = of_type(&report, DiffType::MissingFile);
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].severity, Severity::Critical);
        assert_eq!(missing[0].path.as_deref(), Some("b.ts"));
        assert!(!report.summary.files_match);
        assert_eq!(report.verdict, VerdictLabel::Mismatch);
    }

    #[test]
    fn extra_file_is_critical() {
        let a = bundle("g", b"cfg", &[("a.ts", "x\n")]);
        let b = bundle("g", b"cfg", &[("a.ts", "x\n"), ("c.ts", "z\n")]);
        let report = build_diff(&a, &b).unwrap();
        assert_eq!(of_type(&report, DiffType::ExtraFile).len(), 1);
        assert_eq!(report.verdict, VerdictLabel::Mismatch);
    }

    #[test]
    fn changed_value_is_one_hash_mismatch() {
        let a = bundle("g", b"cfg", &[("index.ts", "export const foo = 1;")]);
        let b = bundle("g", b"cfg", &[("index.ts", "export const foo = 2;")]);
        let report = build_diff(&a, &b).unwrap();
        let hash = of_type(&report, DiffType::HashMismatch);
        assert_eq!(hash.len(), 1);
        assert_eq!(hash[0].severity, Severity::Major);
        assert!(of_type(&report, DiffType::ContentDiff).is_empty());
        let excerpt = hash[0].excerpt.as_ref().unwrap();
        assert_eq!(excerpt.before, "export const foo = 1;");
        assert_eq!(excerpt.after, "export const foo = 2;");
        assert_eq!(report.verdict, VerdictLabel::PartialMatch);
    }

    #[test]
    fn internal_rename_is_invisible_to_export_scan() {
        let a = bundle(
            "g",
            b"cfg",
            &[("v.ts", "const limit = 1;\nexport function f(): number {\n  return limit;\n}\n")],
        );
        let b = bundle(
            "g",
            b"cfg",
            &[("v.ts", "const bound = 1;\nexport function f(): number {\n  return bound;\n}\n")],
        );
        let report = build_diff(&a, &b).unwrap();
        assert_eq!(of_type(&report, DiffType::HashMismatch).len(), 1);
        assert!(of_type(&report, DiffType::ContentDiff).is_empty());
    }

    #[test]
    fn export_difference_names_each_export() {
        let a = bundle("g", b"cfg", &[("c.ts", "export const A = 1;\nexport const B = 2;\n")]);
        let b = bundle("g", b"cfg", &[("c.ts", "export const A = 1;\nexport const C = 2;\n")]);
        let report = build_diff(&a, &b).unwrap();
        let content = of_type(&report, DiffType::ContentDiff);
        assert_eq!(content.len(), 2);
        assert!(content.iter().all(|m| m.severity == Severity::Major));
        assert!(content[0].description.contains("'B'"));
        assert!(content[1].description.contains("'C'"));
    }

    #[test]
    fn line_count_difference_is_minor() {
        let a = bundle("g", b"cfg", &[("a.ts", "x\n")]);
        let b = bundle("g", b"cfg", &[("a.ts", "x\ny\n")]);
        let report = build_diff(&a, &b).unwrap();
        let content = of_type(&report, DiffType::ContentDiff);
        assert_eq!(content.len(), 1);
        assert_eq!(content[0].severity, Severity::Minor);
    }

    #[test]
    fn generator_difference_is_info() {
        let a = bundle("direct", b"cfg", &[("a.ts", "x\n")]);
        let b = bundle("tree", b"cfg", &[("a.ts", "x\n")]);
        let report = build_diff(&a, &b).unwrap();
        let meta = of_type(&report, DiffType::MetadataDiff);
        assert_eq!(meta.len(), 1);
        assert_eq!(meta[0].severity, Severity::Info);
        assert_eq!(report.verdict, VerdictLabel::Match);
        assert_eq!(report.left_generator, "direct");
        assert_eq!(report.right_generator, "tree");
    }

    #[test]
    fn config_hash_difference_is_major() {
        let a = bundle("g", b"one", &[("a.ts", "x\n")]);
        let b = bundle("g", b"two", &[("a.ts", "x\n")]);
        let report = build_diff(&a, &b).unwrap();
        let meta = of_type(&report, DiffType::MetadataDiff);
        assert_eq!(meta.len(), 1);
        assert_eq!(meta[0].severity, Severity::Major);
        assert!(!report.summary.hash_match);
        assert!(report.summary.files_match);
        assert_eq!(report.verdict, VerdictLabel::PartialMatch);
    }
}
