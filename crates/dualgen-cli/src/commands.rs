use std::fs;
use std::path::Path;
use std::process::ExitCode;

use anyhow::{anyhow, bail, Context};
use colored::Colorize;
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info};

use dualgen_adjudicate::{Adjudicator, ComparisonOptions, Mode, Verdict};
use dualgen_diff::{build_diff, DiffReport, Mismatch, Severity, VerdictLabel};
use dualgen_direct::DirectGenerator;
use dualgen_manifest::load_manifest;
use dualgen_tree::TreeGenerator;
use dualgen_types::{
    GenerationBundle, GenerationError, GenerationResult, Generator, ValidationReport,
};

use crate::cli::*;

/// How a command ended, mapped onto the process exit status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Exit 0: valid configuration, or a MATCH.
    Clean,
    /// Exit 1: invalid configuration, PARTIAL_MATCH or INCONCLUSIVE.
    Flagged,
    /// Exit 2: MISMATCH or ERROR.
    Failed,
}

impl Outcome {
    pub fn from_verdict(label: VerdictLabel) -> Self {
        match label {
            VerdictLabel::Match => Self::Clean,
            VerdictLabel::PartialMatch | VerdictLabel::Inconclusive => Self::Flagged,
            VerdictLabel::Mismatch | VerdictLabel::Error => Self::Failed,
        }
    }

    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Clean => ExitCode::SUCCESS,
            Self::Flagged => ExitCode::from(1),
            Self::Failed => ExitCode::from(2),
        }
    }
}

pub fn run_command(cli: Cli) -> anyhow::Result<Outcome> {
    let format = cli.format;
    match cli.command {
        Command::Validate(args) => cmd_validate(args, format),
        Command::Generate(args) => cmd_generate(args, format),
        Command::Diff(args) => cmd_diff(args, format),
        Command::Adjudicate(args) => cmd_adjudicate(args, format),
        Command::Verify(args) => cmd_verify(args, format),
    }
}

fn cmd_validate(args: ValidateArgs, format: OutputFormat) -> anyhow::Result<Outcome> {
    let (report, config_hash) = match load_manifest(&args.manifest) {
        Ok(manifest) => (manifest.report, Some(manifest.hash)),
        Err(err) => match GenerationError::from(err) {
            GenerationError::ConfigurationInvalid(report) => (report, None),
            other => return Err(other.into()),
        },
    };
    match format {
        OutputFormat::Json => print_json(&json!({
            "valid": report.is_valid(),
            "configHash": config_hash.map(|h| h.to_hex()),
            "errors": report.errors,
            "warnings": report.warnings,
        }))?,
        OutputFormat::Text => {
            if let Some(hash) = config_hash {
                println!(
                    "{} {} is valid (config hash {})",
                    "✓".green().bold(),
                    args.manifest.display(),
                    hash.short_hex().cyan()
                );
            }
            print_issues(&report);
        }
    }
    Ok(if report.is_valid() {
        Outcome::Clean
    } else {
        Outcome::Flagged
    })
}

fn cmd_generate(args: GenerateArgs, format: OutputFormat) -> anyhow::Result<Outcome> {
    let result = match args.generator {
        GeneratorKind::Direct => DirectGenerator::default().generate(&args.manifest),
        GeneratorKind::Tree => TreeGenerator::default().generate(&args.manifest),
    };
    let Some(bundle) = accept(result, format)? else {
        return Ok(Outcome::Flagged);
    };
    match &args.out {
        Some(path) => {
            write_json(path, &bundle)?;
            if let OutputFormat::Text = format {
                println!(
                    "{} {} wrote {} file(s) to {} (bundle {})",
                    "✓".green().bold(),
                    bundle.metadata.generator.bold(),
                    bundle.files.len(),
                    path.display(),
                    bundle.hash.short_hex().cyan()
                );
            }
        }
        None => print_json(&bundle)?,
    }
    Ok(Outcome::Clean)
}

fn cmd_diff(args: DiffArgs, format: OutputFormat) -> anyhow::Result<Outcome> {
    let left = read_bundle(&args.left)?;
    let right = read_bundle(&args.right)?;
    let report = build_diff(&left, &right)?;
    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => print_report(&report),
    }
    Ok(Outcome::from_verdict(report.verdict))
}

fn cmd_adjudicate(args: AdjudicateArgs, format: OutputFormat) -> anyhow::Result<Outcome> {
    let left = read_bundle(&args.left)?;
    let right = read_bundle(&args.right)?;
    let options = comparison_options(&args.comparison)?;
    let verdict = Adjudicator::new(options).adjudicate(Some(&left), Some(&right))?;
    if let Some(path) = &args.out {
        write_json(path, &verdict)?;
    }
    match format {
        OutputFormat::Json => print_json(&verdict)?,
        OutputFormat::Text => print_verdict(&verdict),
    }
    Ok(Outcome::from_verdict(verdict.verdict))
}

fn cmd_verify(args: VerifyArgs, format: OutputFormat) -> anyhow::Result<Outcome> {
    let options = comparison_options(&args.comparison)?;
    let manifest = args.manifest.as_path();

    // The generators share nothing, so they run side by side.
    let (direct, tree) = std::thread::scope(|scope| -> anyhow::Result<_> {
        let direct = scope.spawn(|| DirectGenerator::default().generate(manifest));
        let tree = scope.spawn(|| TreeGenerator::default().generate(manifest));
        let direct = direct
            .join()
            .map_err(|_| anyhow!("direct generator thread panicked"))?;
        let tree = tree
            .join()
            .map_err(|_| anyhow!("tree generator thread panicked"))?;
        Ok((direct, tree))
    })?;
    let Some(direct) = accept(direct, format)? else {
        return Ok(Outcome::Flagged);
    };
    let Some(tree) = accept(tree, format)? else {
        return Ok(Outcome::Flagged);
    };

    let report = build_diff(&direct, &tree)?;
    let verdict = Adjudicator::new(options).adjudicate(Some(&direct), Some(&tree))?;

    fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;
    write_json(&args.out_dir.join("bundle-direct.json"), &direct)?;
    write_json(&args.out_dir.join("bundle-tree.json"), &tree)?;
    write_json(&args.out_dir.join("diff-report.json"), &report)?;
    write_json(&args.out_dir.join("verdict.json"), &verdict)?;
    info!(out_dir = %args.out_dir.display(), verdict = %verdict.verdict, "verification written");

    match format {
        OutputFormat::Json => print_json(&json!({
            "outDir": args.out_dir,
            "report": report,
            "verdict": verdict,
        }))?,
        OutputFormat::Text => {
            println!(
                "{} {} and {} from {}",
                "Generated".bold(),
                direct.metadata.generator.cyan(),
                tree.metadata.generator.cyan(),
                manifest.display()
            );
            print_report(&report);
            println!();
            print_verdict(&verdict);
            println!("Artifacts written to {}", args.out_dir.display().to_string().bold());
        }
    }
    Ok(Outcome::from_verdict(verdict.verdict))
}

/// Settings file first, then flags on top.
fn comparison_options(flags: &ComparisonFlags) -> anyhow::Result<ComparisonOptions> {
    let mut options = match &flags.settings {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading settings {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("parsing settings {}", path.display()))?
        }
        None => ComparisonOptions::default(),
    };
    if flags.ignore_whitespace {
        options.ignore_whitespace = true;
    }
    if flags.ignore_comments {
        options.ignore_comments = true;
    }
    if flags.relaxed {
        options.mode = Mode::Relaxed;
    }
    if let Some(size) = flags.max_diff_size {
        options.max_diff_size = size;
    }
    debug!(?options, "comparison options");
    Ok(options)
}

/// Unwrap a generator result. An invalid configuration is reported and
/// yields `None`; every other failure is an error.
fn accept(
    result: GenerationResult<GenerationBundle>,
    format: OutputFormat,
) -> anyhow::Result<Option<GenerationBundle>> {
    match result {
        Ok(bundle) => Ok(Some(bundle)),
        Err(GenerationError::ConfigurationInvalid(report)) => {
            match format {
                OutputFormat::Json => print_json(&json!({
                    "valid": false,
                    "errors": report.errors,
                    "warnings": report.warnings,
                }))?,
                OutputFormat::Text => {
                    println!("{} configuration invalid", "✗".red().bold());
                    print_issues(&report);
                }
            }
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

fn read_bundle(path: &Path) -> anyhow::Result<GenerationBundle> {
    let text =
        fs::read_to_string(path).with_context(|| format!("reading bundle {}", path.display()))?;
    let bundle: GenerationBundle = serde_json::from_str(&text)
        .with_context(|| format!("parsing bundle {}", path.display()))?;
    if !bundle.verify() {
        bail!("bundle {} does not match its recorded hashes", path.display());
    }
    Ok(bundle)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    fs::write(path, text + "\n").with_context(|| format!("writing {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_issues(report: &ValidationReport) {
    for issue in &report.errors {
        println!("  {} {}", "error:".red().bold(), issue);
    }
    for issue in &report.warnings {
        println!("  {} {}", "warning:".yellow(), issue);
    }
}

fn print_mismatch(mismatch: &Mismatch) {
    let severity = match mismatch.severity {
        Severity::Critical => mismatch.severity.as_str().red().bold(),
        Severity::Major => mismatch.severity.as_str().red(),
        Severity::Minor => mismatch.severity.as_str().yellow(),
        Severity::Info => mismatch.severity.as_str().dimmed(),
    };
    let path = mismatch.path.as_deref().unwrap_or("(bundle)");
    println!(
        "  {:<8} {:<18} {} {}",
        severity,
        mismatch.diff_type.as_str(),
        path.bold(),
        mismatch.description
    );
    if let Some(location) = &mismatch.location {
        println!(
            "           at left line {}, right line {}",
            location.left_line, location.right_line
        );
    }
}

fn label(verdict: VerdictLabel) -> colored::ColoredString {
    match verdict {
        VerdictLabel::Match => verdict.as_str().green().bold(),
        VerdictLabel::PartialMatch | VerdictLabel::Inconclusive => verdict.as_str().yellow().bold(),
        VerdictLabel::Mismatch | VerdictLabel::Error => verdict.as_str().red().bold(),
    }
}

fn print_report(report: &DiffReport) {
    println!(
        "Diff {} vs {}",
        report.left_generator.cyan(),
        report.right_generator.cyan()
    );
    for mismatch in &report.mismatches {
        print_mismatch(mismatch);
    }
    let s = &report.summary;
    println!(
        "  {} mismatch(es): {} critical, {} major, {} minor, {} info; files {}, hash {}",
        s.total,
        s.critical,
        s.major,
        s.minor,
        s.info,
        if s.files_match { "match".green() } else { "differ".red() },
        if s.hash_match { "match".green() } else { "differs".yellow() },
    );
    println!("  Diff verdict: {}", label(report.verdict));
}

fn print_verdict(verdict: &Verdict) {
    println!(
        "Verdict: {} (confidence {:.2}, semantically equivalent: {})",
        label(verdict.verdict),
        verdict.confidence,
        verdict.semantically_equivalent
    );
    for diff in &verdict.diffs {
        print_mismatch(diff);
    }
    println!("  {}", verdict.summary);
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    const MANIFEST: &str = "\
version: 2.0.0
project:
  name: lumen
thresholds:
  critical: 0.3
  low: 0.5
  nominal: 0.7
  optimal: 0.9
";

    fn run(args: &[&str]) -> anyhow::Result<Outcome> {
        let mut argv = vec!["dualgen", "--format", "json"];
        argv.extend_from_slice(args);
        run_command(Cli::try_parse_from(argv)?)
    }

    fn manifest(dir: &Path, text: &str) -> String {
        let path = dir.join("dualgen.yaml");
        fs::write(&path, text).unwrap();
        path.display().to_string()
    }

    #[test]
    fn exit_codes_follow_verdicts() {
        assert_eq!(Outcome::from_verdict(VerdictLabel::Match), Outcome::Clean);
        assert_eq!(Outcome::from_verdict(VerdictLabel::Inconclusive), Outcome::Flagged);
        assert_eq!(Outcome::from_verdict(VerdictLabel::PartialMatch), Outcome::Flagged);
        assert_eq!(Outcome::from_verdict(VerdictLabel::Error), Outcome::Failed);
        assert_eq!(Outcome::from_verdict(VerdictLabel::Mismatch), Outcome::Failed);
    }

    #[test]
    fn validate_reports_errors() {
        let dir = tempfile::tempdir().unwrap();
        let good = manifest(dir.path(), MANIFEST);
        assert_eq!(run(&["validate", &good]).unwrap(), Outcome::Clean);

        let bad = manifest(dir.path(), "version: 2.0.0\nproject:\n  name: lumen\nthresholds:\n  critical: 0.6\n  low: 0.5\n");
        assert_eq!(run(&["validate", &bad]).unwrap(), Outcome::Flagged);
    }

    #[test]
    fn validate_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.yaml").display().to_string();
        assert!(run(&["validate", &missing]).is_err());
    }

    #[test]
    fn verify_writes_every_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = manifest(dir.path(), MANIFEST);
        let out = dir.path().join("out");
        let out_arg = out.display().to_string();
        let outcome = run(&["verify", &path, "--out-dir", &out_arg]).unwrap();
        assert_eq!(outcome, Outcome::Clean);
        for name in ["bundle-direct.json", "bundle-tree.json", "diff-report.json", "verdict.json"] {
            assert!(out.join(name).is_file(), "{name} missing");
        }
        let verdict: Verdict =
            serde_json::from_str(&fs::read_to_string(out.join("verdict.json")).unwrap()).unwrap();
        assert_eq!(verdict.verdict, VerdictLabel::Match);
    }

    #[test]
    fn generate_then_diff_and_adjudicate() {
        let dir = tempfile::tempdir().unwrap();
        let path = manifest(dir.path(), MANIFEST);
        let left = dir.path().join("direct.json").display().to_string();
        let right = dir.path().join("tree.json").display().to_string();
        assert_eq!(run(&["generate", &path, "--out", &left]).unwrap(), Outcome::Clean);
        assert_eq!(
            run(&["generate", &path, "-g", "tree", "--out", &right]).unwrap(),
            Outcome::Clean
        );
        // Every file differs in bytes, so the structural diff flags hash mismatches.
        assert_eq!(run(&["diff", &left, &right]).unwrap(), Outcome::Flagged);
        assert_eq!(run(&["adjudicate", &left, &right]).unwrap(), Outcome::Clean);
    }

    #[test]
    fn tampered_bundle_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = manifest(dir.path(), MANIFEST);
        let bundle_path = dir.path().join("direct.json");
        let bundle_arg = bundle_path.display().to_string();
        run(&["generate", &path, "--out", &bundle_arg]).unwrap();
        let text = fs::read_to_string(&bundle_path).unwrap();
        fs::write(&bundle_path, text.replace("lumen", "lumex")).unwrap();
        assert!(run(&["diff", &bundle_arg, &bundle_arg]).is_err());
    }

    #[test]
    fn settings_file_is_overridden_by_flags() {
        let dir = tempfile::tempdir().unwrap();
        let settings = dir.path().join("cmp.toml");
        fs::write(&settings, "ignore_comments = true\nmax_diff_size = 50\n").unwrap();
        let flags = ComparisonFlags {
            relaxed: true,
            max_diff_size: Some(75),
            settings: Some(settings),
            ..Default::default()
        };
        let options = comparison_options(&flags).unwrap();
        assert!(options.ignore_comments);
        assert!(!options.ignore_whitespace);
        assert_eq!(options.mode, Mode::Relaxed);
        assert_eq!(options.max_diff_size, 75);
    }
}
