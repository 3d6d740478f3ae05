use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "dualgen",
    about = "dualgen: generate typed artifacts twice, then prove the two agree",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum GeneratorKind {
    /// Direct text rendering
    Direct,
    /// Node tree plus generic serializer
    Tree,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check a configuration document and list its errors and warnings
    Validate(ValidateArgs),
    /// Run one generator and write its bundle as JSON
    Generate(GenerateArgs),
    /// Structural diff of two bundle files
    Diff(DiffArgs),
    /// Adjudicate two bundle files
    Adjudicate(AdjudicateArgs),
    /// Run both generators, diff and adjudicate, and write every artifact
    Verify(VerifyArgs),
}

#[derive(Args)]
pub struct ValidateArgs {
    pub manifest: PathBuf,
}

#[derive(Args)]
pub struct GenerateArgs {
    pub manifest: PathBuf,
    #[arg(short, long, default_value = "direct")]
    pub generator: GeneratorKind,
    /// Write the bundle here instead of standard output
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct DiffArgs {
    pub left: PathBuf,
    pub right: PathBuf,
}

/// Comparison settings shared by `adjudicate` and `verify`. Flags override
/// the settings file.
#[derive(Args, Clone, Debug, Default)]
pub struct ComparisonFlags {
    #[arg(long)]
    pub ignore_whitespace: bool,
    #[arg(long)]
    pub ignore_comments: bool,
    /// Treat import order and object property order as insignificant
    #[arg(long)]
    pub relaxed: bool,
    #[arg(long)]
    pub max_diff_size: Option<usize>,
    /// TOML file with comparison settings
    #[arg(long)]
    pub settings: Option<PathBuf>,
}

#[derive(Args)]
pub struct AdjudicateArgs {
    pub left: PathBuf,
    pub right: PathBuf,
    #[command(flatten)]
    pub comparison: ComparisonFlags,
    /// Also write the verdict as JSON here
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Args)]
pub struct VerifyArgs {
    pub manifest: PathBuf,
    #[arg(long, default_value = "dualgen-out")]
    pub out_dir: PathBuf,
    #[command(flatten)]
    pub comparison: ComparisonFlags,
}
