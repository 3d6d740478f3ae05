//! Text rendering of the five artifacts.
//!
//! Each function writes one file top to bottom. Record-like values follow the
//! declaration order of the configuration types; metrics follow the name order
//! of the configuration's metric map.

use std::fmt::{self, Write};

use dualgen_config::{ComponentWeights, Configuration, FrequencyBand, Thresholds};
use dualgen_types::{ContentDigest, GeneratorIdentity};

use crate::literal::{number, quote, string_array, union};

pub(crate) type RenderResult = Result<String, fmt::Error>;

/// Everything a file header mentions.
pub(crate) struct Header<'a> {
    pub identity: &'a GeneratorIdentity,
    pub config: &'a Configuration,
}

impl Header<'_> {
    fn write(&self, out: &mut String, file: &str, about: &str) -> fmt::Result {
        writeln!(
            out,
            "// {file}: {about}. Generated by {} from {} {}.",
            self.identity, self.config.project.name, self.config.version
        )?;
        writeln!(out, "// Do not edit: regenerate from the configuration document.")?;
        writeln!(out)
    }
}

pub(crate) fn types(header: &Header<'_>) -> RenderResult {
    let config = header.config;
    let mut out = String::new();
    header.write(&mut out, "types.ts", "type declarations")?;

    let bands: Vec<&str> = FrequencyBand::ALL.iter().map(|b| b.as_str()).collect();
    writeln!(out, "export type FrequencyBand = {};", union(&bands))?;
    writeln!(out)?;
    writeln!(
        out,
        "export type ValidationLevel = {};",
        union(&config.validation.levels)
    )?;
    writeln!(out)?;
    let metric_names: Vec<&str> = config.metrics.keys().map(String::as_str).collect();
    writeln!(out, "export type MetricName = {};", union(&metric_names))?;

    interface(&mut out, "Thresholds", &numeric(&Thresholds::FIELDS))?;
    interface(&mut out, "ComponentWeights", &numeric(&ComponentWeights::FIELDS))?;
    interface(
        &mut out,
        "ApprovalPolicy",
        &[
            ("threshold", "number"),
            ("requiredScore", "number"),
            ("approvers", "readonly string[]"),
        ],
    )?;
    interface(
        &mut out,
        "MetricDefinition",
        &[
            ("name", "MetricName"),
            ("description", "string"),
            ("weight", "number"),
            ("sources", "readonly string[]"),
        ],
    )?;
    interface(
        &mut out,
        "EvidencePolicy",
        &[
            ("outputDir", "string"),
            ("formats", "readonly string[]"),
            ("retentionDays", "number"),
            ("requiredArtifacts", "readonly string[]"),
        ],
    )?;
    interface(
        &mut out,
        "RuntimeConfig",
        &[
            ("version", "string"),
            ("projectName", "string"),
            ("configHash", "string"),
            ("thresholds", "Thresholds"),
            ("weights", "ComponentWeights"),
            ("approval", "ApprovalPolicy"),
            ("validationLevels", "readonly ValidationLevel[]"),
            ("requiredValidationLevels", "readonly ValidationLevel[]"),
            ("metrics", "readonly MetricDefinition[]"),
            ("evidence", "EvidencePolicy"),
        ],
    )?;
    Ok(out)
}

fn numeric(fields: &[&'static str]) -> Vec<(&'static str, &'static str)> {
    fields.iter().map(|f| (*f, "number")).collect()
}

fn interface(out: &mut String, name: &str, members: &[(&str, &str)]) -> fmt::Result {
    writeln!(out)?;
    writeln!(out, "export interface {name} {{")?;
    for (member, ty) in members {
        writeln!(out, "  readonly {member}: {ty};")?;
    }
    writeln!(out, "}}")
}

/// An object literal, one property per line.
fn object(out: &mut String, entries: &[(&str, String)]) -> fmt::Result {
    writeln!(out, "{{")?;
    for (idx, (key, value)) in entries.iter().enumerate() {
        let sep = if idx + 1 < entries.len() { "," } else { "" };
        writeln!(out, "  {key}: {value}{sep}")?;
    }
    write!(out, "}}")
}

fn numbers(fields: &[&'static str], values: &[f64]) -> Vec<(&'static str, String)> {
    fields.iter().zip(values).map(|(f, v)| (*f, number(*v))).collect()
}

pub(crate) fn constants(header: &Header<'_>, config_hash: &ContentDigest) -> RenderResult {
    let config = header.config;
    let mut out = String::new();
    header.write(&mut out, "constants.ts", "configuration constants")?;

    writeln!(
        out,
        "import type {{ ApprovalPolicy, ComponentWeights, EvidencePolicy, MetricDefinition, Thresholds, ValidationLevel }} from './types';"
    )?;
    writeln!(out)?;
    writeln!(out, "export const CONFIG_VERSION = {};", quote(&config.version))?;
    writeln!(out, "export const PROJECT_NAME = {};", quote(&config.project.name))?;
    writeln!(out, "export const CONFIG_HASH = {};", quote(&config_hash.to_hex()))?;
    writeln!(out)?;

    write!(out, "export const THRESHOLDS: Thresholds = ")?;
    object(
        &mut out,
        &numbers(&Thresholds::FIELDS, &config.thresholds.values()),
    )?;
    writeln!(out, ";")?;
    writeln!(out)?;

    write!(out, "export const WEIGHTS: ComponentWeights = ")?;
    object(
        &mut out,
        &numbers(&ComponentWeights::FIELDS, &config.weights.values()),
    )?;
    writeln!(out, ";")?;
    writeln!(out)?;

    let approval = &config.approval;
    write!(out, "export const APPROVAL_POLICY: ApprovalPolicy = ")?;
    object(
        &mut out,
        &[
            ("threshold", number(approval.threshold)),
            ("requiredScore", number(approval.required_score)),
            ("approvers", string_array(&approval.approvers)),
        ],
    )?;
    writeln!(out, ";")?;
    writeln!(out)?;

    writeln!(
        out,
        "export const VALIDATION_LEVELS: readonly ValidationLevel[] = {};",
        string_array(&config.validation.levels)
    )?;
    writeln!(out)?;
    writeln!(
        out,
        "export const REQUIRED_VALIDATION_LEVELS: readonly ValidationLevel[] = {};",
        string_array(&config.validation.required)
    )?;
    writeln!(out)?;

    if config.metrics.is_empty() {
        writeln!(out, "export const METRICS: readonly MetricDefinition[] = [];")?;
    } else {
        writeln!(out, "export const METRICS: readonly MetricDefinition[] = [")?;
        let last = config.metrics.len() - 1;
        for (idx, (name, metric)) in config.metrics.iter().enumerate() {
            let sep = if idx < last { "," } else { "" };
            writeln!(
                out,
                "  {{ name: {}, description: {}, weight: {}, sources: {} }}{sep}",
                quote(name),
                quote(&metric.description),
                number(metric.weight),
                string_array(&metric.sources)
            )?;
        }
        writeln!(out, "];")?;
    }
    writeln!(out)?;

    let evidence = &config.evidence;
    write!(out, "export const EVIDENCE_POLICY: EvidencePolicy = ")?;
    object(
        &mut out,
        &[
            ("outputDir", quote(&evidence.output_dir)),
            ("formats", string_array(&evidence.formats)),
            ("retentionDays", evidence.retention_days.to_string()),
            ("requiredArtifacts", string_array(&evidence.required_artifacts)),
        ],
    )?;
    writeln!(out, ";")?;
    writeln!(out)?;

    writeln!(
        out,
        "export const WEIGHT_SUM_TOLERANCE = {};",
        number(dualgen_config::defaults::RUNTIME_WEIGHT_SUM_TOLERANCE)
    )?;
    Ok(out)
}

/// The validation factor runs from the floor (nothing passed) to
/// `floor + span` (everything passed).
const VALIDATION_FACTOR_FLOOR: f64 = 0.8;
const VALIDATION_FACTOR_SPAN: f64 = 0.2;

/// Operator guidance per band.
const RECOMMENDATIONS: [(FrequencyBand, &str); 5] = [
    (
        FrequencyBand::Critical,
        "HALT: System requires immediate attention. Do not proceed with POC.",
    ),
    (
        FrequencyBand::Low,
        "CAUTION: Address deficiencies before Thunder Strike review.",
    ),
    (
        FrequencyBand::Nominal,
        "PROCEED: System stable. Continue with validation pipeline.",
    ),
    (FrequencyBand::Optimal, "ADVANCE: Ready for Diamond Hands review."),
    (
        FrequencyBand::Peak,
        "EXECUTE: Maximum coherence achieved. Full speed ahead.",
    ),
];

pub(crate) fn validators(header: &Header<'_>) -> RenderResult {
    let mut out = String::new();
    header.write(&mut out, "validators.ts", "validation predicates")?;

    writeln!(
        out,
        "import type {{ ComponentWeights, FrequencyBand, ValidationLevel }} from './types';"
    )?;
    writeln!(
        out,
        "import {{ APPROVAL_POLICY, EVIDENCE_POLICY, METRICS, REQUIRED_VALIDATION_LEVELS, THRESHOLDS, VALIDATION_LEVELS, WEIGHTS, WEIGHT_SUM_TOLERANCE }} from './constants';"
    )?;
    writeln!(out)?;

    writeln!(out, "export function isScore(value: number): boolean {{")?;
    writeln!(
        out,
        "  return Number.isFinite(value) && value >= 0 && value <= 1;"
    )?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "export function classifyBand(score: number): FrequencyBand {{")?;
    for (field, band) in Thresholds::FIELDS.iter().zip(FrequencyBand::ALL) {
        writeln!(out, "  if (score < THRESHOLDS.{field}) {{")?;
        writeln!(out, "    return {};", quote(band.as_str()))?;
        writeln!(out, "  }}")?;
    }
    writeln!(out, "  return {};", quote(FrequencyBand::Peak.as_str()))?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(
        out,
        "export function validateWeights(weights: ComponentWeights = WEIGHTS): boolean {{"
    )?;
    let terms: Vec<String> = ComponentWeights::FIELDS
        .iter()
        .map(|f| format!("weights.{f}"))
        .collect();
    writeln!(out, "  const sum = {};", terms.join(" + "))?;
    writeln!(out, "  return Math.abs(sum - 1) <= WEIGHT_SUM_TOLERANCE;")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(
        out,
        "export function isValidationLevel(value: string): value is ValidationLevel {{"
    )?;
    writeln!(
        out,
        "  return (VALIDATION_LEVELS as readonly string[]).includes(value);"
    )?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(
        out,
        "export function computeComponentFrequency(scores: Readonly<Record<string, number>>): number {{"
    )?;
    writeln!(
        out,
        "  return METRICS.reduce((sum, metric) => sum + (scores[metric.name] ?? 0) * metric.weight, 0);"
    )?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(
        out,
        "export function computeValidationScore(passed: number, total: number): number {{"
    )?;
    writeln!(out, "  return total > 0 ? passed / total : 0;")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(
        out,
        "export function computeFTotal(componentFrequencies: readonly number[], validationScore: number): number {{"
    )?;
    writeln!(out, "  if (componentFrequencies.length === 0) {{")?;
    writeln!(out, "    return 0;")?;
    writeln!(out, "  }}")?;
    writeln!(
        out,
        "  const mean = componentFrequencies.reduce((sum, f) => sum + f, 0) / componentFrequencies.length;"
    )?;
    writeln!(
        out,
        "  return mean * ({} + {} * validationScore);",
        number(VALIDATION_FACTOR_FLOOR),
        number(VALIDATION_FACTOR_SPAN)
    )?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(
        out,
        "export function isApprovalReady(score: number, validationScore: number): boolean {{"
    )?;
    writeln!(
        out,
        "  return score >= APPROVAL_POLICY.threshold && validationScore >= APPROVAL_POLICY.requiredScore;"
    )?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(
        out,
        "export function hasRequiredValidations(passedLevels: readonly string[]): boolean {{"
    )?;
    writeln!(
        out,
        "  return REQUIRED_VALIDATION_LEVELS.every((level) => passedLevels.includes(level));"
    )?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(
        out,
        "export function hasRequiredArtifacts(artifacts: readonly string[]): boolean {{"
    )?;
    writeln!(
        out,
        "  return EVIDENCE_POLICY.requiredArtifacts.every((artifact) => artifacts.includes(artifact));"
    )?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(
        out,
        "export function recommendationFor(band: FrequencyBand): string {{"
    )?;
    writeln!(out, "  switch (band) {{")?;
    for (band, text) in RECOMMENDATIONS {
        writeln!(out, "    case {}:", quote(band.as_str()))?;
        writeln!(out, "      return {};", quote(text))?;
    }
    writeln!(out, "  }}")?;
    writeln!(out, "}}")?;
    Ok(out)
}

/// Runtime object keys and the constants they point at.
const RUNTIME_FIELDS: [(&str, &str); 10] = [
    ("version", "CONFIG_VERSION"),
    ("projectName", "PROJECT_NAME"),
    ("configHash", "CONFIG_HASH"),
    ("thresholds", "THRESHOLDS"),
    ("weights", "WEIGHTS"),
    ("approval", "APPROVAL_POLICY"),
    ("validationLevels", "VALIDATION_LEVELS"),
    ("requiredValidationLevels", "REQUIRED_VALIDATION_LEVELS"),
    ("metrics", "METRICS"),
    ("evidence", "EVIDENCE_POLICY"),
];

pub(crate) fn runtime_config(header: &Header<'_>) -> RenderResult {
    let mut out = String::new();
    header.write(&mut out, "config.ts", "runtime configuration")?;

    let mut imported: Vec<&str> = RUNTIME_FIELDS.iter().map(|(_, c)| *c).collect();
    imported.sort_unstable();
    writeln!(out, "import type {{ RuntimeConfig }} from './types';")?;
    writeln!(out, "import {{ {} }} from './constants';", imported.join(", "))?;
    writeln!(out, "import {{ validateWeights }} from './validators';")?;
    writeln!(out)?;

    write!(out, "export const RUNTIME_CONFIG: RuntimeConfig = ")?;
    let entries: Vec<(&str, String)> = RUNTIME_FIELDS
        .iter()
        .map(|(key, constant)| (*key, constant.to_string()))
        .collect();
    object(&mut out, &entries)?;
    writeln!(out, ";")?;
    writeln!(out)?;

    writeln!(out, "export function getRuntimeConfig(): RuntimeConfig {{")?;
    writeln!(out, "  return RUNTIME_CONFIG;")?;
    writeln!(out, "}}")?;
    writeln!(out)?;
    writeln!(
        out,
        "export const WEIGHTS_SELF_CHECK: boolean = validateWeights(WEIGHTS);"
    )?;
    Ok(out)
}

/// Modules re-exported by `index.ts`, in emission order.
pub(crate) const MODULES: [&str; 4] = ["types", "constants", "validators", "config"];

pub(crate) fn index(header: &Header<'_>) -> RenderResult {
    let mut out = String::new();
    header.write(&mut out, "index.ts", "public entry point")?;
    for module in MODULES {
        writeln!(out, "export * from {};", quote(&format!("./{module}")))?;
    }
    Ok(out)
}
