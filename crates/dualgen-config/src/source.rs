use std::collections::BTreeMap;

use tracing::debug;

use dualgen_types::{IssueCode, ValidationReport};

use crate::defaults;
use crate::model::{
    ApprovalPolicy, CiPolicy, ComponentWeights, Configuration, EvidencePolicy, MetricSpec,
    NotificationPolicy, ProjectInfo, Thresholds, ValidationPolicy,
};
use crate::validation::validate;

/// A scalar or list value as a reader found it in the document.
#[derive(Clone, Debug, PartialEq)]
pub enum RawValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<RawValue>),
}

impl RawValue {
    /// Text form of a scalar. Lists have none.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Bool(b) => Some(b.to_string()),
            Self::Number(n) => Some(n.to_string()),
            Self::Text(s) => Some(s.clone()),
            Self::List(_) => None,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::Text(_) => "string",
            Self::List(_) => "list",
        }
    }
}

/// What a configuration reader exposes to [`resolve`].
///
/// Paths are key segments from the document root, e.g.
/// `["thresholds", "low"]`. A mapping has no value of its own, only keys.
pub trait FieldSource {
    /// The scalar or list stored at `path`, if any.
    fn value(&self, path: &[&str]) -> Option<RawValue>;

    /// Child keys of the mapping at `path`, in document order.
    fn keys(&self, path: &[&str]) -> Vec<String>;

    /// Returns `true` if `path` holds a value or a non-empty mapping.
    fn contains(&self, path: &[&str]) -> bool {
        self.value(path).is_some() || !self.keys(path).is_empty()
    }
}

/// A resolved configuration plus the type warnings raised while resolving.
#[derive(Clone, Debug)]
pub struct Resolution {
    pub config: Configuration,
    pub report: ValidationReport,
}

impl Resolution {
    /// Run validation and merge its findings after the resolution warnings.
    pub fn validated(self) -> (Configuration, ValidationReport) {
        let mut report = self.report;
        let checked = validate(&self.config);
        report.errors.extend(checked.errors);
        report.warnings.extend(checked.warnings);
        (self.config, report)
    }
}

/// Map whatever a reader found onto a fully specified [`Configuration`].
///
/// Total: every field ends up with a value. A field that is absent takes its
/// default silently; a field of the wrong type takes its default and raises a
/// `FIELD_TYPE` warning.
pub fn resolve(source: &dyn FieldSource) -> Resolution {
    let mut r = Resolver {
        source,
        report: ValidationReport::new(),
    };

    let version = r.text(&["version"], "");
    let project = ProjectInfo {
        name: r.text(&["project", "name"], ""),
        description: r.text(&["project", "description"], ""),
        owner: r.text(&["project", "owner"], ""),
    };

    let t = defaults::THRESHOLDS;
    let thresholds = Thresholds {
        critical: r.number(&["thresholds", "critical"], t.critical),
        low: r.number(&["thresholds", "low"], t.low),
        nominal: r.number(&["thresholds", "nominal"], t.nominal),
        optimal: r.number(&["thresholds", "optimal"], t.optimal),
    };

    let w = defaults::WEIGHTS;
    let weights = ComponentWeights {
        governance: r.number(&["weights", "governance"], w.governance),
        architecture: r.number(&["weights", "architecture"], w.architecture),
        implementation: r.number(&["weights", "implementation"], w.implementation),
        validation: r.number(&["weights", "validation"], w.validation),
    };

    let approval = ApprovalPolicy {
        threshold: r.number(&["approval", "threshold"], defaults::APPROVAL_THRESHOLD),
        required_score: r.number(&["approval", "required_score"], defaults::APPROVAL_REQUIRED_SCORE),
        approvers: r.list(&["approval", "approvers"], &[]),
    };

    let validation = ValidationPolicy {
        levels: r.list(&["validation", "levels"], &defaults::VALIDATION_LEVELS),
        required: r.list(&["validation", "required"], &defaults::REQUIRED_VALIDATION_LEVELS),
    };

    let metrics = r.metrics();

    let evidence = EvidencePolicy {
        output_dir: r.text(&["evidence", "output_dir"], defaults::EVIDENCE_OUTPUT_DIR),
        formats: r.list(&["evidence", "formats"], &defaults::EVIDENCE_FORMATS),
        retention_days: r.days(&["evidence", "retention_days"], defaults::EVIDENCE_RETENTION_DAYS),
        required_artifacts: r.list(
            &["evidence", "required_artifacts"],
            &defaults::EVIDENCE_REQUIRED_ARTIFACTS,
        ),
    };

    let ci = CiPolicy {
        triggers: r.list(&["ci", "triggers"], &defaults::CI_TRIGGERS),
        branches: r.list(&["ci", "branches"], &defaults::CI_BRANCHES),
        fail_on_mismatch: r.flag(&["ci", "fail_on_mismatch"], defaults::CI_FAIL_ON_MISMATCH),
    };

    let notifications = NotificationPolicy {
        channels: r.list(&["notifications", "channels"], &[]),
        on_mismatch: r.flag(&["notifications", "on_mismatch"], defaults::NOTIFY_ON_MISMATCH),
    };

    let roles = r.roles();

    debug!(
        metrics = metrics.len(),
        roles = roles.len(),
        warnings = r.report.warnings.len(),
        "configuration resolved"
    );

    Resolution {
        config: Configuration {
            version,
            project,
            thresholds,
            weights,
            approval,
            validation,
            metrics,
            evidence,
            ci,
            notifications,
            roles,
        },
        report: r.report,
    }
}

struct Resolver<'a> {
    source: &'a dyn FieldSource,
    report: ValidationReport,
}

impl Resolver<'_> {
    fn mistyped(&mut self, path: &[&str], expected: &str, found: &RawValue) {
        self.report.warn(
            IssueCode::FieldType,
            path.join("."),
            format!("expected {expected}, found {}; using default", found.kind()),
        );
    }

    fn text(&mut self, path: &[&str], default: &str) -> String {
        match self.source.value(path) {
            None => default.to_string(),
            Some(value) => match value.as_text() {
                Some(text) => text,
                None => {
                    self.mistyped(path, "scalar", &value);
                    default.to_string()
                }
            },
        }
    }

    fn number(&mut self, path: &[&str], default: f64) -> f64 {
        match self.source.value(path) {
            None => default,
            Some(RawValue::Number(n)) => n,
            Some(other) => {
                self.mistyped(path, "number", &other);
                default
            }
        }
    }

    fn flag(&mut self, path: &[&str], default: bool) -> bool {
        match self.source.value(path) {
            None => default,
            Some(RawValue::Bool(b)) => b,
            Some(other) => {
                self.mistyped(path, "boolean", &other);
                default
            }
        }
    }

    fn days(&mut self, path: &[&str], default: u32) -> u32 {
        match self.source.value(path) {
            None => default,
            Some(RawValue::Number(n)) if n >= 0.0 && n.fract() == 0.0 && n <= u32::MAX as f64 => {
                n as u32
            }
            Some(other) => {
                self.mistyped(path, "non-negative whole number", &other);
                default
            }
        }
    }

    /// A list field. A lone scalar is read as a one-item list.
    fn list(&mut self, path: &[&str], default: &[&str]) -> Vec<String> {
        match self.source.value(path) {
            None => defaults::strings(default),
            Some(RawValue::List(items)) => {
                let mut out = Vec::with_capacity(items.len());
                for item in &items {
                    match item.as_text() {
                        Some(text) => out.push(text),
                        None => self.mistyped(path, "list of scalars", item),
                    }
                }
                out
            }
            Some(scalar) => scalar.as_text().into_iter().collect(),
        }
    }

    fn metrics(&mut self) -> BTreeMap<String, MetricSpec> {
        if let Some(value) = self.source.value(&["metrics"]) {
            self.mistyped(&["metrics"], "mapping", &value);
            return defaults::metrics();
        }
        if !self.source.contains(&["metrics"]) {
            return defaults::metrics();
        }
        let mut metrics = BTreeMap::new();
        for name in self.source.keys(&["metrics"]) {
            let spec = match self.source.value(&["metrics", name.as_str()]) {
                // Shorthand: `coherence: 0.25`.
                Some(RawValue::Number(weight)) => MetricSpec {
                    description: String::new(),
                    weight,
                    sources: Vec::new(),
                },
                Some(other) => {
                    self.mistyped(&["metrics", name.as_str()], "mapping or number", &other);
                    continue;
                }
                None => MetricSpec {
                    description: self.text(&["metrics", name.as_str(), "description"], ""),
                    weight: self.number(&["metrics", name.as_str(), "weight"], 0.0),
                    sources: self.list(&["metrics", name.as_str(), "sources"], &[]),
                },
            };
            metrics.insert(name, spec);
        }
        metrics
    }

    fn roles(&mut self) -> BTreeMap<String, Vec<String>> {
        let mut roles = BTreeMap::new();
        for name in self.source.keys(&["roles"]) {
            let members = self.list(&["roles", name.as_str()], &[]);
            roles.insert(name, members);
        }
        roles
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A source backed by dotted paths, for tests.
    #[derive(Default)]
    pub(crate) struct MapSource(pub BTreeMap<String, RawValue>);

    impl MapSource {
        pub(crate) fn with(mut self, path: &str, value: RawValue) -> Self {
            self.0.insert(path.to_string(), value);
            self
        }

        pub(crate) fn minimal() -> Self {
            Self::default()
                .with("version", RawValue::Text("2.0.0".into()))
                .with("project.name", RawValue::Text("lumen".into()))
        }
    }

    impl FieldSource for MapSource {
        fn value(&self, path: &[&str]) -> Option<RawValue> {
            self.0.get(&path.join(".")).cloned()
        }

        fn keys(&self, path: &[&str]) -> Vec<String> {
            let prefix = format!("{}.", path.join("."));
            let mut keys: Vec<String> = Vec::new();
            for key in self.0.keys() {
                if let Some(rest) = key.strip_prefix(&prefix) {
                    let first = rest.split('.').next().unwrap_or(rest).to_string();
                    if !keys.contains(&first) {
                        keys.push(first);
                    }
                }
            }
            keys
        }
    }

    #[test]
    fn minimal_source_resolves_to_defaults() {
        let resolution = resolve(&MapSource::minimal());
        assert!(resolution.report.warnings.is_empty());
        assert_eq!(resolution.config, defaults::configuration("2.0.0", "lumen"));
    }

    #[test]
    fn numeric_version_becomes_text() {
        let source = MapSource::minimal().with("version", RawValue::Number(2.0));
        assert_eq!(resolve(&source).config.version, "2");
    }

    #[test]
    fn wrong_type_falls_back_with_warning() {
        let source =
            MapSource::minimal().with("thresholds.low", RawValue::Text("half".into()));
        let resolution = resolve(&source);
        assert_eq!(resolution.config.thresholds.low, defaults::THRESHOLDS.low);
        assert_eq!(resolution.report.warnings.len(), 1);
        assert_eq!(resolution.report.warnings[0].code, IssueCode::FieldType);
        assert_eq!(resolution.report.warnings[0].field, "thresholds.low");
    }

    #[test]
    fn scalar_list_field_is_one_item() {
        let source =
            MapSource::minimal().with("evidence.formats", RawValue::Text("yaml".into()));
        assert_eq!(resolve(&source).config.evidence.formats, vec!["yaml"]);
    }

    #[test]
    fn metrics_replace_defaults_when_present() {
        let source = MapSource::minimal()
            .with("metrics.latency.description", RawValue::Text("p99".into()))
            .with("metrics.latency.weight", RawValue::Number(0.4))
            .with(
                "metrics.latency.sources",
                RawValue::List(vec![RawValue::Text("prometheus".into())]),
            )
            .with("metrics.errors", RawValue::Number(0.6));
        let metrics = resolve(&source).config.metrics;
        assert_eq!(metrics.len(), 2);
        assert_eq!(metrics["latency"].weight, 0.4);
        assert_eq!(metrics["latency"].sources, vec!["prometheus"]);
        assert_eq!(metrics["errors"].weight, 0.6);
        assert!(metrics["errors"].description.is_empty());
    }

    #[test]
    fn metrics_list_falls_back_with_warning() {
        let source = MapSource::minimal().with(
            "metrics",
            RawValue::List(vec![RawValue::Text("latency".into())]),
        );
        let resolution = resolve(&source);
        assert_eq!(resolution.config.metrics, defaults::metrics());
        assert_eq!(resolution.report.warnings.len(), 1);
        assert_eq!(resolution.report.warnings[0].code, IssueCode::FieldType);
        assert_eq!(resolution.report.warnings[0].field, "metrics");
    }

    #[test]
    fn retention_days_must_be_whole() {
        let source =
            MapSource::minimal().with("evidence.retention_days", RawValue::Number(1.5));
        let resolution = resolve(&source);
        assert_eq!(resolution.config.evidence.retention_days, 90);
        assert!(resolution.report.has_code(IssueCode::FieldType));
    }

    #[test]
    fn roles_collect_members() {
        let source = MapSource::minimal()
            .with(
                "roles.reviewer",
                RawValue::List(vec![RawValue::Text("ana".into()), RawValue::Text("kim".into())]),
            )
            .with("roles.owner", RawValue::Text("lee".into()));
        let roles = resolve(&source).config.roles;
        assert_eq!(roles["reviewer"], vec!["ana", "kim"]);
        assert_eq!(roles["owner"], vec!["lee"]);
    }

    #[test]
    fn validated_appends_validation_findings() {
        let source = MapSource::default();
        let (_, report) = resolve(&source).validated();
        assert!(report.has_code(IssueCode::MissingVersion));
        assert!(report.has_code(IssueCode::MissingProjectName));
    }
}
