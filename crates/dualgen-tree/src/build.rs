//! Builds the node tree for each artifact.

use dualgen_config::{ComponentWeights, Configuration, Thresholds};
use dualgen_types::{ContentDigest, FileCategory, GeneratorIdentity};

use crate::node::{Expr, Module, Node, Param, Stmt, Value};

/// Shared inputs for every module.
pub struct Context<'a> {
    pub identity: &'a GeneratorIdentity,
    pub config: &'a Configuration,
    pub config_hash: &'a ContentDigest,
}

impl Context<'_> {
    fn module(&self, path: &str, nodes: Vec<Node>) -> Module {
        Module {
            path: path.to_string(),
            header: vec![
                format!("@file {path}"),
                format!("@generated {}", self.identity),
                format!(
                    "Source: {} {}. Regenerate instead of editing.",
                    self.config.project.name, self.config.version
                ),
            ],
            nodes,
        }
    }
}

/// All modules with their categories, in emission order.
pub fn modules(cx: &Context<'_>) -> Vec<(Module, FileCategory)> {
    vec![
        (types(cx), FileCategory::Types),
        (constants(cx), FileCategory::Constants),
        (validators(cx), FileCategory::Validators),
        (runtime(cx), FileCategory::Config),
        (index(cx), FileCategory::Index),
    ]
}

fn names(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn import(type_only: bool, items: &[&str], from: &str) -> Node {
    Node::Import {
        names: names(items),
        from: from.to_string(),
        type_only,
    }
}

fn interface(name: &str, members: &[(&str, &str)]) -> Node {
    Node::Interface {
        name: name.to_string(),
        members: members
            .iter()
            .map(|(m, t)| (m.to_string(), t.to_string()))
            .collect(),
    }
}

fn constant(name: &str, ty: Option<&str>, value: Expr) -> Node {
    Node::Constant {
        name: name.to_string(),
        ty: ty.map(str::to_string),
        value,
    }
}

fn function(name: &str, params: Vec<Param>, returns: &str, body: Vec<Stmt>) -> Node {
    Node::Function {
        name: name.to_string(),
        params,
        returns: returns.to_string(),
        body,
    }
}

/// Frequency bands, lowest first, with the guidance `recommendationFor`
/// returns. Every band but the last ends at the threshold of the same name.
const BANDS: [(&str, &str); 5] = [
    (
        "critical",
        "HALT: System requires immediate attention. Do not proceed with POC.",
    ),
    ("low", "CAUTION: Address deficiencies before Thunder Strike review."),
    (
        "nominal",
        "PROCEED: System stable. Continue with validation pipeline.",
    ),
    ("optimal", "ADVANCE: Ready for Diamond Hands review."),
    ("peak", "EXECUTE: Maximum coherence achieved. Full speed ahead."),
];

const WEIGHT_FIELDS: [&str; 4] = ["governance", "architecture", "implementation", "validation"];

fn thresholds(t: &Thresholds) -> [(&'static str, f64); 4] {
    [
        ("critical", t.critical),
        ("low", t.low),
        ("nominal", t.nominal),
        ("optimal", t.optimal),
    ]
}

fn weights(w: &ComponentWeights) -> [(&'static str, f64); 4] {
    [
        ("governance", w.governance),
        ("architecture", w.architecture),
        ("implementation", w.implementation),
        ("validation", w.validation),
    ]
}

fn numbers(entries: [(&str, f64); 4]) -> Value {
    Value::object(entries.map(|(f, v)| (f, Value::Num(v))))
}

fn number_members(fields: &[&'static str]) -> Vec<(&'static str, &'static str)> {
    fields.iter().map(|f| (*f, "number")).collect()
}

fn types(cx: &Context<'_>) -> Module {
    let config = cx.config;
    let nodes = vec![
        Node::TypeAlias {
            name: "FrequencyBand".into(),
            members: BANDS.iter().map(|(band, _)| band.to_string()).collect(),
        },
        Node::TypeAlias {
            name: "ValidationLevel".into(),
            members: config.validation.levels.clone(),
        },
        Node::TypeAlias {
            name: "MetricName".into(),
            members: config.metrics.keys().cloned().collect(),
        },
        interface(
            "Thresholds",
            &number_members(&thresholds(&config.thresholds).map(|(f, _)| f)),
        ),
        interface("ComponentWeights", &number_members(&WEIGHT_FIELDS)),
        interface(
            "ApprovalPolicy",
            &[
                ("threshold", "number"),
                ("requiredScore", "number"),
                ("approvers", "readonly string[]"),
            ],
        ),
        interface(
            "MetricDefinition",
            &[
                ("name", "MetricName"),
                ("description", "string"),
                ("weight", "number"),
                ("sources", "readonly string[]"),
            ],
        ),
        interface(
            "EvidencePolicy",
            &[
                ("outputDir", "string"),
                ("formats", "readonly string[]"),
                ("retentionDays", "number"),
                ("requiredArtifacts", "readonly string[]"),
            ],
        ),
        interface("RuntimeConfig", &RUNTIME_SHAPE.map(|(key, ty, _)| (key, ty))),
    ];
    cx.module("types.ts", nodes)
}

fn constants(cx: &Context<'_>) -> Module {
    let config = cx.config;
    let metrics = config
        .metrics
        .iter()
        .map(|(name, metric)| {
            Value::object([
                ("name", Value::str(name)),
                ("description", Value::str(&metric.description)),
                ("weight", Value::Num(metric.weight)),
                ("sources", Value::strings(&metric.sources)),
            ])
        })
        .collect();
    let evidence = &config.evidence;

    let nodes = vec![
        import(
            true,
            &[
                "ApprovalPolicy",
                "ComponentWeights",
                "EvidencePolicy",
                "MetricDefinition",
                "Thresholds",
                "ValidationLevel",
            ],
            "./types",
        ),
        constant("CONFIG_VERSION", None, Expr::Value(Value::str(&config.version))),
        constant("PROJECT_NAME", None, Expr::Value(Value::str(&config.project.name))),
        constant("CONFIG_HASH", None, Expr::Value(Value::str(cx.config_hash.to_hex()))),
        constant(
            "THRESHOLDS",
            Some("Thresholds"),
            Expr::Value(numbers(thresholds(&config.thresholds))),
        ),
        constant(
            "WEIGHTS",
            Some("ComponentWeights"),
            Expr::Value(numbers(weights(&config.weights))),
        ),
        constant(
            "APPROVAL_POLICY",
            Some("ApprovalPolicy"),
            Expr::Value(Value::object([
                ("threshold", Value::Num(config.approval.threshold)),
                ("requiredScore", Value::Num(config.approval.required_score)),
                ("approvers", Value::strings(&config.approval.approvers)),
            ])),
        ),
        constant(
            "VALIDATION_LEVELS",
            Some("readonly ValidationLevel[]"),
            Expr::Value(Value::strings(&config.validation.levels)),
        ),
        constant(
            "REQUIRED_VALIDATION_LEVELS",
            Some("readonly ValidationLevel[]"),
            Expr::Value(Value::strings(&config.validation.required)),
        ),
        constant(
            "METRICS",
            Some("readonly MetricDefinition[]"),
            Expr::Value(Value::Array(metrics)),
        ),
        constant(
            "EVIDENCE_POLICY",
            Some("EvidencePolicy"),
            Expr::Value(Value::object([
                ("outputDir", Value::str(&evidence.output_dir)),
                ("formats", Value::strings(&evidence.formats)),
                ("retentionDays", Value::Int(u64::from(evidence.retention_days))),
                ("requiredArtifacts", Value::strings(&evidence.required_artifacts)),
            ])),
        ),
        constant(
            "WEIGHT_SUM_TOLERANCE",
            None,
            Expr::Value(Value::Num(RUNTIME_TOLERANCE)),
        ),
    ];
    cx.module("constants.ts", nodes)
}

/// Tolerance the generated self-check applies to the weight sum.
const RUNTIME_TOLERANCE: f64 = 0.001;

/// The validation factor runs from the floor (nothing passed) to
/// `floor + span` (everything passed).
const FACTOR_FLOOR: f64 = 0.8;
const FACTOR_SPAN: f64 = 0.2;

fn returns(code: &str) -> Vec<Stmt> {
    vec![Stmt::Return(Expr::code(code))]
}

fn validators(cx: &Context<'_>) -> Module {
    let mut band_checks: Vec<Stmt> = thresholds(&cx.config.thresholds)
        .iter()
        .zip(BANDS)
        .map(|((field, _), (band, _))| Stmt::If {
            condition: format!("score < THRESHOLDS.{field}"),
            then: vec![Stmt::Return(Expr::Value(Value::str(band)))],
        })
        .collect();
    let (top, _) = BANDS[BANDS.len() - 1];
    band_checks.push(Stmt::Return(Expr::Value(Value::str(top))));

    let weight_sum = WEIGHT_FIELDS
        .iter()
        .map(|f| format!("weights.{f}"))
        .collect::<Vec<_>>()
        .join(" + ");

    let recommendations = BANDS
        .iter()
        .map(|(band, text)| {
            (
                Value::str(*band),
                vec![Stmt::Return(Expr::Value(Value::str(*text)))],
            )
        })
        .collect();

    let nodes = vec![
        import(
            true,
            &["ComponentWeights", "FrequencyBand", "ValidationLevel"],
            "./types",
        ),
        import(
            false,
            &[
                "APPROVAL_POLICY",
                "EVIDENCE_POLICY",
                "METRICS",
                "REQUIRED_VALIDATION_LEVELS",
                "THRESHOLDS",
                "VALIDATION_LEVELS",
                "WEIGHTS",
                "WEIGHT_SUM_TOLERANCE",
            ],
            "./constants",
        ),
        function(
            "isScore",
            vec![Param::new("value", "number")],
            "boolean",
            returns("Number.isFinite(value) && value >= 0 && value <= 1"),
        ),
        function(
            "classifyBand",
            vec![Param::new("score", "number")],
            "FrequencyBand",
            band_checks,
        ),
        function(
            "validateWeights",
            vec![Param::new("weights", "ComponentWeights").with_default("WEIGHTS")],
            "boolean",
            vec![
                Stmt::Const {
                    name: "sum".into(),
                    value: Expr::Code(weight_sum),
                },
                Stmt::Return(Expr::code("Math.abs(sum - 1) <= WEIGHT_SUM_TOLERANCE")),
            ],
        ),
        function(
            "isValidationLevel",
            vec![Param::new("value", "string")],
            "value is ValidationLevel",
            returns("(VALIDATION_LEVELS as readonly string[]).includes(value)"),
        ),
        function(
            "computeComponentFrequency",
            vec![Param::new("scores", "Readonly<Record<string, number>>")],
            "number",
            returns(
                "METRICS.reduce((sum, metric) => sum + (scores[metric.name] ?? 0) * metric.weight, 0)",
            ),
        ),
        function(
            "computeValidationScore",
            vec![
                Param::new("passed", "number"),
                Param::new("total", "number"),
            ],
            "number",
            returns("total > 0 ? passed / total : 0"),
        ),
        function(
            "computeFTotal",
            vec![
                Param::new("componentFrequencies", "readonly number[]"),
                Param::new("validationScore", "number"),
            ],
            "number",
            vec![
                Stmt::If {
                    condition: "componentFrequencies.length === 0".into(),
                    then: vec![Stmt::Return(Expr::Value(Value::Int(0)))],
                },
                Stmt::Const {
                    name: "mean".into(),
                    value: Expr::code(
                        "componentFrequencies.reduce((sum, f) => sum + f, 0) / componentFrequencies.length",
                    ),
                },
                Stmt::Return(Expr::Code(format!(
                    "mean * ({FACTOR_FLOOR} + {FACTOR_SPAN} * validationScore)"
                ))),
            ],
        ),
        function(
            "isApprovalReady",
            vec![
                Param::new("score", "number"),
                Param::new("validationScore", "number"),
            ],
            "boolean",
            returns(
                "score >= APPROVAL_POLICY.threshold && validationScore >= APPROVAL_POLICY.requiredScore",
            ),
        ),
        function(
            "hasRequiredValidations",
            vec![Param::new("passedLevels", "readonly string[]")],
            "boolean",
            returns("REQUIRED_VALIDATION_LEVELS.every((level) => passedLevels.includes(level))"),
        ),
        function(
            "hasRequiredArtifacts",
            vec![Param::new("artifacts", "readonly string[]")],
            "boolean",
            returns(
                "EVIDENCE_POLICY.requiredArtifacts.every((artifact) => artifacts.includes(artifact))",
            ),
        ),
        function(
            "recommendationFor",
            vec![Param::new("band", "FrequencyBand")],
            "string",
            vec![Stmt::Switch {
                subject: "band".into(),
                cases: recommendations,
            }],
        ),
    ];
    cx.module("validators.ts", nodes)
}

/// `RuntimeConfig` members: key, type, and the constant holding the value.
const RUNTIME_SHAPE: [(&str, &str, &str); 10] = [
    ("version", "string", "CONFIG_VERSION"),
    ("projectName", "string", "PROJECT_NAME"),
    ("configHash", "string", "CONFIG_HASH"),
    ("thresholds", "Thresholds", "THRESHOLDS"),
    ("weights", "ComponentWeights", "WEIGHTS"),
    ("approval", "ApprovalPolicy", "APPROVAL_POLICY"),
    ("validationLevels", "readonly ValidationLevel[]", "VALIDATION_LEVELS"),
    (
        "requiredValidationLevels",
        "readonly ValidationLevel[]",
        "REQUIRED_VALIDATION_LEVELS",
    ),
    ("metrics", "readonly MetricDefinition[]", "METRICS"),
    ("evidence", "EvidencePolicy", "EVIDENCE_POLICY"),
];

fn runtime(cx: &Context<'_>) -> Module {
    let mut imported: Vec<&str> = RUNTIME_SHAPE.iter().map(|(_, _, c)| *c).collect();
    imported.sort_unstable();
    let object = Value::object(
        RUNTIME_SHAPE
            .iter()
            .map(|(key, _, constant)| (*key, Value::Ref(constant.to_string()))),
    );

    let nodes = vec![
        import(true, &["RuntimeConfig"], "./types"),
        import(false, &imported, "./constants"),
        import(false, &["validateWeights"], "./validators"),
        constant("RUNTIME_CONFIG", Some("RuntimeConfig"), Expr::Value(object)),
        function(
            "getRuntimeConfig",
            Vec::new(),
            "RuntimeConfig",
            vec![Stmt::Return(Expr::code("RUNTIME_CONFIG"))],
        ),
        constant(
            "WEIGHTS_SELF_CHECK",
            Some("boolean"),
            Expr::code("validateWeights(WEIGHTS)"),
        ),
    ];
    cx.module("config.ts", nodes)
}

fn index(cx: &Context<'_>) -> Module {
    let nodes = ["./types", "./constants", "./validators", "./config"]
        .into_iter()
        .map(|from| Node::Export {
            from: from.to_string(),
        })
        .collect();
    cx.module("index.ts", nodes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dualgen_config::defaults;

    fn with_context<T>(f: impl FnOnce(&Context<'_>) -> T) -> T {
        let identity = GeneratorIdentity::new("tree-test", "0.0.1");
        let config = defaults::configuration("2.0.0", "lumen");
        let hash = config.canonical_hash().unwrap();
        f(&Context {
            identity: &identity,
            config: &config,
            config_hash: &hash,
        })
    }

    #[test]
    fn five_modules_in_order() {
        let paths: Vec<String> =
            with_context(|cx| modules(cx).into_iter().map(|(m, _)| m.path).collect());
        assert_eq!(
            paths,
            ["types.ts", "constants.ts", "validators.ts", "config.ts", "index.ts"]
        );
    }

    #[test]
    fn band_checks_cover_every_threshold() {
        let module = with_context(validators);
        let classify = module
            .nodes
            .iter()
            .find_map(|n| match n {
                Node::Function { name, body, .. } if name == "classifyBand" => Some(body.clone()),
                _ => None,
            })
            .unwrap();
        assert_eq!(classify.len(), BANDS.len());
    }

    #[test]
    fn metrics_are_name_ordered() {
        let module = with_context(types);
        let members = module
            .nodes
            .iter()
            .find_map(|n| match n {
                Node::TypeAlias { name, members } if name == "MetricName" => Some(members.clone()),
                _ => None,
            })
            .unwrap();
        let mut sorted = members.clone();
        sorted.sort();
        assert_eq!(members, sorted);
    }

    #[test]
    fn header_names_generator() {
        let module = with_context(index);
        assert!(module.header.iter().any(|l| l == "@generated tree-test@0.0.1"));
    }
}
