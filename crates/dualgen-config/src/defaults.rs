//! The default table.
//!
//! Every optional field of a configuration document falls back to a value
//! defined here and nowhere else. Both readers reach these values only through
//! [`crate::resolve`].

use std::collections::BTreeMap;

use crate::model::{
    ApprovalPolicy, CiPolicy, ComponentWeights, Configuration, EvidencePolicy, MetricSpec,
    NotificationPolicy, ProjectInfo, Thresholds, ValidationPolicy,
};

/// Manifest-level tolerance on the component weight sum. Exceeding it is a
/// warning.
pub const WEIGHT_SUM_TOLERANCE: f64 = 0.01;

/// Tolerance used by the generated runtime self-check. Stricter than the
/// manifest tolerance; the two are intentionally distinct.
pub const RUNTIME_WEIGHT_SUM_TOLERANCE: f64 = 0.001;

pub const THRESHOLDS: Thresholds = Thresholds {
    critical: 0.3,
    low: 0.5,
    nominal: 0.7,
    optimal: 0.9,
};

pub const WEIGHTS: ComponentWeights = ComponentWeights {
    governance: 0.30,
    architecture: 0.25,
    implementation: 0.25,
    validation: 0.20,
};

pub const APPROVAL_THRESHOLD: f64 = 0.7;
pub const APPROVAL_REQUIRED_SCORE: f64 = 0.8;

pub const VALIDATION_LEVELS: [&str; 4] = [
    "self_assessment",
    "peer_review",
    "external_validation",
    "final_review",
];
pub const REQUIRED_VALIDATION_LEVELS: [&str; 3] =
    ["self_assessment", "peer_review", "external_validation"];

/// `(name, description, weight)`.
pub const METRICS: [(&str, &str, f64); 5] = [
    ("coherence", "Internal consistency of the component", 0.25),
    ("alignment", "Alignment with governance policy", 0.25),
    ("velocity", "Rate of delivery progress", 0.15),
    ("stability", "Operational stability", 0.20),
    ("evidence_score", "Completeness of supporting evidence", 0.15),
];

pub const EVIDENCE_OUTPUT_DIR: &str = "evidence";
pub const EVIDENCE_FORMATS: [&str; 1] = ["json"];
pub const EVIDENCE_RETENTION_DAYS: u32 = 90;
pub const EVIDENCE_REQUIRED_ARTIFACTS: [&str; 1] = ["frequency_report.json"];

pub const CI_TRIGGERS: [&str; 2] = ["push", "pull_request"];
pub const CI_BRANCHES: [&str; 1] = ["main"];
pub const CI_FAIL_ON_MISMATCH: bool = true;

pub const NOTIFY_ON_MISMATCH: bool = true;

pub(crate) fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn approval() -> ApprovalPolicy {
    ApprovalPolicy {
        threshold: APPROVAL_THRESHOLD,
        required_score: APPROVAL_REQUIRED_SCORE,
        approvers: Vec::new(),
    }
}

pub fn validation() -> ValidationPolicy {
    ValidationPolicy {
        levels: strings(&VALIDATION_LEVELS),
        required: strings(&REQUIRED_VALIDATION_LEVELS),
    }
}

pub fn metrics() -> BTreeMap<String, MetricSpec> {
    METRICS
        .iter()
        .map(|(name, description, weight)| {
            (
                name.to_string(),
                MetricSpec {
                    description: description.to_string(),
                    weight: *weight,
                    sources: Vec::new(),
                },
            )
        })
        .collect()
}

pub fn evidence() -> EvidencePolicy {
    EvidencePolicy {
        output_dir: EVIDENCE_OUTPUT_DIR.to_string(),
        formats: strings(&EVIDENCE_FORMATS),
        retention_days: EVIDENCE_RETENTION_DAYS,
        required_artifacts: strings(&EVIDENCE_REQUIRED_ARTIFACTS),
    }
}

pub fn ci() -> CiPolicy {
    CiPolicy {
        triggers: strings(&CI_TRIGGERS),
        branches: strings(&CI_BRANCHES),
        fail_on_mismatch: CI_FAIL_ON_MISMATCH,
    }
}

pub fn notifications() -> NotificationPolicy {
    NotificationPolicy {
        channels: Vec::new(),
        on_mismatch: NOTIFY_ON_MISMATCH,
    }
}

/// A configuration with only the required fields set.
pub fn configuration(version: &str, project_name: &str) -> Configuration {
    Configuration {
        version: version.to_string(),
        project: ProjectInfo {
            name: project_name.to_string(),
            description: String::new(),
            owner: String::new(),
        },
        thresholds: THRESHOLDS,
        weights: WEIGHTS,
        approval: approval(),
        validation: validation(),
        metrics: metrics(),
        evidence: evidence(),
        ci: ci(),
        notifications: notifications(),
        roles: BTreeMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_tolerance_is_stricter() {
        assert!(RUNTIME_WEIGHT_SUM_TOLERANCE < WEIGHT_SUM_TOLERANCE);
    }

    #[test]
    fn default_metric_weights_sum_to_one() {
        let sum: f64 = METRICS.iter().map(|(_, _, w)| w).sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn required_levels_are_declared() {
        for level in REQUIRED_VALIDATION_LEVELS {
            assert!(VALIDATION_LEVELS.contains(&level));
        }
    }

    #[test]
    fn minimal_configuration_uses_table() {
        let config = configuration("1", "p");
        assert_eq!(config.thresholds, THRESHOLDS);
        assert_eq!(config.metrics.len(), METRICS.len());
        assert_eq!(config.evidence.retention_days, 90);
        assert!(config.roles.is_empty());
    }
}
