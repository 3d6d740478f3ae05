use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use dualgen_types::{ContentDigest, ContentHasher, TypeError};

/// A fully specified configuration. Every field has a value; absent sections
/// were filled from the default table when the configuration was resolved.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub version: String,
    pub project: ProjectInfo,
    pub thresholds: Thresholds,
    pub weights: ComponentWeights,
    pub approval: ApprovalPolicy,
    pub validation: ValidationPolicy,
    /// Metric definitions keyed by name. Ordered by name, so emission order
    /// never depends on the order the document listed them in.
    pub metrics: BTreeMap<String, MetricSpec>,
    pub evidence: EvidencePolicy,
    pub ci: CiPolicy,
    pub notifications: NotificationPolicy,
    pub roles: BTreeMap<String, Vec<String>>,
}

impl Configuration {
    /// Content hash of the configuration.
    ///
    /// The value is converted to a `serde_json::Value` first, whose maps are
    /// key-sorted, so the hash depends only on content and never on the key
    /// order of the source document.
    pub fn canonical_hash(&self) -> Result<ContentDigest, TypeError> {
        let value =
            serde_json::to_value(self).map_err(|e| TypeError::Serialization(e.to_string()))?;
        ContentHasher::CONFIG.hash_json(&value)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub name: String,
    pub description: String,
    pub owner: String,
}

/// Upper bounds of the frequency bands below peak, in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub critical: f64,
    pub low: f64,
    pub nominal: f64,
    pub optimal: f64,
}

impl Thresholds {
    /// Field names in declaration order.
    pub const FIELDS: [&'static str; 4] = ["critical", "low", "nominal", "optimal"];

    /// Values in declaration order.
    pub fn values(&self) -> [f64; 4] {
        [self.critical, self.low, self.nominal, self.optimal]
    }

    /// `critical < low < nominal < optimal`.
    pub fn is_strictly_increasing(&self) -> bool {
        self.critical < self.low && self.low < self.nominal && self.nominal < self.optimal
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentWeights {
    pub governance: f64,
    pub architecture: f64,
    pub implementation: f64,
    pub validation: f64,
}

impl ComponentWeights {
    /// Field names in declaration order.
    pub const FIELDS: [&'static str; 4] =
        ["governance", "architecture", "implementation", "validation"];

    /// Values in declaration order.
    pub fn values(&self) -> [f64; 4] {
        [
            self.governance,
            self.architecture,
            self.implementation,
            self.validation,
        ]
    }

    pub fn sum(&self) -> f64 {
        self.values().iter().sum()
    }
}

/// When a score is high enough to escalate for approval.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApprovalPolicy {
    pub threshold: f64,
    pub required_score: f64,
    pub approvers: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ValidationPolicy {
    /// All validation levels, in escalation order.
    pub levels: Vec<String>,
    /// The subset of `levels` that must pass.
    pub required: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetricSpec {
    pub description: String,
    pub weight: f64,
    pub sources: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EvidencePolicy {
    pub output_dir: String,
    pub formats: Vec<String>,
    pub retention_days: u32,
    pub required_artifacts: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CiPolicy {
    pub triggers: Vec<String>,
    pub branches: Vec<String>,
    pub fail_on_mismatch: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NotificationPolicy {
    pub channels: Vec<String>,
    pub on_mismatch: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults;

    fn sample() -> Configuration {
        defaults::configuration("2.0.0", "lumen")
    }

    #[test]
    fn default_thresholds_increase() {
        assert!(sample().thresholds.is_strictly_increasing());
    }

    #[test]
    fn default_weights_sum_to_one() {
        assert!((sample().weights.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn canonical_hash_is_stable() {
        let a = sample().canonical_hash().unwrap();
        let b = sample().canonical_hash().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn canonical_hash_tracks_content() {
        let mut changed = sample();
        changed.thresholds.low = 0.55;
        assert_ne!(
            sample().canonical_hash().unwrap(),
            changed.canonical_hash().unwrap()
        );
    }

    #[test]
    fn canonical_json_has_sorted_keys() {
        let value = serde_json::to_value(sample()).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        let mut sorted = keys.clone();
        sorted.sort();
        assert_eq!(keys, sorted);
    }
}
