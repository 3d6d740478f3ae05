use dualgen_types::{IssueCode, ValidationReport};

use crate::defaults::WEIGHT_SUM_TOLERANCE;
use crate::model::{ComponentWeights, Configuration, Thresholds};

fn in_unit_range(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

/// Check a resolved configuration.
///
/// Errors: missing version or project name, thresholds not strictly
/// increasing (reported once), approval threshold outside [0,1], any other
/// score outside [0,1]. Warnings: weight sum off by more than
/// [`WEIGHT_SUM_TOLERANCE`], empty or inconsistent validation levels.
pub fn validate(config: &Configuration) -> ValidationReport {
    let mut report = ValidationReport::new();

    if config.version.trim().is_empty() {
        report.error(IssueCode::MissingVersion, "version", "version is required");
    }
    if config.project.name.trim().is_empty() {
        report.error(
            IssueCode::MissingProjectName,
            "project.name",
            "project name is required",
        );
    }

    check_thresholds(&config.thresholds, &mut report);
    check_weights(&config.weights, &mut report);

    if !in_unit_range(config.approval.threshold) {
        report.error(
            IssueCode::InvalidApprovalThreshold,
            "approval.threshold",
            format!("{} is outside [0, 1]", config.approval.threshold),
        );
    }
    if !in_unit_range(config.approval.required_score) {
        report.error(
            IssueCode::ScoreOutOfRange,
            "approval.required_score",
            format!("{} is outside [0, 1]", config.approval.required_score),
        );
    }

    for (name, metric) in &config.metrics {
        if !in_unit_range(metric.weight) {
            report.error(
                IssueCode::ScoreOutOfRange,
                format!("metrics.{name}.weight"),
                format!("{} is outside [0, 1]", metric.weight),
            );
        }
    }

    if config.validation.levels.is_empty() {
        report.warn(
            IssueCode::EmptyValidationLevels,
            "validation.levels",
            "no validation levels declared",
        );
    }
    for level in &config.validation.required {
        if !config.validation.levels.contains(level) {
            report.warn(
                IssueCode::UnknownRequiredLevel,
                "validation.required",
                format!("'{level}' is not a declared validation level"),
            );
        }
    }

    report
}

fn check_thresholds(thresholds: &Thresholds, report: &mut ValidationReport) {
    for (field, value) in Thresholds::FIELDS.iter().zip(thresholds.values()) {
        if !in_unit_range(value) {
            report.error(
                IssueCode::ScoreOutOfRange,
                format!("thresholds.{field}"),
                format!("{value} is outside [0, 1]"),
            );
        }
    }
    if !thresholds.is_strictly_increasing() {
        report.error(
            IssueCode::InvalidThresholds,
            "thresholds",
            format!(
                "expected critical < low < nominal < optimal, got {} / {} / {} / {}",
                thresholds.critical, thresholds.low, thresholds.nominal, thresholds.optimal
            ),
        );
    }
}

fn check_weights(weights: &ComponentWeights, report: &mut ValidationReport) {
    for (field, value) in ComponentWeights::FIELDS.iter().zip(weights.values()) {
        if !in_unit_range(value) {
            report.error(
                IssueCode::ScoreOutOfRange,
                format!("weights.{field}"),
                format!("{value} is outside [0, 1]"),
            );
        }
    }
    let sum = weights.sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        report.warn(
            IssueCode::WeightSum,
            "weights",
            format!("weights sum to {sum:.4}, expected 1.0 within {WEIGHT_SUM_TOLERANCE}"),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults;

    fn base() -> Configuration {
        defaults::configuration("2.0.0", "lumen")
    }

    #[test]
    fn defaults_are_clean() {
        let report = validate(&base());
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn non_increasing_thresholds_yield_one_error() {
        let mut config = base();
        config.thresholds.critical = 0.6;
        config.thresholds.low = 0.5;
        let report = validate(&config);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].code, IssueCode::InvalidThresholds);
    }

    #[test]
    fn fully_reversed_thresholds_still_one_ordering_error() {
        let mut config = base();
        config.thresholds = Thresholds {
            critical: 0.9,
            low: 0.7,
            nominal: 0.5,
            optimal: 0.3,
        };
        let report = validate(&config);
        let ordering = report
            .errors
            .iter()
            .filter(|e| e.code == IssueCode::InvalidThresholds)
            .count();
        assert_eq!(ordering, 1);
    }

    #[test]
    fn weight_sum_off_is_warning_only() {
        let mut config = base();
        config.weights.validation = 0.25;
        let report = validate(&config);
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].code, IssueCode::WeightSum);
    }

    #[test]
    fn weight_sum_within_tolerance_is_clean() {
        let mut config = base();
        config.weights.validation = 0.205;
        assert!(validate(&config).warnings.is_empty());
    }

    #[test]
    fn approval_threshold_out_of_range() {
        let mut config = base();
        config.approval.threshold = 1.2;
        let report = validate(&config);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].code, IssueCode::InvalidApprovalThreshold);
    }

    #[test]
    fn metric_weight_out_of_range() {
        let mut config = base();
        config.metrics.get_mut("velocity").unwrap().weight = -0.1;
        let report = validate(&config);
        assert_eq!(report.errors[0].code, IssueCode::ScoreOutOfRange);
        assert_eq!(report.errors[0].field, "metrics.velocity.weight");
    }

    #[test]
    fn missing_identity_fields() {
        let config = defaults::configuration("", "  ");
        let report = validate(&config);
        assert!(report.has_code(IssueCode::MissingVersion));
        assert!(report.has_code(IssueCode::MissingProjectName));
    }

    #[test]
    fn unknown_required_level_warns() {
        let mut config = base();
        config.validation.required.push("audit".into());
        let report = validate(&config);
        assert!(report.is_valid());
        assert!(report.has_code(IssueCode::UnknownRequiredLevel));
    }
}
