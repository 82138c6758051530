//! Data-quality rules: required fields, data types, value ranges, feature
//! completeness

use super::{Rule, RuleCategory, RuleSeverity, ValidationResult};
use crate::domain::record::{
    AlgorithmType, RetrainingDataPoint, REQUIRED_CATEGORICAL_FEATURES,
};
use chrono::{DateTime, SecondsFormat};

/// Completeness ratio below which the optional features draw a warning
const COMPLETENESS_WARNING_THRESHOLD: f64 = 0.5;

/// Every core field of a record must be present and non-empty
pub struct RequiredFieldsRule;

impl Rule for RequiredFieldsRule {
    fn name(&self) -> &'static str {
        "required_fields"
    }

    fn description(&self) -> &'static str {
        "Core record fields must be present and non-empty"
    }

    fn severity(&self) -> RuleSeverity {
        RuleSeverity::Error
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Completeness
    }

    fn validate(&self, record: &RetrainingDataPoint) -> anyhow::Result<ValidationResult> {
        let mut result = ValidationResult::passing();

        // feature_vector and actual_engagement are structurally present in
        // the typed record; the string-typed core fields can still arrive
        // empty from upstream.
        for (name, value) in [
            ("model_version", &record.model_version),
            ("algorithm_type", &record.algorithm_type),
            ("anonymization_timestamp", &record.anonymization_timestamp),
        ] {
            if value.trim().is_empty() {
                result.error(format!("Missing required field: {name}"));
            }
        }

        Ok(result)
    }
}

/// Enum-like and numeric fields must carry well-formed values
pub struct DataTypesRule;

impl DataTypesRule {
    /// A timestamp is well-formed when it parses and equals its own
    /// round-trip serialization (offset or Zulu form)
    fn timestamp_round_trips(raw: &str) -> bool {
        let Ok(parsed) = DateTime::parse_from_rfc3339(raw) else {
            return false;
        };
        parsed.to_rfc3339() == raw
            || parsed.to_rfc3339_opts(SecondsFormat::Millis, true) == raw
            || parsed.to_rfc3339_opts(SecondsFormat::Secs, true) == raw
    }
}

impl Rule for DataTypesRule {
    fn name(&self) -> &'static str {
        "data_types"
    }

    fn description(&self) -> &'static str {
        "Enum and numeric fields must be well-formed"
    }

    fn severity(&self) -> RuleSeverity {
        RuleSeverity::Error
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::DataQuality
    }

    fn validate(&self, record: &RetrainingDataPoint) -> anyhow::Result<ValidationResult> {
        let mut result = ValidationResult::passing();

        if AlgorithmType::from_label(&record.algorithm_type).is_none() {
            result.error("Invalid algorithm type");
        }

        if !record.predicted_rank.is_finite() || record.predicted_rank < 0.0 {
            result.error("Predicted rank must be a non-negative number");
        }

        if !(0.0..=1.0).contains(&record.data_quality_score) {
            result.error("Data quality score out of [0, 1] range");
        }

        if !Self::timestamp_round_trips(&record.anonymization_timestamp) {
            result.error("Anonymization timestamp is not a round-trippable ISO-8601 date");
        }

        Ok(result)
    }
}

/// Engagement numerics must sit in their documented ranges; feature-vector
/// drift outside `[0, 1]` is only a warning
pub struct ValueRangesRule;

impl Rule for ValueRangesRule {
    fn name(&self) -> &'static str {
        "value_ranges"
    }

    fn description(&self) -> &'static str {
        "Numeric fields must sit in their documented ranges"
    }

    fn severity(&self) -> RuleSeverity {
        RuleSeverity::Error
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::DataQuality
    }

    fn validate(&self, record: &RetrainingDataPoint) -> anyhow::Result<ValidationResult> {
        let mut result = ValidationResult::passing();
        let engagement = &record.actual_engagement;

        if !(0.0..=1.0).contains(&engagement.engagement_strength) {
            result.error("Engagement strength out of [0, 1] range");
        }

        if engagement.dwell_time_ms < 0.0 {
            result.error("Negative dwell time");
        }

        if let Some(pct) = engagement.watch_percentage {
            if !(0.0..=1.0).contains(&pct) {
                result.error("Watch percentage out of [0, 1] range");
            }
        }

        for (name, value) in record.feature_vector.numeric_entries() {
            if let Some(v) = value {
                if !(0.0..=1.0).contains(&v) {
                    result.warn(format!("Feature '{name}' outside normalized [0, 1] range"));
                }
            }
        }
        for (key, value) in &record.feature_vector.custom_features {
            if let Some(v) = value.as_f64() {
                if !(0.0..=1.0).contains(&v) {
                    result.warn(format!(
                        "Custom feature '{key}' outside normalized [0, 1] range"
                    ));
                }
            }
        }

        Ok(result)
    }
}

/// Required categorical features must be present; sparse optional features
/// draw a warning
pub struct FeatureCompletenessRule;

impl Rule for FeatureCompletenessRule {
    fn name(&self) -> &'static str {
        "feature_completeness"
    }

    fn description(&self) -> &'static str {
        "Categorical features are mandatory; optional features should be mostly populated"
    }

    fn severity(&self) -> RuleSeverity {
        RuleSeverity::Error
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Completeness
    }

    fn validate(&self, record: &RetrainingDataPoint) -> anyhow::Result<ValidationResult> {
        let mut result = ValidationResult::passing();

        for (name, value) in record.feature_vector.categorical_entries() {
            debug_assert!(REQUIRED_CATEGORICAL_FEATURES.contains(&name));
            if value.trim().is_empty() {
                result.error(format!("Missing required categorical feature: {name}"));
            }
        }

        let ratio = record.feature_vector.completeness_ratio();
        if ratio < COMPLETENESS_WARNING_THRESHOLD {
            result.warn(format!(
                "Optional feature completeness {:.0}% below 50%",
                ratio * 100.0
            ));
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support;
    use test_case::test_case;

    #[test]
    fn test_required_fields_pass_and_fail() {
        let rule = RequiredFieldsRule;
        let record = test_support::record();
        assert!(rule.validate(&record).unwrap().errors.is_empty());

        let mut record = test_support::record();
        record.model_version = String::new();
        record.algorithm_type = "  ".to_string();
        let result = rule.validate(&record).unwrap();
        assert_eq!(result.errors.len(), 2);
        assert!(result.errors[0].contains("model_version"));
    }

    #[test]
    fn test_invalid_algorithm_type_is_hard_error() {
        let mut record = test_support::record();
        record.algorithm_type = "invalid_type".to_string();

        let result = DataTypesRule.validate(&record).unwrap();
        assert!(result.errors.iter().any(|e| e == "Invalid algorithm type"));
        assert!(!result.is_valid);
    }

    #[test_case(-1.0, false; "negative rank")]
    #[test_case(f64::NAN, false; "nan rank")]
    #[test_case(0.0, true; "zero rank")]
    #[test_case(12.0, true; "positive rank")]
    fn test_predicted_rank(rank: f64, ok: bool) {
        let mut record = test_support::record();
        record.predicted_rank = rank;
        let result = DataTypesRule.validate(&record).unwrap();
        assert_eq!(result.errors.is_empty(), ok);
    }

    #[test]
    fn test_timestamp_round_trip() {
        assert!(DataTypesRule::timestamp_round_trips(
            "2026-08-12T14:00:00+00:00"
        ));
        assert!(DataTypesRule::timestamp_round_trips("2026-08-12T14:00:00Z"));
        assert!(DataTypesRule::timestamp_round_trips(
            "2026-08-12T14:00:00.123Z"
        ));
        assert!(!DataTypesRule::timestamp_round_trips("2026-08-12"));
        assert!(!DataTypesRule::timestamp_round_trips("not a date"));
    }

    #[test]
    fn test_negative_dwell_time_is_hard_error() {
        let mut record = test_support::record();
        record.actual_engagement.dwell_time_ms = -5.0;

        let result = ValueRangesRule.validate(&record).unwrap();
        assert!(result.errors.iter().any(|e| e == "Negative dwell time"));
    }

    #[test]
    fn test_feature_drift_is_warning_only() {
        let mut record = test_support::record();
        record.feature_vector.topic_relevance = 1.4;

        let result = ValueRangesRule.validate(&record).unwrap();
        assert!(result.errors.is_empty());
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("topic_relevance"));
    }

    #[test]
    fn test_watch_percentage_bounds() {
        let mut record = test_support::record();
        record.actual_engagement.watch_percentage = Some(1.2);

        let result = ValueRangesRule.validate(&record).unwrap();
        assert!(result
            .errors
            .iter()
            .any(|e| e.contains("Watch percentage")));
    }

    #[test]
    fn test_missing_categorical_is_error() {
        let mut record = test_support::record();
        record.feature_vector.device_type = String::new();

        let result = FeatureCompletenessRule.validate(&record).unwrap();
        assert!(result.errors.iter().any(|e| e.contains("device_type")));
    }

    #[test]
    fn test_sparse_optional_features_warn() {
        let mut record = test_support::record();
        // drop to 4 of 15 populated
        record.feature_vector.content_length = None;
        record.feature_vector.content_quality_score = None;
        record.feature_vector.creator_affinity = None;
        record.feature_vector.visual_appeal = None;

        let result = FeatureCompletenessRule.validate(&record).unwrap();
        assert!(result.errors.is_empty());
        assert!(result.warnings.iter().any(|w| w.contains("completeness")));
    }
}
