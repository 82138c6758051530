//! Validation engine
//!
//! Holds the ordered rule set, runs every rule against a record or batch,
//! and merges results into a single score. A record is admissible only when
//! it has zero errors AND its aggregate score clears the threshold — a
//! record with no errors but a mediocre score is still rejected.

use crate::domain::{batch::RetrainingBatch, record::RetrainingDataPoint};
use crate::validation::report::DataQualityReport;
use crate::validation::rules::{
    DataTypesRule, EngagementConsistencyRule, FeatureCompletenessRule, OutlierDetectionRule,
    PrivacyComplianceRule, RequiredFieldsRule, Rule, TemporalValidityRule, ValidationResult,
    ValueRangesRule,
};
use anyhow::Result;

/// Minimum aggregate score for a record to be admissible
pub const VALIDITY_SCORE_THRESHOLD: f64 = 0.7;

/// Minimum fraction of valid records for a batch to be admissible
pub const BATCH_VALIDITY_RATE: f64 = 0.8;

/// Validation engine with a pluggable, ordered rule set
///
/// Rules are stateless per record; the engine is `Send + Sync` and records
/// of a batch may be validated in parallel by the caller with no ordering
/// guarantees between their outcomes.
pub struct ValidationEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl ValidationEngine {
    /// Create an engine with the eight built-in rules registered in order
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in rule fails to initialize (pattern
    /// compilation).
    pub fn new() -> Result<Self> {
        let rules: Vec<Box<dyn Rule>> = vec![
            Box::new(RequiredFieldsRule),
            Box::new(DataTypesRule),
            Box::new(ValueRangesRule),
            Box::new(EngagementConsistencyRule),
            Box::new(FeatureCompletenessRule),
            Box::new(TemporalValidityRule),
            Box::new(PrivacyComplianceRule::new()?),
            Box::new(OutlierDetectionRule),
        ];
        Ok(Self { rules })
    }

    /// Append a custom rule after the built-ins
    pub fn with_rule(mut self, rule: Box<dyn Rule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Validate a single record against every registered rule
    ///
    /// A rule returning `Err` contributes a synthetic error attributed to
    /// `validation_rule` and a zero score for that rule; the remaining
    /// rules still run.
    pub fn validate(&self, record: &RetrainingDataPoint) -> ValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut scores = Vec::with_capacity(self.rules.len());

        for rule in &self.rules {
            match rule.validate(record) {
                Ok(outcome) => {
                    errors.extend(outcome.errors);
                    warnings.extend(outcome.warnings);
                    scores.push(outcome.score);
                }
                Err(e) => {
                    tracing::warn!(rule = rule.name(), error = ?e, "Validation rule failed to execute");
                    errors.push(format!(
                        "validation_rule: rule '{}' failed to execute",
                        rule.name()
                    ));
                    scores.push(0.0);
                }
            }
        }

        let score = mean(&scores);
        ValidationResult {
            is_valid: errors.is_empty() && score >= VALIDITY_SCORE_THRESHOLD,
            errors,
            warnings,
            score,
        }
    }

    /// Validate a batch: metadata, declared size, and member validity rate
    pub fn validate_batch(&self, batch: &RetrainingBatch) -> ValidationResult {
        let mut result = ValidationResult::passing();

        for (name, value) in [
            ("batch_id", &batch.batch_id),
            ("created_at", &batch.created_at),
            ("algorithm_type", &batch.algorithm_type),
        ] {
            if value.trim().is_empty() {
                result.error(format!("Missing batch metadata: {name}"));
            }
        }

        if batch.batch_size != batch.records.len() {
            result.error("Batch size mismatch");
        }

        if batch.records.is_empty() {
            result.warn("Batch contains no records");
            result.is_valid = result.errors.is_empty();
            return result;
        }

        let member_results: Vec<ValidationResult> =
            batch.records.iter().map(|r| self.validate(r)).collect();
        let valid = member_results.iter().filter(|r| r.is_valid).count();
        let rate = valid as f64 / member_results.len() as f64;
        let scores: Vec<f64> = member_results.iter().map(|r| r.score).collect();

        if rate < BATCH_VALIDITY_RATE {
            let shortfall = if rate >= 0.6 {
                "marginally below"
            } else if rate >= 0.4 {
                "well below"
            } else {
                "far below"
            };
            result.warnings.push(format!(
                "Batch validity rate {:.0}% is {shortfall} the required 80%",
                rate * 100.0
            ));
            tracing::warn!(rate, "Batch validity rate below threshold");
        }

        result.score = mean(&scores);
        result.is_valid = result.errors.is_empty() && rate >= BATCH_VALIDITY_RATE;
        result
    }

    /// Summarize many records (and optional batches) into a quality report
    pub fn generate_quality_report(
        &self,
        records: &[RetrainingDataPoint],
        batches: &[RetrainingBatch],
    ) -> DataQualityReport {
        let record_results: Vec<ValidationResult> =
            records.iter().map(|r| self.validate(r)).collect();
        let batch_results: Vec<ValidationResult> =
            batches.iter().map(|b| self.validate_batch(b)).collect();

        DataQualityReport::build(record_results, batch_results)
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 1.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_support;
    use crate::validation::rules::{RuleCategory, RuleSeverity};

    #[test]
    fn test_valid_record_passes_all_rules() {
        let engine = ValidationEngine::new().unwrap();
        let result = engine.validate(&test_support::record());

        assert!(result.is_valid, "errors: {:?}", result.errors);
        assert!(result.errors.is_empty());
        assert!(result.score >= VALIDITY_SCORE_THRESHOLD);
    }

    #[test]
    fn test_invalid_algorithm_type_rejects_record() {
        let engine = ValidationEngine::new().unwrap();
        let mut record = test_support::record();
        record.algorithm_type = "invalid_type".to_string();

        let result = engine.validate(&record);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e == "Invalid algorithm type"));
    }

    #[test]
    fn test_band_warning_keeps_record_valid() {
        let engine = ValidationEngine::new().unwrap();
        let mut record = test_support::record();
        record.actual_engagement.engagement_type = "like".to_string();
        record.actual_engagement.engagement_strength = 0.05;

        let result = engine.validate(&record);
        assert!(result.is_valid, "errors: {:?}", result.errors);
        assert!(!result.warnings.is_empty());
    }

    #[test]
    fn test_zero_errors_but_low_score_is_rejected() {
        // advisory rules that score poorly without raising errors drag the
        // mean below the threshold; the record must still be rejected
        struct AdvisoryRule;
        impl Rule for AdvisoryRule {
            fn name(&self) -> &'static str {
                "advisory"
            }
            fn description(&self) -> &'static str {
                "scores poorly without errors"
            }
            fn severity(&self) -> RuleSeverity {
                RuleSeverity::Info
            }
            fn category(&self) -> RuleCategory {
                RuleCategory::DataQuality
            }
            fn validate(&self, _: &RetrainingDataPoint) -> Result<ValidationResult> {
                Ok(ValidationResult {
                    is_valid: true,
                    errors: Vec::new(),
                    warnings: Vec::new(),
                    score: 0.0,
                })
            }
        }

        let mut engine = ValidationEngine::new().unwrap();
        for _ in 0..4 {
            engine = engine.with_rule(Box::new(AdvisoryRule));
        }

        let result = engine.validate(&test_support::record());
        assert!(result.errors.is_empty());
        assert!(result.score < VALIDITY_SCORE_THRESHOLD);
        assert!(!result.is_valid);
    }

    #[test]
    fn test_broken_rule_is_isolated() {
        struct BrokenRule;
        impl Rule for BrokenRule {
            fn name(&self) -> &'static str {
                "broken"
            }
            fn description(&self) -> &'static str {
                "always fails to execute"
            }
            fn severity(&self) -> RuleSeverity {
                RuleSeverity::Error
            }
            fn category(&self) -> RuleCategory {
                RuleCategory::DataQuality
            }
            fn validate(&self, _: &RetrainingDataPoint) -> Result<ValidationResult> {
                anyhow::bail!("rule implementation panicked")
            }
        }

        let engine = ValidationEngine::new().unwrap().with_rule(Box::new(BrokenRule));
        let result = engine.validate(&test_support::record());

        // the other eight rules still ran and contributed their outcomes
        assert_eq!(
            result.errors,
            vec!["validation_rule: rule 'broken' failed to execute"]
        );
        assert!(!result.is_valid);
    }

    #[test]
    fn test_batch_size_mismatch_is_hard_error() {
        let engine = ValidationEngine::new().unwrap();
        let mut batch = RetrainingBatch::new(
            "batch-1",
            "2026-08-01T00:00:00Z",
            "posts_feed",
            vec![test_support::record(); 4],
        );
        batch.batch_size = 5;

        let result = engine.validate_batch(&batch);
        assert!(!result.is_valid);
        assert!(result.errors.iter().any(|e| e == "Batch size mismatch"));
    }

    #[test]
    fn test_batch_metadata_required() {
        let engine = ValidationEngine::new().unwrap();
        let batch = RetrainingBatch::new("", "", "posts_feed", vec![test_support::record()]);

        let result = engine.validate_batch(&batch);
        assert!(!result.is_valid);
        assert_eq!(
            result.errors.iter().filter(|e| e.contains("metadata")).count(),
            2
        );
    }

    #[test]
    fn test_batch_validity_rate_threshold() {
        let engine = ValidationEngine::new().unwrap();

        let good = test_support::record();
        let mut bad = test_support::record();
        bad.algorithm_type = "invalid_type".to_string();

        // 3 of 5 valid: 60%, marginally below the 80% requirement
        let batch = RetrainingBatch::new(
            "batch-2",
            "2026-08-01T00:00:00Z",
            "clips_feed",
            vec![good.clone(), good.clone(), good, bad.clone(), bad],
        );

        let result = engine.validate_batch(&batch);
        assert!(!result.is_valid);
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("60%") && w.contains("marginally below")));
    }

    #[test]
    fn test_anonymized_record_remains_admissible() {
        use crate::anonymization::{AnonymizationConfig, AnonymizationEngine};

        let anonymizer = AnonymizationEngine::new(AnonymizationConfig::default()).unwrap();
        let validator = ValidationEngine::new().unwrap();

        let result = anonymizer.anonymize(&test_support::record());
        let anonymized = result.anonymized_data.expect("anonymization succeeded");

        let validation = validator.validate(&anonymized);
        assert!(validation.is_valid, "errors: {:?}", validation.errors);
    }

    #[test]
    fn test_healthy_batch_is_valid() {
        let engine = ValidationEngine::new().unwrap();
        let batch = RetrainingBatch::new(
            "batch-3",
            "2026-08-01T00:00:00Z",
            "clips_feed",
            vec![test_support::record(); 5],
        );

        let result = engine.validate_batch(&batch);
        assert!(result.is_valid, "errors: {:?}", result.errors);
        assert!(result.warnings.is_empty());
    }
}
