//! Consistency and outlier rules over engagement outcomes

use super::{Rule, RuleCategory, RuleSeverity, ValidationResult};
use crate::domain::record::{EngagementType, RetrainingDataPoint};

/// Dwell time (ms) above which a skip looks inconsistent
const SKIP_DWELL_WARNING_MS: f64 = 5000.0;

/// Dwell time (ms) below which saturated engagement looks like an outlier
const SATURATED_MIN_DWELL_MS: f64 = 1000.0;

/// Engagement strength must fall in the band expected for its type
pub struct EngagementConsistencyRule;

impl Rule for EngagementConsistencyRule {
    fn name(&self) -> &'static str {
        "engagement_consistency"
    }

    fn description(&self) -> &'static str {
        "Engagement strength should match the band expected for the engagement type"
    }

    fn severity(&self) -> RuleSeverity {
        RuleSeverity::Warning
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Consistency
    }

    fn validate(&self, record: &RetrainingDataPoint) -> anyhow::Result<ValidationResult> {
        let mut result = ValidationResult::passing();
        let engagement = &record.actual_engagement;

        let Some(kind) = EngagementType::from_label(&engagement.engagement_type) else {
            // never echo the unknown value itself
            result.warn("Unknown engagement type");
            return Ok(result);
        };

        let (low, high) = kind.expected_strength_band();
        if engagement.engagement_strength < low || engagement.engagement_strength > high {
            result.warn(format!(
                "Engagement strength outside expected [{low}, {high}] band for '{}'",
                engagement.engagement_type
            ));
        }

        if kind == EngagementType::Skip && engagement.dwell_time_ms > SKIP_DWELL_WARNING_MS {
            result.warn("Skip interaction with unusually long dwell time");
        }

        Ok(result)
    }
}

/// Flags engagement readings that look like measurement artifacts
pub struct OutlierDetectionRule;

impl Rule for OutlierDetectionRule {
    fn name(&self) -> &'static str {
        "outlier_detection"
    }

    fn description(&self) -> &'static str {
        "Degenerate engagement readings suggest collection artifacts"
    }

    fn severity(&self) -> RuleSeverity {
        RuleSeverity::Info
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::DataQuality
    }

    fn validate(&self, record: &RetrainingDataPoint) -> anyhow::Result<ValidationResult> {
        let mut result = ValidationResult::passing();
        let engagement = &record.actual_engagement;
        let kind = EngagementType::from_label(&engagement.engagement_type);

        if engagement.engagement_strength == 0.0 && kind != Some(EngagementType::Skip) {
            result.warn("Zero engagement strength on a non-skip interaction");
        }

        if engagement.engagement_strength == 1.0
            && engagement.dwell_time_ms < SATURATED_MIN_DWELL_MS
        {
            result.warn("Saturated engagement strength with minimal dwell time");
        }

        Ok(result)
    }
}
