//! Temporal validity rule

use super::{Rule, RuleCategory, RuleSeverity, ValidationResult};
use crate::domain::record::RetrainingDataPoint;
use chrono::{DateTime, Duration, Utc};

/// Age beyond which a record draws a staleness warning
const STALE_AGE_DAYS: i64 = 90;

/// Timestamps must be in the past and quasi-identifiers in range
///
/// `time_of_day` and `day_of_week` out of range are hard errors: records
/// carrying them are rejected rather than generalized.
pub struct TemporalValidityRule;

impl Rule for TemporalValidityRule {
    fn name(&self) -> &'static str {
        "temporal_validity"
    }

    fn description(&self) -> &'static str {
        "Timestamps must be in the past and time fields in range"
    }

    fn severity(&self) -> RuleSeverity {
        RuleSeverity::Error
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Consistency
    }

    fn validate(&self, record: &RetrainingDataPoint) -> anyhow::Result<ValidationResult> {
        let mut result = ValidationResult::passing();

        match DateTime::parse_from_rfc3339(&record.anonymization_timestamp) {
            Ok(parsed) => {
                let parsed = parsed.with_timezone(&Utc);
                let now = Utc::now();
                if parsed > now {
                    result.error("Anonymization timestamp is in the future");
                } else if now - parsed > Duration::days(STALE_AGE_DAYS) {
                    result.warn(format!(
                        "Record is older than {STALE_AGE_DAYS} days"
                    ));
                }
            }
            Err(_) => {
                result.error("Anonymization timestamp is not parseable");
            }
        }

        if !(0..=23).contains(&record.time_of_day) {
            result.error("Time of day out of [0, 23] range");
        }
        if !(0..=6).contains(&record.day_of_week) {
            result.error("Day of week out of [0, 6] range");
        }

        Ok(result)
    }
}
