//! Privacy-compliance rule
//!
//! Scans anonymized records for identity material that should have been
//! stripped: PII-shaped strings in custom features and cohort labels that
//! still look like raw identifiers. Messages reference field names only.

use super::{Rule, RuleCategory, RuleSeverity, ValidationResult};
use crate::domain::record::{AnonymizationLevel, RetrainingDataPoint};
use anyhow::{Context, Result};
use regex::Regex;

/// Cohort strings with this prefix and excessive length look like raw user
/// identifiers that escaped hashing
const RAW_COHORT_PREFIX: &str = "user_";
const RAW_COHORT_MAX_LEN: usize = 20;

/// Detects PII-shaped content left in an anonymized record
pub struct PrivacyComplianceRule {
    pii_patterns: Vec<(&'static str, Regex)>,
}

impl PrivacyComplianceRule {
    pub fn new() -> Result<Self> {
        let patterns = [
            ("SSN", r"\b\d{3}-\d{2}-\d{4}\b"),
            ("email", r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}"),
            ("phone number", r"\b\d{3}-\d{3}-\d{4}\b"),
            ("card number", r"\b\d{16}\b"),
        ];

        let pii_patterns = patterns
            .into_iter()
            .map(|(label, pattern)| {
                Regex::new(pattern)
                    .map(|regex| (label, regex))
                    .with_context(|| format!("Invalid {label} pattern"))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { pii_patterns })
    }

    /// The PII label the text matches, if any
    fn matched_pattern(&self, text: &str) -> Option<&'static str> {
        self.pii_patterns
            .iter()
            .find(|(_, regex)| regex.is_match(text))
            .map(|(label, _)| *label)
    }
}

impl Rule for PrivacyComplianceRule {
    fn name(&self) -> &'static str {
        "privacy_compliance"
    }

    fn description(&self) -> &'static str {
        "Anonymized records must not carry PII-shaped content or raw identifiers"
    }

    fn severity(&self) -> RuleSeverity {
        RuleSeverity::Error
    }

    fn category(&self) -> RuleCategory {
        RuleCategory::Privacy
    }

    fn validate(&self, record: &RetrainingDataPoint) -> anyhow::Result<ValidationResult> {
        let mut result = ValidationResult::passing();

        if AnonymizationLevel::from_label(&record.anonymization_level).is_none() {
            result.error("Invalid anonymization level");
        }

        for (key, value) in &record.feature_vector.custom_features {
            if let Some(text) = value.as_str() {
                if let Some(label) = self.matched_pattern(text) {
                    result.error(format!(
                        "Custom feature '{key}' contains {label}-like content"
                    ));
                }
            }
        }

        if record.user_cohort.starts_with(RAW_COHORT_PREFIX)
            && record.user_cohort.len() > RAW_COHORT_MAX_LEN
        {
            result.warn("User cohort resembles a raw user identifier");
        }

        Ok(result)
    }
}
