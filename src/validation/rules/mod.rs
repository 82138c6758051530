//! Validation rule trait and result types
//!
//! Each rule is independent and individually testable; the
//! [`ValidationEngine`] runs every registered rule and merges their
//! results. Rule messages name fields and expectations only — never raw
//! record content.
//!
//! [`ValidationEngine`]: crate::validation::ValidationEngine

pub mod consistency;
pub mod privacy;
pub mod quality;
pub mod temporal;

use crate::domain::record::RetrainingDataPoint;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use consistency::{EngagementConsistencyRule, OutlierDetectionRule};
pub use privacy::PrivacyComplianceRule;
pub use quality::{DataTypesRule, FeatureCompletenessRule, RequiredFieldsRule, ValueRangesRule};
pub use temporal::TemporalValidityRule;

/// Score deduction for each error a rule raises
const ERROR_PENALTY: f64 = 0.25;

/// Score deduction for each warning a rule raises
const WARNING_PENALTY: f64 = 0.1;

/// Worst outcome a rule can signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSeverity {
    Error,
    Warning,
    Info,
}

/// Concern a rule belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    DataQuality,
    Privacy,
    Consistency,
    Completeness,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DataQuality => write!(f, "data_quality"),
            Self::Privacy => write!(f, "privacy"),
            Self::Consistency => write!(f, "consistency"),
            Self::Completeness => write!(f, "completeness"),
        }
    }
}

/// Merged outcome of one rule run (or of a whole record/batch validation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Quality score in `[0, 1]`
    pub score: f64,
}

impl ValidationResult {
    /// A passing result with a perfect score
    pub fn passing() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            score: 1.0,
        }
    }

    /// Record a hard violation; drops the score and invalidates the result
    pub fn error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.is_valid = false;
        self.score = (self.score - ERROR_PENALTY).max(0.0);
    }

    /// Record a soft signal; reduces the score without invalidating
    pub fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
        self.score = (self.score - WARNING_PENALTY).max(0.0);
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::passing()
    }
}

/// A pluggable validation rule
///
/// `validate` returning `Err` marks a broken rule implementation; the
/// engine converts it into a synthetic error attributed to
/// `"validation_rule"` so one faulty rule cannot abort the rest.
pub trait Rule: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    fn severity(&self) -> RuleSeverity;
    fn category(&self) -> RuleCategory;
    fn validate(&self, record: &RetrainingDataPoint) -> anyhow::Result<ValidationResult>;
}
