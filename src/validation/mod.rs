//! Validation engine, rules, and quality reporting
//!
//! Scores anonymized records and batches against data-quality and
//! privacy-compliance rules before they may enter a retraining batch.
//! Hard rule violations block admission; warnings surface in the report
//! without blocking. The accept/reject decision itself belongs to the
//! retraining-batch assembler, not to this crate.

pub mod engine;
pub mod report;
pub mod rules;

pub use engine::{ValidationEngine, BATCH_VALIDITY_RATE, VALIDITY_SCORE_THRESHOLD};
pub use report::DataQualityReport;
pub use rules::{Rule, RuleCategory, RuleSeverity, ValidationResult};
