//! Data-quality reporting
//!
//! Summarizes many per-record (and per-batch) validation results into one
//! report with aggregate scores and frequency-based recommendations.

use crate::validation::rules::{RuleCategory, ValidationResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A recommendation fires when an error string recurs in at least
/// `max(2, 10% of records)` results
const ERROR_RECOMMENDATION_MIN: usize = 2;
const ERROR_RECOMMENDATION_FRACTION: f64 = 0.1;

/// Warnings use a higher bar: `max(3, 20% of records)`
const WARNING_RECOMMENDATION_MIN: usize = 3;
const WARNING_RECOMMENDATION_FRACTION: f64 = 0.2;

/// Overall score below which the generic low-quality recommendation fires
const LOW_QUALITY_THRESHOLD: f64 = 0.7;

/// Aggregate quality report over a set of records and batches
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataQualityReport {
    /// Mean of all per-record and per-batch scores
    pub overall_score: f64,
    pub total_records: usize,
    pub valid_records: usize,
    pub error_count: usize,
    pub warning_count: usize,
    /// Per-category scores.
    ///
    /// Currently every category reports the aggregate score — scoring is
    /// not yet disaggregated by rule category.
    pub category_scores: BTreeMap<RuleCategory, f64>,
    pub detailed_results: Vec<ValidationResult>,
    pub recommendations: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl DataQualityReport {
    /// Build a report from already-computed validation results
    pub fn build(
        record_results: Vec<ValidationResult>,
        batch_results: Vec<ValidationResult>,
    ) -> Self {
        let total_records = record_results.len();
        let valid_records = record_results.iter().filter(|r| r.is_valid).count();

        let all_scores: Vec<f64> = record_results
            .iter()
            .chain(batch_results.iter())
            .map(|r| r.score)
            .collect();
        let overall_score = if all_scores.is_empty() {
            1.0
        } else {
            all_scores.iter().sum::<f64>() / all_scores.len() as f64
        };

        let error_count = record_results
            .iter()
            .chain(batch_results.iter())
            .map(|r| r.errors.len())
            .sum();
        let warning_count = record_results
            .iter()
            .chain(batch_results.iter())
            .map(|r| r.warnings.len())
            .sum();

        let recommendations = recommendations(&record_results, total_records, overall_score);

        let category_scores = [
            RuleCategory::DataQuality,
            RuleCategory::Privacy,
            RuleCategory::Consistency,
            RuleCategory::Completeness,
        ]
        .into_iter()
        .map(|category| (category, overall_score))
        .collect();

        let mut detailed_results = record_results;
        detailed_results.extend(batch_results);

        Self {
            overall_score,
            total_records,
            valid_records,
            error_count,
            warning_count,
            category_scores,
            detailed_results,
            recommendations,
            generated_at: Utc::now(),
        }
    }
}

/// Derive recommendations from recurring error and warning strings
fn recommendations(
    record_results: &[ValidationResult],
    total_records: usize,
    overall_score: f64,
) -> Vec<String> {
    let mut out = Vec::new();

    let error_threshold = ERROR_RECOMMENDATION_MIN
        .max((total_records as f64 * ERROR_RECOMMENDATION_FRACTION).ceil() as usize);
    let warning_threshold = WARNING_RECOMMENDATION_MIN
        .max((total_records as f64 * WARNING_RECOMMENDATION_FRACTION).ceil() as usize);

    for (message, count) in recurring(record_results.iter().flat_map(|r| r.errors.iter())) {
        if count >= error_threshold {
            out.push(format!(
                "Address recurring error ({count} occurrences): {message}"
            ));
        }
    }
    for (message, count) in recurring(record_results.iter().flat_map(|r| r.warnings.iter())) {
        if count >= warning_threshold {
            out.push(format!(
                "Review recurring warning ({count} occurrences): {message}"
            ));
        }
    }

    if overall_score < LOW_QUALITY_THRESHOLD {
        out.push(
            "Overall data quality is below the acceptance threshold; review collection and anonymization upstream"
                .to_string(),
        );
    }

    out
}

/// Count message frequencies, ordered by count descending then message
fn recurring<'a>(messages: impl Iterator<Item = &'a String>) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for message in messages {
        *counts.entry(message.as_str()).or_insert(0) += 1;
    }
    let mut ordered: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(m, c)| (m.to_string(), c))
        .collect();
    ordered.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ordered
}
