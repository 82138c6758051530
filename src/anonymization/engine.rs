//! Main anonymization engine
//!
//! Orchestrates a fixed-order chain of privacy mechanisms over one
//! [`RetrainingDataPoint`], producing an [`AnonymizationResult`] with the
//! ordered list of applied techniques and the computed privacy metrics.
//!
//! # Fail-closed contract
//!
//! Any error anywhere in the chain yields `success = false` with no
//! anonymized data, `identifiability_risk = 1.0` and
//! `utility_preservation = 0.0`. A failed anonymization is treated as
//! maximally unsafe; the raw record is never passed through unmodified and
//! no error escapes to the caller from [`anonymize`](AnonymizationEngine::anonymize).
//!
//! # Ordering
//!
//! Later steps operate on the already-transformed record (noise is added to
//! hashed, generalized data), so the execution order below is part of the
//! reproducibility contract and must not be shuffled.

use crate::anonymization::{
    config::{AnonymizationConfig, AnonymizationOverrides, DpMechanism},
    mechanisms::{generalize, hashing::SaltStore, minimize, noise},
    metrics::PrivacyMetrics,
};
use crate::domain::{record::RetrainingDataPoint, AnonymizationLevel, Result};
use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Technique names, in chain order, as reported in `applied_techniques`
pub mod technique {
    pub const DIRECT_IDENTIFIER_REMOVAL: &str = "direct_identifier_removal";
    pub const IDENTIFIER_HASHING: &str = "identifier_hashing";
    pub const TIMESTAMP_GENERALIZATION: &str = "timestamp_generalization";
    pub const NOISE_INJECTION: &str = "noise_injection";
    pub const DIFFERENTIAL_PRIVACY: &str = "differential_privacy";
    pub const K_ANONYMITY: &str = "k_anonymity_generalization";
    pub const FEATURE_MINIMIZATION: &str = "feature_minimization";
}

/// Outcome of one anonymization run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationResult {
    pub success: bool,
    /// `None` on failure — never the unmodified input
    pub anonymized_data: Option<RetrainingDataPoint>,
    pub anonymization_level: String,
    pub privacy_metrics: PrivacyMetrics,
    /// Technique names in execution order
    pub applied_techniques: Vec<String>,
    pub timestamp: DateTime<Utc>,
}

impl AnonymizationResult {
    /// The fail-closed result for a chain failure
    fn fail_closed(level: AnonymizationLevel) -> Self {
        Self {
            success: false,
            anonymized_data: None,
            anonymization_level: level.label().to_string(),
            privacy_metrics: PrivacyMetrics::fail_closed(),
            applied_techniques: Vec::new(),
            timestamp: Utc::now(),
        }
    }
}

/// Anonymization engine
///
/// Thread-safe: `anonymize` takes `&self`, and the only interior state is
/// the per-identifier salt cache, which serializes get-or-create per entry.
/// Share across threads with `Arc`.
pub struct AnonymizationEngine {
    config: AnonymizationConfig,
    salt_store: Arc<SaltStore>,
}

impl AnonymizationEngine {
    /// Create an engine with its own salt store
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation (bad privacy
    /// budget, zero k, negative noise level).
    pub fn new(config: AnonymizationConfig) -> anyhow::Result<Self> {
        Self::with_salt_store(config, Arc::new(SaltStore::new()))
    }

    /// Create an engine sharing an existing salt store
    ///
    /// Engines sharing a store produce consistent hashes for the same raw
    /// identifier; independent stores deliberately do not.
    pub fn with_salt_store(
        config: AnonymizationConfig,
        salt_store: Arc<SaltStore>,
    ) -> anyhow::Result<Self> {
        config
            .validate()
            .context("Invalid anonymization configuration")?;
        Ok(Self { config, salt_store })
    }

    pub fn config(&self) -> &AnonymizationConfig {
        &self.config
    }

    /// Anonymize a single record under the engine's configuration
    ///
    /// Infallible by contract: chain failures are converted into the
    /// fail-closed result and logged, never returned as errors.
    pub fn anonymize(&self, record: &RetrainingDataPoint) -> AnonymizationResult {
        self.run(record, &self.config)
    }

    /// Anonymize with a per-call partial override merged over the engine's
    /// configuration
    ///
    /// An override that fails validation is itself a chain failure and
    /// produces the fail-closed result.
    pub fn anonymize_with_overrides(
        &self,
        record: &RetrainingDataPoint,
        overrides: AnonymizationOverrides,
    ) -> AnonymizationResult {
        let mut config = self.config.clone();
        config.apply_overrides(overrides);
        if let Err(e) = config.validate() {
            tracing::error!(error = ?e, "Rejecting anonymization override");
            return AnonymizationResult::fail_closed(config.level);
        }
        self.run(record, &config)
    }

    /// Anonymize a batch of records
    ///
    /// Per-record failures yield their fail-closed results in place; one bad
    /// record never aborts the batch.
    pub fn anonymize_batch(&self, records: &[RetrainingDataPoint]) -> Vec<AnonymizationResult> {
        records.iter().map(|r| self.anonymize(r)).collect()
    }

    fn run(&self, record: &RetrainingDataPoint, config: &AnonymizationConfig) -> AnonymizationResult {
        match self.run_chain(record, config) {
            Ok((anonymized, applied)) => {
                let privacy_metrics = PrivacyMetrics::compute(
                    &applied,
                    &record.feature_vector,
                    &anonymized.feature_vector,
                );
                tracing::debug!(
                    techniques = applied.len(),
                    risk = privacy_metrics.identifiability_risk,
                    "Anonymization chain completed"
                );
                AnonymizationResult {
                    success: true,
                    anonymization_level: anonymized.anonymization_level.clone(),
                    anonymized_data: Some(anonymized),
                    privacy_metrics,
                    applied_techniques: applied,
                    timestamp: Utc::now(),
                }
            }
            Err(e) => {
                tracing::error!(error = ?e, "Anonymization chain failed, failing closed");
                AnonymizationResult::fail_closed(config.level)
            }
        }
    }

    /// Execute the fixed-order technique chain
    fn run_chain(
        &self,
        record: &RetrainingDataPoint,
        config: &AnonymizationConfig,
    ) -> Result<(RetrainingDataPoint, Vec<String>)> {
        let mut out = record.clone();
        let mut applied = Vec::new();
        let mut rng = rand::thread_rng();

        out.anonymization_level = config.level.label().to_string();

        // 1. Direct identifier removal
        if config.remove_direct_identifiers {
            minimize::remove_direct_identifiers(&mut out.feature_vector);
            applied.push(technique::DIRECT_IDENTIFIER_REMOVAL.to_string());
        }

        // 2. Identifier hashing
        if config.hash_user_ids {
            out.user_cohort = self.salt_store.hash(&out.user_cohort);
            out.demographic_cluster = self.salt_store.hash(&out.demographic_cluster);
            applied.push(technique::IDENTIFIER_HASHING.to_string());
        }

        // 3. Timestamp generalization
        if config.generalize_timestamps {
            out.anonymization_timestamp = generalize::generalize_timestamp(
                &out.anonymization_timestamp,
                config.timestamp_granularity,
            )?;
            applied.push(technique::TIMESTAMP_GENERALIZATION.to_string());
        }

        // 4. Noise injection over every numeric feature field
        if config.add_noise {
            let scale = config.noise_level;
            out.feature_vector
                .map_numeric(|v| noise::clamp_unit(v + noise::laplace_noise(&mut rng, scale)));
            applied.push(technique::NOISE_INJECTION.to_string());
        }

        // 5. Differential privacy over the sensitive fields
        if config.differential_privacy {
            let scale = noise::laplace_scale(config.sensitivity, config.epsilon);
            let stddev = noise::gaussian_stddev(config.sensitivity, config.epsilon, config.delta);
            let mut dp_noise = |rng: &mut rand::rngs::ThreadRng| match config.dp_mechanism {
                DpMechanism::Laplace => noise::laplace_noise(rng, scale),
                DpMechanism::Gaussian => noise::gaussian_noise(rng, 0.0, stddev),
            };

            let fv = &mut out.feature_vector;
            fv.user_engagement_history =
                noise::clamp_unit(fv.user_engagement_history + dp_noise(&mut rng));
            fv.user_session_time = noise::clamp_unit(fv.user_session_time + dp_noise(&mut rng));
            fv.user_activity_level = noise::clamp_unit(fv.user_activity_level + dp_noise(&mut rng));
            out.data_quality_score = noise::clamp_unit(out.data_quality_score + dp_noise(&mut rng));

            out.anonymization_level = AnonymizationLevel::DifferentialPrivacy.label().to_string();
            applied.push(technique::DIFFERENTIAL_PRIVACY.to_string());
        }

        // 6. k-anonymity-style quasi-identifier generalization. Group sizes
        // are not verified against any backing population.
        if config.k_anonymity {
            out.time_of_day = generalize::bucket_time_of_day(out.time_of_day);
            out.day_of_week = generalize::collapse_day_of_week(out.day_of_week);
            applied.push(technique::K_ANONYMITY.to_string());
        }

        // 7. Feature minimization; an empty whitelist keeps everything and
        // does not count as an applied technique
        if config.remove_unused_features && !config.feature_whitelist.is_empty() {
            minimize::retain_whitelisted(&mut out.feature_vector, &config.feature_whitelist);
            applied.push(technique::FEATURE_MINIMIZATION.to_string());
        }

        Ok((out, applied))
    }
}
