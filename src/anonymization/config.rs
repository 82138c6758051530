//! Anonymization configuration

use crate::anonymization::mechanisms::TimestampGranularity;
use crate::domain::AnonymizationLevel;
use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Noise mechanism used for the differential-privacy step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DpMechanism {
    /// Laplace mechanism, scale = sensitivity / epsilon
    Laplace,
    /// Gaussian mechanism, stddev = sqrt(2 ln(1.25/delta)) * sensitivity / epsilon
    Gaussian,
}

impl Default for DpMechanism {
    fn default() -> Self {
        Self::Laplace
    }
}

/// Full anonymization policy for one engine instance
///
/// Policy collaborators supply an [`AnonymizationOverrides`] partial that is
/// merged over these defaults via [`AnonymizationConfig::with_overrides`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationConfig {
    /// Reported anonymization strength
    pub level: AnonymizationLevel,

    /// Delete raw identifier keys from the custom-feature map
    pub remove_direct_identifiers: bool,

    /// Salted-hash `user_cohort` and `demographic_cluster`
    pub hash_user_ids: bool,

    /// Truncate the record timestamp
    pub generalize_timestamps: bool,
    pub timestamp_granularity: TimestampGranularity,

    /// Laplace-noise every numeric feature field
    pub add_noise: bool,
    pub noise_level: f64,

    /// Re-noise the sensitive fields under an (epsilon, delta) budget
    pub differential_privacy: bool,
    pub epsilon: f64,
    pub sensitivity: f64,
    pub delta: f64,
    pub dp_mechanism: DpMechanism,

    /// Coarsen time-of-day/day-of-week quasi-identifiers
    pub k_anonymity: bool,
    /// Target group size. Quasi-identifiers are generalized toward this
    /// target, but resulting group sizes are never verified against a
    /// backing population — a known limitation.
    pub k: u32,

    /// Strip features outside the whitelist
    pub remove_unused_features: bool,
    /// Empty whitelist makes minimization a no-op
    pub feature_whitelist: Vec<String>,
}

impl Default for AnonymizationConfig {
    fn default() -> Self {
        Self {
            level: AnonymizationLevel::Enhanced,
            remove_direct_identifiers: true,
            hash_user_ids: true,
            generalize_timestamps: true,
            timestamp_granularity: TimestampGranularity::Hour,
            add_noise: true,
            noise_level: 0.01,
            differential_privacy: false,
            epsilon: 1.0,
            sensitivity: 1.0,
            delta: 0.00001,
            dp_mechanism: DpMechanism::Laplace,
            k_anonymity: false,
            k: 5,
            remove_unused_features: true,
            feature_whitelist: Vec::new(),
        }
    }
}

impl AnonymizationConfig {
    /// Merge a partial override over the defaults
    pub fn with_overrides(overrides: AnonymizationOverrides) -> Self {
        let mut config = Self::default();
        config.apply_overrides(overrides);
        config
    }

    /// Apply a partial override in place
    pub fn apply_overrides(&mut self, overrides: AnonymizationOverrides) {
        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = overrides.$field {
                    self.$field = value;
                })*
            };
        }
        merge!(
            level,
            remove_direct_identifiers,
            hash_user_ids,
            generalize_timestamps,
            timestamp_granularity,
            add_noise,
            noise_level,
            differential_privacy,
            epsilon,
            sensitivity,
            delta,
            dp_mechanism,
            k_anonymity,
            k,
            remove_unused_features,
            feature_whitelist,
        );
    }

    /// Validate parameter ranges
    pub fn validate(&self) -> Result<()> {
        if self.noise_level < 0.0 {
            anyhow::bail!("noise_level must be non-negative");
        }
        if self.epsilon <= 0.0 {
            anyhow::bail!("epsilon must be positive");
        }
        if self.sensitivity <= 0.0 {
            anyhow::bail!("sensitivity must be positive");
        }
        if self.delta <= 0.0 || self.delta >= 1.0 {
            anyhow::bail!("delta must lie in (0, 1)");
        }
        if self.k == 0 {
            anyhow::bail!("k must be at least 1");
        }
        Ok(())
    }
}

/// Partial configuration override supplied by a policy collaborator
///
/// Every field is optional; `None` keeps the documented default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnonymizationOverrides {
    #[serde(default)]
    pub level: Option<AnonymizationLevel>,
    #[serde(default)]
    pub remove_direct_identifiers: Option<bool>,
    #[serde(default)]
    pub hash_user_ids: Option<bool>,
    #[serde(default)]
    pub generalize_timestamps: Option<bool>,
    #[serde(default)]
    pub timestamp_granularity: Option<TimestampGranularity>,
    #[serde(default)]
    pub add_noise: Option<bool>,
    #[serde(default)]
    pub noise_level: Option<f64>,
    #[serde(default)]
    pub differential_privacy: Option<bool>,
    #[serde(default)]
    pub epsilon: Option<f64>,
    #[serde(default)]
    pub sensitivity: Option<f64>,
    #[serde(default)]
    pub delta: Option<f64>,
    #[serde(default)]
    pub dp_mechanism: Option<DpMechanism>,
    #[serde(default)]
    pub k_anonymity: Option<bool>,
    #[serde(default)]
    pub k: Option<u32>,
    #[serde(default)]
    pub remove_unused_features: Option<bool>,
    #[serde(default)]
    pub feature_whitelist: Option<Vec<String>>,
}
