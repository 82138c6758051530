//! Anonymization engine and privacy mechanisms
//!
//! Strips and obscures identity-bearing information in retraining records
//! under a configurable privacy policy.
//!
//! # Architecture
//!
//! - **Mechanisms**: salted hashing, timestamp generalization, Laplace and
//!   Gaussian noise, k-anonymity-style bucketing, feature minimization
//! - **Engine**: fixed-order technique chain with a fail-closed contract
//! - **Metrics**: identifiability risk, information loss, utility
//!   preservation
//!
//! # Usage
//!
//! ```
//! use veilgate::anonymization::{AnonymizationConfig, AnonymizationEngine};
//! # fn example(record: &veilgate::domain::RetrainingDataPoint) -> anyhow::Result<()> {
//! let engine = AnonymizationEngine::new(AnonymizationConfig::default())?;
//! let result = engine.anonymize(record);
//! assert!(result.privacy_metrics.identifiability_risk <= 1.0);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod mechanisms;
pub mod metrics;

pub use config::{AnonymizationConfig, AnonymizationOverrides, DpMechanism};
pub use engine::{AnonymizationEngine, AnonymizationResult};
pub use mechanisms::{SaltStore, TimestampGranularity};
pub use metrics::PrivacyMetrics;
