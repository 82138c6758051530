// Veilgate - Retraining-data anonymization and validation pipeline
// Copyright (c) 2026 Veilgate Contributors
// Licensed under the MIT License

//! # Veilgate
//!
//! Veilgate is a pure in-process pipeline that prepares raw per-interaction
//! engagement records for use in retraining a recommendation model. It has
//! two stages:
//!
//! - an [`AnonymizationEngine`](anonymization::AnonymizationEngine) that
//!   strips and obscures identity-bearing information under a configurable
//!   privacy policy (salted hashing, timestamp generalization, Laplace and
//!   Gaussian noise calibrated to a privacy budget, k-anonymity-style
//!   generalization, feature minimization), and
//! - a [`ValidationEngine`](validation::ValidationEngine) that scores each
//!   anonymized record and batch against data-quality and
//!   privacy-compliance rules before it may enter a retraining batch.
//!
//! Data flows: raw record → anonymization →
//! [`AnonymizationResult`](anonymization::AnonymizationResult) → validation
//! → [`DataQualityReport`](validation::DataQualityReport) → accept/reject
//! decision by the (external) retraining-batch assembler.
//!
//! ## Quick start
//!
//! ```
//! use veilgate::anonymization::{AnonymizationConfig, AnonymizationEngine};
//! use veilgate::validation::ValidationEngine;
//!
//! # fn example(record: veilgate::domain::RetrainingDataPoint) -> anyhow::Result<()> {
//! let anonymizer = AnonymizationEngine::new(AnonymizationConfig::default())?;
//! let validator = ValidationEngine::new()?;
//!
//! let result = anonymizer.anonymize(&record);
//! if let Some(anonymized) = &result.anonymized_data {
//!     let validation = validator.validate(anonymized);
//!     println!(
//!         "score {:.2}, admissible: {}",
//!         validation.score, validation.is_valid
//!     );
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Fail-closed behavior
//!
//! Any failure inside the anonymization chain produces an unsuccessful
//! result with maximal identifiability risk and zero retained utility; the
//! raw record is never passed through unmodified, and no error escapes to
//! the caller. A broken individual validation rule is caught per rule and
//! surfaced as a synthetic error, so one faulty rule cannot abort the rest.
//!
//! ## Concurrency
//!
//! Both engines are synchronous, CPU-bound, and `Send + Sync`. The only
//! shared mutable state is the per-identifier salt cache, which serializes
//! get-or-create per cache entry. Callers own batching and backpressure.

pub mod anonymization;
pub mod domain;
pub mod validation;
