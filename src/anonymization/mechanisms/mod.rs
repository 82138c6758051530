//! Privacy mechanism primitives
//!
//! Stateless (or low-state) building blocks the [`AnonymizationEngine`]
//! chains together: salted hashing, timestamp generalization, noise
//! sampling with differential-privacy calibration, quasi-identifier
//! bucketing, and feature minimization.
//!
//! [`AnonymizationEngine`]: crate::anonymization::AnonymizationEngine

pub mod generalize;
pub mod hashing;
pub mod minimize;
pub mod noise;

pub use generalize::TimestampGranularity;
pub use hashing::SaltStore;
