//! Core domain types and models
//!
//! Holds the record/batch data model shared by the anonymization and
//! validation engines, the domain error hierarchy, and the crate-wide
//! [`Result`] alias.

pub mod batch;
pub mod errors;
pub mod record;
pub mod result;

pub use batch::RetrainingBatch;
pub use errors::VeilgateError;
pub use record::{
    AlgorithmType, AnonymizationLevel, AnonymizedFeatureVector, EngagementOutcome, EngagementType,
    RetrainingDataPoint, MAX_CUSTOM_FEATURES, OPTIONAL_NUMERIC_FEATURES,
    REQUIRED_CATEGORICAL_FEATURES,
};
pub use result::Result;

/// Shared record fixtures for unit tests across the crate
#[cfg(test)]
pub mod test_support {
    use super::record::{AnonymizedFeatureVector, EngagementOutcome, RetrainingDataPoint};
    use std::collections::BTreeMap;

    /// A well-formed feature vector with 8 of the 15 optional features set
    pub fn feature_vector() -> AnonymizedFeatureVector {
        AnonymizedFeatureVector {
            user_engagement_history: 0.6,
            user_session_time: 0.4,
            user_activity_level: 0.7,
            topic_relevance: 0.8,
            content_freshness: 0.5,
            content_length: Some(0.3),
            content_quality_score: Some(0.9),
            creator_affinity: Some(0.5),
            visual_appeal: Some(0.6),
            audio_appeal: Some(0.7),
            caption_sentiment: Some(0.6),
            hashtag_popularity: Some(0.2),
            time_decay: None,
            social_proof: Some(0.4),
            author_follower_ratio: None,
            interaction_recency: None,
            similarity_to_liked: None,
            novelty_score: None,
            diversity_score: None,
            virality_score: None,
            content_type: "clip".to_string(),
            device_type: "mobile".to_string(),
            network_quality: "wifi".to_string(),
            location_context: "home".to_string(),
            custom_features: BTreeMap::new(),
        }
    }

    /// A well-formed engagement outcome (a liked clip)
    pub fn engagement() -> EngagementOutcome {
        EngagementOutcome {
            engaged: true,
            engagement_type: "like".to_string(),
            engagement_strength: 0.8,
            dwell_time_ms: 4200.0,
            watch_percentage: Some(0.9),
            loop_count: 1,
            session_position: 3,
            session_length: 25,
            organic_engagement: true,
            sustained_attention: true,
        }
    }

    /// A fully valid record with a recent timestamp
    pub fn record() -> RetrainingDataPoint {
        let timestamp = chrono::Utc::now() - chrono::Duration::hours(2);
        RetrainingDataPoint {
            feature_vector: feature_vector(),
            actual_engagement: engagement(),
            model_version: "rec-v42".to_string(),
            algorithm_type: "clips_feed".to_string(),
            predicted_rank: 7.0,
            data_quality_score: 0.95,
            anonymization_timestamp: timestamp.to_rfc3339(),
            anonymization_level: "enhanced".to_string(),
            user_cohort: "cohort_a7".to_string(),
            demographic_cluster: "cluster_3".to_string(),
            time_of_day: 14,
            day_of_week: 2,
        }
    }
}
