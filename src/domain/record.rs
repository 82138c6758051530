//! Retraining record domain types
//!
//! A [`RetrainingDataPoint`] is produced once per engagement event by the
//! upstream interaction-log collector, passed through the anonymization and
//! validation pipeline exactly once, and is either admitted to a retraining
//! batch or discarded. It is never mutated in place after anonymization.
//!
//! The enum-like fields (`algorithm_type`, `anonymization_level`,
//! `engagement_type`) are deliberately kept as strings on the record:
//! upstream producers are out of this crate's control, and the
//! [`ValidationEngine`] must be able to observe and report invalid values
//! instead of failing at deserialization time. The strongly-typed enums in
//! this module are the parse targets the rules check against.
//!
//! [`ValidationEngine`]: crate::validation::ValidationEngine

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Upper bound on the open custom-feature map.
///
/// Anything past this is stripped during anonymization rather than passed
/// through unexamined.
pub const MAX_CUSTOM_FEATURES: usize = 32;

/// Recommendation surface a record was sampled from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmType {
    PostsFeed,
    ClipsFeed,
    FriendSuggestions,
}

impl AlgorithmType {
    /// Parse a wire label, returning `None` for unknown values
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "posts_feed" => Some(Self::PostsFeed),
            "clips_feed" => Some(Self::ClipsFeed),
            "friend_suggestions" => Some(Self::FriendSuggestions),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::PostsFeed => "posts_feed",
            Self::ClipsFeed => "clips_feed",
            Self::FriendSuggestions => "friend_suggestions",
        }
    }
}

/// Anonymization strength applied to a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnonymizationLevel {
    Basic,
    Enhanced,
    DifferentialPrivacy,
}

impl AnonymizationLevel {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "basic" => Some(Self::Basic),
            "enhanced" => Some(Self::Enhanced),
            "differential_privacy" => Some(Self::DifferentialPrivacy),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Enhanced => "enhanced",
            Self::DifferentialPrivacy => "differential_privacy",
        }
    }
}

/// Kind of engagement the user produced on the recommended item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementType {
    View,
    Like,
    Comment,
    Share,
    Save,
    Skip,
    Hide,
}

impl EngagementType {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "view" => Some(Self::View),
            "like" => Some(Self::Like),
            "comment" => Some(Self::Comment),
            "share" => Some(Self::Share),
            "save" => Some(Self::Save),
            "skip" => Some(Self::Skip),
            "hide" => Some(Self::Hide),
            _ => None,
        }
    }

    /// Expected `engagement_strength` band for this engagement type.
    ///
    /// Deviation is a consistency warning, not a hard invariant.
    pub fn expected_strength_band(&self) -> (f64, f64) {
        match self {
            Self::Skip | Self::Hide => (0.0, 0.3),
            Self::View => (0.1, 0.7),
            Self::Like | Self::Comment | Self::Share | Self::Save => (0.5, 1.0),
        }
    }
}

/// Anonymized per-interaction feature vector
///
/// Twenty named numeric fields normalized to `[0, 1]`, four categorical
/// fields, and a bounded open map of custom features. The five user-level
/// numeric fields are always populated by the collector; the remaining
/// fifteen are optional and their presence feeds the completeness rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnonymizedFeatureVector {
    // Required numeric features
    pub user_engagement_history: f64,
    pub user_session_time: f64,
    pub user_activity_level: f64,
    pub topic_relevance: f64,
    pub content_freshness: f64,

    // Optional numeric features
    #[serde(default)]
    pub content_length: Option<f64>,
    #[serde(default)]
    pub content_quality_score: Option<f64>,
    #[serde(default)]
    pub creator_affinity: Option<f64>,
    #[serde(default)]
    pub visual_appeal: Option<f64>,
    #[serde(default)]
    pub audio_appeal: Option<f64>,
    #[serde(default)]
    pub caption_sentiment: Option<f64>,
    #[serde(default)]
    pub hashtag_popularity: Option<f64>,
    #[serde(default)]
    pub time_decay: Option<f64>,
    #[serde(default)]
    pub social_proof: Option<f64>,
    #[serde(default)]
    pub author_follower_ratio: Option<f64>,
    #[serde(default)]
    pub interaction_recency: Option<f64>,
    #[serde(default)]
    pub similarity_to_liked: Option<f64>,
    #[serde(default)]
    pub novelty_score: Option<f64>,
    #[serde(default)]
    pub diversity_score: Option<f64>,
    #[serde(default)]
    pub virality_score: Option<f64>,

    // Categorical features (always required)
    pub content_type: String,
    pub device_type: String,
    pub network_quality: String,
    pub location_context: String,

    /// Open custom-feature map.
    ///
    /// Modeled as raw JSON values so validation can inspect string-typed
    /// entries for PII before anonymization strips them.
    #[serde(default)]
    pub custom_features: BTreeMap<String, Value>,
}

/// Names of the fifteen optional numeric features, in declaration order
pub const OPTIONAL_NUMERIC_FEATURES: [&str; 15] = [
    "content_length",
    "content_quality_score",
    "creator_affinity",
    "visual_appeal",
    "audio_appeal",
    "caption_sentiment",
    "hashtag_popularity",
    "time_decay",
    "social_proof",
    "author_follower_ratio",
    "interaction_recency",
    "similarity_to_liked",
    "novelty_score",
    "diversity_score",
    "virality_score",
];

/// Names of the four always-required categorical features
pub const REQUIRED_CATEGORICAL_FEATURES: [&str; 4] = [
    "content_type",
    "device_type",
    "network_quality",
    "location_context",
];

impl AnonymizedFeatureVector {
    /// All twenty named numeric fields as `(name, value)` pairs.
    ///
    /// Required fields are always `Some`; optional fields reflect presence.
    pub fn numeric_entries(&self) -> Vec<(&'static str, Option<f64>)> {
        vec![
            ("user_engagement_history", Some(self.user_engagement_history)),
            ("user_session_time", Some(self.user_session_time)),
            ("user_activity_level", Some(self.user_activity_level)),
            ("topic_relevance", Some(self.topic_relevance)),
            ("content_freshness", Some(self.content_freshness)),
            ("content_length", self.content_length),
            ("content_quality_score", self.content_quality_score),
            ("creator_affinity", self.creator_affinity),
            ("visual_appeal", self.visual_appeal),
            ("audio_appeal", self.audio_appeal),
            ("caption_sentiment", self.caption_sentiment),
            ("hashtag_popularity", self.hashtag_popularity),
            ("time_decay", self.time_decay),
            ("social_proof", self.social_proof),
            ("author_follower_ratio", self.author_follower_ratio),
            ("interaction_recency", self.interaction_recency),
            ("similarity_to_liked", self.similarity_to_liked),
            ("novelty_score", self.novelty_score),
            ("diversity_score", self.diversity_score),
            ("virality_score", self.virality_score),
        ]
    }

    /// The four categorical fields as `(name, value)` pairs
    pub fn categorical_entries(&self) -> [(&'static str, &str); 4] {
        [
            ("content_type", &self.content_type),
            ("device_type", &self.device_type),
            ("network_quality", &self.network_quality),
            ("location_context", &self.location_context),
        ]
    }

    /// Apply `f` to every present numeric field, including numeric custom
    /// features. Non-numeric custom values are left untouched here; the
    /// anonymization chain strips them in its identifier-removal step.
    pub fn map_numeric(&mut self, mut f: impl FnMut(f64) -> f64) {
        self.user_engagement_history = f(self.user_engagement_history);
        self.user_session_time = f(self.user_session_time);
        self.user_activity_level = f(self.user_activity_level);
        self.topic_relevance = f(self.topic_relevance);
        self.content_freshness = f(self.content_freshness);
        for name in OPTIONAL_NUMERIC_FEATURES {
            if let Some(slot) = self.optional_numeric_mut(name) {
                if let Some(v) = *slot {
                    *slot = Some(f(v));
                }
            }
        }
        for value in self.custom_features.values_mut() {
            if let Some(n) = value.as_f64() {
                if let Some(mapped) = serde_json::Number::from_f64(f(n)) {
                    *value = Value::Number(mapped);
                }
            }
        }
    }

    /// Mutable access to an optional numeric field by name
    pub fn optional_numeric_mut(&mut self, name: &str) -> Option<&mut Option<f64>> {
        match name {
            "content_length" => Some(&mut self.content_length),
            "content_quality_score" => Some(&mut self.content_quality_score),
            "creator_affinity" => Some(&mut self.creator_affinity),
            "visual_appeal" => Some(&mut self.visual_appeal),
            "audio_appeal" => Some(&mut self.audio_appeal),
            "caption_sentiment" => Some(&mut self.caption_sentiment),
            "hashtag_popularity" => Some(&mut self.hashtag_popularity),
            "time_decay" => Some(&mut self.time_decay),
            "social_proof" => Some(&mut self.social_proof),
            "author_follower_ratio" => Some(&mut self.author_follower_ratio),
            "interaction_recency" => Some(&mut self.interaction_recency),
            "similarity_to_liked" => Some(&mut self.similarity_to_liked),
            "novelty_score" => Some(&mut self.novelty_score),
            "diversity_score" => Some(&mut self.diversity_score),
            "virality_score" => Some(&mut self.virality_score),
            _ => None,
        }
    }

    /// Fraction of the optional numeric features that are populated
    pub fn completeness_ratio(&self) -> f64 {
        let present = self
            .numeric_entries()
            .iter()
            .skip(5)
            .filter(|(_, v)| v.is_some())
            .count();
        present as f64 / OPTIONAL_NUMERIC_FEATURES.len() as f64
    }
}

/// Observed engagement outcome for a recommended item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementOutcome {
    pub engaged: bool,
    /// One of view/like/comment/share/save/skip/hide (see [`EngagementType`])
    pub engagement_type: String,
    /// Engagement intensity in `[0, 1]`
    pub engagement_strength: f64,
    /// Milliseconds the item was on screen; never negative for valid records
    pub dwell_time_ms: f64,
    #[serde(default)]
    pub watch_percentage: Option<f64>,
    #[serde(default)]
    pub loop_count: u32,
    pub session_position: u32,
    pub session_length: u32,
    pub organic_engagement: bool,
    pub sustained_attention: bool,
}

/// One anonymized engagement record, candidate for a retraining batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrainingDataPoint {
    pub feature_vector: AnonymizedFeatureVector,
    pub actual_engagement: EngagementOutcome,
    pub model_version: String,
    /// One of posts_feed/clips_feed/friend_suggestions (see [`AlgorithmType`])
    pub algorithm_type: String,
    pub predicted_rank: f64,
    pub data_quality_score: f64,
    /// RFC 3339 timestamp, generalized by the anonymization chain
    pub anonymization_timestamp: String,
    /// One of basic/enhanced/differential_privacy (see [`AnonymizationLevel`])
    pub anonymization_level: String,
    pub user_cohort: String,
    pub demographic_cluster: String,
    /// Hour of day, `0..=23` for valid records
    pub time_of_day: i32,
    /// Day of week, `0..=6` for valid records
    pub day_of_week: i32,
}
