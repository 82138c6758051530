//! Direct-identifier removal and feature minimization

use crate::domain::record::{
    AnonymizedFeatureVector, MAX_CUSTOM_FEATURES, OPTIONAL_NUMERIC_FEATURES,
};

/// Custom-feature keys that carry raw identifiers and are always deleted
pub const DIRECT_IDENTIFIER_KEYS: [&str; 6] = [
    "user_id",
    "session_id",
    "device_id",
    "ip_address",
    "account_id",
    "email",
];

/// Strip direct identifiers and unreviewable values from the custom map
///
/// Deletes identifier-bearing keys, drops every non-numeric custom value
/// (a string that slipped past the collector must not pass through
/// unexamined), and truncates the map to [`MAX_CUSTOM_FEATURES`] entries.
pub fn remove_direct_identifiers(features: &mut AnonymizedFeatureVector) {
    features
        .custom_features
        .retain(|key, value| !DIRECT_IDENTIFIER_KEYS.contains(&key.as_str()) && value.is_number());

    if features.custom_features.len() > MAX_CUSTOM_FEATURES {
        let overflow: Vec<String> = features
            .custom_features
            .keys()
            .skip(MAX_CUSTOM_FEATURES)
            .cloned()
            .collect();
        for key in overflow {
            features.custom_features.remove(&key);
        }
    }
}

/// Retain only whitelisted features
///
/// An empty whitelist is a no-op. Otherwise optional numeric fields and
/// custom features outside the whitelist are dropped; the four categorical
/// fields and the required numeric fields are always kept.
pub fn retain_whitelisted(features: &mut AnonymizedFeatureVector, whitelist: &[String]) {
    if whitelist.is_empty() {
        return;
    }

    for name in OPTIONAL_NUMERIC_FEATURES {
        if !whitelist.iter().any(|allowed| allowed == name) {
            if let Some(slot) = features.optional_numeric_mut(name) {
                *slot = None;
            }
        }
    }

    features
        .custom_features
        .retain(|key, _| whitelist.iter().any(|allowed| allowed == key));
}
