//! Salted identifier hashing
//!
//! Raw identifier values are mapped through a one-way salted SHA-256 hash.
//! Salts are random and cached per raw value for the lifetime of the
//! [`SaltStore`], never derived from the identifier itself, so outputs
//! cannot be correlated across process restarts or across independently
//! constructed stores.

use rand::Rng;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// Length of the truncated hex hash emitted for an identifier
const HASH_LENGTH: usize = 16;

/// Per-identifier salt cache with get-or-create serialization per entry
///
/// Two concurrent calls hashing the same raw value race on salt creation;
/// each cache entry is an [`OnceLock`], so only one generated salt ever
/// wins and both callers observe it. Distinct identifiers only contend on
/// the brief map lookup, not on salt generation.
///
/// The store is owned by an [`AnonymizationEngine`] and injected at
/// construction; there is no process-wide singleton.
///
/// [`AnonymizationEngine`]: crate::anonymization::AnonymizationEngine
#[derive(Debug, Default)]
pub struct SaltStore {
    salts: RwLock<HashMap<String, Arc<OnceLock<String>>>>,
}

impl SaltStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash an identifier with its cached (or freshly generated) salt
    ///
    /// Returns the first [`HASH_LENGTH`] hex characters of
    /// `SHA-256(value || salt)`.
    pub fn hash(&self, raw: &str) -> String {
        let salt = self.salt_for(raw);

        let mut hasher = Sha256::new();
        hasher.update(raw.as_bytes());
        hasher.update(salt.as_bytes());
        let digest = hasher.finalize();

        let mut hex = format!("{digest:x}");
        hex.truncate(HASH_LENGTH);
        hex
    }

    /// Look up or lazily create the salt for a raw identifier value
    fn salt_for(&self, raw: &str) -> String {
        self.entry(raw).get_or_init(generate_salt).clone()
    }

    /// Get or insert the cache entry for a raw value
    fn entry(&self, raw: &str) -> Arc<OnceLock<String>> {
        {
            let salts = self.salts.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(entry) = salts.get(raw) {
                return Arc::clone(entry);
            }
        }

        let mut salts = self.salts.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(salts.entry(raw.to_string()).or_default())
    }

    /// Number of identifiers with a cached salt
    pub fn len(&self) -> usize {
        self.salts
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Generate a fresh random salt (128 bits, hex-encoded)
fn generate_salt() -> String {
    let salt: u128 = rand::thread_rng().gen();
    format!("{salt:032x}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_same_value_same_hash_within_store() {
        let store = SaltStore::new();
        let first = store.hash("cohort_a7");
        let second = store.hash("cohort_a7");
        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_same_value_diverges_across_stores() {
        // Fresh random salts mean independent stores cannot be correlated.
        let first = SaltStore::new().hash("cohort_a7");
        let second = SaltStore::new().hash("cohort_a7");
        assert_ne!(first, second);
    }

    #[test]
    fn test_hash_is_truncated_hex() {
        let store = SaltStore::new();
        let hash = store.hash("cluster_3");
        assert_eq!(hash.len(), 16);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_concurrent_same_key_single_salt() {
        let store = Arc::new(SaltStore::new());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.hash("user_cohort_shared"))
            })
            .collect();

        let hashes: Vec<String> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(hashes.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(store.len(), 1);
    }
}
