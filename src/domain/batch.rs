//! Retraining batch type

use super::record::RetrainingDataPoint;
use serde::{Deserialize, Serialize};

/// A batch of anonymized records assembled for one retraining run
///
/// `batch_size` is declared by the assembler and cross-checked against the
/// actual record count during batch validation; a mismatch is a hard error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrainingBatch {
    pub batch_id: String,
    /// RFC 3339 creation timestamp
    pub created_at: String,
    pub algorithm_type: String,
    pub batch_size: usize,
    pub records: Vec<RetrainingDataPoint>,
}

impl RetrainingBatch {
    /// Create a batch whose declared size matches its records
    pub fn new(
        batch_id: impl Into<String>,
        created_at: impl Into<String>,
        algorithm_type: impl Into<String>,
        records: Vec<RetrainingDataPoint>,
    ) -> Self {
        Self {
            batch_id: batch_id.into(),
            created_at: created_at.into(),
            algorithm_type: algorithm_type.into(),
            batch_size: records.len(),
            records,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sets_declared_size() {
        let records = vec![crate::domain::test_support::record(); 3];
        let batch = RetrainingBatch::new("batch-1", "2026-08-01T00:00:00Z", "posts_feed", records);
        assert_eq!(batch.batch_size, 3);
        assert_eq!(batch.records.len(), 3);
    }
}
