//! Timestamp and quasi-identifier generalization
//!
//! Timestamps are truncated to a coarse boundary; `time_of_day` and
//! `day_of_week` are the quasi-identifiers the k-anonymity step coarsens.
//! Generalization is idempotent: re-generalizing at the same granularity is
//! a no-op.

use crate::domain::{Result, VeilgateError};
use chrono::{DateTime, Datelike, NaiveDateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Boundary a timestamp is truncated to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampGranularity {
    /// Zero minutes and seconds
    Hour,
    /// Zero the time of day
    Day,
    /// Roll back to the start of the ISO week, then zero the time of day
    Week,
}

impl Default for TimestampGranularity {
    fn default() -> Self {
        Self::Hour
    }
}

/// Truncate an RFC 3339 timestamp to the given granularity
///
/// An unparseable timestamp is an error; the anonymization engine converts
/// it into a fail-closed result rather than passing the raw value through.
pub fn generalize_timestamp(raw: &str, granularity: TimestampGranularity) -> Result<String> {
    let parsed = DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc);

    let date = match granularity {
        TimestampGranularity::Hour | TimestampGranularity::Day => parsed.date_naive(),
        TimestampGranularity::Week => {
            let days_from_monday = parsed.weekday().num_days_from_monday() as i64;
            parsed.date_naive() - chrono::Duration::days(days_from_monday)
        }
    };

    let hour = match granularity {
        TimestampGranularity::Hour => parsed.hour(),
        TimestampGranularity::Day | TimestampGranularity::Week => 0,
    };

    let truncated: NaiveDateTime = date.and_hms_opt(hour, 0, 0).ok_or_else(|| {
        VeilgateError::Anonymization("timestamp truncation out of range".to_string())
    })?;

    Ok(Utc.from_utc_datetime(&truncated).to_rfc3339())
}

/// Bucket an hour of day into 4-hour windows: `floor(v / 4) * 4`
pub fn bucket_time_of_day(hour: i32) -> i32 {
    hour.div_euclid(4) * 4
}

/// Collapse a day of week (0 = Sunday .. 6 = Saturday) to a binary
/// weekday(1)/weekend(0) flag
pub fn collapse_day_of_week(day: i32) -> i32 {
    if day == 0 || day == 6 {
        0
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(TimestampGranularity::Hour, "2026-08-12T14:00:00+00:00")]
    #[test_case(TimestampGranularity::Day, "2026-08-12T00:00:00+00:00")]
    #[test_case(TimestampGranularity::Week, "2026-08-10T00:00:00+00:00")]
    fn test_generalize(granularity: TimestampGranularity, expected: &str) {
        // 2026-08-12 is a Wednesday; its ISO week starts Monday 2026-08-10.
        let generalized = generalize_timestamp("2026-08-12T14:37:22Z", granularity).unwrap();
        assert_eq!(generalized, expected);
    }

    #[test_case(TimestampGranularity::Hour)]
    #[test_case(TimestampGranularity::Day)]
    #[test_case(TimestampGranularity::Week)]
    fn test_generalize_is_idempotent(granularity: TimestampGranularity) {
        let once = generalize_timestamp("2026-08-12T14:37:22Z", granularity).unwrap();
        let twice = generalize_timestamp(&once, granularity).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_generalize_rejects_garbage() {
        assert!(generalize_timestamp("not-a-timestamp", TimestampGranularity::Hour).is_err());
    }

    #[test_case(0, 0)]
    #[test_case(3, 0)]
    #[test_case(4, 4)]
    #[test_case(14, 12)]
    #[test_case(23, 20)]
    fn test_bucket_time_of_day(hour: i32, bucket: i32) {
        assert_eq!(bucket_time_of_day(hour), bucket);
    }

    #[test]
    fn test_collapse_day_of_week() {
        assert_eq!(collapse_day_of_week(0), 0); // Sunday
        assert_eq!(collapse_day_of_week(6), 0); // Saturday
        for weekday in 1..=5 {
            assert_eq!(collapse_day_of_week(weekday), 1);
        }
    }
}
