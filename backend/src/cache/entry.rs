//! The JSON envelope every cached value is stored in.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub payload: T,
    pub written_at: DateTime<Utc>,
    /// Time to live in milliseconds.
    pub ttl_ms: i64,
}

impl<T> CacheEntry<T> {
    pub fn new(payload: T, written_at: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            payload,
            written_at,
            ttl_ms: ttl.num_milliseconds(),
        }
    }

    /// `None` when the stored milliseconds are outside chrono's range.
    pub fn ttl(&self) -> Option<Duration> {
        Duration::try_milliseconds(self.ttl_ms)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.written_at.checked_add_signed(self.ttl()?)
    }

    /// Valid while `now - written_at <= ttl`.
    ///
    /// `None` for an envelope whose timing fields cannot be represented; the
    /// cache treats those as corrupt.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> Option<bool> {
        let ttl = self.ttl()?;
        Some(now.signed_duration_since(self.written_at) <= ttl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity_boundary_is_inclusive() {
        let written = Utc::now();
        let entry = CacheEntry::new(1u8, written, Duration::seconds(10));
        assert_eq!(entry.is_valid_at(written), Some(true));
        assert_eq!(entry.is_valid_at(written + Duration::seconds(10)), Some(true));
        assert_eq!(
            entry.is_valid_at(written + Duration::milliseconds(10_001)),
            Some(false)
        );
        assert_eq!(entry.expires_at(), Some(written + Duration::seconds(10)));
    }

    #[test]
    fn test_out_of_range_ttl_is_unrepresentable() {
        let written = Utc::now();
        let mut entry = CacheEntry::new(1u8, written, Duration::seconds(10));

        entry.ttl_ms = i64::MIN;
        assert_eq!(entry.ttl(), None);
        assert_eq!(entry.expires_at(), None);
        assert_eq!(entry.is_valid_at(written), None);

        entry.ttl_ms = i64::MAX;
        assert!(entry.ttl().is_some());
        assert_eq!(entry.expires_at(), None);
        assert_eq!(entry.is_valid_at(written), Some(true));
    }

    #[test]
    fn test_envelope_shape() {
        let written = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let entry = CacheEntry::new(vec![1, 2], written, Duration::minutes(1));
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["ttl_ms"], 60_000);
        assert_eq!(json["payload"], serde_json::json!([1, 2]));
    }
}
