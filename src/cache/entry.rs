//! Cached value envelope and TTL predicates

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::clock::{Clock, SystemClock};

/// A cached value stamped with the time it was written.
///
/// Entries are replaced wholesale on every write; `value` is never mutated
/// in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry<T> {
    pub value: T,
    /// Unix milliseconds at creation
    pub cached_at: i64,
    pub key: String,
}

impl<T> CacheEntry<T> {
    /// Age of the entry relative to `now`, never negative
    pub fn age_at(&self, now: i64) -> Duration {
        Duration::from_millis(now.saturating_sub(self.cached_at).max(0) as u64)
    }
}

/// Wraps `value` in an entry stamped with the wall clock.
pub fn create_entry<T>(key: impl Into<String>, value: T) -> CacheEntry<T> {
    create_entry_at(key, value, SystemClock.now_millis())
}

/// Wraps `value` in an entry stamped with `now`.
pub fn create_entry_at<T>(key: impl Into<String>, value: T, now: i64) -> CacheEntry<T> {
    CacheEntry {
        value,
        cached_at: now,
        key: key.into(),
    }
}

/// True iff `now - cached_at < ttl_ms`, using the wall clock.
pub fn is_valid(cached_at: i64, ttl_ms: u64) -> bool {
    is_valid_at(cached_at, ttl_ms, SystemClock.now_millis())
}

/// True iff `now - cached_at < ttl_ms`. A zero TTL is never valid.
pub fn is_valid_at(cached_at: i64, ttl_ms: u64, now: i64) -> bool {
    let age = i128::from(now) - i128::from(cached_at);
    age < i128::from(ttl_ms)
}

/// Time left before an entry stamped at `cached_at` expires, using the wall clock.
pub fn remaining_ttl(cached_at: i64, ttl_ms: u64) -> Duration {
    remaining_ttl_at(cached_at, ttl_ms, SystemClock.now_millis())
}

/// `max(0, ttl - (now - cached_at))`
pub fn remaining_ttl_at(cached_at: i64, ttl_ms: u64, now: i64) -> Duration {
    let age = i128::from(now) - i128::from(cached_at);
    let remaining = i128::from(ttl_ms) - age;
    if remaining <= 0 {
        Duration::ZERO
    } else {
        Duration::from_millis(u64::try_from(remaining).unwrap_or(u64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    #[test]
    fn test_create_entry_at_stamps_time_and_key() {
        let entry = create_entry_at("leagues:country=England", vec![39, 40], NOW);
        assert_eq!(entry.cached_at, NOW);
        assert_eq!(entry.key, "leagues:country=England");
        assert_eq!(entry.value, vec![39, 40]);
    }

    #[test]
    fn test_create_entry_uses_wall_clock() {
        let before = SystemClock.now_millis();
        let entry = create_entry("countries", ());
        let after = SystemClock.now_millis();
        assert!(entry.cached_at >= before && entry.cached_at <= after);
    }

    #[test]
    fn test_ttl_boundary() {
        let ttl = 60_000;
        assert!(is_valid_at(NOW, ttl, NOW));
        assert!(is_valid_at(NOW - 59_999, ttl, NOW));
        assert!(!is_valid_at(NOW - 60_000, ttl, NOW));
        assert!(!is_valid_at(NOW - ttl as i64 - 1, ttl, NOW));
    }

    #[test]
    fn test_zero_ttl_is_always_invalid() {
        assert!(!is_valid_at(NOW, 0, NOW));
        assert!(!is_valid(SystemClock.now_millis(), 0));
    }

    #[test]
    fn test_remaining_ttl_never_negative() {
        assert_eq!(
            remaining_ttl_at(NOW - 1_000, 5_000, NOW),
            Duration::from_millis(4_000)
        );
        assert_eq!(remaining_ttl_at(NOW - 10_000, 5_000, NOW), Duration::ZERO);
        assert_eq!(remaining_ttl_at(NOW, 0, NOW), Duration::ZERO);
    }

    #[test]
    fn test_entry_serializes_with_camel_case_fields() {
        let entry = create_entry_at("timezone", "Europe/London".to_string(), NOW);
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "value": "Europe/London",
                "cachedAt": NOW,
                "key": "timezone",
            })
        );
    }

    #[test]
    fn test_age_at_clamps_future_stamps() {
        let entry = create_entry_at("k", 1, NOW + 500);
        assert_eq!(entry.age_at(NOW), Duration::ZERO);
        assert_eq!(entry.age_at(NOW + 1_500), Duration::from_millis(1_000));
    }
}
