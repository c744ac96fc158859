//! Bounded, insertion-ordered cache with per-lookup TTL.
//!
//! Eviction drops the oldest *inserted* key once the capacity is exceeded.
//! Refreshing an existing key replaces its entry in place without moving it,
//! so this is deliberately not an LRU.

use crate::metric::Metric;
use crate::range::TimeRange;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use std::time::Duration;

/// Maximum number of entries in the series and heatmap caches.
pub const CACHE_CAPACITY: usize = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<V> {
    pub fetched_at: DateTime<Utc>,
    pub data: V,
}

#[derive(Debug, Clone)]
pub struct TtlCache<V> {
    entries: IndexMap<String, CacheEntry<V>>,
    capacity: usize,
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new(CACHE_CAPACITY)
    }
}

impl<V> TtlCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Entry for `key` if it was fetched less than `ttl` before `now`.
    pub fn get_fresh(&self, key: &str, now: DateTime<Utc>, ttl: Duration) -> Option<&V> {
        let entry = self.entries.get(key)?;
        let age_ms = now.signed_duration_since(entry.fetched_at).num_milliseconds();
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        (age_ms < ttl_ms).then_some(&entry.data)
    }

    /// Store `data` under `key`, evicting the oldest-inserted keys while over
    /// capacity. Returns how many entries were evicted.
    pub fn insert(&mut self, key: impl Into<String>, now: DateTime<Utc>, data: V) -> usize {
        self.entries.insert(
            key.into(),
            CacheEntry {
                fetched_at: now,
                data,
            },
        );
        let mut evicted = 0;
        while self.entries.len() > self.capacity {
            if self.entries.shift_remove_index(0).is_none() {
                break;
            }
            evicted += 1;
        }
        evicted
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Keys from oldest to newest insertion.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Cache key for one chart series request.
pub fn series_key(range: TimeRange, filter: &str, metric: Metric) -> String {
    format!("{}|{}|{}", range.as_str(), filter, metric.as_str())
}

/// Cache key for one heatmap request.
pub fn heatmap_key(filter: &str, metric: Metric) -> String {
    format!("heat|{}|{}", filter, metric.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    #[test]
    fn fresh_within_ttl_only() {
        let mut cache = TtlCache::default();
        cache.insert("k", at(0), 1);
        let ttl = Duration::from_secs(60);
        assert_eq!(cache.get_fresh("k", at(59), ttl), Some(&1));
        assert_eq!(cache.get_fresh("k", at(60), ttl), None);
        assert_eq!(cache.get_fresh("missing", at(0), ttl), None);
    }

    #[test]
    fn evicts_oldest_inserted_key() {
        let mut cache = TtlCache::new(CACHE_CAPACITY);
        for i in 0..CACHE_CAPACITY {
            assert_eq!(cache.insert(format!("k{i}"), at(0), i), 0);
        }
        assert_eq!(cache.insert("k30", at(1), 30), 1);
        assert_eq!(cache.len(), CACHE_CAPACITY);
        assert!(!cache.contains_key("k0"));
        assert!(cache.contains_key("k1"));
        assert!(cache.contains_key("k30"));
    }

    #[test]
    fn refresh_does_not_move_key() {
        let mut cache = TtlCache::new(2);
        cache.insert("a", at(0), 1);
        cache.insert("b", at(0), 2);
        cache.insert("a", at(5), 3);
        cache.insert("c", at(6), 4);
        assert_eq!(cache.keys().collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn clear_empties() {
        let mut cache = TtlCache::default();
        cache.insert("a", at(0), ());
        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn key_formats() {
        assert_eq!(
            series_key(TimeRange::OneWeek, "Chiang Mai", Metric::Pm10),
            "1 Week|Chiang Mai|pm10"
        );
        assert_eq!(heatmap_key("Lampang", Metric::Aqi), "heat|Lampang|aqi");
    }
}
