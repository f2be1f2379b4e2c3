//! Time-boxed in-memory cache of the last aggregated result set.
//!
//! The cache holds at most one entry. It lives only as long as the owning
//! [`crate::feed::DisasterFeed`]; nothing is persisted.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::clock::Clock;
use crate::model::DisasterEvent;

#[derive(Debug, Clone)]
struct CacheEntry {
    events: Vec<DisasterEvent>,
    fetched_at: DateTime<Utc>,
}

/// Single-entry cache with a fixed time-to-live.
pub struct FeedCache {
    entry: Option<CacheEntry>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl FeedCache {
    /// Create an empty cache.
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            entry: None,
            ttl,
            clock,
        }
    }

    /// The cached events, if an entry exists and is younger than the TTL.
    pub fn get(&self) -> Option<&[DisasterEvent]> {
        let entry = self.entry.as_ref()?;
        let age = self.clock.now() - entry.fetched_at;
        if age < self.ttl {
            Some(entry.events.as_slice())
        } else {
            None
        }
    }

    /// Store `events`, stamped with the current time.
    pub fn put(&mut self, events: Vec<DisasterEvent>) {
        let fetched_at = self.clock.now();
        debug!(count = events.len(), %fetched_at, "Cache populated");
        self.entry = Some(CacheEntry { events, fetched_at });
    }

    /// Drop any entry.
    pub fn clear(&mut self) {
        if self.entry.take().is_some() {
            debug!("Cache cleared");
        }
    }

    /// When the current entry was stored, valid or not.
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.entry.as_ref().map(|e| e.fetched_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::model::Severity;
    use chrono::TimeZone;

    fn setup() -> (Arc<ManualClock>, FeedCache) {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap(),
        ));
        let cache = FeedCache::new(Duration::minutes(5), clock.clone());
        (clock, cache)
    }

    fn events() -> Vec<DisasterEvent> {
        vec![DisasterEvent {
            id: "1".to_string(),
            title: "Flood".to_string(),
            description: String::new(),
            date: Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap(),
            location: "India".to_string(),
            disaster_type: "Flood".to_string(),
            severity: Severity::High,
            source: "ReliefWeb".to_string(),
            url: "#".to_string(),
            country: "India".to_string(),
        }]
    }

    #[test]
    fn test_empty_cache_misses() {
        let (_clock, cache) = setup();
        assert!(cache.get().is_none());
        assert!(cache.fetched_at().is_none());
    }

    #[test]
    fn test_get_after_put_returns_same_list() {
        let (_clock, mut cache) = setup();
        cache.put(events());

        assert_eq!(cache.get(), Some(events().as_slice()));
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let (clock, mut cache) = setup();
        cache.put(events());

        clock.advance(Duration::minutes(4) + Duration::seconds(59));
        assert!(cache.get().is_some());

        clock.advance(Duration::seconds(1));
        assert!(cache.get().is_none());
        assert!(cache.fetched_at().is_some());
    }

    #[test]
    fn test_clear_resets_unconditionally() {
        let (_clock, mut cache) = setup();
        cache.put(events());

        cache.clear();

        assert!(cache.get().is_none());
        assert!(cache.fetched_at().is_none());
    }
}
