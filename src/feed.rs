//! Fallback orchestration and caching for the disaster feed.
//!
//! Sources are tried strictly one after another in priority order. The first
//! one that produces a non-empty list wins and later sources are never called.
//! When every source fails or comes back empty, the static sample set is
//! returned instead, so callers always get events and never an error.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::cache::FeedCache;
use crate::clock::{Clock, SystemClock};
use crate::config::FeedConfig;
use crate::data_sources::{EonetClient, GdacsClient, ReliefWebClient, SourceAdapter};
use crate::model::DisasterEvent;
use crate::sample::sample_events;

/// Where a snapshot's events came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "name")]
pub enum FeedOrigin {
    /// Served from the cache without contacting any source.
    Cache,
    /// Fetched from the named source.
    Source(&'static str),
    /// Every source failed or was empty; static sample data.
    Sample,
}

impl FeedOrigin {
    /// True when the events are the static fallback set.
    pub fn is_sample(&self) -> bool {
        matches!(self, FeedOrigin::Sample)
    }
}

/// A result set together with its provenance.
#[derive(Debug, Clone, Serialize)]
pub struct FeedSnapshot {
    /// Normalized events, in source order.
    pub events: Vec<DisasterEvent>,

    /// Where the events came from.
    pub origin: FeedOrigin,

    /// When the events were fetched. For cache hits, the time of the
    /// original fetch.
    pub generated_at: DateTime<Utc>,
}

/// Aggregates disaster alerts for one country.
///
/// Owns its sources, cache and clock. Fetching methods take `&mut self`, so a
/// feed never has two fetches in flight at once.
pub struct DisasterFeed {
    adapters: Vec<Box<dyn SourceAdapter>>,
    cache: FeedCache,
    clock: Arc<dyn Clock>,
    country: String,
}

impl DisasterFeed {
    /// Create a feed over `adapters`, tried in the order given.
    pub fn new(
        adapters: Vec<Box<dyn SourceAdapter>>,
        clock: Arc<dyn Clock>,
        cache_ttl: Duration,
        country: &str,
    ) -> Self {
        Self {
            adapters,
            cache: FeedCache::new(cache_ttl, clock.clone()),
            clock,
            country: country.to_string(),
        }
    }

    /// Create the standard feed: ReliefWeb, then GDACS, then EONET.
    pub fn from_config(config: &FeedConfig) -> anyhow::Result<Self> {
        let client = config.http_client()?;
        let adapters: Vec<Box<dyn SourceAdapter>> = vec![
            Box::new(ReliefWebClient::new(client.clone(), config)),
            Box::new(GdacsClient::new(client.clone(), config)),
            Box::new(EonetClient::new(client, config)),
        ];
        let ttl = Duration::from_std(config.cache_ttl)?;

        Ok(Self::new(
            adapters,
            Arc::new(SystemClock),
            ttl,
            &config.country_name,
        ))
    }

    /// Source names in priority order.
    pub fn source_names(&self) -> Vec<&'static str> {
        self.adapters.iter().map(|a| a.name()).collect()
    }

    /// The configured country.
    pub fn country(&self) -> &str {
        &self.country
    }

    /// Try each source in order and return the first non-empty result.
    ///
    /// Bypasses the cache. Source errors are logged and treated like empty
    /// results; if nothing succeeds, the sample set is returned.
    #[instrument(skip(self), fields(country = %self.country))]
    pub async fn fetch_aggregated(&self) -> FeedSnapshot {
        for adapter in &self.adapters {
            let source = adapter.name();
            match adapter.fetch().await {
                Ok(events) if !events.is_empty() => {
                    info!(source, count = events.len(), "Source returned events");
                    return FeedSnapshot {
                        events,
                        origin: FeedOrigin::Source(source),
                        generated_at: self.clock.now(),
                    };
                }
                Ok(_) => {
                    warn!(source, "Source returned no events, trying next");
                }
                Err(e) => {
                    warn!(source, error = %e, "Source failed, trying next");
                }
            }
        }

        let now = self.clock.now();
        warn!(
            sources = self.adapters.len(),
            "No source produced events, using sample data"
        );
        FeedSnapshot {
            events: sample_events(now, &self.country),
            origin: FeedOrigin::Sample,
            generated_at: now,
        }
    }

    /// Cached events if still valid, otherwise a fresh fetch.
    ///
    /// Only real source results are cached; sample data is not, so the next
    /// call tries the sources again.
    pub async fn snapshot(&mut self) -> FeedSnapshot {
        if let Some(events) = self.cache.get() {
            info!(count = events.len(), "Serving events from cache");
            return FeedSnapshot {
                events: events.to_vec(),
                origin: FeedOrigin::Cache,
                generated_at: self.cache.fetched_at().unwrap_or_else(|| self.clock.now()),
            };
        }

        info!("Cache miss, fetching from sources");
        let snapshot = self.fetch_aggregated().await;
        if !snapshot.origin.is_sample() {
            self.cache.put(snapshot.events.clone());
        }
        snapshot
    }

    /// Cached or freshly fetched events. Never empty.
    pub async fn events(&mut self) -> Vec<DisasterEvent> {
        self.snapshot().await.events
    }

    /// Drop cached events so the next call fetches again.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Clear the cache and fetch again.
    pub async fn refresh(&mut self) -> FeedSnapshot {
        self.clear_cache();
        self.snapshot().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_source_order() {
        let feed = DisasterFeed::from_config(&FeedConfig::default()).unwrap();

        assert_eq!(
            feed.source_names(),
            vec!["ReliefWeb", "GDACS", "NASA EONET"]
        );
        assert_eq!(feed.country(), "India");
    }

    #[test]
    fn test_origin_serializes_with_name() {
        let value = serde_json::to_value(FeedOrigin::Source("GDACS")).unwrap();
        assert_eq!(value["kind"], "source");
        assert_eq!(value["name"], "GDACS");
        assert!(FeedOrigin::Sample.is_sample());
    }
}
