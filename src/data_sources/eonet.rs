//! NASA EONET (Earth Observatory Natural Event Tracker) client.
//!
//! EONET lists natural events worldwide without country tags, so events are
//! kept only when their first geometry point falls inside the regional
//! bounding box. Every kept event gets the same location label and a fixed
//! `Medium` severity.
//!
//! # API Reference
//!
//! See: <https://eonet.gsfc.nasa.gov/docs/v3>

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::FeedConfig;
use crate::data_sources::{SourceAdapter, get_body};
use crate::error::FetchError;
use crate::model::{DisasterEvent, Severity};
use crate::normalize::{first_non_blank, in_region, resolve_date};

/// Base URL for the EONET API.
const EONET_API_BASE: &str = "https://eonet.gsfc.nasa.gov/api/v3";

/// Provider name stamped on every event.
pub const EONET_SOURCE: &str = "NASA EONET";

/// Used when an event has no category.
const DEFAULT_EVENT_TYPE: &str = "Natural Event";

/// Client for EONET open events.
#[derive(Clone)]
pub struct EonetClient {
    client: reqwest::Client,
    base_url: String,
    country_name: String,
    region_label: String,
    limit: u32,
}

impl EonetClient {
    /// Create a client using the region settings in `config`.
    pub fn new(client: reqwest::Client, config: &FeedConfig) -> Self {
        Self {
            client,
            base_url: EONET_API_BASE.to_string(),
            country_name: config.country_name.clone(),
            region_label: config.region_label.clone(),
            limit: config.eonet_limit,
        }
    }

    /// Point the client at a different base URL (for testing).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// URL for currently open events.
    pub fn events_url(&self) -> String {
        format!("{}/events?status=open&limit={}", self.base_url, self.limit)
    }

    /// Get open events worldwide.
    pub async fn get_events(&self) -> Result<EonetEventsResponse, FetchError> {
        let body = get_body(&self.client, &self.events_url()).await?;
        let data = serde_json::from_str::<EonetEventsResponse>(&body)?;
        Ok(data)
    }
}

#[async_trait]
impl SourceAdapter for EonetClient {
    fn name(&self) -> &'static str {
        EONET_SOURCE
    }

    async fn fetch(&self) -> Result<Vec<DisasterEvent>, FetchError> {
        let response = self.get_events().await?;
        let total = response.events.len();

        let events: Vec<DisasterEvent> = response
            .events
            .iter()
            .filter(|event| event.is_in_region())
            .map(|event| event.to_event(&self.region_label, &self.country_name))
            .collect();

        debug!(total, kept = events.len(), "EONET events filtered by region");
        Ok(events)
    }
}

// ============================================================================
// Response types
// ============================================================================

/// Events list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EonetEventsResponse {
    /// Open events.
    pub events: Vec<EonetEvent>,
}

/// A single natural event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EonetEvent {
    /// EONET id, e.g. "EONET_6543".
    #[serde(default)]
    pub id: String,

    /// Event title.
    #[serde(default)]
    pub title: String,

    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,

    /// API link to the event.
    #[serde(default)]
    pub link: Option<String>,

    /// Categories such as "Wildfires" or "Severe Storms".
    #[serde(default)]
    pub categories: Vec<EonetCategory>,

    /// Upstream sources with links.
    #[serde(default)]
    pub sources: Vec<EonetSource>,

    /// Observed positions, oldest first.
    #[serde(default)]
    pub geometry: Vec<EonetGeometry>,
}

/// Event category.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EonetCategory {
    /// Category slug, e.g. "wildfires".
    #[serde(default)]
    pub id: String,

    /// Display title.
    #[serde(default)]
    pub title: String,
}

/// Upstream source reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EonetSource {
    /// Source code, e.g. "InciWeb".
    #[serde(default)]
    pub id: String,

    /// Link to the source's page for this event.
    #[serde(default)]
    pub url: Option<String>,
}

/// One observation of an event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EonetGeometry {
    /// Observation time.
    #[serde(default)]
    pub date: Option<String>,

    /// GeoJSON geometry type ("Point", "Polygon").
    #[serde(default, rename = "type")]
    pub geometry_type: String,

    /// GeoJSON coordinates, nested according to `geometry_type`.
    #[serde(default)]
    pub coordinates: serde_json::Value,
}

impl EonetGeometry {
    /// First `(lon, lat)` pair, whatever the nesting depth.
    pub fn first_point(&self) -> Option<(f64, f64)> {
        first_pair(&self.coordinates)
    }
}

fn first_pair(value: &serde_json::Value) -> Option<(f64, f64)> {
    let items = value.as_array()?;
    match (items.first()?, items.get(1)) {
        (serde_json::Value::Number(lon), Some(serde_json::Value::Number(lat))) => {
            Some((lon.as_f64()?, lat.as_f64()?))
        }
        (first, _) => first_pair(first),
    }
}

impl EonetEvent {
    /// Whether the first observation lies in the regional bounding box.
    pub fn is_in_region(&self) -> bool {
        self.geometry
            .first()
            .and_then(EonetGeometry::first_point)
            .is_some_and(|(lon, lat)| in_region(lon, lat))
    }

    /// Normalize this event into a [`DisasterEvent`].
    pub fn to_event(&self, region_label: &str, country: &str) -> DisasterEvent {
        let disaster_type = first_non_blank([self.categories.first().map(|c| c.title.as_str())])
            .unwrap_or(DEFAULT_EVENT_TYPE);
        let description = first_non_blank([self.description.as_deref()])
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} tracked by NASA EONET.", disaster_type));

        DisasterEvent {
            id: self.id.clone(),
            title: self.title.trim().to_string(),
            description,
            date: resolve_date([self.geometry.first().and_then(|g| g.date.as_deref())]),
            location: region_label.to_string(),
            disaster_type: disaster_type.to_string(),
            severity: Severity::Medium,
            source: EONET_SOURCE.to_string(),
            url: first_non_blank([
                self.sources.first().and_then(|s| s.url.as_deref()),
                self.link.as_deref(),
            ])
            .unwrap_or("#")
            .to_string(),
            country: country.to_string(),
        }
    }
}
