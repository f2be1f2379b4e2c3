//! GDACS (Global Disaster Alert and Coordination System) client.
//!
//! GDACS publishes automated alerts for earthquakes, tropical cyclones, floods,
//! droughts, volcanoes and wildfires, each with a Green/Orange/Red alert level.
//!
//! # API Reference
//!
//! See: <https://www.gdacs.org/gdacsapi/swagger/index.html>
//!
//! The event list endpoint answers with a GeoJSON `FeatureCollection`. A query
//! that matches nothing may come back with an empty body.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::FeedConfig;
use crate::data_sources::{SourceAdapter, get_body, string_or_number};
use crate::error::FetchError;
use crate::model::DisasterEvent;
use crate::normalize::{first_non_blank, gdacs_severity, gdacs_type_label, resolve_date};

/// Base URL for the GDACS API.
const GDACS_API_BASE: &str = "https://www.gdacs.org/gdacsapi/api";

/// Provider name stamped on every event.
pub const GDACS_SOURCE: &str = "GDACS";

/// Event types requested from GDACS.
const EVENT_TYPES: &str = "EQ;TC;FL;VO;DR;WF";

/// Alert levels requested from GDACS.
const ALERT_LEVELS: &str = "Green;Orange;Red";

/// Client for the GDACS event list.
#[derive(Clone)]
pub struct GdacsClient {
    client: reqwest::Client,
    base_url: String,
    country_name: String,
    limit: u32,
}

impl GdacsClient {
    /// Create a client for the country in `config`.
    pub fn new(client: reqwest::Client, config: &FeedConfig) -> Self {
        Self {
            client,
            base_url: GDACS_API_BASE.to_string(),
            country_name: config.country_name.clone(),
            limit: config.gdacs_limit,
        }
    }

    /// Point the client at a different base URL (for testing).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// URL for alerts about the configured country.
    pub fn events_url(&self) -> String {
        format!(
            "{}/events/geteventlist/SEARCH?eventlist={}&alertlevel={}&country={}&pagesize={}",
            self.base_url,
            EVENT_TYPES,
            ALERT_LEVELS,
            urlencoding::encode(&self.country_name),
            self.limit
        )
    }

    /// Get the current alert list. An empty body yields an empty collection.
    pub async fn get_events(&self) -> Result<GdacsFeatureCollection, FetchError> {
        let body = get_body(&self.client, &self.events_url()).await?;
        if body.trim().is_empty() {
            debug!("GDACS returned an empty body");
            return Ok(GdacsFeatureCollection::default());
        }

        let data = serde_json::from_str::<GdacsFeatureCollection>(&body)?;
        Ok(data)
    }
}

#[async_trait]
impl SourceAdapter for GdacsClient {
    fn name(&self) -> &'static str {
        GDACS_SOURCE
    }

    async fn fetch(&self) -> Result<Vec<DisasterEvent>, FetchError> {
        let collection = self.get_events().await?;
        Ok(collection
            .features
            .iter()
            .map(|feature| feature.properties.to_event(&self.country_name))
            .collect())
    }
}

// ============================================================================
// Response types
// ============================================================================

/// GeoJSON feature collection returned by the event list.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GdacsFeatureCollection {
    /// One feature per alert.
    pub features: Vec<GdacsFeature>,
}

/// A single alert.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GdacsFeature {
    /// Alert attributes.
    #[serde(default)]
    pub properties: GdacsProperties,
}

/// Alert attributes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GdacsProperties {
    /// Event type code (EQ, TC, FL, DR, VO, WF).
    #[serde(default)]
    pub eventtype: String,

    /// Event id, unique per event type.
    #[serde(default, deserialize_with = "string_or_number")]
    pub eventid: String,

    /// Event name.
    #[serde(default)]
    pub name: Option<String>,

    /// Plain-text description.
    #[serde(default)]
    pub description: Option<String>,

    /// HTML description.
    #[serde(default)]
    pub htmldescription: Option<String>,

    /// Alert level (Green, Orange, Red).
    #[serde(default)]
    pub alertlevel: String,

    /// Affected country or countries.
    #[serde(default)]
    pub country: Option<String>,

    /// Event start.
    #[serde(default)]
    pub fromdate: Option<String>,

    /// Event end (or last update).
    #[serde(default)]
    pub todate: Option<String>,

    /// Links to GDACS pages.
    #[serde(default)]
    pub url: Option<GdacsLinks>,

    /// Hazard-specific magnitude text.
    #[serde(default)]
    pub severitydata: Option<GdacsSeverityData>,
}

/// Links attached to a GDACS alert.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GdacsLinks {
    /// Public report page.
    #[serde(default)]
    pub report: Option<String>,

    /// API details endpoint.
    #[serde(default)]
    pub details: Option<String>,
}

/// Hazard magnitude as reported by GDACS.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GdacsSeverityData {
    /// Numeric magnitude (Richter, wind speed, ...).
    #[serde(default)]
    pub severity: Option<f64>,

    /// Magnitude as display text.
    #[serde(default)]
    pub severitytext: Option<String>,
}

impl GdacsProperties {
    /// Normalize this alert into a [`DisasterEvent`].
    pub fn to_event(&self, country: &str) -> DisasterEvent {
        let disaster_type = gdacs_type_label(&self.eventtype);
        let title = first_non_blank([self.name.as_deref()])
            .map(str::to_string)
            .unwrap_or_else(|| format!("{} alert", disaster_type));
        let description = first_non_blank([
            self.description.as_deref(),
            self.htmldescription.as_deref(),
            self.severitydata
                .as_ref()
                .and_then(|s| s.severitytext.as_deref()),
        ])
        .map(str::to_string)
        .unwrap_or_else(|| format!("{} alert issued by GDACS.", disaster_type));
        let links = self.url.as_ref();

        DisasterEvent {
            id: format!("{}-{}", self.eventtype, self.eventid),
            title,
            description,
            date: resolve_date([self.fromdate.as_deref(), self.todate.as_deref()]),
            location: first_non_blank([self.country.as_deref()])
                .unwrap_or(country)
                .to_string(),
            disaster_type: disaster_type.to_string(),
            severity: gdacs_severity(&self.alertlevel),
            source: GDACS_SOURCE.to_string(),
            url: first_non_blank([
                links.and_then(|l| l.report.as_deref()),
                links.and_then(|l| l.details.as_deref()),
            ])
            .unwrap_or("#")
            .to_string(),
            country: country.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn properties(value: serde_json::Value) -> GdacsProperties {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_earthquake_mapping() {
        let props = properties(json!({
            "eventtype": "EQ",
            "eventid": 1400123,
            "name": "Earthquake in Gujarat",
            "description": "Magnitude 5.9M, Depth:10km",
            "alertlevel": "Orange",
            "country": "India",
            "fromdate": "2024-07-01T06:30:00",
            "url": { "report": "https://www.gdacs.org/report.aspx?eventid=1400123" }
        }));

        let event = props.to_event("India");

        assert_eq!(event.id, "EQ-1400123");
        assert_eq!(event.title, "Earthquake in Gujarat");
        assert_eq!(event.disaster_type, "Earthquake");
        assert_eq!(event.severity, Severity::Medium);
        assert_eq!(event.source, "GDACS");
        assert_eq!(
            event.date,
            Utc.with_ymd_and_hms(2024, 7, 1, 6, 30, 0).unwrap()
        );
        assert_eq!(
            event.url,
            "https://www.gdacs.org/report.aspx?eventid=1400123"
        );
    }

    #[test]
    fn test_unknown_codes() {
        let props = properties(json!({
            "eventtype": "XX",
            "eventid": "9",
            "alertlevel": "Blue"
        }));

        let event = props.to_event("India");

        assert_eq!(event.disaster_type, "XX");
        assert_eq!(event.severity, Severity::Low);
        assert_eq!(event.title, "XX alert");
        assert_eq!(event.location, "India");
        assert_eq!(event.url, "#");
    }

    #[test]
    fn test_red_alert_is_high() {
        let props = properties(json!({ "eventtype": "TC", "eventid": 1, "alertlevel": "Red" }));

        let event = props.to_event("India");

        assert_eq!(event.severity, Severity::High);
        assert_eq!(event.disaster_type, "Tropical Cyclone");
    }

    #[test]
    fn test_events_url_embeds_filters() {
        let config = FeedConfig::default();
        let client =
            GdacsClient::new(reqwest::Client::new(), &config).with_base_url("http://localhost:1");

        let url = client.events_url();

        assert!(url.starts_with("http://localhost:1/events/geteventlist/SEARCH?"));
        assert!(url.contains("alertlevel=Green;Orange;Red"));
        assert!(url.contains("country=India"));
        assert!(url.contains("pagesize=20"));
    }
}
