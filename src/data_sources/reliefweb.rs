//! ReliefWeb API client.
//!
//! ReliefWeb is OCHA's humanitarian information service. The feed reads the
//! most recent reports tagged with one country.
//!
//! # API Reference
//!
//! See: <https://apidoc.reliefweb.int/>
//!
//! # Rate Limits
//!
//! - Maximum 1,000 calls per day
//! - Maximum 1,000 entries per response

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::FeedConfig;
use crate::data_sources::{SourceAdapter, get_body, string_or_number};
use crate::error::FetchError;
use crate::model::DisasterEvent;
use crate::normalize::{first_non_blank, reliefweb_severity, resolve_date};

/// Base URL for the ReliefWeb API.
const RELIEFWEB_API_BASE: &str = "https://api.reliefweb.int/v1";

/// Provider name stamped on every event.
pub const RELIEFWEB_SOURCE: &str = "ReliefWeb";

/// Used when a report has neither body text nor a summary.
const NO_DESCRIPTION: &str = "No description available.";

/// Used when a report names no disaster type or theme.
const DEFAULT_DISASTER_TYPE: &str = "General Alert";

/// Client for the ReliefWeb reports endpoint.
#[derive(Clone)]
pub struct ReliefWebClient {
    client: reqwest::Client,
    base_url: String,
    app_name: String,
    country_id: u32,
    country_name: String,
    limit: u32,
}

impl ReliefWebClient {
    /// Create a client for the country in `config`.
    pub fn new(client: reqwest::Client, config: &FeedConfig) -> Self {
        Self {
            client,
            base_url: RELIEFWEB_API_BASE.to_string(),
            app_name: config.app_name.clone(),
            country_id: config.reliefweb_country_id,
            country_name: config.country_name.clone(),
            limit: config.reliefweb_limit.min(1000),
        }
    }

    /// Point the client at a different base URL (for testing).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// URL for the latest reports about the configured country.
    pub fn reports_url(&self) -> String {
        format!(
            "{}/reports?appname={}&profile=full&limit={}&sort[]=date:desc&filter[field]=country.id&filter[value]={}",
            self.base_url,
            urlencoding::encode(&self.app_name),
            self.limit,
            self.country_id
        )
    }

    /// Get the latest reports for the configured country.
    pub async fn get_reports(&self) -> Result<ReliefWebReportsResponse, FetchError> {
        let body = get_body(&self.client, &self.reports_url()).await?;
        let data = serde_json::from_str::<ReliefWebReportsResponse>(&body)?;
        Ok(data)
    }
}

#[async_trait]
impl SourceAdapter for ReliefWebClient {
    fn name(&self) -> &'static str {
        RELIEFWEB_SOURCE
    }

    async fn fetch(&self) -> Result<Vec<DisasterEvent>, FetchError> {
        let reports = self.get_reports().await?;
        Ok(reports
            .data
            .iter()
            .map(|item| item.to_event(&self.country_name))
            .collect())
    }
}

// ============================================================================
// Response types
// ============================================================================

/// Generic ReliefWeb list response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct ReliefWebListResponse<T> {
    /// Total number of matching items.
    #[serde(default, rename = "totalCount")]
    pub total_count: i64,

    /// Number of items returned.
    #[serde(default)]
    pub count: i64,

    /// List of data items.
    pub data: Vec<ReliefWebItem<T>>,
}

/// A single item wrapper in ReliefWeb responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct ReliefWebItem<T> {
    /// Item ID. ReliefWeb sends a string, older payloads a number.
    #[serde(default, deserialize_with = "string_or_number")]
    pub id: String,

    /// Item fields.
    #[serde(default)]
    pub fields: T,

    /// API URL of the item.
    #[serde(default)]
    pub href: String,
}

/// Reports list response.
pub type ReliefWebReportsResponse = ReliefWebListResponse<ReliefWebReportFields>;

/// Report record fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReliefWebReportFields {
    /// Report title.
    #[serde(default)]
    pub title: String,

    /// Report body text.
    #[serde(default)]
    pub body: Option<String>,

    /// Headline block, carrying a short summary.
    #[serde(default)]
    pub headline: Option<ReliefWebHeadline>,

    /// Primary affected country.
    #[serde(default)]
    pub primary_country: Option<ReliefWebCountryRef>,

    /// All mentioned countries.
    #[serde(default)]
    pub country: Vec<ReliefWebCountryRef>,

    /// Sub-national locations.
    #[serde(default)]
    pub location: Vec<ReliefWebTerm>,

    /// Disaster types the report covers.
    #[serde(default)]
    pub disaster_type: Vec<ReliefWebTerm>,

    /// Report themes.
    #[serde(default)]
    pub theme: Vec<ReliefWebTerm>,

    /// Publication dates.
    #[serde(default)]
    pub date: Option<ReliefWebDate>,

    /// URL to the report.
    #[serde(default)]
    pub url: Option<String>,
}

impl ReliefWebReportFields {
    /// Place name: primary country, then first country, then first location.
    pub fn location_name(&self) -> Option<&str> {
        first_non_blank([
            self.primary_country.as_ref().map(|c| c.name.as_str()),
            self.country.first().map(|c| c.name.as_str()),
            self.location.first().map(|l| l.name.as_str()),
        ])
    }

    /// Category: first disaster type, then first theme.
    pub fn type_name(&self) -> Option<&str> {
        first_non_blank([
            self.disaster_type.first().map(|t| t.name.as_str()),
            self.theme.first().map(|t| t.name.as_str()),
        ])
    }

    /// Body text, then headline summary.
    pub fn description(&self) -> Option<&str> {
        first_non_blank([
            self.body.as_deref(),
            self.headline.as_ref().and_then(|h| h.summary.as_deref()),
        ])
    }
}

impl ReliefWebItem<ReliefWebReportFields> {
    /// Normalize this report into a [`DisasterEvent`].
    pub fn to_event(&self, country: &str) -> DisasterEvent {
        let fields = &self.fields;
        let disaster_type = fields.type_name().unwrap_or(DEFAULT_DISASTER_TYPE);
        let body = fields.body.as_deref().unwrap_or_default();
        let date = fields.date.as_ref();

        DisasterEvent {
            id: self.id.clone(),
            title: fields.title.trim().to_string(),
            description: fields.description().unwrap_or(NO_DESCRIPTION).to_string(),
            date: resolve_date([
                date.and_then(|d| d.created.as_deref()),
                date.and_then(|d| d.original.as_deref()),
                date.and_then(|d| d.changed.as_deref()),
            ]),
            location: fields.location_name().unwrap_or(country).to_string(),
            disaster_type: disaster_type.to_string(),
            severity: reliefweb_severity(&fields.title, body, disaster_type),
            source: RELIEFWEB_SOURCE.to_string(),
            url: first_non_blank([fields.url.as_deref()])
                .unwrap_or("#")
                .to_string(),
            country: country.to_string(),
        }
    }
}

// Common reference types

/// A term/taxonomy reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReliefWebTerm {
    /// Term ID.
    #[serde(default)]
    pub id: i64,

    /// Term name.
    #[serde(default)]
    pub name: String,
}

/// A country reference.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReliefWebCountryRef {
    /// Country ID.
    #[serde(default)]
    pub id: i64,

    /// Country name.
    #[serde(default)]
    pub name: String,

    /// ISO 3166-1 alpha-3 code.
    #[serde(default)]
    pub iso3: String,
}

/// Report headline block.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReliefWebHeadline {
    /// Headline title.
    #[serde(default)]
    pub title: Option<String>,

    /// Short summary, used when the report has no body.
    #[serde(default)]
    pub summary: Option<String>,
}

/// A date object in ReliefWeb responses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReliefWebDate {
    /// Original publication date.
    #[serde(default)]
    pub original: Option<String>,

    /// Date the report was posted to ReliefWeb.
    #[serde(default)]
    pub created: Option<String>,

    /// Last change.
    #[serde(default)]
    pub changed: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Severity;
    use chrono::{DateTime, TimeZone, Utc};
    use serde_json::json;

    fn report(fields: serde_json::Value) -> ReliefWebItem<ReliefWebReportFields> {
        serde_json::from_value(json!({ "id": "4071234", "fields": fields })).unwrap()
    }

    #[test]
    fn test_full_report_mapping() {
        let item = report(json!({
            "title": "Assam floods situation report",
            "body": "Water levels continue to rise.",
            "primary_country": { "id": 119, "name": "India", "iso3": "ind" },
            "disaster_type": [{ "id": 4611, "name": "Flood" }],
            "date": { "created": "2024-07-01T06:30:00+00:00" },
            "url": "https://reliefweb.int/report/india/assam-floods"
        }));

        let event = item.to_event("India");

        assert_eq!(event.id, "4071234");
        assert_eq!(event.description, "Water levels continue to rise.");
        assert_eq!(event.location, "India");
        assert_eq!(event.disaster_type, "Flood");
        assert_eq!(event.severity, Severity::High);
        assert_eq!(event.source, "ReliefWeb");
        assert_eq!(event.url, "https://reliefweb.int/report/india/assam-floods");
        assert_eq!(
            event.date,
            Utc.with_ymd_and_hms(2024, 7, 1, 6, 30, 0).unwrap()
        );
    }

    #[test]
    fn test_fallback_chains() {
        let item = report(json!({
            "title": "Monthly bulletin",
            "headline": { "summary": "Short summary." },
            "country": [{ "id": 1, "name": "" }],
            "location": [{ "id": 2, "name": "Odisha" }],
            "theme": [{ "id": 3, "name": "Health" }]
        }));

        let event = item.to_event("India");

        assert_eq!(event.description, "Short summary.");
        assert_eq!(event.location, "Odisha");
        assert_eq!(event.disaster_type, "Health");
        assert_eq!(event.severity, Severity::Low);
        assert_eq!(event.url, "#");
    }

    #[test]
    fn test_defaults_when_fields_missing() {
        let item = report(json!({ "title": "Bare report" }));

        let event = item.to_event("India");

        assert_eq!(event.description, NO_DESCRIPTION);
        assert_eq!(event.location, "India");
        assert_eq!(event.disaster_type, DEFAULT_DISASTER_TYPE);
        assert_eq!(event.date, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn test_urgent_title_beats_low_type() {
        let item = report(json!({
            "title": "urgent appeal",
            "disaster_type": [{ "id": 1, "name": "Epidemic" }]
        }));

        assert_eq!(item.to_event("India").severity, Severity::High);
    }

    #[test]
    fn test_numeric_id_accepted() {
        let item: ReliefWebItem<ReliefWebReportFields> =
            serde_json::from_value(json!({ "id": 42, "fields": { "title": "x" } })).unwrap();
        assert_eq!(item.id, "42");
    }

    #[test]
    fn test_list_response_items_without_fields() {
        let response: ReliefWebReportsResponse = serde_json::from_value(json!({
            "totalCount": 2,
            "count": 2,
            "data": [
                { "id": 7 },
                { "id": "8", "fields": { "title": "Second" } }
            ]
        }))
        .unwrap();

        assert_eq!(response.data.len(), 2);
        assert_eq!(response.data[0].id, "7");
        assert!(response.data[0].fields.title.is_empty());
        assert_eq!(response.data[1].fields.title, "Second");
    }

    #[test]
    fn test_reports_url_filters_country() {
        let config = FeedConfig::default();
        let client = ReliefWebClient::new(reqwest::Client::new(), &config)
            .with_base_url("http://localhost:9999/v1/");

        let url = client.reports_url();

        assert!(url.starts_with("http://localhost:9999/v1/reports?"));
        assert!(url.contains("filter[field]=country.id&filter[value]=119"));
        assert!(url.contains("limit=20"));
        assert!(url.contains("sort[]=date:desc"));
    }
}
