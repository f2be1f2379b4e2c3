//! Feed configuration.
//!
//! Every setting has a default; `DISASTER_FEED_*` environment variables
//! override them. Values that fail to parse are ignored.

use std::env;
use std::time::Duration;

/// Default country name.
const DEFAULT_COUNTRY: &str = "India";

/// ReliefWeb's numeric id for India.
const DEFAULT_RELIEFWEB_COUNTRY_ID: u32 = 119;

/// Default application name sent to ReliefWeb.
const DEFAULT_APP_NAME: &str = "disaster-feed";

/// Default label for EONET events, which carry no place name.
const DEFAULT_REGION_LABEL: &str = "South Asia Region";

/// Default cache validity window.
const DEFAULT_CACHE_TTL_SECS: u64 = 300;

/// Longest accepted cache validity window (one week).
const MAX_CACHE_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Default per-request timeout.
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Settings for a [`crate::feed::DisasterFeed`] and its sources.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Country name used for filtering and as the default location.
    pub country_name: String,

    /// ReliefWeb numeric country id.
    pub reliefweb_country_id: u32,

    /// Application name ReliefWeb requires on every call.
    pub app_name: String,

    /// ReliefWeb page size.
    pub reliefweb_limit: u32,

    /// GDACS result limit.
    pub gdacs_limit: u32,

    /// EONET result limit (before the bounding-box filter).
    pub eonet_limit: u32,

    /// Location label given to every EONET event.
    pub region_label: String,

    /// How long a fetched result set stays valid.
    pub cache_ttl: Duration,

    /// Upper bound on any single provider request.
    pub request_timeout: Duration,

    /// Periodic refresh interval for the binary. `None` means fetch once.
    pub refresh_interval: Option<Duration>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            country_name: DEFAULT_COUNTRY.to_string(),
            reliefweb_country_id: DEFAULT_RELIEFWEB_COUNTRY_ID,
            app_name: DEFAULT_APP_NAME.to_string(),
            reliefweb_limit: 20,
            gdacs_limit: 20,
            eonet_limit: 50,
            region_label: DEFAULT_REGION_LABEL.to_string(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            refresh_interval: None,
        }
    }
}

impl FeedConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let text = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let number = |key: &str| text(key).and_then(|v| v.trim().parse::<u64>().ok());
        let limit = |key: &str| {
            text(key)
                .and_then(|v| v.trim().parse::<u32>().ok())
                .filter(|n| *n > 0)
        };

        Self {
            country_name: text("DISASTER_FEED_COUNTRY").unwrap_or(defaults.country_name),
            reliefweb_country_id: text("DISASTER_FEED_RELIEFWEB_COUNTRY_ID")
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(defaults.reliefweb_country_id),
            app_name: text("DISASTER_FEED_APP_NAME").unwrap_or(defaults.app_name),
            reliefweb_limit: limit("DISASTER_FEED_RELIEFWEB_LIMIT")
                .unwrap_or(defaults.reliefweb_limit),
            gdacs_limit: limit("DISASTER_FEED_GDACS_LIMIT").unwrap_or(defaults.gdacs_limit),
            eonet_limit: limit("DISASTER_FEED_EONET_LIMIT").unwrap_or(defaults.eonet_limit),
            region_label: text("DISASTER_FEED_REGION_LABEL").unwrap_or(defaults.region_label),
            cache_ttl: number("DISASTER_FEED_CACHE_TTL_SECS")
                .filter(|secs| *secs <= MAX_CACHE_TTL_SECS)
                .map(Duration::from_secs)
                .unwrap_or(defaults.cache_ttl),
            request_timeout: number("DISASTER_FEED_TIMEOUT_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
            refresh_interval: number("DISASTER_FEED_REFRESH_SECS")
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
        }
    }

    /// Build the HTTP client shared by all sources.
    pub fn http_client(&self) -> anyhow::Result<reqwest::Client> {
        let client = reqwest::Client::builder()
            .timeout(self.request_timeout)
            .user_agent(format!("{}/{}", self.app_name, env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(client)
    }
}
