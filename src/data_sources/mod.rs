//! External disaster-alert sources.
//!
//! Each client performs a single GET against a fixed endpoint and maps the
//! provider's records into [`DisasterEvent`]s.
//!
//! # Data Sources
//!
//! - [`reliefweb`]: ReliefWeb humanitarian reports, filtered to one country
//! - [`gdacs`]: GDACS alerts (earthquakes, cyclones, floods, ...)
//! - [`eonet`]: NASA EONET open natural events, filtered by bounding box

pub mod eonet;
pub mod gdacs;
pub mod reliefweb;

pub use eonet::EonetClient;
pub use gdacs::GdacsClient;
pub use reliefweb::ReliefWebClient;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::error::FetchError;
use crate::model::DisasterEvent;

/// A provider that can be asked for its current events.
///
/// An empty `Ok` means "reachable, nothing to report" and is not an error.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Provider name, used as `DisasterEvent::source` and in logs.
    fn name(&self) -> &'static str;

    /// Fetch and normalize the provider's current events.
    async fn fetch(&self) -> Result<Vec<DisasterEvent>, FetchError>;
}

/// GET `url` and return the body, failing on non-success statuses.
pub(crate) async fn get_body(client: &reqwest::Client, url: &str) -> Result<String, FetchError> {
    debug!(url = %url, "Requesting source");

    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status(status.as_u16()));
    }

    Ok(response.text().await?)
}

/// Accept an identifier sent either as a JSON string or a number.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}
