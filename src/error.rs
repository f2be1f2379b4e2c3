//! Errors raised by source adapters.
//!
//! These never reach callers of [`crate::feed::DisasterFeed`]: the orchestrator
//! logs them and moves on to the next source.

use thiserror::Error;

/// Why an adapter could not produce events.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The request did not complete (connect failure, timeout, body read).
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// The provider answered with a non-success HTTP status.
    #[error("unexpected HTTP status {0}")]
    Status(u16),

    /// The body was not the shape the provider is expected to return.
    #[error("could not parse response: {0}")]
    Parse(#[from] serde_json::Error),
}

impl FetchError {
    /// True for transport failures and non-success statuses.
    pub fn is_network(&self) -> bool {
        matches!(self, FetchError::Network(_) | FetchError::Status(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_is_network_class() {
        assert!(FetchError::Status(503).is_network());
        assert_eq!(
            FetchError::Status(503).to_string(),
            "unexpected HTTP status 503"
        );
    }

    #[test]
    fn test_parse_is_not_network_class() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert!(!FetchError::from(err).is_network());
    }
}
