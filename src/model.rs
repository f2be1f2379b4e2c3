//! Data models for the disaster feed.
//!
//! Every provider response is mapped into a single [`DisasterEvent`] shape so
//! the ranking and rendering code never needs to know where a record came from.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Derived severity of a disaster event.
///
/// Variants are declared from least to most severe, so the derived `Ord`
/// places `High` above `Medium` above `Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Routine or informational alert.
    Low,
    /// Developing situation worth watching.
    Medium,
    /// Serious event needing attention.
    High,
}

impl Severity {
    /// Lowercase name, as used in serialized output and CSS classes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }
}

/// A single normalized disaster alert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisasterEvent {
    /// Identifier, unique within its source only.
    pub id: String,

    /// Human-readable headline.
    pub title: String,

    /// Free text. May still contain markup; the presenter strips it.
    pub description: String,

    /// Event or report date (UTC).
    ///
    /// Unparsable provider dates are replaced with the Unix epoch.
    pub date: DateTime<Utc>,

    /// Best-effort place name. Defaults to the configured country.
    pub location: String,

    /// Free-form category such as "Flood" or "Earthquake".
    pub disaster_type: String,

    /// Derived severity.
    pub severity: Severity,

    /// Provider name.
    pub source: String,

    /// Link to the full report, `#` when the provider gave none.
    pub url: String,

    /// The configured country.
    pub country: String,
}

/// Order events for display: highest severity first, newest first within a tier.
///
/// Uses a stable sort, so events with equal severity and date keep their
/// relative order.
pub fn rank_events(events: &mut [DisasterEvent]) {
    events.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| b.date.cmp(&a.date))
    });
}

/// Counts shown above the rendered list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedSummary {
    /// Total number of events.
    pub total_events: usize,

    /// Number of high-severity events.
    pub high_count: usize,

    /// Number of medium-severity events.
    pub medium_count: usize,

    /// Number of low-severity events.
    pub low_count: usize,

    /// Events per source name.
    pub by_source: HashMap<String, usize>,
}

impl FeedSummary {
    /// Compute the summary for a list of events.
    pub fn from_events(events: &[DisasterEvent]) -> Self {
        let mut summary = Self {
            total_events: events.len(),
            ..Default::default()
        };

        for event in events {
            match event.severity {
                Severity::High => summary.high_count += 1,
                Severity::Medium => summary.medium_count += 1,
                Severity::Low => summary.low_count += 1,
            }
            *summary.by_source.entry(event.source.clone()).or_insert(0) += 1;
        }

        summary
    }
}
