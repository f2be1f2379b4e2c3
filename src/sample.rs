//! Static fallback events, shown when no source produced data.

use chrono::{DateTime, Duration, Utc};

use crate::model::{DisasterEvent, Severity};

/// Source name stamped on sample events.
pub const SAMPLE_SOURCE: &str = "Sample Data";

struct SampleEntry {
    title: &'static str,
    description: &'static str,
    hours_ago: i64,
    location: &'static str,
    disaster_type: &'static str,
    severity: Severity,
}

const SAMPLES: [SampleEntry; 4] = [
    SampleEntry {
        title: "Flood warning issued for low-lying districts",
        description: "Heavy monsoon rainfall has raised river levels. Residents near riverbanks are advised to move to higher ground.",
        hours_ago: 2,
        location: "Assam",
        disaster_type: "Flood",
        severity: Severity::High,
    },
    SampleEntry {
        title: "Moderate earthquake felt across the region",
        description: "A magnitude 5.2 earthquake was recorded. No major damage has been reported so far.",
        hours_ago: 6,
        location: "Uttarakhand",
        disaster_type: "Earthquake",
        severity: Severity::Medium,
    },
    SampleEntry {
        title: "Heatwave advisory for northern plains",
        description: "Daytime temperatures are expected to exceed 45\u{b0}C. Avoid outdoor activity during peak hours.",
        hours_ago: 24,
        location: "Rajasthan",
        disaster_type: "Heatwave",
        severity: Severity::Medium,
    },
    SampleEntry {
        title: "Cyclone watch along the eastern coast",
        description: "A deep depression over the Bay of Bengal may intensify into a cyclonic storm within 48 hours.",
        hours_ago: 48,
        location: "Odisha",
        disaster_type: "Cyclone",
        severity: Severity::High,
    },
];

/// The four fallback events, dated relative to `now`.
pub fn sample_events(now: DateTime<Utc>, country: &str) -> Vec<DisasterEvent> {
    SAMPLES
        .iter()
        .enumerate()
        .map(|(i, entry)| DisasterEvent {
            id: format!("sample-{}", i + 1),
            title: entry.title.to_string(),
            description: entry.description.to_string(),
            date: now - Duration::hours(entry.hours_ago),
            location: entry.location.to_string(),
            disaster_type: entry.disaster_type.to_string(),
            severity: entry.severity,
            source: SAMPLE_SOURCE.to_string(),
            url: "#".to_string(),
            country: country.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_four_events_relative_to_now() {
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();

        let events = sample_events(now, "India");

        assert_eq!(events.len(), 4);
        let types: Vec<&str> = events.iter().map(|e| e.disaster_type.as_str()).collect();
        assert_eq!(types, vec!["Flood", "Earthquake", "Heatwave", "Cyclone"]);
        assert!(events.iter().all(|e| e.date < now));
        assert!(events.iter().all(|e| e.country == "India"));
        assert_eq!(events[0].date, now - Duration::hours(2));
    }

    #[test]
    fn test_deterministic_for_same_now() {
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
        assert_eq!(sample_events(now, "India"), sample_events(now, "India"));
    }
}
