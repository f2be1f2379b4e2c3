//! HTML rendering of a feed snapshot.
//!
//! Output is a self-contained fragment: a summary line followed by one list
//! item per event, ranked high severity first and newest first within a tier.

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::feed::FeedSnapshot;
use crate::model::{DisasterEvent, FeedSummary, rank_events};
use crate::normalize::{strip_markup, truncate_chars};

/// Longest description shown per event, in characters.
const MAX_DESCRIPTION_CHARS: usize = 280;

/// Render `snapshot` as an HTML fragment.
pub fn render_html(snapshot: &FeedSnapshot) -> String {
    let mut events = snapshot.events.clone();
    rank_events(&mut events);
    let summary = FeedSummary::from_events(&events);

    let mut html = String::new();
    html.push_str("<section class=\"disaster-feed\">\n");

    if snapshot.origin.is_sample() {
        html.push_str(
            "  <p class=\"feed-notice\">Live sources are unavailable. Showing sample data.</p>\n",
        );
    }

    html.push_str(&format!(
        "  <p class=\"feed-summary\">{} alerts: {} high, {} medium, {} low. Updated {}.</p>\n",
        summary.total_events,
        summary.high_count,
        summary.medium_count,
        summary.low_count,
        snapshot.generated_at.format("%d %b %Y %H:%M UTC")
    ));
    if !summary.by_source.is_empty() {
        html.push_str(&format!(
            "  <p class=\"feed-sources\">Sources: {}</p>\n",
            source_counts(&summary)
        ));
    }

    if events.is_empty() {
        html.push_str("  <p class=\"feed-empty\">No alerts at this time.</p>\n");
    } else {
        html.push_str("  <ul class=\"disaster-list\">\n");
        for event in &events {
            render_item(&mut html, event);
        }
        html.push_str("  </ul>\n");
    }

    html.push_str("</section>\n");
    html
}

/// "GDACS (2), ReliefWeb (5)", sorted by source name.
fn source_counts(summary: &FeedSummary) -> String {
    let mut sources: Vec<(&String, &usize)> = summary.by_source.iter().collect();
    sources.sort_by(|a, b| a.0.cmp(b.0));
    sources
        .iter()
        .map(|(name, count)| format!("{} ({})", encode_text(name), count))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_item(html: &mut String, event: &DisasterEvent) {
    let description = truncate_chars(&strip_markup(&event.description), MAX_DESCRIPTION_CHARS);

    html.push_str(&format!(
        "    <li class=\"disaster-item severity-{}\">\n",
        event.severity.as_str()
    ));
    html.push_str(&format!(
        "      <h3><a href=\"{}\">{}</a></h3>\n",
        encode_double_quoted_attribute(&event.url),
        encode_text(&event.title)
    ));
    html.push_str(&format!(
        "      <p class=\"meta\"><span class=\"severity\">{}</span> {} &middot; {} &middot; {} &middot; {}</p>\n",
        event.severity.label(),
        encode_text(&event.disaster_type),
        encode_text(&event.location),
        event.date.format("%d %b %Y"),
        encode_text(&event.source)
    ));
    html.push_str(&format!("      <p>{}</p>\n", encode_text(&description)));
    html.push_str("    </li>\n");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::FeedOrigin;
    use crate::model::Severity;
    use chrono::{Duration, TimeZone, Utc};

    fn event(id: &str, title: &str, severity: Severity, hours_ago: i64) -> DisasterEvent {
        let now = Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
        DisasterEvent {
            id: id.to_string(),
            title: title.to_string(),
            description: "<p>Rivers &amp; streams rising</p>".to_string(),
            date: now - Duration::hours(hours_ago),
            location: "Assam".to_string(),
            disaster_type: "Flood".to_string(),
            severity,
            source: "ReliefWeb".to_string(),
            url: "https://example.org/a?b=1&c=\"2\"".to_string(),
            country: "India".to_string(),
        }
    }

    fn snapshot(events: Vec<DisasterEvent>, origin: FeedOrigin) -> FeedSnapshot {
        FeedSnapshot {
            events,
            origin,
            generated_at: Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_items_are_ranked() {
        let html = render_html(&snapshot(
            vec![
                event("1", "Low alert", Severity::Low, 1),
                event("2", "Older high alert", Severity::High, 10),
                event("3", "Newer high alert", Severity::High, 2),
            ],
            FeedOrigin::Source("ReliefWeb"),
        ));

        let newer = html.find("Newer high alert").unwrap();
        let older = html.find("Older high alert").unwrap();
        let low = html.find("Low alert").unwrap();
        assert!(newer < older && older < low);
        assert!(html.contains("3 alerts: 2 high, 0 medium, 1 low."));
    }

    #[test]
    fn test_text_is_escaped_and_markup_stripped() {
        let html = render_html(&snapshot(
            vec![event("1", "<script>alert(1)</script>", Severity::High, 1)],
            FeedOrigin::Source("ReliefWeb"),
        ));

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(html.contains("<p>Rivers &amp; streams rising</p>"));
        assert!(html.contains("href=\"https://example.org/a?b=1&amp;c=&quot;2&quot;\""));
        assert!(html.contains("severity-high"));
    }

    #[test]
    fn test_sample_notice() {
        let html = render_html(&snapshot(
            vec![event("1", "Sample", Severity::Low, 1)],
            FeedOrigin::Sample,
        ));
        assert!(html.contains("Showing sample data"));
    }

    #[test]
    fn test_empty_list() {
        let html = render_html(&snapshot(vec![], FeedOrigin::Cache));
        assert!(html.contains("No alerts at this time."));
        assert!(!html.contains("<ul"));
        assert!(!html.contains("feed-sources"));
    }

    #[test]
    fn test_summary_counts_per_source() {
        let mut gdacs = event("2", "GDACS alert", Severity::Medium, 3);
        gdacs.source = "GDACS".to_string();
        let html = render_html(&snapshot(
            vec![
                event("1", "First", Severity::High, 1),
                gdacs,
                event("3", "Second", Severity::Low, 5),
            ],
            FeedOrigin::Source("ReliefWeb"),
        ));

        assert!(html.contains("<p class=\"feed-sources\">Sources: GDACS (1), ReliefWeb (2)</p>"));
    }
}
