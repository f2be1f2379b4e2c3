//! Pure normalization rules shared by the source adapters.
//!
//! Nothing here performs I/O. Each adapter maps its raw record fields through
//! these helpers to build a [`crate::model::DisasterEvent`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::Severity;

/// Latitude range (inclusive) treated as "in region" for EONET events.
pub const REGION_LAT_RANGE: (f64, f64) = (8.0, 35.0);

/// Longitude range (inclusive) treated as "in region" for EONET events.
pub const REGION_LON_RANGE: (f64, f64) = (68.0, 97.0);

static URGENT_WORDS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)urgent|emergency|critical|severe|major|catastrophic|deadly")
        .expect("urgent-word pattern is valid")
});

static HIGH_IMPACT_TYPES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)earthquake|cyclone|flood|tsunami").expect("high-impact pattern is valid")
});

static MEDIUM_IMPACT_TYPES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)storm|landslide|wildfire").expect("medium-impact pattern is valid")
});

static TAGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)</?[^>]+>").expect("tag pattern is valid"));

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Severity of a ReliefWeb report.
///
/// Alarm words in the title or body win over everything else. Otherwise the
/// disaster type decides:
///
/// - earthquake, cyclone, flood, tsunami: `High`
/// - storm, landslide, wildfire: `Medium`
/// - anything else: `Low`
pub fn reliefweb_severity(title: &str, body: &str, disaster_type: &str) -> Severity {
    if URGENT_WORDS.is_match(title) || URGENT_WORDS.is_match(body) {
        Severity::High
    } else if HIGH_IMPACT_TYPES.is_match(disaster_type) {
        Severity::High
    } else if MEDIUM_IMPACT_TYPES.is_match(disaster_type) {
        Severity::Medium
    } else {
        Severity::Low
    }
}

/// Human label for a GDACS event-type code. Unknown codes pass through.
pub fn gdacs_type_label(code: &str) -> &str {
    match code {
        "EQ" => "Earthquake",
        "TC" => "Tropical Cyclone",
        "FL" => "Flood",
        "DR" => "Drought",
        "VO" => "Volcano",
        "WF" => "Wildfire",
        other => other,
    }
}

/// Severity for a GDACS alert level. Unknown levels are `Low`.
pub fn gdacs_severity(alert_level: &str) -> Severity {
    match alert_level {
        "Red" => Severity::High,
        "Orange" => Severity::Medium,
        _ => Severity::Low,
    }
}

/// Whether a point lies inside the fixed regional bounding box.
pub fn in_region(lon: f64, lat: f64) -> bool {
    (REGION_LAT_RANGE.0..=REGION_LAT_RANGE.1).contains(&lat)
        && (REGION_LON_RANGE.0..=REGION_LON_RANGE.1).contains(&lon)
}

/// Parse a provider timestamp.
///
/// Accepts RFC 3339, a bare `YYYY-MM-DDTHH:MM:SS` (read as UTC) and a bare
/// `YYYY-MM-DD`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// First candidate that parses as a timestamp, or the Unix epoch.
pub fn resolve_date<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> DateTime<Utc> {
    candidates
        .into_iter()
        .flatten()
        .find_map(parse_timestamp)
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// First candidate that is present and not blank.
pub fn first_non_blank<'a>(candidates: impl IntoIterator<Item = Option<&'a str>>) -> Option<&'a str> {
    candidates
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
}

/// Reduce a markup fragment to plain text.
pub fn strip_markup(raw: &str) -> String {
    let without_tags = TAGS.replace_all(raw, " ");
    let decoded = html_escape::decode_html_entities(&without_tags);
    WHITESPACE.replace_all(&decoded, " ").trim().to_string()
}

/// Cut `text` to at most `max_chars` characters, ending with "..." when cut.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let kept: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    format!("{}...", kept.trim_end())
}
