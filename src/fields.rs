//! Pure field-derivation helpers.
//!
//! Everything here is side-effect free. Malformed or missing inputs degrade to
//! an empty string (or `false` for the overnight flag) rather than erroring.

use chrono::NaiveTime;

/// Combines a coordinate pair into a `"lat,lng"` display string; empty when
/// either side is unknown.
pub fn combine_latlng(lat: Option<f64>, lng: Option<f64>) -> String {
    match (lat, lng) {
        (Some(lat), Some(lng)) => format!("{lat},{lng}"),
        _ => String::new(),
    }
}

/// Builds a Google Maps link for a coordinate pair; empty when either side is
/// unknown.
pub fn google_maps_link(lat: Option<f64>, lng: Option<f64>) -> String {
    match (lat, lng) {
        (Some(lat), Some(lng)) => format!("https://www.google.com/maps?q={lat},{lng}"),
        _ => String::new(),
    }
}

/// Formats a fractional minute count as `H:MM` (125 -> `2:05`).
///
/// An already-formatted `H:MM` string passes through unchanged, so the
/// function is idempotent on its own output and re-runs over enriched files
/// are harmless. Empty, malformed, or negative inputs yield an empty string.
pub fn format_duration(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if is_formatted_duration(trimmed) {
        return trimmed.to_string();
    }
    match trimmed.parse::<f64>() {
        Ok(minutes) if minutes.is_finite() && minutes >= 0.0 => {
            let total = minutes.round() as i64;
            format!("{}:{:02}", total / 60, total % 60)
        }
        _ => String::new(),
    }
}

fn is_formatted_duration(value: &str) -> bool {
    match value.split_once(':') {
        Some((hours, minutes)) => {
            !hours.is_empty()
                && hours.chars().all(|c| c.is_ascii_digit())
                && minutes.len() == 2
                && minutes.chars().all(|c| c.is_ascii_digit())
                && minutes.parse::<u32>().is_ok_and(|m| m < 60)
        }
        None => false,
    }
}

/// Formats a fractional confidence as a rounded percentage (0.873 -> `87%`).
///
/// An already-formatted percent string passes through unchanged; empty or
/// malformed inputs yield an empty string.
pub fn format_confidence(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if let Some(percent) = trimmed.strip_suffix('%') {
        if !percent.is_empty() && percent.chars().all(|c| c.is_ascii_digit()) {
            return trimmed.to_string();
        }
    }
    match trimmed.parse::<f64>() {
        Ok(confidence) if confidence.is_finite() => {
            format!("{}%", (confidence * 100.0).round() as i64)
        }
        _ => String::new(),
    }
}

/// Determines whether a start/end clock-time pair falls in the overnight
/// window (around 23:00-07:00).
///
/// Inputs are 12-hour clock strings like `"11:30 PM"`. The edges are pinned
/// as: start at or after 23:00, start strictly before 07:00, end at or before
/// 07:00, or start later than end (midnight rollover). Malformed or missing
/// inputs are not overnight.
pub fn is_overnight(start: &str, end: &str) -> bool {
    let (st, et) = match (parse_clock(start), parse_clock(end)) {
        (Some(st), Some(et)) => (st, et),
        _ => return false,
    };
    // Both constants are valid clock times
    let overnight_start = NaiveTime::from_hms_opt(23, 0, 0).unwrap();
    let overnight_end = NaiveTime::from_hms_opt(7, 0, 0).unwrap();

    st >= overnight_start || st < overnight_end || et <= overnight_end || st > et
}

fn parse_clock(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), "%I:%M %p").ok()
}
