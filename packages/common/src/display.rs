//! Formatting shared by form previews and detail views.

use chrono::{DateTime, NaiveDateTime, Utc};

/// Format used by `datetime-local` inputs.
pub const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// `round(weight * 100)` followed by `%`.
pub fn weight_percent(weight: f64) -> String {
    if !weight.is_finite() {
        return "0%".into();
    }
    format!("{}%", (weight * 100.0).round() as i64)
}

/// Width of a progress bar, clamped to `0%..=100%`.
pub fn progress_width(percentage: f64) -> String {
    let clamped = if percentage.is_finite() {
        percentage.clamp(0.0, 100.0)
    } else {
        0.0
    };
    format!("{clamped}%")
}

pub fn active_badge(is_active: bool) -> &'static str {
    if is_active { "Active" } else { "Inactive" }
}

pub fn open_badge(is_open: bool) -> &'static str {
    if is_open { "Open" } else { "Closed" }
}

/// Human-readable timestamp, or `fallback` when absent.
pub fn format_date_or(date: Option<&DateTime<Utc>>, fallback: &str) -> String {
    match date {
        Some(d) => d.format("%b %-d, %Y %H:%M").to_string(),
        None => fallback.to_string(),
    }
}

pub fn format_date(date: Option<&DateTime<Utc>>) -> String {
    format_date_or(date, "N/A")
}

/// Render a timestamp as a `datetime-local` input value (UTC, minute precision).
pub fn to_datetime_local(date: &DateTime<Utc>) -> String {
    date.format(DATETIME_LOCAL_FORMAT).to_string()
}

/// Parse a `datetime-local` value (`YYYY-MM-DDTHH:MM`, optional seconds) or
/// an RFC 3339 timestamp. Values without an offset are taken as UTC.
pub fn parse_datetime_local(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(d) = DateTime::parse_from_rfc3339(value) {
        return Some(d.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S", DATETIME_LOCAL_FORMAT]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}
