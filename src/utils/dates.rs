//! Date helpers shared by the analysis pipeline and the flattener

use chrono::NaiveDateTime;

/// ISO-8601 rendering used for every timestamp in flattened output
pub const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Render a timestamp as an ISO-8601 string
#[must_use]
pub fn to_iso(timestamp: &NaiveDateTime) -> String {
    timestamp.format(ISO_FORMAT).to_string()
}

/// Render an optional timestamp, keeping absence as `None`
#[must_use]
pub fn to_iso_opt(timestamp: Option<&NaiveDateTime>) -> Option<String> {
    timestamp.map(to_iso)
}

/// Whole calendar days from `from` to `to`, ignoring the time of day
///
/// Negative when `to` is before `from`.
#[must_use]
pub fn days_between(from: &NaiveDateTime, to: &NaiveDateTime) -> i64 {
    (to.date() - from.date()).num_days()
}

/// Whole calendar days from `from` to `to`, floored at zero
#[must_use]
pub fn days_elapsed(from: &NaiveDateTime, to: &NaiveDateTime) -> u32 {
    u32::try_from(days_between(from, to).max(0)).unwrap_or(u32::MAX)
}
