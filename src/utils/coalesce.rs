//! Coalesce-with-default helpers
//!
//! Clinical source tables are full of NULLs. Every component of the crate
//! replaces them with the same small set of documented defaults, so the
//! fallback literals live here rather than at each call site.

use serde::{Deserialize, Deserializer};

/// Default label for an absent categorical value
pub const UNKNOWN: &str = "Unknown";

/// Default label for an absent free-text clinical value (strength, frequency)
pub const NOT_AVAILABLE: &str = "N/A";

/// Text-specific coalescing for borrowed optional strings
pub trait CoalesceText {
    /// The value, or `"Unknown"` when absent
    fn or_unknown(self) -> String;
    /// The value, or `"N/A"` when absent
    fn or_not_available(self) -> String;
}

impl CoalesceText for Option<&str> {
    fn or_unknown(self) -> String {
        self.unwrap_or(UNKNOWN).to_string()
    }

    fn or_not_available(self) -> String {
        self.unwrap_or(NOT_AVAILABLE).to_string()
    }
}

impl CoalesceText for &Option<String> {
    fn or_unknown(self) -> String {
        self.as_deref().or_unknown()
    }

    fn or_not_available(self) -> String {
        self.as_deref().or_not_available()
    }
}

/// Deserialize a value that may arrive as `null`, substituting its default
///
/// Use with `#[serde(default, deserialize_with = "...")]` so a missing key and
/// an explicit `null` behave the same way.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A count that treats an absent value as zero
#[inline]
#[must_use]
pub fn count_or_zero<T: Default>(value: Option<T>) -> T {
    value.unwrap_or_default()
}
