//! Serde adapter for note timestamps.
//!
//! Timestamps are written as ISO-8601 UTC with millisecond precision and a
//! trailing `Z` (`2024-01-05T10:15:30.123Z`). Reading accepts any RFC 3339
//! string so collections written with other offsets still load.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::Error;
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(value))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| D::Error::custom(format!("invalid timestamp '{raw}': {e}")))
}

/// Renders a timestamp the way it is persisted.
pub fn format(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}
