//! Shared types for the review service

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Canonical textual form of review timestamps (second precision)
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Bare calendar date accepted in date-range queries
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Newtype wrapper for review IDs to provide type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewId(pub String);

impl ReviewId {
    /// Generate a fresh UUIDv7 (time-sortable) identifier
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ReviewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ReviewId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Format a timestamp in the canonical `YYYY-MM-DD HH:MM:SS` form
#[inline]
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Serde adapter for `NaiveDateTime` in the canonical timestamp form
pub mod timestamp_format {
    use super::TIMESTAMP_FORMAT;
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(ts: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&ts.format(TIMESTAMP_FORMAT))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).map_err(|e| {
            de::Error::custom(format!("invalid timestamp '{raw}' (expected {TIMESTAMP_FORMAT}): {e}"))
        })
    }
}
