//! Date parsing and date-range normalization for review queries
//!
//! Query bounds may be given either as `YYYY-MM-DD HH:MM:SS` or as a bare
//! `YYYY-MM-DD`. A bare date parses to midnight; `normalize_range` then widens
//! a midnight `end` bound to 23:59:59 so the whole day is included.

use crate::domain::{DATE_FORMAT, TIMESTAMP_FORMAT};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("date format for '{0}' is invalid")]
pub struct InvalidDateFormat(pub String);

/// What to do when a query supplies a malformed date bound
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvalidDatePolicy {
    /// Drop both bounds and serve the query without any date filter
    #[default]
    Ignore,
    /// Fail the request
    Reject,
}

impl InvalidDatePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvalidDatePolicy::Ignore => "ignore",
            InvalidDatePolicy::Reject => "reject",
        }
    }
}

/// Inclusive, optionally open-ended bounds over review timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DateRange {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        Self { start, end }
    }

    #[inline]
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    #[inline]
    pub fn contains(&self, ts: &NaiveDateTime) -> bool {
        self.start.is_none_or(|start| start <= *ts) && self.end.is_none_or(|end| *ts <= end)
    }
}

/// Parse a full timestamp, falling back to a bare date at 00:00:00
pub fn parse_date(text: &str) -> Result<NaiveDateTime, InvalidDateFormat> {
    NaiveDateTime::parse_from_str(text, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(text, DATE_FORMAT).map(|d| d.and_time(NaiveTime::MIN)))
        .map_err(|_| InvalidDateFormat(text.to_string()))
}

fn is_midnight(ts: &NaiveDateTime) -> bool {
    ts.hour() == 0 && ts.minute() == 0 && ts.second() == 0
}

/// Advance a midnight timestamp to 23:59:59 of the same day
fn end_of_day(midnight: NaiveDateTime) -> NaiveDateTime {
    midnight.checked_add_signed(Duration::seconds(86_399)).unwrap_or(midnight)
}

fn parse_bounds(
    start_text: Option<&str>,
    end_text: Option<&str>,
) -> Result<DateRange, InvalidDateFormat> {
    let start = start_text.map(parse_date).transpose()?;
    let end = end_text
        .map(parse_date)
        .transpose()?
        .map(|end| if is_midnight(&end) { end_of_day(end) } else { end });

    Ok(DateRange { start, end })
}

/// Turn optional query bound texts into a `DateRange`.
///
/// If either supplied bound is malformed, both bounds are discarded. Under
/// `InvalidDatePolicy::Ignore` that yields an unbounded range; under
/// `InvalidDatePolicy::Reject` the parse error is returned.
pub fn normalize_range(
    start_text: Option<&str>,
    end_text: Option<&str>,
    policy: InvalidDatePolicy,
) -> Result<DateRange, InvalidDateFormat> {
    match parse_bounds(start_text, end_text) {
        Ok(range) => Ok(range),
        Err(e) => match policy {
            InvalidDatePolicy::Ignore => {
                warn!(
                    start = ?start_text,
                    end = ?end_text,
                    error = %e,
                    "invalid_date_ignored"
                );
                Ok(DateRange::default())
            }
            InvalidDatePolicy::Reject => Err(e),
        },
    }
}
