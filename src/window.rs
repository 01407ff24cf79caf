//! Time-window selection for dashboard queries.
//!
//! A window is either a named preset counted back from "now" or an explicit
//! pair of bounds typed into the dashboard's date inputs.

use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use serde::Serialize;

use crate::error::InputError;

// ---

/// Named look-back presets offered by the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RangePreset {
    #[default]
    Last24Hours,
    Last7Days,
    Last30Days,
}

/// Closed `[start, end]` interval of instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    // ---
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl RangePreset {
    /// Fixed look-back duration. No calendar handling.
    pub fn duration(self) -> Duration {
        // ---
        match self {
            RangePreset::Last24Hours => Duration::hours(24),
            RangePreset::Last7Days => Duration::days(7),
            RangePreset::Last30Days => Duration::days(30),
        }
    }

    /// Window ending at `now`.
    pub fn window(self, now: DateTime<Utc>) -> TimeWindow {
        TimeWindow {
            start: now - self.duration(),
            end: now,
        }
    }
}

impl FromStr for RangePreset {
    type Err = InputError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "24h" => Ok(RangePreset::Last24Hours),
            "7d" => Ok(RangePreset::Last7Days),
            "30d" => Ok(RangePreset::Last30Days),
            other => Err(InputError::UnknownPreset(other.to_string())),
        }
    }
}

impl TimeWindow {
    /// Build a window from two user-supplied timestamps.
    pub fn from_bounds(from: &str, to: &str) -> Result<Self, InputError> {
        // ---
        let start = parse_timestamp(from)?;
        let end = parse_timestamp(to)?;
        if start > end {
            return Err(InputError::InvertedRange {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(TimeWindow { start, end })
    }
}

/// Parse RFC 3339, or a naive `datetime-local` value taken as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, InputError> {
    // ---
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| InputError::InvalidTimestamp(raw.to_string()))
}
