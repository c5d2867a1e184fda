//! Time windows selectable for the trends view.

use std::fmt;
use std::str::FromStr;

/// Window of historical data to analyse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TimeRange {
    #[cfg_attr(feature = "serde", serde(rename = "1h"))]
    Hour,
    #[cfg_attr(feature = "serde", serde(rename = "6h"))]
    SixHours,
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "24h"))]
    Day,
    #[cfg_attr(feature = "serde", serde(rename = "7d"))]
    Week,
}

impl TimeRange {
    /// All ranges, shortest first.
    pub const ALL: [TimeRange; 4] = [
        TimeRange::Hour,
        TimeRange::SixHours,
        TimeRange::Day,
        TimeRange::Week,
    ];

    /// Query-string form (`1h`, `6h`, `24h`, `7d`).
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Hour => "1h",
            TimeRange::SixHours => "6h",
            TimeRange::Day => "24h",
            TimeRange::Week => "7d",
        }
    }

    /// Length of the window.
    pub fn duration(&self) -> chrono::Duration {
        match self {
            TimeRange::Hour => chrono::Duration::hours(1),
            TimeRange::SixHours => chrono::Duration::hours(6),
            TimeRange::Day => chrono::Duration::hours(24),
            TimeRange::Week => chrono::Duration::days(7),
        }
    }

    /// Cycle to the next longer range, wrapping around.
    pub fn next(self) -> Self {
        match self {
            TimeRange::Hour => TimeRange::SixHours,
            TimeRange::SixHours => TimeRange::Day,
            TimeRange::Day => TimeRange::Week,
            TimeRange::Week => TimeRange::Hour,
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown range string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseTimeRangeError(String);

impl fmt::Display for ParseTimeRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown time range '{}' (expected 1h, 6h, 24h or 7d)", self.0)
    }
}

impl std::error::Error for ParseTimeRangeError {}

impl FromStr for TimeRange {
    type Err = ParseTimeRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeRange::ALL
            .into_iter()
            .find(|r| r.as_str() == s.trim())
            .ok_or_else(|| ParseTimeRangeError(s.to_string()))
    }
}
