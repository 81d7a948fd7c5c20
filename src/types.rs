// =============================================================================
// Shared types used across the dashboard
// =============================================================================

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Candle width accepted by the OKX candles endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BarInterval {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1H")]
    OneHour,
    #[serde(rename = "4H")]
    FourHours,
    #[serde(rename = "1D")]
    OneDay,
}

impl BarInterval {
    /// Every interval, in the order the selector shows them.
    pub const ALL: [BarInterval; 7] = [
        Self::OneMinute,
        Self::FiveMinutes,
        Self::FifteenMinutes,
        Self::ThirtyMinutes,
        Self::OneHour,
        Self::FourHours,
        Self::OneDay,
    ];

    /// The `bar=` code OKX expects. Note the upper-case hour/day suffixes.
    pub fn code(self) -> &'static str {
        match self {
            Self::OneMinute => "1m",
            Self::FiveMinutes => "5m",
            Self::FifteenMinutes => "15m",
            Self::ThirtyMinutes => "30m",
            Self::OneHour => "1H",
            Self::FourHours => "4H",
            Self::OneDay => "1D",
        }
    }

    /// Human-readable label for the timeframe picker.
    pub fn label(self) -> &'static str {
        match self {
            Self::OneMinute => "1 minute",
            Self::FiveMinutes => "5 minutes",
            Self::FifteenMinutes => "15 minutes",
            Self::ThirtyMinutes => "30 minutes",
            Self::OneHour => "1 hour",
            Self::FourHours => "4 hours",
            Self::OneDay => "1 day",
        }
    }
}

impl Default for BarInterval {
    fn default() -> Self {
        Self::OneHour
    }
}

impl std::fmt::Display for BarInterval {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// Returned when a string is not one of the supported interval codes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported bar interval '{0}' (expected one of 1m, 5m, 15m, 30m, 1H, 4H, 1D)")]
pub struct InvalidInterval(pub String);

impl FromStr for BarInterval {
    type Err = InvalidInterval;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|iv| iv.code() == s)
            .ok_or_else(|| InvalidInterval(s.to_string()))
    }
}

/// Coarse market direction derived from counting bullish vs bearish signals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trend {
    Up,
    Down,
    Accumulating,
}

impl Trend {
    /// Chart marker shown next to the label.
    pub fn marker(self) -> &'static str {
        match self {
            Self::Up => "📈",
            Self::Down => "📉",
            Self::Accumulating => "↔️",
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Up => write!(f, "UP"),
            Self::Down => write!(f, "DOWN"),
            Self::Accumulating => write!(f, "ACCUMULATING"),
        }
    }
}
