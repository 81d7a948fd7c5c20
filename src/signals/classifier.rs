// =============================================================================
// Trend Classifier — threshold rules over the latest bar
// =============================================================================
//
// Four independent rules inspect the most recent indicator readings:
//   1. RSI above/below its bands               => overbought / oversold
//   2. Stochastic %K AND %D above/below bands  => overbought / oversold
//   3. MACD vs signal line                     => positive / negative
//   4. Close outside the Bollinger envelope    => overbought / oversold
//
// Oversold and positive readings count as bullish, overbought and negative as
// bearish. The majority decides the trend; a tie is ACCUMULATING.
//
// A rule whose inputs are missing is skipped. Rule 3 never abstains while
// both MACD values exist.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::types::Trend;

// =============================================================================
// Thresholds
// =============================================================================

fn default_rsi_overbought() -> f64 {
    70.0
}

fn default_rsi_oversold() -> f64 {
    30.0
}

fn default_stoch_overbought() -> f64 {
    80.0
}

fn default_stoch_oversold() -> f64 {
    20.0
}

/// Oscillator bands used by rules 1 and 2. All comparisons are strict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalThresholds {
    #[serde(default = "default_rsi_overbought")]
    pub rsi_overbought: f64,

    #[serde(default = "default_rsi_oversold")]
    pub rsi_oversold: f64,

    #[serde(default = "default_stoch_overbought")]
    pub stoch_overbought: f64,

    #[serde(default = "default_stoch_oversold")]
    pub stoch_oversold: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        Self {
            rsi_overbought: default_rsi_overbought(),
            rsi_oversold: default_rsi_oversold(),
            stoch_overbought: default_stoch_overbought(),
            stoch_oversold: default_stoch_oversold(),
        }
    }
}

// =============================================================================
// Signals
// =============================================================================

/// Indicator that produced a signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSource {
    Rsi,
    Stochastic,
    Macd,
    Bollinger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Overbought,
    Oversold,
    Positive,
    Negative,
}

impl SignalKind {
    pub fn is_bullish(self) -> bool {
        matches!(self, Self::Oversold | Self::Positive)
    }

    pub fn is_bearish(self) -> bool {
        !self.is_bullish()
    }
}

/// One triggered threshold condition.
///
/// Each rule can only produce its own readings, so the variants are the
/// complete set of source/kind pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Signal {
    RsiOverbought,
    RsiOversold,
    StochasticOverbought,
    StochasticOversold,
    MacdPositive,
    MacdNegative,
    BollingerOverbought,
    BollingerOversold,
}

impl Signal {
    pub fn source(self) -> SignalSource {
        match self {
            Self::RsiOverbought | Self::RsiOversold => SignalSource::Rsi,
            Self::StochasticOverbought | Self::StochasticOversold => SignalSource::Stochastic,
            Self::MacdPositive | Self::MacdNegative => SignalSource::Macd,
            Self::BollingerOverbought | Self::BollingerOversold => SignalSource::Bollinger,
        }
    }

    pub fn kind(self) -> SignalKind {
        match self {
            Self::RsiOverbought | Self::StochasticOverbought | Self::BollingerOverbought => {
                SignalKind::Overbought
            }
            Self::RsiOversold | Self::StochasticOversold | Self::BollingerOversold => {
                SignalKind::Oversold
            }
            Self::MacdPositive => SignalKind::Positive,
            Self::MacdNegative => SignalKind::Negative,
        }
    }
}

impl std::fmt::Display for Signal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            Self::RsiOverbought => "RSI shows an overbought zone",
            Self::RsiOversold => "RSI shows an oversold zone",
            Self::StochasticOverbought => "Stochastic shows an overbought zone",
            Self::StochasticOversold => "Stochastic shows an oversold zone",
            Self::MacdPositive => "MACD gives a positive signal",
            Self::MacdNegative => "MACD gives a negative signal",
            Self::BollingerOverbought => "Price is in the overbought zone of the Bollinger Bands",
            Self::BollingerOversold => "Price is in the oversold zone of the Bollinger Bands",
        };
        f.write_str(text)
    }
}

// =============================================================================
// Classification
// =============================================================================

/// Indicator readings of the most recent bar. Any of them may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LatestReadings {
    pub close: Option<f64>,
    pub rsi: Option<f64>,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_lower: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Classification {
    pub trend: Trend,
    pub signals: Vec<Signal>,
}

impl Classification {
    pub fn bullish_count(&self) -> usize {
        self.signals.iter().filter(|s| s.kind().is_bullish()).count()
    }

    pub fn bearish_count(&self) -> usize {
        self.signals.iter().filter(|s| s.kind().is_bearish()).count()
    }
}

/// Classify the latest readings into a trend and its supporting signals.
///
/// Signals come back in rule order (RSI, Stochastic, MACD, Bollinger).
pub fn classify(readings: &LatestReadings, thresholds: &SignalThresholds) -> Classification {
    let mut signals = Vec::with_capacity(4);

    // ── 1. RSI ──────────────────────────────────────────────────────────
    if let Some(rsi) = readings.rsi {
        if rsi > thresholds.rsi_overbought {
            signals.push(Signal::RsiOverbought);
        } else if rsi < thresholds.rsi_oversold {
            signals.push(Signal::RsiOversold);
        }
    }

    // ── 2. Stochastic (both lines must agree) ───────────────────────────
    if let (Some(k), Some(d)) = (readings.stoch_k, readings.stoch_d) {
        if k > thresholds.stoch_overbought && d > thresholds.stoch_overbought {
            signals.push(Signal::StochasticOverbought);
        } else if k < thresholds.stoch_oversold && d < thresholds.stoch_oversold {
            signals.push(Signal::StochasticOversold);
        }
    }

    // ── 3. MACD ─────────────────────────────────────────────────────────
    if let (Some(macd), Some(signal)) = (readings.macd, readings.macd_signal) {
        signals.push(if macd > signal {
            Signal::MacdPositive
        } else {
            Signal::MacdNegative
        });
    }

    // ── 4. Bollinger ────────────────────────────────────────────────────
    if let (Some(close), Some(upper), Some(lower)) =
        (readings.close, readings.bb_upper, readings.bb_lower)
    {
        if close > upper {
            signals.push(Signal::BollingerOverbought);
        } else if close < lower {
            signals.push(Signal::BollingerOversold);
        }
    }

    let bullish = signals.iter().filter(|s| s.kind().is_bullish()).count();
    let bearish = signals.len() - bullish;

    let trend = if bullish > bearish {
        Trend::Up
    } else if bearish > bullish {
        Trend::Down
    } else {
        Trend::Accumulating
    };

    Classification { trend, signals }
}
