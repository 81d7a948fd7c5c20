// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators shown on the
// dashboard. Every function takes an immutable column and returns a new column
// of the same length, with `None` wherever the look-back window is not yet
// filled or touches a missing input.

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rolling;
pub mod rsi;
pub mod stochastic;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::market_data::Series;

use self::bollinger::calculate_bollinger;
use self::macd::calculate_macd;
use self::rsi::calculate_rsi;
use self::stochastic::calculate_stochastic;

// =============================================================================
// Parameters
// =============================================================================

fn default_rsi_period() -> usize {
    14
}

fn default_macd_fast() -> usize {
    12
}

fn default_macd_slow() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

fn default_bb_period() -> usize {
    20
}

fn default_bb_std() -> f64 {
    2.0
}

fn default_stoch_period() -> usize {
    14
}

fn default_stoch_smoothing() -> usize {
    3
}

/// Look-back windows for every indicator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorParams {
    #[serde(default = "default_rsi_period")]
    pub rsi_period: usize,

    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,

    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,

    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,

    #[serde(default = "default_bb_period")]
    pub bb_period: usize,

    /// Band distance in standard deviations.
    #[serde(default = "default_bb_std")]
    pub bb_std: f64,

    #[serde(default = "default_stoch_period")]
    pub stoch_period: usize,

    /// Window of the %D moving average.
    #[serde(default = "default_stoch_smoothing")]
    pub stoch_smoothing: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            rsi_period: default_rsi_period(),
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
            bb_period: default_bb_period(),
            bb_std: default_bb_std(),
            stoch_period: default_stoch_period(),
            stoch_smoothing: default_stoch_smoothing(),
        }
    }
}

// =============================================================================
// IndicatorSet
// =============================================================================

/// Derived columns, aligned index-for-index with the bars of a [`Series`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSet {
    pub rsi: Vec<Option<f64>>,
    pub macd: Vec<Option<f64>>,
    pub macd_signal: Vec<Option<f64>>,
    pub bb_upper: Vec<Option<f64>>,
    pub bb_middle: Vec<Option<f64>>,
    pub bb_lower: Vec<Option<f64>>,
    pub stoch_k: Vec<Option<f64>>,
    pub stoch_d: Vec<Option<f64>>,
}

/// Compute every indicator column for `series`.
pub fn compute_indicators(series: &Series, params: &IndicatorParams) -> IndicatorSet {
    let closes = series.closes();
    let highs = series.highs();
    let lows = series.lows();

    let rsi = calculate_rsi(&closes, params.rsi_period);
    let macd = calculate_macd(&closes, params.macd_fast, params.macd_slow, params.macd_signal);
    let bands = calculate_bollinger(&closes, params.bb_period, params.bb_std);
    let stoch = calculate_stochastic(
        &highs,
        &lows,
        &closes,
        params.stoch_period,
        params.stoch_smoothing,
    );

    debug!(
        symbol = series.symbol(),
        interval = %series.interval(),
        bars = series.len(),
        rsi_defined = rsi.iter().flatten().count(),
        macd_signal_defined = macd.signal.iter().flatten().count(),
        "indicators computed"
    );

    IndicatorSet {
        rsi,
        macd: macd.line,
        macd_signal: macd.signal,
        bb_upper: bands.upper,
        bb_middle: bands.middle,
        bb_lower: bands.lower,
        stoch_k: stoch.k,
        stoch_d: stoch.d,
    }
}
