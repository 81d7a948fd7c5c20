// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   MACD line   = EMA(close, fast) - EMA(close, slow)
//   Signal line = EMA(MACD line, signal)
//
// With the default 12/26/9 windows the MACD line is first defined at index 25
// and the signal line at index 33.
// =============================================================================

use super::ema::calculate_ema;

/// MACD line and its signal line, both aligned with the input closes.
#[derive(Debug, Clone, PartialEq)]
pub struct MacdSeries {
    pub line: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
}

pub fn calculate_macd(closes: &[Option<f64>], fast: usize, slow: usize, signal: usize) -> MacdSeries {
    let fast_ema = calculate_ema(closes, fast);
    let slow_ema = calculate_ema(closes, slow);

    let line: Vec<Option<f64>> = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();

    let signal = calculate_ema(&line, signal);

    MacdSeries { line, signal }
}
