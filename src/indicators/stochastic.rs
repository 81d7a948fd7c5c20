// =============================================================================
// Stochastic Oscillator
// =============================================================================
//
//   %K = 100 * (close - lowest_low) / (highest_high - lowest_low)
//   %D = SMA(%K, smoothing)
//
// Highest high / lowest low are taken over the last `period` bars. When the
// range is zero %K is undefined for that bar.
// =============================================================================

use super::rolling::{rolling_max, rolling_min, sma};

#[derive(Debug, Clone, PartialEq)]
pub struct StochasticSeries {
    pub k: Vec<Option<f64>>,
    pub d: Vec<Option<f64>>,
}

pub fn calculate_stochastic(
    highs: &[Option<f64>],
    lows: &[Option<f64>],
    closes: &[Option<f64>],
    period: usize,
    smoothing: usize,
) -> StochasticSeries {
    let highest = rolling_max(highs, period);
    let lowest = rolling_min(lows, period);

    let k: Vec<Option<f64>> = closes
        .iter()
        .zip(highest.iter().zip(&lowest))
        .map(|(close, (hi, lo))| {
            let (close, hi, lo) = ((*close)?, (*hi)?, (*lo)?);
            let range = hi - lo;
            if range == 0.0 {
                return None;
            }
            Some(100.0 * (close - lo) / range).filter(|v| v.is_finite())
        })
        .collect();

    let d = sma(&k, smoothing);

    StochasticSeries { k, d }
}
