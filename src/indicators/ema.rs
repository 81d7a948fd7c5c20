// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = value_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The first EMA value is seeded with the SMA of the first `period` values.
// =============================================================================

/// Compute the EMA column for `values` with look-back `period`.
///
/// The output is aligned with the input: index `i` holds the EMA as of value
/// `i`, and the first `period - 1` entries are `None`.
///
/// # Edge cases
/// - `period == 0` => all `None`
/// - A missing input yields `None` at that index and the average is re-seeded
///   from the next `period` consecutive defined values.
/// - A non-finite intermediate result is treated like a missing input.
pub fn calculate_ema(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 {
        return out;
    }

    let multiplier = 2.0 / (period + 1) as f64;

    let mut prev_ema: Option<f64> = None;
    // Values collected towards the SMA seed since the last gap.
    let mut seed_sum = 0.0;
    let mut seed_len = 0usize;

    for (i, value) in values.iter().enumerate() {
        let Some(v) = *value else {
            prev_ema = None;
            seed_sum = 0.0;
            seed_len = 0;
            continue;
        };

        let next = match prev_ema {
            Some(prev) => Some(v * multiplier + prev * (1.0 - multiplier)),
            None => {
                seed_sum += v;
                seed_len += 1;
                (seed_len == period).then(|| seed_sum / period as f64)
            }
        };

        match next {
            Some(ema) if ema.is_finite() => {
                out[i] = Some(ema);
                prev_ema = Some(ema);
            }
            Some(_) => {
                prev_ema = None;
                seed_sum = 0.0;
                seed_len = 0;
            }
            None => {}
        }
    }

    out
}
