// =============================================================================
// Relative Strength Index (RSI) — Wilder's Smoothing
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 — Compute price changes (deltas) from consecutive closes.
// Step 2 — Seed average gain / average loss with the SMA of the first `period`
//          gains / losses.
// Step 3 — Apply Wilder's exponential smoothing:
//            avg_gain = (prev_avg_gain * (period - 1) + current_gain) / period
//            avg_loss = (prev_avg_loss * (period - 1) + current_loss) / period
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
// =============================================================================

/// Compute the RSI column for `closes` and `period`, aligned with the input.
///
/// The first defined value sits at index `period`, since `period` deltas are
/// needed to seed the averages.
///
/// # Edge cases
/// - `period == 0` => all `None`
/// - If the average loss is zero, RSI is 100 (a flat window included).
/// - A delta touching a missing close is missing; the averages are re-seeded
///   from the next `period` consecutive deltas.
pub fn calculate_rsi(closes: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; closes.len()];
    if period == 0 || closes.len() < period + 1 {
        return out;
    }

    let period_f = period as f64;
    let mut averages: Option<(f64, f64)> = None;
    let mut seed_gain = 0.0;
    let mut seed_loss = 0.0;
    let mut seed_len = 0usize;

    for i in 1..closes.len() {
        let delta = match (closes[i - 1], closes[i]) {
            (Some(prev), Some(cur)) => cur - prev,
            _ => {
                averages = None;
                seed_gain = 0.0;
                seed_loss = 0.0;
                seed_len = 0;
                continue;
            }
        };

        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);

        averages = match averages {
            Some((avg_gain, avg_loss)) => Some((
                (avg_gain * (period_f - 1.0) + gain) / period_f,
                (avg_loss * (period_f - 1.0) + loss) / period_f,
            )),
            None => {
                seed_gain += gain;
                seed_loss += loss;
                seed_len += 1;
                (seed_len == period).then(|| (seed_gain / period_f, seed_loss / period_f))
            }
        };

        if let Some((avg_gain, avg_loss)) = averages {
            out[i] = rsi_from_averages(avg_gain, avg_loss);
            if out[i].is_none() {
                // Non-finite — restart the smoothing.
                averages = None;
                seed_gain = 0.0;
                seed_loss = 0.0;
                seed_len = 0;
            }
        }
    }

    out
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
///
/// Returns `None` when the result is non-finite.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    let rsi = if avg_loss == 0.0 {
        100.0
    } else {
        let rs = avg_gain / avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    };

    rsi.is_finite().then_some(rsi)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn col(xs: &[f64]) -> Vec<Option<f64>> {
        xs.iter().copied().map(Some).collect()
    }

    #[test]
    fn rsi_empty_input() {
        assert!(calculate_rsi(&[], 14).is_empty());
    }

    #[test]
    fn rsi_period_zero() {
        assert_eq!(calculate_rsi(&col(&[1.0, 2.0, 3.0]), 0), vec![None; 3]);
    }

    #[test]
    fn rsi_insufficient_data() {
        // 14 closes => 13 deltas < 14.
        let closes: Vec<f64> = (1..=14).map(|x| x as f64).collect();
        assert!(calculate_rsi(&col(&closes), 14).iter().all(Option::is_none));
    }

    #[test]
    fn rsi_first_value_at_period() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let series = calculate_rsi(&col(&closes), 14);
        assert!(series[..14].iter().all(Option::is_none));
        assert!(series[14..].iter().all(Option::is_some));
    }

    #[test]
    fn rsi_all_gains() {
        let closes: Vec<f64> = (1..=30).map(|x| x as f64).collect();
        for v in calculate_rsi(&col(&closes), 14).into_iter().flatten() {
            assert!((v - 100.0).abs() < 1e-10, "expected 100.0, got {v}");
        }
    }

    #[test]
    fn rsi_all_losses() {
        let closes: Vec<f64> = (1..=30).rev().map(|x| x as f64).collect();
        let series = calculate_rsi(&col(&closes), 14);
        assert!(series[14].is_some());
        for v in series.into_iter().flatten() {
            assert!(v.abs() < 1e-10, "expected 0.0, got {v}");
        }
    }

    #[test]
    fn rsi_flat_market_has_zero_loss() {
        // No down moves at all => average loss is exactly zero => 100.
        let series = calculate_rsi(&col(&[100.0; 30]), 14);
        assert_eq!(series[29], Some(100.0));
    }

    #[test]
    fn rsi_range_check() {
        let closes = [
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03,
            44.18, 44.22, 44.57, 43.42, 42.66, 43.13,
        ];
        let series = calculate_rsi(&col(&closes), 14);
        assert!(series[14].is_some());
        for v in series.into_iter().flatten() {
            assert!((0.0..=100.0).contains(&v), "RSI {v} out of range");
        }
    }

    #[test]
    fn rsi_known_seed_value() {
        // Seed: gains 1+1, losses 1 over 3 deltas => RS = 2, RSI = 66.67.
        let series = calculate_rsi(&col(&[10.0, 11.0, 12.0, 11.0]), 3);
        assert!((series[3].unwrap() - 200.0 / 3.0).abs() < 1e-10);
    }

    #[test]
    fn rsi_missing_close_restarts_seed() {
        let mut closes = col(&(1..=40).map(|x| x as f64).collect::<Vec<_>>());
        closes[20] = None;
        let series = calculate_rsi(&closes, 14);
        assert!(series[19].is_some());
        // Deltas 20 and 21 touch the gap; 14 fresh deltas end at index 35.
        assert!(series[20..35].iter().all(Option::is_none));
        assert!(series[35].is_some());
    }
}
