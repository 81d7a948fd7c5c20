// =============================================================================
// Rolling-window statistics
// =============================================================================
//
// Every function here takes a column of `Option<f64>` and returns a column of
// the same length. Index `i` holds the statistic of the window ending at `i`,
// so the first `period - 1` entries are always `None`. A window containing a
// missing value yields `None`.
// =============================================================================

/// Apply `stat` to every complete window of `period` values.
fn rolling<F>(values: &[Option<f64>], period: usize, stat: F) -> Vec<Option<f64>>
where
    F: Fn(&[f64]) -> Option<f64>,
{
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let mut window = Vec::with_capacity(period);
    for end in period - 1..values.len() {
        window.clear();
        window.extend(values[end + 1 - period..=end].iter().map_while(|v| *v));
        if window.len() == period {
            out[end] = stat(&window).filter(|v| v.is_finite());
        }
    }

    out
}

/// Simple moving average.
pub fn sma(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, |w| Some(mean(w)))
}

/// Population standard deviation (divides by `period`, not `period - 1`).
pub fn rolling_std(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, |w| {
        let m = mean(w);
        let variance = w.iter().map(|x| (x - m).powi(2)).sum::<f64>() / w.len() as f64;
        Some(variance.sqrt())
    })
}

pub fn rolling_min(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, |w| w.iter().copied().reduce(f64::min))
}

pub fn rolling_max(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    rolling(values, period, |w| w.iter().copied().reduce(f64::max))
}

fn mean(w: &[f64]) -> f64 {
    w.iter().sum::<f64>() / w.len() as f64
}
