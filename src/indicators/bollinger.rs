// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ). σ is the population standard deviation of the
// same window.

use super::rolling::{rolling_std, sma};

/// Band columns aligned with the input closes.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

/// Calculate Bollinger Bands over every window of `period` closes.
///
/// A bar gets no bands until `period` closes are available, or while a missing
/// close sits inside its window.
pub fn calculate_bollinger(closes: &[Option<f64>], period: usize, num_std: f64) -> BollingerBands {
    let middle = sma(closes, period);
    let sigma = rolling_std(closes, period);

    let band = |sign: f64| -> Vec<Option<f64>> {
        middle
            .iter()
            .zip(&sigma)
            .map(|(m, s)| Some((*m)? + sign * num_std * (*s)?))
            .collect()
    };

    BollingerBands {
        upper: band(1.0),
        lower: band(-1.0),
        middle,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn col(xs: impl IntoIterator<Item = f64>) -> Vec<Option<f64>> {
        xs.into_iter().map(Some).collect()
    }

    #[test]
    fn bollinger_basic() {
        let bb = calculate_bollinger(&col((1..=20).map(|x| x as f64)), 20, 2.0);
        let (u, m, l) = (bb.upper[19].unwrap(), bb.middle[19].unwrap(), bb.lower[19].unwrap());
        assert!((m - 10.5).abs() < 1e-10);
        assert!(u > m);
        assert!(l < m);
        assert!(((u - m) - (m - l)).abs() < 1e-10);
    }

    #[test]
    fn bollinger_insufficient_data() {
        let bb = calculate_bollinger(&col([1.0, 2.0, 3.0]), 20, 2.0);
        assert!(bb.upper.iter().chain(&bb.middle).chain(&bb.lower).all(Option::is_none));
    }

    #[test]
    fn bollinger_flat_collapses() {
        let bb = calculate_bollinger(&col([100.0; 25]), 20, 2.0);
        assert_eq!(bb.upper[24], Some(100.0));
        assert_eq!(bb.lower[24], Some(100.0));
    }

    #[test]
    fn bands_are_ordered_wherever_defined() {
        let closes = col((0..80).map(|i| 50.0 + (i as f64 * 1.3).cos() * 7.0));
        let bb = calculate_bollinger(&closes, 20, 2.0);
        for i in 0..closes.len() {
            if let (Some(u), Some(m), Some(l)) = (bb.upper[i], bb.middle[i], bb.lower[i]) {
                assert!(u >= m && m >= l, "index {i}: {u} {m} {l}");
            }
        }
        assert!(bb.middle[19].is_some());
    }
}
