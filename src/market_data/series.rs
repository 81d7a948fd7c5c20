use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::BarInterval;

// ---------------------------------------------------------------------------
// Data types
// ---------------------------------------------------------------------------

/// A single OHLCV bar as returned by the candles endpoint.
///
/// Price and volume fields are `None` when the exchange sent something that
/// does not convert to a finite number. The bar is still kept so that the
/// remaining fields stay usable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

/// Ordered run of bars for one instrument at one interval.
///
/// Built once per render and never mutated afterwards. Construction sorts the
/// bars oldest-first and drops repeated timestamps, so timestamps are strictly
/// increasing.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    symbol: String,
    interval: BarInterval,
    bars: Vec<Bar>,
}

impl Series {
    pub fn new(symbol: impl Into<String>, interval: BarInterval, mut bars: Vec<Bar>) -> Self {
        // Stable sort keeps the first occurrence of a duplicated timestamp.
        bars.sort_by_key(|b| b.timestamp);
        bars.dedup_by_key(|b| b.timestamp);

        Self {
            symbol: symbol.into(),
            interval,
            bars,
        }
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn interval(&self) -> BarInterval {
        self.interval
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Close column (oldest-first).
    pub fn closes(&self) -> Vec<Option<f64>> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn highs(&self) -> Vec<Option<f64>> {
        self.bars.iter().map(|b| b.high).collect()
    }

    pub fn lows(&self) -> Vec<Option<f64>> {
        self.bars.iter().map(|b| b.low).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
