use chrono::{DateTime, Utc};
use serde::Serialize;

use super::series::Series;
use crate::indicators::{compute_indicators, IndicatorParams, IndicatorSet};
use crate::signals::LatestReadings;

/// A series together with its derived indicator columns.
///
/// The table owns both halves; indicator columns are only ever appended next
/// to the bars, never written back into them.
#[derive(Debug, Clone)]
pub struct AnalysisTable {
    series: Series,
    indicators: IndicatorSet,
}

/// One flattened row of the table, as handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub timestamp: DateTime<Utc>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
    pub rsi: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    pub stoch_k: Option<f64>,
    pub stoch_d: Option<f64>,
}

impl AnalysisTable {
    /// Extend `series` with every indicator column.
    pub fn compute(series: Series, params: &IndicatorParams) -> Self {
        let indicators = compute_indicators(&series, params);
        Self { series, indicators }
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    pub fn indicators(&self) -> &IndicatorSet {
        &self.indicators
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn row(&self, i: usize) -> Option<TableRow> {
        let bar = self.series.bars().get(i)?;
        let ind = &self.indicators;
        Some(TableRow {
            timestamp: bar.timestamp,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            rsi: ind.rsi[i],
            macd: ind.macd[i],
            macd_signal: ind.macd_signal[i],
            bb_upper: ind.bb_upper[i],
            bb_middle: ind.bb_middle[i],
            bb_lower: ind.bb_lower[i],
            stoch_k: ind.stoch_k[i],
            stoch_d: ind.stoch_d[i],
        })
    }

    /// All rows, oldest first.
    pub fn rows(&self) -> Vec<TableRow> {
        (0..self.len()).filter_map(|i| self.row(i)).collect()
    }

    /// Readings of the most recent bar; all `None` for an empty table.
    pub fn latest_readings(&self) -> LatestReadings {
        if self.series.is_empty() {
            return LatestReadings::default();
        }
        match self.row(self.len() - 1) {
            Some(row) => LatestReadings {
                close: row.close,
                rsi: row.rsi,
                stoch_k: row.stoch_k,
                stoch_d: row.stoch_d,
                macd: row.macd,
                macd_signal: row.macd_signal,
                bb_upper: row.bb_upper,
                bb_lower: row.bb_lower,
            },
            None => LatestReadings::default(),
        }
    }
}
