// =============================================================================
// Dashboard view — what the page draws
// =============================================================================
//
// Flattens one render into a JSON document: the trend headline, the signal
// list, the full table, and one panel per chart (price + Bollinger, RSI,
// Stochastic, MACD). The page only draws; it never computes.
// =============================================================================

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dashboard::{Analysis, RenderRequest};
use crate::market_data::TableRow;
use crate::signals::SignalThresholds;
use crate::types::{BarInterval, Trend};

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub symbol: String,
    pub interval: BarInterval,
    pub interval_label: &'static str,
    pub trend: Trend,
    pub trend_marker: &'static str,
    pub signals: Vec<String>,
    pub bullish_signals: usize,
    pub bearish_signals: usize,
    pub rows: Vec<TableRow>,
    pub charts: Charts,
}

#[derive(Debug, Serialize)]
pub struct Charts {
    /// Shared x axis for every panel.
    pub timestamps: Vec<DateTime<Utc>>,
    pub price: PricePanel,
    pub rsi: ChartPanel,
    pub stochastic: ChartPanel,
    pub macd: ChartPanel,
}

#[derive(Debug, Serialize)]
pub struct PricePanel {
    pub title: String,
    pub height: u32,
    pub open: Vec<Option<f64>>,
    pub high: Vec<Option<f64>>,
    pub low: Vec<Option<f64>>,
    pub close: Vec<Option<f64>>,
    pub overlays: Vec<LineSeries>,
}

#[derive(Debug, Serialize)]
pub struct ChartPanel {
    pub title: String,
    pub height: u32,
    pub lines: Vec<LineSeries>,
    pub guides: Vec<GuideLine>,
}

#[derive(Debug, Serialize)]
pub struct LineSeries {
    pub name: &'static str,
    pub values: Vec<Option<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<&'static str>,
    pub dashed: bool,
    /// Shade the area between this line and the previous one.
    pub fill_to_previous: bool,
}

impl LineSeries {
    fn plain(name: &'static str, values: Vec<Option<f64>>) -> Self {
        Self {
            name,
            values,
            color: None,
            dashed: false,
            fill_to_previous: false,
        }
    }
}

/// Horizontal reference line (overbought / oversold band).
#[derive(Debug, Serialize)]
pub struct GuideLine {
    pub y: f64,
    pub color: &'static str,
}

impl DashboardView {
    pub fn build(request: &RenderRequest, analysis: &Analysis, thresholds: &SignalThresholds) -> Self {
        let table = &analysis.table;
        let ind = table.indicators();
        let bars = table.series().bars();
        let class = &analysis.classification;

        let price = PricePanel {
            title: format!("Price chart {}", request.symbol),
            height: 600,
            open: bars.iter().map(|b| b.open).collect(),
            high: bars.iter().map(|b| b.high).collect(),
            low: bars.iter().map(|b| b.low).collect(),
            close: bars.iter().map(|b| b.close).collect(),
            overlays: vec![
                LineSeries {
                    color: Some("gray"),
                    dashed: true,
                    ..LineSeries::plain("BB Upper", ind.bb_upper.clone())
                },
                LineSeries {
                    color: Some("gray"),
                    dashed: true,
                    fill_to_previous: true,
                    ..LineSeries::plain("BB Lower", ind.bb_lower.clone())
                },
            ],
        };

        let rsi = ChartPanel {
            title: "RSI".to_string(),
            height: 300,
            lines: vec![LineSeries::plain("RSI", ind.rsi.clone())],
            guides: vec![
                GuideLine { y: thresholds.rsi_overbought, color: "red" },
                GuideLine { y: thresholds.rsi_oversold, color: "green" },
            ],
        };

        let stochastic = ChartPanel {
            title: "Stochastic Oscillator".to_string(),
            height: 300,
            lines: vec![
                LineSeries::plain("Stoch %K", ind.stoch_k.clone()),
                LineSeries::plain("Stoch %D", ind.stoch_d.clone()),
            ],
            guides: vec![
                GuideLine { y: thresholds.stoch_overbought, color: "red" },
                GuideLine { y: thresholds.stoch_oversold, color: "green" },
            ],
        };

        let macd = ChartPanel {
            title: "MACD".to_string(),
            height: 300,
            lines: vec![
                LineSeries::plain("MACD", ind.macd.clone()),
                LineSeries::plain("Signal", ind.macd_signal.clone()),
            ],
            guides: Vec::new(),
        };

        Self {
            symbol: request.symbol.clone(),
            interval: request.interval,
            interval_label: request.interval.label(),
            trend: class.trend,
            trend_marker: class.trend.marker(),
            signals: class.signals.iter().map(ToString::to_string).collect(),
            bullish_signals: class.bullish_count(),
            bearish_signals: class.bearish_count(),
            rows: table.rows(),
            charts: Charts {
                timestamps: bars.iter().map(|b| b.timestamp).collect(),
                price,
                rsi,
                stochastic,
                macd,
            },
        }
    }
}
