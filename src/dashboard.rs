// =============================================================================
// Render cycle
// =============================================================================
//
//   1. Fetch the candles (one HTTP call, no retries)
//   2. Extend the series with every indicator column
//   3. Classify the latest bar into a trend + signals
//
// A failed fetch stops the cycle: nothing is computed and the caller shows a
// "no data available" state. Nothing is kept between cycles.
// =============================================================================

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::indicators::IndicatorParams;
use crate::market_data::{AnalysisTable, Series};
use crate::okx::{FetchError, OkxClient};
use crate::signals::{classify, Classification, SignalThresholds};
use crate::types::BarInterval;

/// What to render: one instrument, one interval, a bounded number of bars.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderRequest {
    pub symbol: String,
    pub interval: BarInterval,
    pub limit: u32,
}

/// Everything the presentation layer needs for one page.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub table: AnalysisTable,
    pub classification: Classification,
}

/// Compute indicators and classify an already-fetched series.
pub fn analyze(series: Series, params: &IndicatorParams, thresholds: &SignalThresholds) -> Analysis {
    let table = AnalysisTable::compute(series, params);
    let classification = classify(&table.latest_readings(), thresholds);
    Analysis {
        table,
        classification,
    }
}

/// Run one full fetch → compute → classify cycle.
pub async fn render(
    client: &OkxClient,
    request: &RenderRequest,
    params: &IndicatorParams,
    thresholds: &SignalThresholds,
) -> Result<Analysis, FetchError> {
    let series = match client
        .get_candles(&request.symbol, request.interval, request.limit)
        .await
    {
        Ok(series) => series,
        Err(e) => {
            warn!(
                symbol = %request.symbol,
                interval = %request.interval,
                error = %e,
                "no data available — skipping indicators"
            );
            return Err(e);
        }
    };

    let analysis = analyze(series, params, thresholds);

    info!(
        symbol = %request.symbol,
        interval = %request.interval,
        bars = analysis.table.len(),
        trend = %analysis.classification.trend,
        signals = analysis.classification.signals.len(),
        "render complete"
    );
    for signal in &analysis.classification.signals {
        debug!(source = ?signal.source(), kind = ?signal.kind(), "{signal}");
    }

    Ok(analysis)
}
