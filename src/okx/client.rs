// =============================================================================
// OKX REST API Client — public market data
// =============================================================================
//
// Only the unauthenticated candles endpoint is used, so no request signing is
// involved. Every render issues exactly one GET; there are no retries.
// =============================================================================

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use tracing::{debug, instrument, warn};

use crate::market_data::{Bar, Series};
use crate::types::BarInterval;

/// Default public REST host.
pub const DEFAULT_BASE_URL: &str = "https://www.okx.com";

/// Largest `limit` the candles endpoint honours.
pub const MAX_CANDLE_LIMIT: u32 = 300;

/// Why a candles request produced no usable series.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request to OKX failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("OKX returned HTTP {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("malformed candles response: {0}")]
    Body(String),

    #[error("OKX rejected the request (code {code}): {msg}")]
    Exchange { code: String, msg: String },

    #[error("OKX returned no candles")]
    Empty,
}

/// OKX public REST client.
#[derive(Debug, Clone)]
pub struct OkxClient {
    base_url: String,
    client: reqwest::Client,
}

impl OkxClient {
    // -------------------------------------------------------------------------
    // Construction
    // -------------------------------------------------------------------------

    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build reqwest client")?;

        debug!(base_url = %base_url, "OkxClient initialised");

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -------------------------------------------------------------------------
    // Public market data
    // -------------------------------------------------------------------------

    /// GET /api/v5/market/candles (public — no signature required).
    ///
    /// Returns the bars oldest-first. OKX itself answers newest-first.
    #[instrument(skip(self), name = "okx::get_candles")]
    pub async fn get_candles(
        &self,
        inst_id: &str,
        interval: BarInterval,
        limit: u32,
    ) -> std::result::Result<Series, FetchError> {
        let url = format!("{}/api/v5/market/candles", self.base_url);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("instId", inst_id.to_string()),
                ("bar", interval.code().to_string()),
                ("limit", limit.to_string()),
            ])
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            return Err(FetchError::Status { status, body: text });
        }

        let body: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| FetchError::Body(format!("invalid JSON: {e}")))?;

        let series = parse_candles(&body, inst_id, interval)?;
        debug!(inst_id, %interval, count = series.len(), "candles fetched");
        Ok(series)
    }
}

// =============================================================================
// Response parsing
// =============================================================================

/// Parse the candles envelope:
///
/// ```json
/// { "code": "0", "msg": "", "data": [["1700000000000","37000","37050","36990","37020","12.3", ...], ...] }
/// ```
///
/// Row indices: [0] ts (ms, string), [1] open, [2] high, [3] low, [4] close,
/// [5] volume; anything after that is ignored.
///
/// A price or volume field that does not parse becomes `None`; rows with fewer
/// than six fields or an unusable timestamp are skipped.
pub fn parse_candles(
    body: &serde_json::Value,
    inst_id: &str,
    interval: BarInterval,
) -> std::result::Result<Series, FetchError> {
    if let Some(code) = body.get("code").and_then(json_text) {
        if code != "0" {
            let msg = body
                .get("msg")
                .and_then(|m| m.as_str())
                .unwrap_or_default()
                .to_string();
            return Err(FetchError::Exchange { code, msg });
        }
    }

    let rows = body
        .get("data")
        .and_then(|d| d.as_array())
        .ok_or_else(|| FetchError::Body("missing 'data' array".to_string()))?;

    let mut bars = Vec::with_capacity(rows.len());

    for (idx, row) in rows.iter().enumerate() {
        let Some(fields) = row.as_array() else {
            warn!(row = idx, "skipping candle row that is not an array");
            continue;
        };

        if fields.len() < 6 {
            warn!(row = idx, len = fields.len(), "skipping short candle row");
            continue;
        }

        let Some(timestamp) = parse_timestamp(&fields[0]) else {
            warn!(row = idx, value = %fields[0], "skipping candle row with bad timestamp");
            continue;
        };

        bars.push(Bar {
            timestamp,
            open: parse_number(&fields[1]),
            high: parse_number(&fields[2]),
            low: parse_number(&fields[3]),
            close: parse_number(&fields[4]),
            volume: parse_number(&fields[5]),
        });
    }

    if bars.is_empty() {
        return Err(FetchError::Empty);
    }

    Ok(Series::new(inst_id, interval, bars))
}

// -----------------------------------------------------------------------------
// Internal helpers
// -----------------------------------------------------------------------------

/// String or number JSON scalar as text.
fn json_text(val: &serde_json::Value) -> Option<String> {
    match val {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// OKX sends numbers as JSON strings; accept bare numbers too.
/// Anything that is not a finite number is treated as missing.
fn parse_number(val: &serde_json::Value) -> Option<f64> {
    let n = match val {
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok()?,
        serde_json::Value::Number(n) => n.as_f64()?,
        _ => return None,
    };
    n.is_finite().then_some(n)
}

fn parse_timestamp(val: &serde_json::Value) -> Option<DateTime<Utc>> {
    let ms = parse_number(val)?;
    DateTime::from_timestamp_millis(ms as i64)
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use axum::{http::StatusCode as AxumStatus, routing::get, Router};
    use serde_json::json;

    /// Newest-first rows like the live endpoint returns.
    pub(crate) fn okx_body(n: usize) -> serde_json::Value {
        let rows: Vec<serde_json::Value> = (0..n)
            .rev()
            .map(|i| {
                let close = 100.0 + (i as f64 * 0.45).sin() * 6.0;
                json!([
                    (1_700_000_000_000_i64 + i as i64 * 3_600_000).to_string(),
                    format!("{:.4}", close - 0.3),
                    format!("{:.4}", close + 1.2),
                    format!("{:.4}", close - 1.4),
                    format!("{:.4}", close),
                    "12.5",
                    "1250.0",
                    "1250.0",
                    "1"
                ])
            })
            .collect();
        json!({ "code": "0", "msg": "", "data": rows })
    }

    /// Serve `router` on an ephemeral local port and return its base URL.
    pub(crate) async fn spawn_exchange(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}")
    }

    // ---- parse_candles ---------------------------------------------------

    #[test]
    fn parses_and_sorts_rows() {
        let series = parse_candles(&okx_body(5), "BTC-USDT", BarInterval::OneHour).unwrap();
        assert_eq!(series.len(), 5);
        assert_eq!(series.symbol(), "BTC-USDT");
        let ts: Vec<_> = series.bars().iter().map(|b| b.timestamp.timestamp_millis()).collect();
        assert_eq!(ts[0], 1_700_000_000_000);
        assert!(ts.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(series.bars()[0].volume, Some(12.5));
    }

    #[test]
    fn bad_field_becomes_missing_and_row_is_kept() {
        let body = json!({
            "code": "0",
            "data": [
                ["1700000060000", "1", "oops", "0.5", "1.5", "10"],
                ["1700000000000", "1", "2", "0.5", "NaN", "10"]
            ]
        });
        let series = parse_candles(&body, "ETH-USDT", BarInterval::OneMinute).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.bars()[0].close, None);
        assert_eq!(series.bars()[1].high, None);
        assert_eq!(series.bars()[1].close, Some(1.5));
    }

    #[test]
    fn short_rows_and_bad_timestamps_are_skipped() {
        let body = json!({
            "code": "0",
            "data": [
                ["1700000000000", "1", "2"],
                ["not-a-time", "1", "2", "0.5", "1.5", "10"],
                ["1700000060000", "1", "2", "0.5", "1.5", "10"]
            ]
        });
        let series = parse_candles(&body, "ETH-USDT", BarInterval::OneMinute).unwrap();
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn nonzero_code_is_exchange_error() {
        let body = json!({ "code": "51001", "msg": "Instrument ID does not exist", "data": [] });
        let err = parse_candles(&body, "NOPE-USDT", BarInterval::OneHour).unwrap_err();
        assert!(matches!(err, FetchError::Exchange { ref code, .. } if code == "51001"));
    }

    #[test]
    fn missing_data_is_body_error() {
        let err = parse_candles(&json!({ "code": "0" }), "BTC-USDT", BarInterval::OneHour).unwrap_err();
        assert!(matches!(err, FetchError::Body(_)));
    }

    #[test]
    fn no_rows_is_empty_error() {
        let body = json!({ "code": "0", "msg": "", "data": [] });
        let err = parse_candles(&body, "BTC-USDT", BarInterval::OneHour).unwrap_err();
        assert!(matches!(err, FetchError::Empty));
    }

    // ---- get_candles over HTTP -------------------------------------------

    #[tokio::test]
    async fn get_candles_sends_query_and_parses() {
        let router = Router::new().route(
            "/api/v5/market/candles",
            get(
                |axum::extract::Query(q): axum::extract::Query<std::collections::HashMap<String, String>>| async move {
                    assert_eq!(q.get("instId").map(String::as_str), Some("SOL-USDT"));
                    assert_eq!(q.get("bar").map(String::as_str), Some("4H"));
                    assert_eq!(q.get("limit").map(String::as_str), Some("30"));
                    axum::Json(okx_body(30))
                },
            ),
        );
        let base = spawn_exchange(router).await;
        let client = OkxClient::new(base, Duration::from_secs(5)).unwrap();

        let series = client
            .get_candles("SOL-USDT", BarInterval::FourHours, 30)
            .await
            .unwrap();
        assert_eq!(series.len(), 30);
        assert_eq!(series.interval(), BarInterval::FourHours);
    }

    #[tokio::test]
    async fn http_500_is_status_error() {
        let router = Router::new().route(
            "/api/v5/market/candles",
            get(|| async { (AxumStatus::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let base = spawn_exchange(router).await;
        let client = OkxClient::new(base, Duration::from_secs(5)).unwrap();

        let err = client
            .get_candles("BTC-USDT", BarInterval::OneHour, 100)
            .await
            .unwrap_err();
        match err {
            FetchError::Status { status, body } => {
                assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
                assert_eq!(body, "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn non_json_body_is_body_error() {
        let router = Router::new().route("/api/v5/market/candles", get(|| async { "<html>" }));
        let base = spawn_exchange(router).await;
        let client = OkxClient::new(base, Duration::from_secs(5)).unwrap();

        let err = client
            .get_candles("BTC-USDT", BarInterval::OneHour, 100)
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Body(_)));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = OkxClient::new("https://www.okx.com/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }
}
