// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/` and are public; the dashboard has no
// user accounts.
//
// CORS is configured permissively so a static page on another origin can
// draw the charts.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Json, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

use crate::api::view::DashboardView;
use crate::app_state::AppState;
use crate::config::DashboardConfig;
use crate::dashboard::{self, RenderRequest};
use crate::okx::client::MAX_CANDLE_LIMIT;
use crate::types::{BarInterval, InvalidInterval};

// =============================================================================
// Router construction
// =============================================================================

/// Build the REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/options", get(options))
        .route("/api/v1/analysis", get(analysis))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    server_time: i64,
}

async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Picker options
// =============================================================================

#[derive(Serialize)]
struct TimeframeOption {
    code: BarInterval,
    label: &'static str,
}

#[derive(Serialize)]
struct Defaults {
    symbol: String,
    interval: BarInterval,
    limit: u32,
}

#[derive(Serialize)]
struct OptionsResponse {
    trading_pairs: Vec<String>,
    timeframes: Vec<TimeframeOption>,
    defaults: Defaults,
}

async fn options(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let config = &state.config;
    Json(OptionsResponse {
        trading_pairs: config.trading_pairs.clone(),
        timeframes: BarInterval::ALL
            .into_iter()
            .map(|iv| TimeframeOption {
                code: iv,
                label: iv.label(),
            })
            .collect(),
        defaults: Defaults {
            symbol: config.default_symbol.clone(),
            interval: config.default_interval,
            limit: config.default_limit,
        },
    })
}

// =============================================================================
// Analysis
// =============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct AnalysisQuery {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub interval: Option<String>,
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Query parameters the dashboard cannot render.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error(transparent)]
    Interval(#[from] InvalidInterval),

    #[error("limit must be between 1 and {max}, got {0}", max = MAX_CANDLE_LIMIT)]
    Limit(u32),

    #[error("symbol must not be empty")]
    EmptySymbol,

    #[error("invalid query: {0}")]
    Query(String),
}

impl From<QueryRejection> for RequestError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Query(rejection.body_text())
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({ "error": self.to_string() });
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

impl AnalysisQuery {
    /// Fill unset parameters from `config` and validate the rest.
    pub fn resolve(self, config: &DashboardConfig) -> Result<RenderRequest, RequestError> {
        let symbol = match self.symbol {
            Some(s) => s.trim().to_uppercase(),
            None => config.default_symbol.clone(),
        };
        if symbol.is_empty() {
            return Err(RequestError::EmptySymbol);
        }

        let interval = match self.interval {
            Some(code) => code.trim().parse::<BarInterval>()?,
            None => config.default_interval,
        };

        let limit = self.limit.unwrap_or(config.default_limit);
        if !(1..=MAX_CANDLE_LIMIT).contains(&limit) {
            return Err(RequestError::Limit(limit));
        }

        Ok(RenderRequest {
            symbol,
            interval,
            limit,
        })
    }
}

async fn analysis(
    State(state): State<Arc<AppState>>,
    query: Result<Query<AnalysisQuery>, QueryRejection>,
) -> Result<Response, RequestError> {
    let Query(query) = query?;
    let request = query.resolve(&state.config)?;
    let config = &state.config;

    let response = match dashboard::render(&state.okx, &request, &config.indicators, &config.thresholds).await {
        Ok(analysis) => {
            Json(DashboardView::build(&request, &analysis, &config.thresholds)).into_response()
        }
        Err(e) => {
            warn!(symbol = %request.symbol, error = %e, "analysis unavailable");
            let body = serde_json::json!({
                "error": "no data available",
                "detail": e.to_string(),
            });
            (StatusCode::BAD_GATEWAY, Json(body)).into_response()
        }
    };

    Ok(response)
}
