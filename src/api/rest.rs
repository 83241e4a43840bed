// =============================================================================
// REST API Endpoints - Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`.  Price frames arrive in the request
// body; the service never fetches market data itself.
//
// CORS is configured permissively so the dashboard can be served from any
// origin during development.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use super::error::ApiRejection;
use crate::app_state::AppState;
use crate::catalog::{Catalog, PARAM_BOUNDS};
use crate::chart::{assemble_chart, ChartPayload};
use crate::layout::{LayoutPlan, MethodSelection};
use crate::market_data::{PriceFrame, RawColumn};
use crate::runtime_config::{IndicatorParams, IndicatorParamsUpdate, RuntimeConfig};
use crate::types::ChartTheme;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/catalog", get(catalog))
        .route("/api/v1/layout", post(layout))
        .route("/api/v1/chart", post(chart))
        .route("/api/v1/defaults", get(get_defaults).post(set_defaults))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    state_version: u64,
    uptime_secs: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        state_version: state.current_state_version(),
        uptime_secs: state.uptime_secs(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Catalog
// =============================================================================

async fn catalog(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let config = state.runtime_config.read();
    Json(Catalog::from_config(&config))
}

// =============================================================================
// Layout
// =============================================================================

#[derive(Deserialize)]
struct LayoutRequest {
    #[serde(default)]
    methods: Vec<String>,
}

async fn layout(Json(req): Json<LayoutRequest>) -> impl IntoResponse {
    let selection = MethodSelection::from_names(&req.methods);
    Json(LayoutPlan::for_selection(&selection))
}

// =============================================================================
// Chart
// =============================================================================

#[derive(Debug, Default, Deserialize)]
struct FrameInput {
    #[serde(default)]
    dates: Vec<NaiveDate>,
    #[serde(default)]
    columns: Vec<RawColumn>,
}

#[derive(Deserialize)]
struct ChartRequest {
    /// Display names from the catalog or raw symbols.
    #[serde(default)]
    tickers: Vec<String>,
    #[serde(default)]
    methods: Vec<String>,
    #[serde(default)]
    frame: FrameInput,
    #[serde(default)]
    params: IndicatorParamsUpdate,
    #[serde(default)]
    start: Option<NaiveDate>,
    #[serde(default)]
    end: Option<NaiveDate>,
    #[serde(default)]
    theme: ChartTheme,
}

/// Map requested names to symbols, keeping first-seen order.
fn resolve_tickers(config: &RuntimeConfig, requested: &[String]) -> Vec<String> {
    let mut symbols: Vec<String> = Vec::with_capacity(requested.len());
    for name in requested {
        let symbol = config.symbol_for(name);
        if !symbol.is_empty() && !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }
    symbols
}

async fn chart(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChartRequest>,
) -> Result<Json<ChartPayload>, ApiRejection> {
    let config = state.config_snapshot();
    let params = config.indicator_defaults.merged(&req.params);
    let selection = MethodSelection::from_names(&req.methods);
    let tickers = resolve_tickers(&config, &req.tickers);

    if tickers.is_empty() || selection.is_empty() {
        info!(
            tickers = tickers.len(),
            methods = selection.len(),
            "nothing to draw, serving layout only"
        );
        return Ok(Json(ChartPayload::empty(&selection, req.theme)));
    }

    let columns = req
        .frame
        .columns
        .into_iter()
        .map(|mut col| {
            col.ticker = col.ticker.map(|t| config.symbol_for(&t));
            col
        })
        .collect();

    let frame = PriceFrame::from_columns(&tickers, req.frame.dates, columns)?
        .between(req.start, req.end);
    let payload = assemble_chart(&frame, &selection, &params, req.theme)?;

    info!(
        tickers = ?tickers,
        methods = selection.len(),
        points = frame.dates().len(),
        traces = payload.traces.len(),
        "chart served"
    );
    Ok(Json(payload))
}

// =============================================================================
// Indicator defaults
// =============================================================================

#[derive(Serialize)]
struct DefaultsResponse {
    defaults: IndicatorParams,
    changes: Vec<String>,
}

async fn get_defaults(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let defaults = state.runtime_config.read().indicator_defaults;
    Json(DefaultsResponse {
        defaults,
        changes: Vec::new(),
    })
}

async fn set_defaults(
    State(state): State<Arc<AppState>>,
    Json(update): Json<IndicatorParamsUpdate>,
) -> Result<Json<DefaultsResponse>, ApiRejection> {
    let mut config = state.runtime_config.write();
    let candidate = config.indicator_defaults.merged(&update);
    PARAM_BOUNDS.check(&candidate)?;

    let mut changes = Vec::new();

    macro_rules! apply_param {
        ($($field:ident),*) => {
            $(if config.indicator_defaults.$field != candidate.$field {
                changes.push(format!(
                    "{}: {} -> {}",
                    stringify!($field),
                    config.indicator_defaults.$field,
                    candidate.$field
                ));
                config.indicator_defaults.$field = candidate.$field;
            })*
        };
    }

    apply_param!(ma_window, rsi_window, macd_slow, macd_fast, macd_signal, swing_shift);

    // Clone config and drop write lock before saving.
    let config_clone = config.clone();
    drop(config);

    if !changes.is_empty() {
        info!(changes = ?changes, "Indicator defaults updated");

        // Save to disk (best-effort).
        if let Err(e) = config_clone.save(&state.config_path) {
            warn!(error = %e, "Failed to save indicator defaults to disk");
        }

        state.increment_version();
    }

    Ok(Json(DefaultsResponse {
        defaults: config_clone.indicator_defaults,
        changes,
    }))
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_state(tag: &str) -> Arc<AppState> {
        let dir = std::env::temp_dir().join(format!("dashboard-api-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        Arc::new(AppState::new(RuntimeConfig::default(), dir.join("dashboard_config.json")))
    }

    async fn send(state: Arc<AppState>, req: Request<Body>) -> (StatusCode, Value) {
        let resp = router(state).oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn two_ticker_frame() -> Value {
        json!({
            "dates": ["2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05"],
            "columns": [
                { "field": "Close", "ticker": "AAPL", "values": [10.0, 11.0, 12.0, 11.0] },
                { "field": "Close", "ticker": "TSLA", "values": [20.0, null, 21.0, 22.0] }
            ]
        })
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, body) = send(test_state("health"), get("/api/v1/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["state_version"], 1);
    }

    #[tokio::test]
    async fn catalog_publishes_bounds_and_defaults() {
        let (status, body) = send(test_state("catalog"), get("/api/v1/catalog")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["tickers"][0]["symbol"], "AAPL");
        assert_eq!(body["methods"][4]["name"], "MACD");
        assert_eq!(body["bounds"]["macd_slow"]["min"], 20);
        assert_eq!(body["defaults"]["ma_window"], 14);
    }

    #[tokio::test]
    async fn layout_ignores_unknown_methods() {
        let (status, body) = send(
            test_state("layout"),
            post("/api/v1/layout", json!({ "methods": ["Close", "MACD", "Volume"] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["rows"], 2);
        assert_eq!(body["row_specs"][1]["y_title"], "MACD value");
    }

    #[tokio::test]
    async fn chart_accepts_display_names() {
        let (status, body) = send(
            test_state("chart-names"),
            post(
                "/api/v1/chart",
                json!({
                    "tickers": ["Apple", "Tesla"],
                    "methods": ["Close"],
                    "frame": two_ticker_frame()
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["traces"][0]["name"], "Close AAPL");
        assert_eq!(body["traces"][1]["name"], "Close TSLA");
        assert!(body["traces"][1]["y"][1].is_null());
    }

    #[tokio::test]
    async fn chart_trims_to_date_window() {
        let (status, body) = send(
            test_state("chart-window"),
            post(
                "/api/v1/chart",
                json!({
                    "tickers": ["AAPL", "TSLA"],
                    "methods": ["Swing"],
                    "frame": two_ticker_frame(),
                    "params": { "swing_shift": 1 },
                    "start": "2024-01-03",
                    "end": "2024-01-04",
                    "theme": "dark"
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["layout"]["template"], "plotly_dark");
        assert_eq!(body["traces"][0]["x"], json!(["2024-01-03", "2024-01-04"]));
    }

    #[tokio::test]
    async fn chart_without_tickers_is_layout_only() {
        let (status, body) = send(
            test_state("chart-empty"),
            post("/api/v1/chart", json!({ "tickers": [], "methods": ["MACD", "Candles"] })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["traces"], json!([]));
        assert_eq!(body["layout"]["rows"], 2);
    }

    #[tokio::test]
    async fn chart_without_methods_skips_the_frame() {
        let (status, body) = send(
            test_state("chart-no-methods"),
            post(
                "/api/v1/chart",
                json!({
                    "tickers": ["AAPL", "TSLA"],
                    "methods": [],
                    "frame": {
                        "dates": ["2024-01-03", "2024-01-02"],
                        "columns": []
                    }
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["traces"], json!([]));
        assert_eq!(body["layout"]["rows"], 1);
        assert_eq!(body["layout"]["row_specs"][0]["y_title"], "Price $");
    }

    #[tokio::test]
    async fn oversized_window_is_served() {
        let (status, body) = send(
            test_state("chart-huge-window"),
            post(
                "/api/v1/chart",
                json!({
                    "tickers": ["AAPL", "TSLA"],
                    "methods": ["RSI", "MA"],
                    "frame": two_ticker_frame(),
                    "params": { "rsi_window": 17592186044416u64, "ma_window": 17592186044416u64 }
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["traces"][0]["name"], "MA AAPL");
        assert_eq!(body["traces"][0]["y"], json!([null, null, null, null]));
        assert_eq!(body["traces"][1]["y"][1], 100.0);
    }

    #[tokio::test]
    async fn invalid_window_is_a_bad_request() {
        let (status, body) = send(
            test_state("chart-bad-param"),
            post(
                "/api/v1/chart",
                json!({
                    "tickers": ["AAPL", "TSLA"],
                    "methods": ["MA"],
                    "frame": two_ticker_frame(),
                    "params": { "ma_window": 0 }
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid MA window: 0 (must be >= 1)");
    }

    #[tokio::test]
    async fn missing_column_is_unprocessable() {
        let (status, body) = send(
            test_state("chart-missing"),
            post(
                "/api/v1/chart",
                json!({
                    "tickers": ["AAPL", "TSLA"],
                    "methods": ["Candles"],
                    "frame": two_ticker_frame()
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "column (Open, AAPL) is not present in the price frame");
    }

    #[tokio::test]
    async fn unordered_dates_are_unprocessable() {
        let (status, _) = send(
            test_state("chart-dates"),
            post(
                "/api/v1/chart",
                json!({
                    "tickers": ["AAPL"],
                    "methods": ["Close"],
                    "frame": {
                        "dates": ["2024-01-03", "2024-01-02"],
                        "columns": [{ "field": "Close", "values": [1.0, 2.0] }]
                    }
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn defaults_update_is_tracked_and_saved() {
        let state = test_state("defaults");
        let (status, body) = send(
            state.clone(),
            post("/api/v1/defaults", json!({ "rsi_window": 21, "ma_window": 14 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["defaults"]["rsi_window"], 21);
        assert_eq!(body["changes"], json!(["rsi_window: 14 -> 21"]));
        assert_eq!(state.current_state_version(), 2);
        assert!(state.config_path.exists());

        let (_, body) = send(state, get("/api/v1/defaults")).await;
        assert_eq!(body["defaults"]["rsi_window"], 21);
        assert_eq!(body["changes"], json!([]));
    }

    #[tokio::test]
    async fn defaults_outside_bounds_are_rejected() {
        let state = test_state("defaults-bounds");
        let (status, body) = send(
            state.clone(),
            post("/api/v1/defaults", json!({ "macd_signal": 30 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "macd_signal = 30 is outside the allowed range [6, 12]");
        assert_eq!(state.runtime_config.read().indicator_defaults.macd_signal, 9);
    }

    #[test]
    fn ticker_resolution_dedupes_in_order() {
        let config = RuntimeConfig::default();
        let requested: Vec<String> = ["Tesla", "aapl", "TSLA", "Apple"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(resolve_tickers(&config, &requested), vec!["TSLA", "AAPL"]);
    }
}
