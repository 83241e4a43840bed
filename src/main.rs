// =============================================================================
// Stock Analysis Helper - Main Entry Point
// =============================================================================
//
// Serves the chart API.  Price frames are supplied by the caller; the service
// only computes indicators, plans the subplot layout and assembles traces.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod api;
mod app_state;
mod catalog;
mod chart;
mod indicators;
mod layout;
mod market_data;
mod runtime_config;
mod types;

use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::app_state::{AppState, DEFAULT_CONFIG_PATH};
use crate::runtime_config::{parse_ticker_list, RuntimeConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║        Stock Analysis Helper - Starting Up               ║");
    info!("╚══════════════════════════════════════════════════════════╝");

    let mut config = RuntimeConfig::load(DEFAULT_CONFIG_PATH).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        RuntimeConfig::default()
    });

    if let Ok(addr) = std::env::var("DASHBOARD_BIND_ADDR") {
        config.bind_addr = addr;
    }

    // Override the ticker catalog from env if available.
    if let Ok(raw) = std::env::var("DASHBOARD_TICKERS") {
        let tickers = parse_ticker_list(&raw);
        if tickers.is_empty() {
            warn!(value = %raw, "DASHBOARD_TICKERS has no usable entries, keeping catalog");
        } else {
            config.tickers = tickers;
        }
    }

    info!(
        tickers = ?config.tickers.iter().map(|t| t.symbol.as_str()).collect::<Vec<_>>(),
        "Ticker catalog"
    );
    info!(defaults = ?config.indicator_defaults, "Indicator defaults");

    // ── 2. Build shared state ────────────────────────────────────────────
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState::new(config, DEFAULT_CONFIG_PATH));

    // ── 3. Start the API server ──────────────────────────────────────────
    let app = api::router(state.clone());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "API server listening. Press Ctrl+C to stop.");

    // ── 4. Graceful shutdown ─────────────────────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for shutdown signal");
            }
            warn!("Shutdown signal received - stopping gracefully");
        })
        .await?;

    if let Err(e) = state.runtime_config.read().save(&state.config_path) {
        error!(error = %e, "Failed to save runtime config on shutdown");
    }

    info!("Stock Analysis Helper shut down complete.");
    Ok(())
}
