//! risk-ai HTTP Server
//!
//! Axum-based server exposing portfolio and trade risk analysis backed by
//! the `risk-engine` crate.

mod config;
mod fixtures;
mod handlers;
mod routes;
mod state;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use risk_engine::RiskConfig;

use crate::config::ServerConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment
    dotenvy::dotenv().ok();

    let config = ServerConfig::from_env();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.log_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let risk = RiskConfig::from_env().context("invalid risk configuration")?;
    tracing::info!(
        high = risk.thresholds.high,
        medium = risk.thresholds.medium,
        "✓ Risk thresholds loaded"
    );

    let cors = config.cors_layer()?;
    let addr = config.bind_addr.clone();
    let environment = config.environment.clone();

    let app = routes::app(AppState::new(risk, config), cors);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 risk-ai server running on http://{}", addr);
    tracing::info!("   Environment: {}", environment);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                     - Health check");
    tracing::info!("  GET  /health/detailed            - Health with runtime details");
    tracing::info!("  POST /analyze/portfolio          - Portfolio risk analysis");
    tracing::info!("  GET  /analyze/portfolio/examples - Example payloads");
    tracing::info!("  POST /analyze/trade              - Trade risk analysis");
    tracing::info!("  POST /analyze/anomaly/portfolio  - Portfolio value anomaly check");
    tracing::info!("  POST /analyze/anomaly/trade      - Trade size anomaly check");
    tracing::info!("");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("🛑 risk-ai server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
