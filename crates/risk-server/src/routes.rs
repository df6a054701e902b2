//! Router

use axum::{Router, routing::{get, post}};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{
    analyze_portfolio, analyze_trade, detailed_health_check, health_check, portfolio_anomalies,
    portfolio_examples, trading_anomalies,
};
use crate::state::AppState;

/// All routes, without middleware
pub fn router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/health", get(health_check))
        .route("/health/detailed", get(detailed_health_check))

        // Analysis
        .route("/analyze/portfolio", post(analyze_portfolio))
        .route("/analyze/portfolio/examples", get(portfolio_examples))
        .route("/analyze/trade", post(analyze_trade))

        // Anomaly helpers
        .route("/analyze/anomaly/portfolio", post(portfolio_anomalies))
        .route("/analyze/anomaly/trade", post(trading_anomalies))

        .with_state(state)
}

/// Router with the tracing and CORS stack applied
pub fn app(state: AppState, cors: CorsLayer) -> Router {
    router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    )
}
