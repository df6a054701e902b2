//! HTTP Handlers

use axum::{Json, extract::State, http::StatusCode};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use risk_engine::{
    PortfolioAnalysis, PortfolioAnalysisRequest, PortfolioAnomalyReport, RiskError, TradeAnalysis,
    TradeAnalysisRequest, TradingAnomalyReport,
};

use crate::fixtures;
use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: DateTime<Utc>,
    pub service: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub detail: String,
    pub error_type: String,
    pub timestamp: DateTime<Utc>,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map an engine error onto a status and body; server-side failures get
/// an opaque `fallback` message. The service has already logged it.
fn api_error(err: &RiskError, fallback: &str) -> ApiError {
    let (status, detail) = if err.is_client_error() {
        (StatusCode::BAD_REQUEST, err.user_message())
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, fallback.to_string())
    };

    (
        status,
        Json(ErrorResponse {
            detail,
            error_type: err.code().into(),
            timestamp: Utc::now(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Basic health check
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: Utc::now(),
        service: state.config.service_name.clone(),
    })
}

/// Health check with runtime details
pub async fn detailed_health_check(State(state): State<AppState>) -> Json<Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
        "version": env!("CARGO_PKG_VERSION"),
        "environment": state.config.environment,
        "timestamp": Utc::now(),
        "uptime_seconds": state.started_at.elapsed().as_secs(),
        "risk_thresholds": state.service.config().thresholds,
        "dependencies": {
            "risk_engine": "operational",
            "anomaly_detector": "operational",
            "database": "not_configured"
        }
    }))
}

/// Analyze portfolio risk and generate recommendations
pub async fn analyze_portfolio(
    State(state): State<AppState>,
    Json(payload): Json<PortfolioAnalysisRequest>,
) -> Result<Json<PortfolioAnalysis>, ApiError> {
    state
        .service
        .analyze_portfolio(&payload)
        .map(Json)
        .map_err(|e| api_error(&e, "Internal server error during portfolio analysis"))
}

/// Example portfolios for testing and demonstration
pub async fn portfolio_examples() -> Json<Value> {
    Json(fixtures::portfolio_examples())
}

/// Analyze individual trade risk
pub async fn analyze_trade(
    State(state): State<AppState>,
    Json(payload): Json<TradeAnalysisRequest>,
) -> Result<Json<TradeAnalysis>, ApiError> {
    state
        .service
        .analyze_trade(&payload)
        .map(Json)
        .map_err(|e| api_error(&e, "Internal server error during trade analysis"))
}

/// Portfolio value spike check
pub async fn portfolio_anomalies(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Json<PortfolioAnomalyReport> {
    Json(state.anomaly.detect_portfolio_anomalies(&payload))
}

/// Trade size outlier check
pub async fn trading_anomalies(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Json<TradingAnomalyReport> {
    Json(state.anomaly.detect_trading_anomalies(&payload))
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Request, StatusCode},
    };
    use axum::Json;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use risk_engine::{AnomalyType, RiskConfig, RiskError, TradingAnomalyReport};

    use super::api_error;

    use crate::config::ServerConfig;
    use crate::routes::router;
    use crate::state::AppState;

    fn app() -> Router {
        router(AppState::new(RiskConfig::default(), ServerConfig::default()))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (status, body) = send(app(), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "risk-ai");
    }

    #[tokio::test]
    async fn test_detailed_health_check() {
        let (status, body) = send(app(), get("/health/detailed")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["dependencies"]["risk_engine"], "operational");
        assert_eq!(body["environment"], "development");
    }

    #[tokio::test]
    async fn test_portfolio_analysis() {
        let payload = json!({
            "wallet": "test_wallet_123",
            "positions": [
                {"symbol": "SOL", "amount": 10.0, "value_usd": 2000.0, "volatility": 0.25},
                {"symbol": "USDC", "amount": 1000.0, "value_usd": 1000.0, "volatility": 0.01}
            ],
            "total_value": 3000.0,
            "leverage_ratio": 1.0
        });
        let (status, body) = send(app(), post("/analyze/portfolio", &payload)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["wallet"], "test_wallet_123");
        assert_eq!(body["risk_level"], "medium");
        assert_eq!(body["metrics"]["num_positions"], 2);
        assert!(body["analysis_timestamp"].is_string());

        let types: Vec<&str> = body["alerts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["type"].as_str().unwrap())
            .collect();
        assert_eq!(types, vec!["concentration", "volatility", "diversification"]);
    }

    #[tokio::test]
    async fn test_empty_positions_returns_baseline() {
        let payload = json!({
            "wallet": "empty_wallet",
            "positions": [],
            "total_value": 100.0,
            "leverage_ratio": 1.0
        });
        let (status, body) = send(app(), post("/analyze/portfolio", &payload)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["risk_score"], 0.0);
        assert_eq!(body["risk_level"], "low");
        assert_eq!(body["alerts"][0]["severity"], "info");
    }

    #[tokio::test]
    async fn test_invalid_total_value_is_bad_request() {
        let payload = json!({
            "wallet": "w",
            "positions": [{"mint": "SOL", "amount": 1.0, "value_usd": 10.0}],
            "total_value": 0.0,
            "leverage_ratio": 1.0
        });
        let (status, body) = send(app(), post("/analyze/portfolio", &payload)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error_type"], "invalid_input");
        assert!(body["detail"].as_str().unwrap().contains("total_value"));
    }

    #[tokio::test]
    async fn test_missing_field_is_rejected() {
        let payload = json!({"wallet": "w", "positions": []});
        let (status, _) = send(app(), post("/analyze/portfolio", &payload)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_examples_are_analyzable() {
        let (status, examples) = send(app(), get("/analyze/portfolio/examples")).await;
        assert_eq!(status, StatusCode::OK);

        for key in ["balanced_portfolio", "concentrated_portfolio"] {
            let (status, body) = send(app(), post("/analyze/portfolio", &examples[key])).await;
            assert_eq!(status, StatusCode::OK, "{key}");
            assert_eq!(body["wallet"], examples[key]["wallet"]);
        }
    }

    #[tokio::test]
    async fn test_trade_analysis() {
        let payload = json!({
            "wallet": "test_wallet_123",
            "input_token": "SOL",
            "output_token": "USDC",
            "amount": 2.5,
            "trade_size_usd": 15000.0
        });
        let (status, body) = send(app(), post("/analyze/trade", &payload)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["trade_risk_score"], 100.0);
        assert_eq!(body["suggested_slippage"], "1.000%");
        assert_eq!(body["alerts"][0]["severity"], "high");
        assert_eq!(body["recommendations"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_anomaly_endpoints() {
        let payload = json!({
            "current": {"total_value": 1140},
            "historical": [
                {"total_value": 1000}, {"total_value": 1010}, {"total_value": 1020}
            ]
        });
        let (status, body) = send(app(), post("/analyze/anomaly/portfolio", &payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_anomaly"], true);

        let payload = json!({"trade_size_usd": 200.0, "avg_trade_size": "n/a"});
        let (status, body) = send(app(), post("/analyze/anomaly/trade", &payload)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["is_anomaly"], false);
        assert_eq!(body["anomaly_type"], "normal");
    }

    #[tokio::test]
    async fn test_trade_anomaly_report_decodes() {
        let payload = json!({"trade_size_usd": 6000.0, "avg_trade_size": 1000.0});
        let (status, body) = send(app(), post("/analyze/anomaly/trade", &payload)).await;
        assert_eq!(status, StatusCode::OK);

        let report: TradingAnomalyReport = serde_json::from_value(body).unwrap();
        assert!(report.is_anomaly);
        assert_eq!(report.anomaly_type, Some(AnomalyType::LargeTrade));
    }

    #[test]
    fn test_api_error_mapping() {
        let (status, Json(body)) = api_error(
            &RiskError::InvalidInput("total_value must be > 0, got 0".into()),
            "fallback",
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.detail, "total_value must be > 0, got 0");
        assert_eq!(body.error_type, "invalid_input");

        let (status, Json(body)) = api_error(
            &RiskError::ComputationFailure("score was NaN".into()),
            "Internal server error during portfolio analysis",
        );
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.detail, "Internal server error during portfolio analysis");
        assert_eq!(body.error_type, "computation_failure");
    }
}
