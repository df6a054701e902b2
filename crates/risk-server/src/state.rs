//! Application State

use std::sync::Arc;
use std::time::Instant;

use risk_engine::{AnomalyDetector, RiskConfig, RiskService};

use crate::config::ServerConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Portfolio and trade scoring
    pub service: Arc<RiskService>,

    /// Auxiliary anomaly checks
    pub anomaly: Arc<AnomalyDetector>,

    pub config: Arc<ServerConfig>,

    pub started_at: Instant,
}

impl AppState {
    pub fn new(risk: RiskConfig, config: ServerConfig) -> Self {
        Self {
            service: Arc::new(RiskService::new(risk)),
            anomaly: Arc::new(AnomalyDetector::new(risk.anomaly)),
            config: Arc::new(config),
            started_at: Instant::now(),
        }
    }
}
