//! Service Kit - Scoring Components
//!
//! Pure calculators behind the risk service. None of them hold state
//! beyond their configuration.

mod metrics_calculator;
mod risk_scorer;
mod trade_scorer;
mod anomaly_detector;

pub use metrics_calculator::compute_metrics;
pub use risk_scorer::RiskScorer;
pub use trade_scorer::TradeScorer;
pub use anomaly_detector::{
    AnomalyDetector, AnomalyType, PortfolioAnomalyReport, TradingAnomalyReport,
};

/// Format a ratio as a percentage, e.g. `0.5556` with one decimal is `"55.6%"`
pub fn format_percent(ratio: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, ratio * 100.0)
}
