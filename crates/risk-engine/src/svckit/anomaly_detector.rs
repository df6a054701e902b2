//! Anomaly Detector
//!
//! Statistical threshold checks on portfolio value history and trade size.
//! Payload fields are read leniently: anything missing or mistyped takes its
//! zero/default value, and a check that cannot be computed reports an error
//! instead of failing the request.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::AnomalyConstants;

/// Outcome of the portfolio value check
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortfolioAnomalyReport {
    pub is_anomaly: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_anomaly: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_value: Option<f64>,

    /// Latest absolute change over the mean prior absolute change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_change_ratio: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PortfolioAnomalyReport {
    fn insufficient_data() -> Self {
        Self {
            is_anomaly: false,
            value_anomaly: None,
            current_value: None,
            value_change_ratio: None,
            reason: Some("Insufficient historical data".into()),
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            reason: None,
            error: Some(error.into()),
            ..Self::insufficient_data()
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyType {
    LargeTrade,
    Normal,
}

/// Outcome of the trade size check
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TradingAnomalyReport {
    pub is_anomaly: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anomaly_score: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anomaly_type: Option<AnomalyType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trade_size_ratio: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct AnomalyDetector {
    constants: AnomalyConstants,
}

impl AnomalyDetector {
    pub const fn new(constants: AnomalyConstants) -> Self {
        Self { constants }
    }

    /// Check `{"current": {"total_value"}, "historical": [{"total_value"}, ...]}`
    pub fn detect_portfolio_anomalies(&self, payload: &Value) -> PortfolioAnomalyReport {
        let current = payload
            .get("current")
            .map_or(0.0, |c| number_or(c.get("total_value"), 0.0));

        let historical: Vec<f64> = payload
            .get("historical")
            .and_then(Value::as_array)
            .map(|entries| {
                entries
                    .iter()
                    .map(|h| number_or(h.get("total_value"), 0.0))
                    .collect()
            })
            .unwrap_or_default();

        self.portfolio_value_anomaly(&historical, current)
    }

    /// Flag the latest change when it dwarfs the trailing mean change
    #[allow(clippy::cast_precision_loss)]
    pub fn portfolio_value_anomaly(&self, historical: &[f64], current: f64) -> PortfolioAnomalyReport {
        let c = &self.constants;
        if historical.len() < c.min_history {
            return PortfolioAnomalyReport::insufficient_data();
        }

        let start = historical.len().saturating_sub(c.window);
        let mut series: Vec<f64> = historical[start..].to_vec();
        series.push(current);

        let changes: Vec<f64> = series.windows(2).map(|w| (w[1] - w[0]).abs()).collect();
        let Some((&current_change, prior)) = changes.split_last() else {
            return PortfolioAnomalyReport::insufficient_data();
        };
        if prior.is_empty() {
            return PortfolioAnomalyReport::insufficient_data();
        }
        let avg_change = prior.iter().sum::<f64>() / prior.len() as f64;

        if !avg_change.is_finite() || !current_change.is_finite() {
            tracing::warn!(avg_change, current_change, "portfolio anomaly check hit non-finite change");
            return PortfolioAnomalyReport::failed("non-finite portfolio value change");
        }

        let (is_anomaly, ratio) = if avg_change > 0.0 {
            (
                current_change > avg_change * c.spike_multiplier,
                current_change / avg_change,
            )
        } else {
            (false, 0.0)
        };

        PortfolioAnomalyReport {
            is_anomaly,
            value_anomaly: Some(is_anomaly),
            current_value: Some(current),
            value_change_ratio: Some(ratio),
            reason: None,
            error: None,
        }
    }

    /// Check `{"trade_size_usd", "avg_trade_size"}`
    pub fn detect_trading_anomalies(&self, payload: &Value) -> TradingAnomalyReport {
        let avg = number_or(payload.get("avg_trade_size"), self.constants.default_avg_trade_size);
        let size = number_or(payload.get("trade_size_usd"), 0.0);
        self.trading_anomaly(size, avg)
    }

    pub fn trading_anomaly(&self, trade_size_usd: f64, avg_trade_size: f64) -> TradingAnomalyReport {
        let c = &self.constants;
        let ratio = trade_size_usd / avg_trade_size.max(1.0);

        if !ratio.is_finite() {
            tracing::warn!(trade_size_usd, avg_trade_size, "trading anomaly check hit non-finite ratio");
            return TradingAnomalyReport {
                is_anomaly: false,
                anomaly_score: None,
                anomaly_type: None,
                trade_size_ratio: None,
                error: Some("non-finite trade size ratio".into()),
            };
        }

        let is_anomaly = ratio > c.trade_ratio_threshold;
        TradingAnomalyReport {
            is_anomaly,
            anomaly_score: Some((ratio / c.trade_score_divisor).min(1.0)),
            anomaly_type: Some(if is_anomaly {
                AnomalyType::LargeTrade
            } else {
                AnomalyType::Normal
            }),
            trade_size_ratio: Some(ratio),
            error: None,
        }
    }
}

fn number_or(value: Option<&Value>, default: f64) -> f64 {
    value.and_then(Value::as_f64).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_insufficient_history() {
        let detector = AnomalyDetector::default();
        let report = detector.detect_portfolio_anomalies(&json!({
            "current": {"total_value": 1000},
            "historical": [{"total_value": 900}]
        }));
        assert!(!report.is_anomaly);
        assert_eq!(report.reason.as_deref(), Some("Insufficient historical data"));
    }

    #[test]
    fn test_spike_detected() {
        // changes: 10, 10, 10, 10, then 100
        let report = AnomalyDetector::default()
            .portfolio_value_anomaly(&[1000.0, 1010.0, 1020.0, 1030.0, 1040.0], 1140.0);
        assert!(report.is_anomaly);
        assert_eq!(report.value_anomaly, Some(true));
        assert!((report.value_change_ratio.unwrap() - 10.0).abs() < EPS);
        assert_eq!(report.current_value, Some(1140.0));
    }

    #[test]
    fn test_steady_history_not_anomalous() {
        let report = AnomalyDetector::default()
            .portfolio_value_anomaly(&[1000.0, 1010.0, 995.0], 1005.0);
        assert!(!report.is_anomaly);
        assert!(report.reason.is_none());
    }

    #[test]
    fn test_only_trailing_window_used() {
        // The 1_000_000 jump falls outside the last five snapshots.
        let history = [0.0, 1_000_000.0, 1_000_010.0, 1_000_020.0, 1_000_030.0, 1_000_040.0];
        let report = AnomalyDetector::default().portfolio_value_anomaly(&history, 1_000_050.0);
        assert!(!report.is_anomaly);
        assert!((report.value_change_ratio.unwrap() - 1.0).abs() < EPS);
    }

    #[test]
    fn test_flat_history_reports_zero_ratio() {
        let report = AnomalyDetector::default().portfolio_value_anomaly(&[500.0, 500.0], 9000.0);
        assert!(!report.is_anomaly);
        assert_eq!(report.value_change_ratio, Some(0.0));
    }

    #[test]
    fn test_malformed_fields_default_to_zero() {
        let report = AnomalyDetector::default().detect_portfolio_anomalies(&json!({
            "current": {"total_value": "lots"},
            "historical": [{"total_value": 100}, {}, {"total_value": null}]
        }));
        // series 100, 0, 0, 0 -> prior changes 100, 0; latest 0
        assert!(!report.is_anomaly);
        assert_eq!(report.current_value, Some(0.0));
    }

    #[test]
    fn test_overflowing_values_reported_as_error() {
        let report = AnomalyDetector::default()
            .portfolio_value_anomaly(&[f64::MAX, -f64::MAX], 0.0);
        assert!(!report.is_anomaly);
        assert!(report.error.is_some());
    }

    #[test]
    fn test_large_trade_anomaly() {
        let report = AnomalyDetector::default().detect_trading_anomalies(&json!({
            "trade_size_usd": 6000.0,
            "avg_trade_size": 1000.0
        }));
        assert!(report.is_anomaly);
        assert_eq!(report.anomaly_type, Some(AnomalyType::LargeTrade));
        assert!((report.anomaly_score.unwrap() - 0.6).abs() < EPS);
        assert!((report.trade_size_ratio.unwrap() - 6.0).abs() < EPS);
    }

    #[test]
    fn test_trade_defaults() {
        let report = AnomalyDetector::default().detect_trading_anomalies(&json!({}));
        assert!(!report.is_anomaly);
        assert_eq!(report.anomaly_type, Some(AnomalyType::Normal));
        assert_eq!(report.trade_size_ratio, Some(0.0));

        // avg defaults to 1000 when missing
        let report = AnomalyDetector::default()
            .detect_trading_anomalies(&json!({"trade_size_usd": 5000.0}));
        assert!(!report.is_anomaly);
    }

    #[test]
    fn test_trade_score_capped_and_avg_floored() {
        let report = AnomalyDetector::default().trading_anomaly(50.0, 0.0);
        assert!((report.trade_size_ratio.unwrap() - 50.0).abs() < EPS);
        assert!((report.anomaly_score.unwrap() - 1.0).abs() < EPS);
    }
}
