//! Risk Scorer
//!
//! Turns portfolio metrics into a bounded score, a risk level, alerts and
//! recommendations.

use std::collections::HashSet;

use crate::config::RiskConfig;
use crate::error::{Result, RiskError};
use crate::model::{
    Alert, AlertSeverity, AlertType, PortfolioInput, PortfolioMetrics, RiskAssessment, RiskLevel,
};
use crate::svckit::{compute_metrics, format_percent};

const HIGH_RISK_RECOMMENDATIONS: [&str; 4] = [
    "Consider reducing position sizes in largest holdings",
    "Diversify into different asset classes",
    "Set stop-loss orders for volatile positions",
    "Review and potentially reduce leverage",
];

const MEDIUM_RISK_RECOMMENDATIONS: [&str; 4] = [
    "Monitor portfolio concentration regularly",
    "Consider adding hedging strategies",
    "Review asset allocation monthly",
    "Set price alerts for key positions",
];

const REDUCE_CONCENTRATION: &str = "Diversify portfolio to reduce concentration risk";
const REDUCE_VOLATILITY: &str = "Consider adding less volatile assets to portfolio";
const ADD_POSITIONS: &str = "Consider adding more positions for better diversification";

const EMPTY_PORTFOLIO_ALERT: &str = "Portfolio is empty or has no value";
const EMPTY_PORTFOLIO_RECOMMENDATION: &str = "Start by adding some positions to your portfolio";

/// Scores portfolio metrics against a fixed configuration
#[derive(Clone, Debug, Default)]
pub struct RiskScorer {
    config: RiskConfig,
}

impl RiskScorer {
    pub const fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Fixed assessment for a portfolio with no positions or no value
    pub fn empty_assessment() -> RiskAssessment {
        RiskAssessment {
            score: 0.0,
            level: RiskLevel::Low,
            alerts: vec![Alert::new(
                AlertSeverity::Info,
                AlertType::Info,
                EMPTY_PORTFOLIO_ALERT,
            )],
            recommendations: vec![EMPTY_PORTFOLIO_RECOMMENDATION.to_string()],
            metrics: PortfolioMetrics::zero(),
        }
    }

    /// Assess a portfolio, taking the baseline path when it has no
    /// positions or no value
    pub fn assess(&self, input: &PortfolioInput) -> Result<RiskAssessment> {
        if input.is_empty() {
            return Ok(Self::empty_assessment());
        }

        let metrics = compute_metrics(input.positions(), input.total_value())?;
        self.score_portfolio(&metrics)
    }

    /// Score a non-empty portfolio
    pub fn score_portfolio(&self, metrics: &PortfolioMetrics) -> Result<RiskAssessment> {
        let score = self.score(metrics)?;
        let level = RiskLevel::from_score(score, &self.config.thresholds);

        tracing::debug!(score, %level, ?metrics, "portfolio scored");

        Ok(RiskAssessment {
            score,
            level,
            alerts: self.alerts(metrics, level),
            recommendations: self.recommendations(metrics, level),
            metrics: *metrics,
        })
    }

    /// Weighted sum, position-count adjustment, then clamp
    pub fn score(&self, metrics: &PortfolioMetrics) -> Result<f64> {
        let w = &self.config.scoring;

        let size_term = (metrics.total_value / w.size_divisor).min(w.size_cap);
        let mut base = 100.0
            * (w.concentration * metrics.concentration
                + w.volatility * metrics.weighted_volatility
                + w.max_position * metrics.max_position_ratio
                + size_term);

        if metrics.num_positions > w.diversified_above {
            base *= w.diversification_discount;
        } else if metrics.num_positions < w.concentrated_below {
            base *= w.concentration_penalty;
        }

        if !base.is_finite() {
            return Err(RiskError::ComputationFailure(format!(
                "non-finite risk score from metrics {metrics:?}"
            )));
        }

        Ok(base.clamp(0.0, w.max_score))
    }

    /// Alerts in order: overall risk, concentration, volatility, diversification
    pub fn alerts(&self, metrics: &PortfolioMetrics, level: RiskLevel) -> Vec<Alert> {
        let t = &self.config.alerts;
        let mut alerts = Vec::new();

        match level {
            RiskLevel::High => alerts.push(Alert::new(
                AlertSeverity::High,
                AlertType::OverallRisk,
                "Portfolio has high overall risk",
            )),
            RiskLevel::Medium | RiskLevel::Low => {}
        }

        let concentration = metrics.concentration;
        if concentration > t.concentration_high {
            alerts.push(
                Alert::new(
                    AlertSeverity::High,
                    AlertType::Concentration,
                    format!("Very high concentration: {}", format_percent(concentration, 1)),
                )
                .with_metric("concentration", concentration),
            );
        } else if concentration > t.concentration_medium {
            alerts.push(
                Alert::new(
                    AlertSeverity::Medium,
                    AlertType::Concentration,
                    format!("High concentration: {}", format_percent(concentration, 1)),
                )
                .with_metric("concentration", concentration),
            );
        }

        let volatility = metrics.weighted_volatility;
        if volatility > t.volatility_high {
            alerts.push(
                Alert::new(
                    AlertSeverity::High,
                    AlertType::Volatility,
                    format!("High volatility: {}", format_percent(volatility, 1)),
                )
                .with_metric("weighted_volatility", volatility),
            );
        } else if volatility > t.volatility_medium {
            alerts.push(
                Alert::new(
                    AlertSeverity::Medium,
                    AlertType::Volatility,
                    format!("Moderate volatility: {}", format_percent(volatility, 1)),
                )
                .with_metric("weighted_volatility", volatility),
            );
        }

        if metrics.num_positions < t.min_positions_alert {
            #[allow(clippy::cast_precision_loss)]
            let count = metrics.num_positions as f64;
            alerts.push(
                Alert::new(
                    AlertSeverity::Medium,
                    AlertType::Diversification,
                    format!("Low diversification: only {} positions", metrics.num_positions),
                )
                .with_metric("num_positions", count),
            );
        }

        alerts
    }

    /// Level-driven advice followed by metric-driven advice, deduplicated
    pub fn recommendations(&self, metrics: &PortfolioMetrics, level: RiskLevel) -> Vec<String> {
        let t = &self.config.alerts;
        let mut recommendations: Vec<&str> = match level {
            RiskLevel::High => HIGH_RISK_RECOMMENDATIONS.to_vec(),
            RiskLevel::Medium => MEDIUM_RISK_RECOMMENDATIONS.to_vec(),
            RiskLevel::Low => Vec::new(),
        };

        if metrics.concentration > t.concentration_recommendation {
            recommendations.push(REDUCE_CONCENTRATION);
        }
        if metrics.weighted_volatility > t.volatility_recommendation {
            recommendations.push(REDUCE_VOLATILITY);
        }
        if metrics.num_positions < t.min_positions_recommendation {
            recommendations.push(ADD_POSITIONS);
        }

        dedup_preserving_order(recommendations)
    }
}

fn dedup_preserving_order(items: Vec<&str>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(*item))
        .map(str::to_string)
        .collect()
}
