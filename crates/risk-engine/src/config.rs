//! Risk Configuration
//!
//! Thresholds and tuning constants for every scoring path. Nothing here is
//! global: a [`RiskConfig`] is built once and handed to the scorers.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RiskError};

/// Score cut-offs for the risk level mapping
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// Scores at or above this are `high`
    pub high: f64,

    /// Scores at or above this (and below `high`) are `medium`
    pub medium: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            high: 70.0,
            medium: 40.0,
        }
    }
}

impl RiskThresholds {
    pub fn new(high: f64, medium: f64) -> Result<Self> {
        let thresholds = Self { high, medium };
        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.high.is_finite() || !self.medium.is_finite() {
            return Err(RiskError::Config("risk thresholds must be finite".into()));
        }
        if !(0.0..=100.0).contains(&self.medium) || !(0.0..=100.0).contains(&self.high) {
            return Err(RiskError::Config(format!(
                "risk thresholds must lie in [0, 100], got high={} medium={}",
                self.high, self.medium
            )));
        }
        if self.medium > self.high {
            return Err(RiskError::Config(format!(
                "medium threshold {} exceeds high threshold {}",
                self.medium, self.high
            )));
        }
        Ok(())
    }
}

/// Weights and multipliers of the portfolio score formula
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub concentration: f64,
    pub volatility: f64,
    pub max_position: f64,

    /// Total value is divided by this before capping
    pub size_divisor: f64,

    /// Cap on the size term
    pub size_cap: f64,

    /// More positions than this earns the discount
    pub diversified_above: usize,
    pub diversification_discount: f64,

    /// Fewer positions than this incurs the penalty
    pub concentrated_below: usize,
    pub concentration_penalty: f64,

    pub max_score: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            concentration: 0.4,
            volatility: 0.3,
            max_position: 0.2,
            size_divisor: 100_000.0,
            size_cap: 0.1,
            diversified_above: 5,
            diversification_discount: 0.9,
            concentrated_below: 2,
            concentration_penalty: 1.2,
            max_score: 100.0,
        }
    }
}

/// Metric cut-offs for alerts and recommendations
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlertThresholds {
    pub concentration_high: f64,
    pub concentration_medium: f64,
    pub volatility_high: f64,
    pub volatility_medium: f64,

    /// Fewer positions than this raises a diversification alert
    pub min_positions_alert: usize,

    pub concentration_recommendation: f64,
    pub volatility_recommendation: f64,

    /// Fewer positions than this suggests adding more
    pub min_positions_recommendation: usize,
}

impl Default for AlertThresholds {
    fn default() -> Self {
        Self {
            concentration_high: 0.7,
            concentration_medium: 0.5,
            volatility_high: 0.3,
            volatility_medium: 0.15,
            min_positions_alert: 3,
            concentration_recommendation: 0.5,
            volatility_recommendation: 0.2,
            min_positions_recommendation: 4,
        }
    }
}

/// Constants of the single-trade path
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TradeConstants {
    /// Trade size (USD) that maps to a size risk of 1.0
    pub reference_size_usd: f64,
    pub high_size_risk: f64,
    pub medium_size_risk: f64,
    pub min_slippage: f64,
    pub slippage_per_size_risk: f64,
}

impl Default for TradeConstants {
    fn default() -> Self {
        Self {
            reference_size_usd: 10_000.0,
            high_size_risk: 0.7,
            medium_size_risk: 0.3,
            min_slippage: 0.001,
            slippage_per_size_risk: 0.01,
        }
    }
}

/// Constants of the anomaly helpers
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AnomalyConstants {
    /// Trailing historical snapshots considered
    pub window: usize,
    pub min_history: usize,

    /// Latest change must exceed this multiple of the mean prior change
    pub spike_multiplier: f64,

    pub trade_ratio_threshold: f64,
    pub trade_score_divisor: f64,
    pub default_avg_trade_size: f64,
}

impl Default for AnomalyConstants {
    fn default() -> Self {
        Self {
            window: 5,
            min_history: 2,
            spike_multiplier: 3.0,
            trade_ratio_threshold: 5.0,
            trade_score_divisor: 10.0,
            default_avg_trade_size: 1000.0,
        }
    }
}

/// Full engine configuration
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskConfig {
    pub thresholds: RiskThresholds,
    pub scoring: ScoringWeights,
    pub alerts: AlertThresholds,
    pub trade: TradeConstants,
    pub anomaly: AnomalyConstants,
}

impl RiskConfig {
    /// Create from environment variables
    ///
    /// Reads `HIGH_RISK_THRESHOLD` and `MEDIUM_RISK_THRESHOLD`; everything
    /// else keeps its default.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = RiskThresholds::default();
        let high = parse_f64(
            "HIGH_RISK_THRESHOLD",
            lookup("HIGH_RISK_THRESHOLD").as_deref(),
            defaults.high,
        )?;
        let medium = parse_f64(
            "MEDIUM_RISK_THRESHOLD",
            lookup("MEDIUM_RISK_THRESHOLD").as_deref(),
            defaults.medium,
        )?;

        let config = Self {
            thresholds: RiskThresholds { high, medium },
            ..Default::default()
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_thresholds(mut self, thresholds: RiskThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.thresholds.validate()?;
        if self.scoring.size_divisor <= 0.0 {
            return Err(RiskError::Config("size_divisor must be > 0".into()));
        }
        if self.trade.reference_size_usd <= 0.0 {
            return Err(RiskError::Config("reference_size_usd must be > 0".into()));
        }
        if self.anomaly.trade_score_divisor <= 0.0 {
            return Err(RiskError::Config("trade_score_divisor must be > 0".into()));
        }
        Ok(())
    }
}

fn parse_f64(key: &str, raw: Option<&str>, default: f64) -> Result<f64> {
    match raw {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| RiskError::Config(format!("{key} is not a number: {raw:?}"))),
        None => Ok(default),
    }
}
