//! Domain Models
//!
//! Request, metric and assessment records for portfolio and trade risk
//! analysis. Every record is built fresh per request and never mutated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::RiskThresholds;
use crate::error::{Result, RiskError};

/// Volatility assumed for a position that does not carry one
pub const DEFAULT_VOLATILITY: f64 = 0.02;

/// Daily volume assumed for a trade that does not carry one
pub const DEFAULT_DAILY_VOLUME: f64 = 1_000_000.0;

const fn default_volatility() -> f64 {
    DEFAULT_VOLATILITY
}

#[allow(clippy::unnecessary_wraps)]
const fn default_daily_volume() -> Option<f64> {
    Some(DEFAULT_DAILY_VOLUME)
}

/// A single holding
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Token mint or symbol (e.g., "SOL", "USDC")
    #[serde(rename = "mint", alias = "symbol")]
    pub identifier: String,

    /// Quantity held
    pub amount: f64,

    /// Current USD value of the holding
    pub value_usd: f64,

    /// Dimensionless risk factor, conventionally in [0, 1]
    #[serde(default = "default_volatility")]
    pub volatility: f64,
}

impl Position {
    pub fn new(identifier: impl Into<String>, amount: f64, value_usd: f64) -> Self {
        Self {
            identifier: identifier.into(),
            amount,
            value_usd,
            volatility: DEFAULT_VOLATILITY,
        }
    }

    pub fn with_volatility(mut self, volatility: f64) -> Self {
        self.volatility = volatility;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.identifier.trim().is_empty() {
            return Err(RiskError::InvalidInput("position identifier must not be empty".into()));
        }
        if !self.value_usd.is_finite() || self.value_usd < 0.0 {
            return Err(RiskError::InvalidInput(format!(
                "position {} value_usd must be a finite number >= 0",
                self.identifier
            )));
        }
        if !self.amount.is_finite() {
            return Err(RiskError::InvalidInput(format!(
                "position {} amount must be finite",
                self.identifier
            )));
        }
        if !self.volatility.is_finite() {
            return Err(RiskError::InvalidInput(format!(
                "position {} volatility must be finite",
                self.identifier
            )));
        }
        Ok(())
    }
}

/// Positions plus the caller's total value
#[derive(Clone, Debug, PartialEq)]
pub struct PortfolioInput {
    positions: Vec<Position>,
    total_value: f64,
}

impl PortfolioInput {
    /// Rejects a negative or non-finite total; zero is allowed and marks
    /// the portfolio as empty.
    pub fn new(positions: Vec<Position>, total_value: f64) -> Result<Self> {
        if !total_value.is_finite() || total_value < 0.0 {
            return Err(RiskError::InvalidInput(format!(
                "total_value must be a finite number >= 0, got {total_value}"
            )));
        }
        Ok(Self {
            positions,
            total_value,
        })
    }

    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub const fn total_value(&self) -> f64 {
        self.total_value
    }

    /// No value or no positions: scored by the degenerate path
    pub fn is_empty(&self) -> bool {
        self.total_value == 0.0 || self.positions.is_empty()
    }
}

/// Portfolio-level metrics derived from the positions
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PortfolioMetrics {
    /// Sum of squared position weights (Herfindahl index)
    pub concentration: f64,

    /// Value-weighted average volatility
    pub weighted_volatility: f64,

    /// Unweighted average volatility
    pub avg_volatility: f64,

    pub num_positions: usize,

    /// Largest single position weight
    pub max_position_ratio: f64,

    /// `1 - concentration`
    pub diversity_score: f64,

    pub total_value: f64,
}

impl PortfolioMetrics {
    /// All-zero record reported for an empty portfolio
    pub fn zero() -> Self {
        Self::default()
    }
}

/// Categorical risk level
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn from_score(score: f64, thresholds: &RiskThresholds) -> Self {
        if score >= thresholds.high {
            Self::High
        } else if score >= thresholds.medium {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Alert severity
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    Info,
    Low,
    Medium,
    High,
}

/// Coarse alert category
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    OverallRisk,
    Concentration,
    Volatility,
    Diversification,
    TradeSize,
    Info,
}

/// A single flagged condition
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub severity: AlertSeverity,

    pub message: String,

    #[serde(rename = "type")]
    pub kind: AlertType,

    /// Name of the metric that triggered the alert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,

    /// Value of that metric
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

impl Alert {
    pub fn new(severity: AlertSeverity, kind: AlertType, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            kind,
            metric: None,
            value: None,
        }
    }

    pub fn with_metric(mut self, metric: impl Into<String>, value: f64) -> Self {
        self.metric = Some(metric.into());
        self.value = Some(value);
        self
    }
}

/// Result of scoring a portfolio
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub score: f64,
    pub level: RiskLevel,
    pub alerts: Vec<Alert>,
    pub recommendations: Vec<String>,
    pub metrics: PortfolioMetrics,
}

/// Result of scoring a single trade
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TradeAssessment {
    pub trade_risk_score: f64,

    /// Trade size normalized against the reference size, at most 1.0
    pub size_risk: f64,

    pub alerts: Vec<Alert>,

    /// e.g. "0.500%"
    pub suggested_slippage: String,

    pub recommendations: Vec<String>,
}

/// Portfolio analysis request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortfolioAnalysisRequest {
    /// Wallet address to analyze
    pub wallet: String,

    pub positions: Vec<Position>,

    /// Total portfolio value in USD
    pub total_value: f64,

    /// Portfolio leverage ratio; carried through, not scored
    pub leverage_ratio: f64,
}

impl PortfolioAnalysisRequest {
    pub fn validate(&self) -> Result<()> {
        if self.wallet.trim().is_empty() {
            return Err(RiskError::InvalidInput("wallet must not be empty".into()));
        }
        if !self.total_value.is_finite() || self.total_value <= 0.0 {
            return Err(RiskError::InvalidInput(format!(
                "total_value must be > 0, got {}",
                self.total_value
            )));
        }
        if !self.leverage_ratio.is_finite() || self.leverage_ratio <= 0.0 {
            return Err(RiskError::InvalidInput(format!(
                "leverage_ratio must be > 0, got {}",
                self.leverage_ratio
            )));
        }
        self.positions.iter().try_for_each(Position::validate)
    }
}

/// Portfolio analysis response
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PortfolioAnalysis {
    /// Overall risk score 0-100
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub alerts: Vec<Alert>,
    pub recommendations: Vec<String>,
    pub metrics: PortfolioMetrics,
    pub analysis_timestamp: DateTime<Utc>,
    pub wallet: String,
}

impl PortfolioAnalysis {
    pub fn from_assessment(assessment: RiskAssessment, wallet: impl Into<String>) -> Self {
        Self {
            risk_score: assessment.score,
            risk_level: assessment.level,
            alerts: assessment.alerts,
            recommendations: assessment.recommendations,
            metrics: assessment.metrics,
            analysis_timestamp: Utc::now(),
            wallet: wallet.into(),
        }
    }
}

/// Single-trade analysis request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TradeAnalysisRequest {
    pub wallet: String,

    /// Token being sold
    pub input_token: String,

    /// Token being bought
    pub output_token: String,

    /// Amount of input token
    pub amount: f64,

    pub trade_size_usd: f64,

    /// Daily volume of the token; accepted for price-impact work, not yet
    /// read by the scorer
    #[serde(default = "default_daily_volume")]
    pub daily_volume: Option<f64>,
}

impl TradeAnalysisRequest {
    pub fn validate(&self) -> Result<()> {
        if self.wallet.trim().is_empty() {
            return Err(RiskError::InvalidInput("wallet must not be empty".into()));
        }
        if !self.amount.is_finite() {
            return Err(RiskError::InvalidInput("amount must be finite".into()));
        }
        if !self.trade_size_usd.is_finite() || self.trade_size_usd < 0.0 {
            return Err(RiskError::InvalidInput(format!(
                "trade_size_usd must be a finite number >= 0, got {}",
                self.trade_size_usd
            )));
        }
        match self.daily_volume {
            Some(volume) if !volume.is_finite() || volume < 0.0 => Err(RiskError::InvalidInput(
                format!("daily_volume must be a finite number >= 0, got {volume}"),
            )),
            _ => Ok(()),
        }
    }
}

/// Trade analysis response
pub type TradeAnalysis = TradeAssessment;
