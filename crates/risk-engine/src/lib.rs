//! # risk-engine
//!
//! Stateless risk scoring for token portfolios and single trades.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐   ┌────────────────────┐   ┌──────────────────────────┐
//! │  positions   │──▶│ Metrics Calculator │──▶│       Risk Scorer        │
//! │ total value  │   │ concentration, vol │   │ score · level · alerts   │
//! └──────────────┘   └────────────────────┘   │ recommendations          │
//!                                              └──────────────────────────┘
//! ┌──────────────┐   ┌────────────────────┐
//! │ trade size   │──▶│    Trade Scorer    │──▶ size risk · slippage
//! └──────────────┘   └────────────────────┘
//! ```
//!
//! ## Score
//!
//! ```text
//! 100 × (0.4·concentration + 0.3·weighted_vol + 0.2·max_weight + min(value/100k, 0.1))
//!   × 0.9 when more than 5 positions
//!   × 1.2 when fewer than 2 positions
//! clamped to [0, 100]; ≥ 70 high, ≥ 40 medium, else low
//! ```
//!
//! Every call is a pure function of its input. Thresholds and constants
//! come from an explicit [`RiskConfig`].

pub mod svckit;
pub mod service;
pub mod model;
pub mod config;
pub mod error;

pub use config::{
    AlertThresholds, AnomalyConstants, RiskConfig, RiskThresholds, ScoringWeights, TradeConstants,
};
pub use error::{Result, RiskError};
pub use model::{
    Alert, AlertSeverity, AlertType, PortfolioAnalysis, PortfolioAnalysisRequest, PortfolioInput,
    PortfolioMetrics, Position, RiskAssessment, RiskLevel, TradeAnalysis, TradeAnalysisRequest,
    TradeAssessment,
};
pub use service::RiskService;
pub use svckit::{
    AnomalyDetector, AnomalyType, PortfolioAnomalyReport, RiskScorer, TradeScorer,
    TradingAnomalyReport, compute_metrics,
};
