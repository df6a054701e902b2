//! Risk Service
//!
//! Request-level entry points: validation, empty-portfolio routing and
//! response stamping around the pure scorers.

use crate::config::RiskConfig;
use crate::error::{Result, RiskError};
use crate::model::{
    PortfolioAnalysis, PortfolioAnalysisRequest, PortfolioInput, RiskAssessment, TradeAnalysis,
    TradeAnalysisRequest,
};
use crate::svckit::{RiskScorer, TradeScorer};

#[derive(Clone, Debug, Default)]
pub struct RiskService {
    scorer: RiskScorer,
    trade_scorer: TradeScorer,
}

impl RiskService {
    pub const fn new(config: RiskConfig) -> Self {
        Self {
            scorer: RiskScorer::new(config),
            trade_scorer: TradeScorer::new(config.trade),
        }
    }

    pub const fn config(&self) -> &RiskConfig {
        self.scorer.config()
    }

    /// Analyze portfolio risk
    pub fn analyze_portfolio(&self, request: &PortfolioAnalysisRequest) -> Result<PortfolioAnalysis> {
        tracing::info!(
            wallet = %request.wallet,
            positions = request.positions.len(),
            "analyzing portfolio"
        );

        self.assess_portfolio(request)
            .map(|assessment| PortfolioAnalysis::from_assessment(assessment, &request.wallet))
            .inspect_err(|e| log_failure(&request.wallet, "portfolio", e))
    }

    fn assess_portfolio(&self, request: &PortfolioAnalysisRequest) -> Result<RiskAssessment> {
        request.validate()?;

        let input = PortfolioInput::new(request.positions.clone(), request.total_value)?;
        if input.is_empty() {
            tracing::info!(wallet = %request.wallet, "empty portfolio, returning baseline assessment");
        }
        self.scorer.assess(&input)
    }

    /// Analyze a single trade; token fields and daily volume are not scored
    pub fn analyze_trade(&self, request: &TradeAnalysisRequest) -> Result<TradeAnalysis> {
        tracing::info!(
            wallet = %request.wallet,
            input_token = %request.input_token,
            output_token = %request.output_token,
            trade_size_usd = request.trade_size_usd,
            "analyzing trade"
        );

        request
            .validate()
            .and_then(|()| self.trade_scorer.score_trade(request.trade_size_usd))
            .inspect_err(|e| log_failure(&request.wallet, "trade", e))
    }
}

/// Single log site for a failed analysis: rejected input is a warning,
/// anything else an error
fn log_failure(wallet: &str, analysis: &str, err: &RiskError) {
    if err.is_client_error() {
        tracing::warn!(wallet, analysis, error = %err, "analysis rejected");
    } else {
        tracing::error!(wallet, analysis, error = %err, "analysis failed");
    }
}
