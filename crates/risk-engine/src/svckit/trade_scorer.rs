//! Trade Scorer
//!
//! Size-based risk for a single proposed trade.

use crate::config::TradeConstants;
use crate::error::{Result, RiskError};
use crate::model::{Alert, AlertSeverity, AlertType, TradeAssessment};
use crate::svckit::format_percent;

const TRADE_RECOMMENDATIONS: [&str; 2] = [
    "Check current liquidity before trading",
    "Monitor price impact during execution",
];

#[derive(Clone, Debug, Default)]
pub struct TradeScorer {
    constants: TradeConstants,
}

impl TradeScorer {
    pub const fn new(constants: TradeConstants) -> Self {
        Self { constants }
    }

    pub fn score_trade(&self, trade_size_usd: f64) -> Result<TradeAssessment> {
        let c = &self.constants;

        // f64::min swallows NaN, so check the raw ratio.
        let ratio = trade_size_usd / c.reference_size_usd;
        if !ratio.is_finite() {
            return Err(RiskError::ComputationFailure(format!(
                "non-finite size risk for trade of {trade_size_usd} USD"
            )));
        }
        let size_risk = ratio.min(1.0);

        let alerts = if size_risk > c.high_size_risk {
            vec![Alert::new(
                AlertSeverity::High,
                AlertType::TradeSize,
                "Large trade detected - consider splitting into smaller trades",
            )
            .with_metric("size_risk", size_risk)]
        } else if size_risk > c.medium_size_risk {
            vec![Alert::new(
                AlertSeverity::Medium,
                AlertType::TradeSize,
                "Moderate trade size - monitor price impact",
            )
            .with_metric("size_risk", size_risk)]
        } else {
            Vec::new()
        };

        let slippage = c.min_slippage.max(size_risk * c.slippage_per_size_risk);

        tracing::debug!(trade_size_usd, size_risk, slippage, "trade scored");

        Ok(TradeAssessment {
            trade_risk_score: size_risk * 100.0,
            size_risk,
            alerts,
            suggested_slippage: format_percent(slippage, 3),
            recommendations: TRADE_RECOMMENDATIONS.iter().map(|s| (*s).to_string()).collect(),
        })
    }
}
