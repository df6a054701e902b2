//! Metrics Calculator
//!
//! Derives concentration, volatility and diversity metrics from a list of
//! positions.

use crate::error::{Result, RiskError};
use crate::model::{PortfolioMetrics, Position};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Compute portfolio metrics
///
/// `total_value` must be > 0 and `positions` non-empty; empty portfolios
/// go through [`crate::RiskScorer::assess`], which returns the baseline.
#[allow(clippy::cast_precision_loss)]
pub fn compute_metrics(positions: &[Position], total_value: f64) -> Result<PortfolioMetrics> {
    if positions.is_empty() {
        return Err(RiskError::InvalidInput("cannot compute metrics without positions".into()));
    }
    if !total_value.is_finite() || total_value <= 0.0 {
        return Err(RiskError::InvalidInput(format!(
            "cannot compute metrics for total_value {total_value}"
        )));
    }

    let mut concentration = 0.0;
    let mut weighted_volatility = 0.0;
    let mut volatility_sum = 0.0;
    let mut weight_sum = 0.0;
    let mut max_position_ratio = f64::MIN;

    // Weight and volatility come from the same position on every step.
    for position in positions {
        let weight = position.value_usd / total_value;
        concentration += weight * weight;
        weighted_volatility += position.volatility * weight;
        volatility_sum += position.volatility;
        weight_sum += weight;
        max_position_ratio = max_position_ratio.max(weight);
    }

    if (weight_sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        tracing::warn!(
            weight_sum,
            total_value,
            "position values do not sum to total_value"
        );
    }

    let num_positions = positions.len();

    Ok(PortfolioMetrics {
        concentration,
        weighted_volatility,
        avg_volatility: volatility_sum / num_positions as f64,
        num_positions,
        max_position_ratio,
        diversity_score: 1.0 - concentration,
        total_value,
    })
}
