//! Pluggable formulas for the auto valuation mode
//!
//! The business decides the multiple; the engine only requires the result
//! to be deterministic, non-negative, and non-decreasing in current-year
//! profit.

use super::config::BusinessMetrics;
use crate::error::ConfigurationError;

/// Basis points in 100%
const BPS: i128 = 10_000;

/// Turns business metrics into a company value in cents
pub trait ValuationStrategy: Send + Sync {
    /// Company value in cents, never negative
    fn value(&self, metrics: &BusinessMetrics) -> Result<u64, ConfigurationError>;
}

/// Weighted profit times a fixed multiple, discounted for churn.
///
/// ```text
/// weighted = (current * current_weight + sum(history)) / (current_weight + history.len())
/// value    = max(weighted, 0) * multiple * (1 - churn / 100)
/// ```
///
/// Absent churn counts as 0%. An empty history makes `weighted` the
/// current-year profit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProfitMultipleStrategy {
    /// Multiple applied to weighted profit, in basis points (30_000 = 3.0x)
    pub multiple_bps: u32,

    /// Weight of the current year relative to each history year
    pub current_weight: u32,
}

impl Default for ProfitMultipleStrategy {
    fn default() -> Self {
        Self {
            multiple_bps: 30_000,
            current_weight: 2,
        }
    }
}

impl ProfitMultipleStrategy {
    pub fn new(multiple_bps: u32, current_weight: u32) -> Result<Self, ConfigurationError> {
        if current_weight == 0 {
            return Err(ConfigurationError::InvalidStrategy(
                "current-year weight must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            multiple_bps,
            current_weight,
        })
    }

    /// Weighted average profit in cents, floored
    fn weighted_profit(&self, metrics: &BusinessMetrics) -> i128 {
        let weight = self.current_weight.max(1) as i128;
        let history_sum: i128 = metrics.profit_history.iter().map(|r| r.profit as i128).sum();
        let denominator = weight + metrics.profit_history.len() as i128;
        (metrics.current_year_profit as i128 * weight + history_sum).div_euclid(denominator)
    }
}

impl ValuationStrategy for ProfitMultipleStrategy {
    fn value(&self, metrics: &BusinessMetrics) -> Result<u64, ConfigurationError> {
        metrics.validate_churn()?;

        let churn = metrics.churn_rate.unwrap_or(0.0);
        let retention_bps = ((100.0 - churn) * 100.0).round() as i128;
        let retention_bps = retention_bps.clamp(0, BPS);

        let base = self.weighted_profit(metrics).max(0);
        let value = base * self.multiple_bps as i128 / BPS * retention_bps / BPS;

        u64::try_from(value).map_err(|_| ConfigurationError::ValuationOverflow)
    }
}
