//! Company valuation and per-contributor allocation

use serde::{Deserialize, Serialize};

use super::config::{ValuationConfig, ValuationMode};
use super::strategy::{ProfitMultipleStrategy, ValuationStrategy};
use crate::error::ConfigurationError;
use crate::projection::ProjectionResult;

/// Total company value in cents, using the default auto formula
pub fn compute_valuation(config: &ValuationConfig) -> Result<u64, ConfigurationError> {
    compute_valuation_with(config, &ProfitMultipleStrategy::default())
}

/// Total company value in cents with a caller-supplied auto formula
pub fn compute_valuation_with(
    config: &ValuationConfig,
    strategy: &dyn ValuationStrategy,
) -> Result<u64, ConfigurationError> {
    match config.mode {
        ValuationMode::Manual => Ok(config.required_manual_value()? as u64),
        ValuationMode::Auto => strategy.value(config.required_business_metrics()?),
    }
}

/// One contributor's share of the company value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquityValueRow {
    pub contributor_id: String,
    pub contributor_name: String,
    pub slices: u64,

    /// Share of all slices, in percent
    pub percentage: f64,

    /// Cents
    pub total_value: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vested_slices: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vested_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vested_value: Option<u64>,
}

impl EquityValueRow {
    /// Drop the vested columns, for callers with vesting switched off
    pub fn without_vesting(mut self) -> Self {
        self.vested_slices = None;
        self.vested_percentage = None;
        self.vested_value = None;
        self
    }
}

/// `floor(total * part / whole)` without overflow
fn pro_rata(total: u64, part: u64, whole: u64) -> u64 {
    (total as u128 * part as u128 / whole as u128) as u64
}

fn percent_of(part: u64, whole: u64) -> f64 {
    100.0 * part as f64 / whole as f64
}

/// Split `total_value_cents` across the projection by slice share.
///
/// Values are floored, so the rows may sum to less than the total by at most
/// one cent per contributor beyond the first. A pie with no slices prices
/// every row at 0.
pub fn allocate(total_value_cents: u64, projection: &ProjectionResult) -> Vec<EquityValueRow> {
    let total_slices = projection.totals.total_slices;

    if total_slices == 0 && !projection.per_contributor.is_empty() {
        log::warn!("allocating value over a roster with no slices");
    }

    projection
        .per_contributor
        .iter()
        .map(|row| {
            let (percentage, total_value, vested_percentage, vested_value) = if total_slices == 0 {
                (0.0, 0, 0.0, 0)
            } else {
                (
                    percent_of(row.slices, total_slices),
                    pro_rata(total_value_cents, row.slices, total_slices),
                    percent_of(row.vested_slices, total_slices),
                    pro_rata(total_value_cents, row.vested_slices, total_slices),
                )
            };

            EquityValueRow {
                contributor_id: row.contributor_id.clone(),
                contributor_name: row.contributor_name.clone(),
                slices: row.slices,
                percentage,
                total_value,
                vested_slices: Some(row.vested_slices),
                vested_percentage: Some(vested_percentage),
                vested_value: Some(vested_value),
            }
        })
        .collect()
}
