//! Error types for the equity engine
//!
//! `ConfigurationError` covers malformed caller input (vesting and valuation
//! configs). `Error` wraps it together with the loader and store failures.

use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Malformed vesting or valuation configuration.
///
/// These are deterministic input errors: retrying the same call will fail the
/// same way, so callers should reject the input at entry time.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("vesting period must be positive, got {0} months")]
    NonPositiveVestingMonths(i32),

    #[error("cliff cannot be negative, got {0} months")]
    NegativeCliffMonths(i32),

    #[error("cliff of {cliff_months} months exceeds vesting period of {vesting_months} months")]
    CliffExceedsVesting { cliff_months: i32, vesting_months: i32 },

    #[error("date arithmetic out of range: {0}")]
    DateOutOfRange(String),

    #[error("manual valuation mode requires a manual value")]
    MissingManualValue,

    #[error("manual value cannot be negative, got {0} cents")]
    NegativeManualValue(i64),

    #[error("auto valuation mode requires business metrics")]
    MissingBusinessMetrics,

    #[error("profit history holds {0} entries, at most {max} allowed", max = crate::valuation::MAX_PROFIT_HISTORY)]
    ProfitHistoryTooLong(usize),

    #[error("profit history must be strictly descending by year ({previous} is followed by {next})")]
    ProfitHistoryOrder { previous: i32, next: i32 },

    #[error("profit history year {year} is not before the current year {current_year}")]
    ProfitHistoryNotPast { year: i32, current_year: i32 },

    #[error("churn rate must be within [0, 100], got {0}")]
    ChurnRateOutOfRange(f64),

    #[error("invalid valuation strategy parameter: {0}")]
    InvalidStrategy(String),

    #[error("roster slice totals exceed {max} slices", max = u64::MAX)]
    SliceTotalOverflow,

    #[error("computed valuation exceeds {max} cents", max = u64::MAX)]
    ValuationOverflow,
}

/// Crate-level error
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("roster row {row}: {message}")]
    InvalidRoster { row: usize, message: String },

    #[error("duplicate contributor id '{0}'")]
    DuplicateContributor(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store error: {0}")]
    Store(String),
}
