//! Company valuation and equity pricing
//!
//! - `compute_valuation`: total company value from manual or auto settings
//! - `allocate`: per-contributor dollar value from a projection
//! - `ValuationHistory`: bounded log of recorded valuations

mod calculator;
mod config;
mod history;
mod money;
mod strategy;

pub use calculator::{allocate, compute_valuation, compute_valuation_with, EquityValueRow};
pub use config::{BusinessMetrics, ProfitRecord, ValuationConfig, ValuationMode, MAX_PROFIT_HISTORY};
pub use history::{ValuationHistory, ValuationHistoryEntry, ValuationInputs, HISTORY_CAPACITY};
pub use money::format_cents;
pub use strategy::{ProfitMultipleStrategy, ValuationStrategy};
