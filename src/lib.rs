//! Equity Projection - vesting, projection and valuation engine for slicing-pie equity splits
//!
//! This library provides:
//! - Cliff + straight-line vesting status per contributor
//! - Roster-wide projections at any target date, with next cliff / full-vest dates
//! - Company valuation (manual or metrics-driven) and per-contributor pricing
//! - Feature-flag resolution and a key-value settings seam for the UI layer
//!
//! All calculators are pure functions of their inputs.

pub mod error;
pub mod contributor;
pub mod vesting;
pub mod projection;
pub mod valuation;
pub mod settings;
pub mod scenario;

// Re-export commonly used types
pub use error::{ConfigurationError, Error, Result};
pub use contributor::{Contributor, VestingConfig};
pub use vesting::{compute_vesting_status, VestingState, VestingStatus};
pub use projection::{project, ProjectionEngine, ProjectionResult, ProjectionTotals};
pub use valuation::{allocate, compute_valuation, EquityValueRow, ValuationConfig, ValuationMode};
pub use settings::FeatureFlags;
pub use scenario::ScenarioRunner;
