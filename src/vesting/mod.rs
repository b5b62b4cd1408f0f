//! Vesting status for a single contributor

pub mod calendar;
mod calculator;
mod status;

pub use calculator::compute_vesting_status;
pub use calendar::{add_months, months_between};
pub use status::{VestingState, VestingStatus};
