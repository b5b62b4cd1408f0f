//! Projection engine for roster-wide vesting at a target date

mod engine;
mod result;

pub use engine::{project, MilestoneKind, ProjectionEngine, VestingMilestone};
pub use result::{ContributorProjection, ProjectionResult, ProjectionSummary, ProjectionTotals};
