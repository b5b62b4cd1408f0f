//! Scenario runner for batch projections over many dates
//!
//! Holds a validated roster once, then projects it at as many target dates
//! as the caller needs (a projections chart, a what-if slider). Dates are
//! independent, so batches run in parallel.

use chrono::NaiveDate;
use rayon::prelude::*;

use crate::contributor::{load_roster_auto, validate_roster, Contributor};
use crate::error::{ConfigurationError, Result};
use crate::projection::{ProjectionEngine, ProjectionResult};
use crate::valuation::{allocate, EquityValueRow};
use crate::vesting::add_months;

/// Pre-loaded roster runner
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::from_path("roster.csv")?;
/// let chart = runner.timeline(start, 48, 6)?;
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    roster: Vec<Contributor>,
    engine: ProjectionEngine,
}

impl ScenarioRunner {
    /// Create a runner, validating the roster up front
    pub fn new(roster: Vec<Contributor>) -> Result<Self> {
        validate_roster(&roster)?;
        Ok(Self {
            roster,
            engine: ProjectionEngine::new(),
        })
    }

    /// Create a runner from a CSV or JSON roster file
    pub fn from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        Self::new(load_roster_auto(path)?)
    }

    pub fn roster(&self) -> &[Contributor] {
        &self.roster
    }

    /// Projection at a single date
    pub fn run(&self, target_date: NaiveDate) -> std::result::Result<ProjectionResult, ConfigurationError> {
        self.engine.project(target_date, &self.roster)
    }

    /// Projections at each date, in input order
    pub fn project_dates(
        &self,
        dates: &[NaiveDate],
    ) -> std::result::Result<Vec<ProjectionResult>, ConfigurationError> {
        dates
            .par_iter()
            .map(|date| self.engine.project(*date, &self.roster))
            .collect()
    }

    /// Projections from `start` every `step_months` up to `start + months`, inclusive
    pub fn timeline(
        &self,
        start: NaiveDate,
        months: u32,
        step_months: u32,
    ) -> std::result::Result<Vec<ProjectionResult>, ConfigurationError> {
        let dates = timeline_dates(start, months, step_months)?;
        log::debug!("projecting {} timeline points from {}", dates.len(), start);
        self.project_dates(&dates)
    }

    /// Projection at `target_date` priced at `total_value_cents`
    pub fn value_at(
        &self,
        target_date: NaiveDate,
        total_value_cents: u64,
    ) -> std::result::Result<Vec<EquityValueRow>, ConfigurationError> {
        Ok(allocate(total_value_cents, &self.run(target_date)?))
    }
}

/// Dates `start, start + step, ...` not past `start + months`.
///
/// Each point is offset from `start` directly so month-end starts do not drift.
pub fn timeline_dates(
    start: NaiveDate,
    months: u32,
    step_months: u32,
) -> std::result::Result<Vec<NaiveDate>, ConfigurationError> {
    let step = step_months.max(1);
    (0..=months)
        .step_by(step as usize)
        .map(|offset| add_months(start, offset))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contributor::VestingConfig;
    use crate::error::Error;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_runner() -> ScenarioRunner {
        ScenarioRunner::new(vec![
            Contributor::new("a", "Ada", 1000)
                .with_vesting(VestingConfig::new(date(2024, 1, 1), 12, 48)),
            Contributor::new("b", "Grace", 1000),
        ])
        .unwrap()
    }

    #[test]
    fn test_timeline_dates() {
        let dates = timeline_dates(date(2024, 1, 31), 3, 1).unwrap();
        assert_eq!(
            dates,
            vec![date(2024, 1, 31), date(2024, 2, 29), date(2024, 3, 31), date(2024, 4, 30)]
        );

        let sparse = timeline_dates(date(2024, 1, 1), 10, 6).unwrap();
        assert_eq!(sparse, vec![date(2024, 1, 1), date(2024, 7, 1)]);
    }

    #[test]
    fn test_timeline_preserves_order_and_grows() {
        let results = test_runner().timeline(date(2024, 1, 1), 48, 12).unwrap();
        assert_eq!(results.len(), 5);

        let vested: Vec<_> = results.iter().map(|r| r.totals.total_vested).collect();
        assert_eq!(vested, vec![1000, 1250, 1500, 1750, 2000]);
        assert_eq!(results[4].target_date, date(2028, 1, 1));
    }

    #[test]
    fn test_value_at() {
        let rows = test_runner().value_at(date(2026, 1, 1), 2_000_000).unwrap();
        assert_eq!(rows[0].total_value, 1_000_000);
        assert_eq!(rows[0].vested_value, Some(500_000));
    }

    #[test]
    fn test_new_rejects_bad_roster() {
        let roster = vec![Contributor::new("x", "", 1)
            .with_vesting(VestingConfig::new(date(2024, 1, 1), -1, 12))];
        assert!(matches!(ScenarioRunner::new(roster), Err(Error::Configuration(_))));
    }
}
