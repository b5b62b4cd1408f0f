//! Roster-wide vesting projection at an arbitrary target date

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::result::{ContributorProjection, ProjectionResult};
use crate::contributor::Contributor;
use crate::error::ConfigurationError;
use crate::vesting::{compute_vesting_status, VestingState};

/// Kind of upcoming vesting event
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MilestoneKind {
    Cliff,
    FullVest,
}

/// A pending vesting event for one contributor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VestingMilestone {
    pub contributor_id: String,
    pub kind: MilestoneKind,
    pub date: NaiveDate,
}

/// Stateless projection engine.
///
/// Every call is a pure function of its arguments, so one engine can be
/// shared freely across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectionEngine;

impl ProjectionEngine {
    pub fn new() -> Self {
        Self
    }

    /// Project every roster member's vesting split at `target_date`
    pub fn project(
        &self,
        target_date: NaiveDate,
        roster: &[Contributor],
    ) -> Result<ProjectionResult, ConfigurationError> {
        let mut result = ProjectionResult::new(target_date);

        if roster.is_empty() {
            log::warn!("projecting an empty roster at {}", target_date);
            return Ok(result);
        }

        for contributor in roster {
            let status = compute_vesting_status(target_date, contributor)?;
            result.add_row(ContributorProjection::from_status(contributor, status))?;
        }

        log::debug!(
            "projected {} contributors at {}: {}/{} slices vested",
            roster.len(),
            target_date,
            result.totals.total_vested,
            result.totals.total_slices,
        );

        Ok(result)
    }

    /// Pending cliffs and full-vest dates strictly after `target_date`, earliest first
    pub fn upcoming_milestones(
        &self,
        target_date: NaiveDate,
        roster: &[Contributor],
    ) -> Result<Vec<VestingMilestone>, ConfigurationError> {
        let projection = self.project(target_date, roster)?;
        let mut milestones = Vec::new();

        for row in &projection.per_contributor {
            if row.state == VestingState::PreCliff {
                if let Some(date) = row.cliff_date.filter(|d| *d > target_date) {
                    milestones.push(VestingMilestone {
                        contributor_id: row.contributor_id.clone(),
                        kind: MilestoneKind::Cliff,
                        date,
                    });
                }
            }
            if row.state.is_pending() {
                if let Some(date) = row.full_vest_date.filter(|d| *d > target_date) {
                    milestones.push(VestingMilestone {
                        contributor_id: row.contributor_id.clone(),
                        kind: MilestoneKind::FullVest,
                        date,
                    });
                }
            }
        }

        milestones.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then(a.kind.cmp(&b.kind))
                .then_with(|| a.contributor_id.cmp(&b.contributor_id))
        });
        Ok(milestones)
    }
}

/// Shorthand for `ProjectionEngine::new().project(...)`
pub fn project(
    target_date: NaiveDate,
    roster: &[Contributor],
) -> Result<ProjectionResult, ConfigurationError> {
    ProjectionEngine::new().project(target_date, roster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contributor::VestingConfig;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_roster() -> Vec<Contributor> {
        vec![
            Contributor::new("founder", "Ada", 1000)
                .with_vesting(VestingConfig::new(date(2024, 1, 1), 12, 48)),
            Contributor::new("advisor", "Grace", 500),
            Contributor::new("hire", "Linus", 200)
                .with_vesting(VestingConfig::new(date(2025, 7, 1), 6, 24)),
        ]
    }

    #[test]
    fn test_projection_runs() {
        let result = project(date(2026, 1, 1), &test_roster()).unwrap();

        assert_eq!(result.per_contributor.len(), 3);
        assert_eq!(result.totals.total_slices, 1700);

        let founder = result.get("founder").unwrap();
        assert_eq!(founder.state, VestingState::Vesting);
        assert_eq!(founder.vested_slices, 500);

        let advisor = result.get("advisor").unwrap();
        assert_eq!(advisor.state, VestingState::None);
        assert_eq!(advisor.vested_slices, 500);

        // 6 of 24 months at the cliff
        let hire = result.get("hire").unwrap();
        assert_eq!(hire.state, VestingState::Vesting);
        assert_eq!(hire.vested_slices, 50);

        assert_eq!(result.totals.total_vested, 1050);
        assert_eq!(result.totals.total_unvested, 650);
    }

    #[test]
    fn test_next_dates() {
        let result = project(date(2025, 9, 1), &test_roster()).unwrap();
        // Hire is pre-cliff, founder already past theirs
        assert_eq!(result.next_cliff_date, Some(date(2026, 1, 1)));
        assert_eq!(result.next_full_vest_date, Some(date(2027, 7, 1)));
    }

    #[test]
    fn test_empty_roster() {
        let result = project(date(2026, 1, 1), &[]).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.totals.total_slices, 0);
        assert_eq!(result.totals.total_vested, 0);
        assert_eq!(result.totals.total_unvested, 0);
        assert_eq!(result.next_cliff_date, None);
        assert_eq!(result.next_full_vest_date, None);
    }

    #[test]
    fn test_target_before_every_start() {
        let result = project(date(2020, 1, 1), &test_roster()).unwrap();
        let founder = result.get("founder").unwrap();
        assert_eq!(founder.state, VestingState::PreCliff);
        assert_eq!(result.next_cliff_date, Some(date(2025, 1, 1)));
    }

    #[test]
    fn test_tied_cliffs_surface_once() {
        let start = date(2025, 1, 1);
        let roster = vec![
            Contributor::new("a", "", 10).with_vesting(VestingConfig::new(start, 12, 36)),
            Contributor::new("b", "", 20).with_vesting(VestingConfig::new(start, 12, 48)),
        ];
        let result = project(date(2025, 3, 1), &roster).unwrap();
        assert_eq!(result.next_cliff_date, Some(date(2026, 1, 1)));
        assert_eq!(result.next_full_vest_date, Some(date(2028, 1, 1)));
    }

    #[test]
    fn test_upcoming_milestones_sorted() {
        let milestones = ProjectionEngine::new()
            .upcoming_milestones(date(2025, 9, 1), &test_roster())
            .unwrap();

        let listed: Vec<_> = milestones
            .iter()
            .map(|m| (m.contributor_id.as_str(), m.kind, m.date))
            .collect();
        assert_eq!(
            listed,
            vec![
                ("hire", MilestoneKind::Cliff, date(2026, 1, 1)),
                ("hire", MilestoneKind::FullVest, date(2027, 7, 1)),
                ("founder", MilestoneKind::FullVest, date(2028, 1, 1)),
            ]
        );
    }

    #[test]
    fn test_malformed_terms_fail_projection() {
        let roster = vec![Contributor::new("bad", "", 10)
            .with_vesting(VestingConfig::new(date(2025, 1, 1), 0, 0))];
        assert!(project(date(2026, 1, 1), &roster).is_err());
    }

    #[test]
    fn test_slice_total_overflow_is_an_error() {
        let half = u64::MAX / 2 + 1;
        let roster = vec![Contributor::new("a", "", half), Contributor::new("b", "", half)];
        assert_eq!(
            project(date(2026, 1, 1), &roster),
            Err(ConfigurationError::SliceTotalOverflow)
        );
    }

    #[test]
    fn test_projection_is_repeatable() {
        let roster = test_roster();
        let a = project(date(2026, 4, 15), &roster).unwrap();
        let b = project(date(2026, 4, 15), &roster).unwrap();
        assert_eq!(a, b);
    }
}
