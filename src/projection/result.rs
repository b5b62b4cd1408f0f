//! Projection output structures

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::contributor::Contributor;
use crate::error::ConfigurationError;
use crate::vesting::{VestingState, VestingStatus};

/// One roster member's projected vesting position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContributorProjection {
    pub contributor_id: String,
    pub contributor_name: String,

    /// Total slices (vested + unvested)
    pub slices: u64,
    pub vested_slices: u64,
    pub unvested_slices: u64,
    pub percent_vested: f64,
    pub state: VestingState,

    pub cliff_date: Option<NaiveDate>,
    pub full_vest_date: Option<NaiveDate>,
}

impl ContributorProjection {
    pub fn from_status(contributor: &Contributor, status: VestingStatus) -> Self {
        Self {
            contributor_id: contributor.id.clone(),
            contributor_name: contributor.name.clone(),
            slices: contributor.slices,
            vested_slices: status.vested_slices,
            unvested_slices: status.unvested_slices,
            percent_vested: status.percent_vested,
            state: status.state,
            cliff_date: status.cliff_date,
            full_vest_date: status.full_vest_date,
        }
    }
}

/// Roster-wide slice totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionTotals {
    pub total_slices: u64,
    pub total_vested: u64,
    pub total_unvested: u64,
}

impl ProjectionTotals {
    /// Add one contributor's split. Totals are left untouched on overflow.
    pub fn add(&mut self, row: &ContributorProjection) -> Result<(), ConfigurationError> {
        let sum = |total: u64, slices: u64| {
            total
                .checked_add(slices)
                .ok_or(ConfigurationError::SliceTotalOverflow)
        };

        let total_slices = sum(self.total_slices, row.slices)?;
        let total_vested = sum(self.total_vested, row.vested_slices)?;
        let total_unvested = sum(self.total_unvested, row.unvested_slices)?;

        self.total_slices = total_slices;
        self.total_vested = total_vested;
        self.total_unvested = total_unvested;
        Ok(())
    }

    /// Vested share of all slices in percent, 0 for an empty pie
    pub fn percent_vested(&self) -> f64 {
        if self.total_slices == 0 {
            0.0
        } else {
            100.0 * self.total_vested as f64 / self.total_slices as f64
        }
    }
}

/// Projected equity distribution at a target date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionResult {
    pub target_date: NaiveDate,

    /// One entry per roster member, roster order
    pub per_contributor: Vec<ContributorProjection>,

    pub totals: ProjectionTotals,

    /// Earliest pending cliff strictly after the target date
    pub next_cliff_date: Option<NaiveDate>,

    /// Earliest pending full-vest date strictly after the target date
    pub next_full_vest_date: Option<NaiveDate>,
}

impl ProjectionResult {
    pub fn new(target_date: NaiveDate) -> Self {
        Self {
            target_date,
            per_contributor: Vec::new(),
            totals: ProjectionTotals::default(),
            next_cliff_date: None,
            next_full_vest_date: None,
        }
    }

    /// Add a contributor row, updating totals and the next-event dates
    pub fn add_row(&mut self, row: ContributorProjection) -> Result<(), ConfigurationError> {
        self.totals.add(&row)?;

        if row.state == VestingState::PreCliff {
            if let Some(cliff) = row.cliff_date.filter(|d| *d > self.target_date) {
                self.next_cliff_date = earliest(self.next_cliff_date, cliff);
            }
        }
        if row.state.is_pending() {
            if let Some(full) = row.full_vest_date.filter(|d| *d > self.target_date) {
                self.next_full_vest_date = earliest(self.next_full_vest_date, full);
            }
        }

        self.per_contributor.push(row);
        Ok(())
    }

    pub fn get(&self, contributor_id: &str) -> Option<&ContributorProjection> {
        self.per_contributor
            .iter()
            .find(|row| row.contributor_id == contributor_id)
    }

    pub fn is_empty(&self) -> bool {
        self.per_contributor.is_empty()
    }

    /// Summary statistics
    pub fn summary(&self) -> ProjectionSummary {
        let count = |state: VestingState| {
            self.per_contributor.iter().filter(|r| r.state == state).count()
        };

        ProjectionSummary {
            target_date: self.target_date,
            contributors: self.per_contributor.len(),
            unrestricted: count(VestingState::None),
            pre_cliff: count(VestingState::PreCliff),
            vesting: count(VestingState::Vesting),
            fully_vested: count(VestingState::FullyVested),
            total_slices: self.totals.total_slices,
            total_vested: self.totals.total_vested,
            percent_vested: self.totals.percent_vested(),
        }
    }
}

fn earliest(current: Option<NaiveDate>, candidate: NaiveDate) -> Option<NaiveDate> {
    Some(current.map_or(candidate, |d| d.min(candidate)))
}

/// Headcount by state plus the aggregate vested share
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectionSummary {
    pub target_date: NaiveDate,
    pub contributors: usize,
    pub unrestricted: usize,
    pub pre_cliff: usize,
    pub vesting: usize,
    pub fully_vested: usize,
    pub total_slices: u64,
    pub total_vested: u64,
    pub percent_vested: f64,
}
