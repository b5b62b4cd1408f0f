//! Computed vesting state for one contributor at one date

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Where a contributor sits on their vesting schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VestingState {
    /// No vesting terms, always fully vested
    None,
    /// Before the cliff, nothing vested
    PreCliff,
    /// Past the cliff, vesting linearly
    Vesting,
    /// Vesting period complete
    FullyVested,
}

impl VestingState {
    /// Whether more slices will vest after this point
    pub fn is_pending(&self) -> bool {
        matches!(self, VestingState::PreCliff | VestingState::Vesting)
    }
}

/// Vesting status as of a given date.
///
/// Recomputed on every query; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VestingStatus {
    pub state: VestingState,

    /// Percent vested in [0, 100]
    pub percent_vested: f64,

    pub vested_slices: u64,
    pub unvested_slices: u64,

    /// Calendar months elapsed since the start date (0 without vesting terms)
    pub months_elapsed: u32,

    pub cliff_date: Option<NaiveDate>,
    pub full_vest_date: Option<NaiveDate>,
}

impl VestingStatus {
    /// Status for a contributor with no vesting terms
    pub fn unrestricted(slices: u64) -> Self {
        Self {
            state: VestingState::None,
            percent_vested: 100.0,
            vested_slices: slices,
            unvested_slices: 0,
            months_elapsed: 0,
            cliff_date: None,
            full_vest_date: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_serializes_camel_case() {
        assert_eq!(serde_json::to_string(&VestingState::PreCliff).unwrap(), "\"preCliff\"");
        assert_eq!(serde_json::to_string(&VestingState::FullyVested).unwrap(), "\"fullyVested\"");
        assert_eq!(serde_json::to_string(&VestingState::None).unwrap(), "\"none\"");
    }

    #[test]
    fn test_pending_states() {
        assert!(VestingState::PreCliff.is_pending());
        assert!(VestingState::Vesting.is_pending());
        assert!(!VestingState::FullyVested.is_pending());
        assert!(!VestingState::None.is_pending());
    }
}
