//! Straight-line vesting with a cliff

use chrono::NaiveDate;

use super::calendar::{add_months, months_between};
use super::status::{VestingState, VestingStatus};
use crate::contributor::Contributor;
use crate::error::ConfigurationError;

/// Compute a contributor's vesting status as of `as_of`.
///
/// Contributors without vesting terms are always fully vested. With terms:
/// - before the start date, or before the cliff: nothing vested
/// - from the cliff until the vesting period ends: `elapsed / vesting_months`
/// - afterwards: fully vested
///
/// Vested slices are floored so that vested + unvested equals the
/// contributor's slices exactly.
pub fn compute_vesting_status(
    as_of: NaiveDate,
    contributor: &Contributor,
) -> Result<VestingStatus, ConfigurationError> {
    let Some(vesting) = &contributor.vesting else {
        return Ok(VestingStatus::unrestricted(contributor.slices));
    };
    vesting.validate()?;

    let slices = contributor.slices;
    let cliff_months = vesting.cliff_months as u32;
    let vesting_months = vesting.vesting_months as u32;

    let cliff_date = add_months(vesting.start_date, cliff_months)?;
    let full_vest_date = add_months(vesting.start_date, vesting_months)?;
    let months_elapsed = months_between(vesting.start_date, as_of);

    // Vesting has not started yet, whatever the cliff length
    let not_started = as_of < vesting.start_date;

    let (state, percent_vested, vested_slices) = if not_started || months_elapsed < cliff_months {
        (VestingState::PreCliff, 0.0, 0)
    } else if months_elapsed >= vesting_months {
        (VestingState::FullyVested, 100.0, slices)
    } else {
        let percent = 100.0 * months_elapsed as f64 / vesting_months as f64;
        // Integer floor keeps vested + unvested == slices
        let vested = (slices as u128 * months_elapsed as u128 / vesting_months as u128) as u64;
        (VestingState::Vesting, percent, vested)
    };

    Ok(VestingStatus {
        state,
        percent_vested,
        vested_slices,
        unvested_slices: slices - vested_slices,
        months_elapsed,
        cliff_date: Some(cliff_date),
        full_vest_date: Some(full_vest_date),
    })
}
