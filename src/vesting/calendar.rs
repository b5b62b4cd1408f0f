//! Calendar-month arithmetic
//!
//! Month addition clamps to the last day of the target month
//! (Jan 31 + 1 month = Feb 28/29), never a fixed 30-day step.

use chrono::{Datelike, Months, NaiveDate};

use crate::error::ConfigurationError;

/// `date` plus `months` calendar months, clamped to month end
pub fn add_months(date: NaiveDate, months: u32) -> Result<NaiveDate, ConfigurationError> {
    date.checked_add_months(Months::new(months)).ok_or_else(|| {
        ConfigurationError::DateOutOfRange(format!("{} + {} months", date, months))
    })
}

/// Whole calendar months from `start` to `end`, 0 when `end` precedes `start`.
///
/// Month `m` counts as elapsed once `add_months(start, m) <= end`, so the
/// result agrees with cliff and full-vest dates built by `add_months`.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> u32 {
    if end <= start {
        return 0;
    }

    let raw = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;
    let mut months = raw.max(0) as u32;

    // Not yet reached the anniversary day within the final month
    while months > 0 {
        match start.checked_add_months(Months::new(months)) {
            Some(anniversary) if anniversary <= end => break,
            _ => months -= 1,
        }
    }

    months
}
