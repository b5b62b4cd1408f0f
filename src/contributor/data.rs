//! Contributor roster records and their vesting configuration

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Vesting terms attached to a contributor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VestingConfig {
    /// Vesting clock start (may be in the future)
    pub start_date: NaiveDate,

    /// Months before anything counts as vested
    pub cliff_months: i32,

    /// Months until 100% vested
    pub vesting_months: i32,
}

impl VestingConfig {
    pub fn new(start_date: NaiveDate, cliff_months: i32, vesting_months: i32) -> Self {
        Self {
            start_date,
            cliff_months,
            vesting_months,
        }
    }

    /// Check the config invariants.
    ///
    /// Meant for edit time; the calculators call it too and refuse to clamp.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.vesting_months <= 0 {
            return Err(ConfigurationError::NonPositiveVestingMonths(self.vesting_months));
        }
        if self.cliff_months < 0 {
            return Err(ConfigurationError::NegativeCliffMonths(self.cliff_months));
        }
        if self.cliff_months > self.vesting_months {
            return Err(ConfigurationError::CliffExceedsVesting {
                cliff_months: self.cliff_months,
                vesting_months: self.vesting_months,
            });
        }
        Ok(())
    }
}

/// A member of the equity roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contributor {
    pub id: String,

    /// Display name, empty when the roster does not carry one
    #[serde(default)]
    pub name: String,

    /// Total accumulated slices, vested or not
    pub slices: u64,

    /// `None` means always fully vested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vesting: Option<VestingConfig>,
}

impl Contributor {
    /// Contributor without vesting terms
    pub fn new(id: impl Into<String>, name: impl Into<String>, slices: u64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slices,
            vesting: None,
        }
    }

    /// Builder-style setter for the vesting terms
    pub fn with_vesting(mut self, vesting: VestingConfig) -> Self {
        self.vesting = Some(vesting);
        self
    }

    pub fn has_vesting(&self) -> bool {
        self.vesting.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_validate_accepts_typical_terms() {
        assert!(VestingConfig::new(date(2024, 1, 1), 12, 48).validate().is_ok());
        assert!(VestingConfig::new(date(2024, 1, 1), 0, 12).validate().is_ok());
        assert!(VestingConfig::new(date(2024, 1, 1), 24, 24).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_malformed_terms() {
        let start = date(2024, 1, 1);
        assert_eq!(
            VestingConfig::new(start, 0, 0).validate(),
            Err(ConfigurationError::NonPositiveVestingMonths(0))
        );
        assert_eq!(
            VestingConfig::new(start, -3, 12).validate(),
            Err(ConfigurationError::NegativeCliffMonths(-3))
        );
        assert_eq!(
            VestingConfig::new(start, 13, 12).validate(),
            Err(ConfigurationError::CliffExceedsVesting { cliff_months: 13, vesting_months: 12 })
        );
    }

    #[test]
    fn test_contributor_json_shape() {
        let c = Contributor::new("c1", "Ada", 1000)
            .with_vesting(VestingConfig::new(date(2024, 1, 1), 12, 48));
        let json = serde_json::to_value(&c).unwrap();
        assert_eq!(json["vesting"]["startDate"], "2024-01-01");
        assert_eq!(json["vesting"]["cliffMonths"], 12);

        let bare: Contributor = serde_json::from_str(r#"{"id":"c2","slices":5}"#).unwrap();
        assert_eq!(bare.name, "");
        assert!(!bare.has_vesting());
    }
}
