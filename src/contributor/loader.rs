//! Load a contributor roster from CSV or JSON
//!
//! Every vesting config is validated on the way in so that bad terms are
//! rejected at entry rather than at query time.

use super::{Contributor, VestingConfig};
use crate::error::{Error, Result};
use chrono::NaiveDate;
use csv::Reader;
use std::collections::HashSet;
use std::fs::File;
use std::path::Path;

/// Raw CSV row: `id,name,slices,start_date,cliff_months,vesting_months`
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    id: String,
    #[serde(default)]
    name: Option<String>,
    slices: u64,
    #[serde(default)]
    start_date: Option<NaiveDate>,
    #[serde(default)]
    cliff_months: Option<i32>,
    #[serde(default)]
    vesting_months: Option<i32>,
}

impl CsvRow {
    fn into_contributor(self, row: usize) -> Result<Contributor> {
        let vesting = match (self.start_date, self.cliff_months, self.vesting_months) {
            (None, None, None) => None,
            (Some(start), Some(cliff), Some(months)) => Some(VestingConfig::new(start, cliff, months)),
            _ => {
                return Err(Error::InvalidRoster {
                    row,
                    message: "start_date, cliff_months and vesting_months must be set together"
                        .to_string(),
                })
            }
        };

        Ok(Contributor {
            id: self.id,
            name: self.name.unwrap_or_default(),
            slices: self.slices,
            vesting,
        })
    }
}

/// Reject invalid vesting terms and duplicate ids
pub fn validate_roster(roster: &[Contributor]) -> Result<()> {
    let mut seen = HashSet::with_capacity(roster.len());
    for (idx, contributor) in roster.iter().enumerate() {
        if contributor.id.is_empty() {
            return Err(Error::InvalidRoster {
                row: idx + 1,
                message: "contributor id is empty".to_string(),
            });
        }
        if !seen.insert(contributor.id.as_str()) {
            return Err(Error::DuplicateContributor(contributor.id.clone()));
        }
        if let Some(vesting) = &contributor.vesting {
            vesting.validate()?;
        }
    }
    Ok(())
}

/// Load a roster from a CSV file
pub fn load_roster<P: AsRef<Path>>(path: P) -> Result<Vec<Contributor>> {
    let file = File::open(path.as_ref())?;
    load_roster_from_reader(file)
}

/// Load a roster from any CSV reader (file, string buffer, ...)
pub fn load_roster_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<Contributor>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut roster = Vec::new();

    for (idx, result) in csv_reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        roster.push(row.into_contributor(idx + 1)?);
    }

    validate_roster(&roster)?;
    log::debug!("loaded {} contributors from CSV", roster.len());
    Ok(roster)
}

/// Load a roster from a JSON array of contributors
pub fn load_roster_json<P: AsRef<Path>>(path: P) -> Result<Vec<Contributor>> {
    let file = File::open(path.as_ref())?;
    let roster: Vec<Contributor> = serde_json::from_reader(std::io::BufReader::new(file))?;
    validate_roster(&roster)?;
    log::debug!("loaded {} contributors from JSON", roster.len());
    Ok(roster)
}

/// Pick the loader from the file extension (`.json`, anything else is CSV)
pub fn load_roster_auto<P: AsRef<Path>>(path: P) -> Result<Vec<Contributor>> {
    let path = path.as_ref();
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("json") => load_roster_json(path),
        _ => load_roster(path),
    }
}
