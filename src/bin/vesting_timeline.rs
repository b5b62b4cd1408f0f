//! Export a roster's vesting timeline as CSV
//!
//! Configuration comes from the environment:
//! - `ROSTER_PATH` (default `roster.csv`)
//! - `TIMELINE_START` (YYYY-MM-DD, default today)
//! - `TIMELINE_MONTHS` (default 48)
//! - `TIMELINE_STEP` (months between points, default 1)
//! - `OUTPUT_PATH` (default `vesting_timeline.csv`)

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use equity_projection::{ScenarioRunner, VestingState};
use serde::Serialize;
use std::env;
use std::time::Instant;

/// One output line per (date, contributor)
#[derive(Debug, Serialize)]
struct TimelineRow<'a> {
    date: NaiveDate,
    contributor_id: &'a str,
    state: VestingState,
    slices: u64,
    vested_slices: u64,
    unvested_slices: u64,
    percent_vested: f64,
}

fn env_or<T: std::str::FromStr>(var: &str, default: T) -> T {
    env::var(var)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn main() -> Result<()> {
    env_logger::init();

    let roster_path: String = env_or("ROSTER_PATH", "roster.csv".to_string());
    let start: NaiveDate = env_or("TIMELINE_START", Local::now().date_naive());
    let months: u32 = env_or("TIMELINE_MONTHS", 48);
    let step: u32 = env_or("TIMELINE_STEP", 1);
    let output_path: String = env_or("OUTPUT_PATH", "vesting_timeline.csv".to_string());

    let started = Instant::now();
    let runner = ScenarioRunner::from_path(&roster_path)
        .with_context(|| format!("loading roster {}", roster_path))?;
    println!("Loaded {} contributors in {:?}", runner.roster().len(), started.elapsed());

    let results = runner
        .timeline(start, months, step)
        .context("projecting timeline")?;
    println!("Projected {} dates in {:?}", results.len(), started.elapsed());

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {}", output_path))?;
    for result in &results {
        for row in &result.per_contributor {
            writer.serialize(TimelineRow {
                date: result.target_date,
                contributor_id: &row.contributor_id,
                state: row.state,
                slices: row.slices,
                vested_slices: row.vested_slices,
                unvested_slices: row.unvested_slices,
                percent_vested: row.percent_vested,
            })?;
        }
    }
    writer.flush()?;

    println!("Output written to {}", output_path);
    if let (Some(first), Some(last)) = (results.first(), results.last()) {
        println!("\nTimeline Summary:");
        println!("  {}: {:.2}% vested", first.target_date, first.totals.percent_vested());
        println!("  {}: {:.2}% vested", last.target_date, last.totals.percent_vested());
    }

    Ok(())
}
