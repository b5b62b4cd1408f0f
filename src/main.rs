//! Equity Projection CLI
//!
//! Projects a contributor roster at a date and prices it when a valuation
//! is supplied.
//!
//! Each feature flag resolves as command-line argument, then
//! `VESTING_ENABLED` / `VALUATION_ENABLED`, then the `--settings` file, then
//! off.

use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::Parser;
use equity_projection::{
    contributor::load_roster_auto,
    projection::ProjectionEngine,
    settings::{load_valuation_config, BlobStore, FeatureFlags, MemoryStore},
    valuation::{allocate, compute_valuation, format_cents, EquityValueRow, ValuationConfig},
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "equity-projection", version, about = "Project vested equity and its value")]
struct Args {
    /// Roster file (.csv or .json)
    #[arg(long)]
    roster: PathBuf,

    /// Projection date (YYYY-MM-DD), defaults to today
    #[arg(long)]
    as_of: Option<NaiveDate>,

    /// Manual company value in cents
    #[arg(long, conflicts_with = "valuation")]
    manual_value: Option<i64>,

    /// Valuation config JSON file
    #[arg(long)]
    valuation: Option<PathBuf>,

    /// Persisted settings JSON object (flags, `valuation_config`)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Show vesting columns (overrides VESTING_ENABLED)
    #[arg(long, action = clap::ArgAction::Set)]
    vesting: Option<bool>,

    /// Price the roster (overrides VALUATION_ENABLED)
    #[arg(long, action = clap::ArgAction::Set)]
    pricing: Option<bool>,

    /// Emit JSON instead of a table
    #[arg(long)]
    json: bool,
}

fn load_store(args: &Args) -> Result<MemoryStore> {
    let Some(path) = &args.settings else {
        return Ok(MemoryStore::new());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading settings {}", path.display()))?;
    MemoryStore::from_json(&raw)
        .with_context(|| format!("parsing settings {}", path.display()))
}

/// `--manual-value`, then `--valuation`, then the stored config
fn load_valuation(
    args: &Args,
    store: &dyn BlobStore,
    current_year: i32,
) -> Result<Option<ValuationConfig>> {
    let config = if let Some(value) = args.manual_value {
        Some(ValuationConfig::manual(value))
    } else if let Some(path) = &args.valuation {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading valuation config {}", path.display()))?;
        let config: ValuationConfig = serde_json::from_str(&raw)
            .with_context(|| format!("parsing valuation config {}", path.display()))?;
        Some(config)
    } else {
        load_valuation_config(store).context("reading stored valuation config")?
    };

    if let Some(config) = &config {
        config.validate(current_year).context("invalid valuation config")?;
    }
    Ok(config)
}

fn print_table(rows: &[EquityValueRow], vesting_enabled: bool) {
    if vesting_enabled {
        println!(
            "{:<16} {:>10} {:>8} {:>18} {:>10} {:>18}",
            "Contributor", "Slices", "Share", "Value", "Vested", "Vested Value"
        );
    } else {
        println!(
            "{:<16} {:>10} {:>8} {:>18}",
            "Contributor", "Slices", "Share", "Value"
        );
    }
    println!("{}", "-".repeat(86));

    for row in rows {
        let label = if row.contributor_name.is_empty() {
            &row.contributor_id
        } else {
            &row.contributor_name
        };
        print!(
            "{:<16} {:>10} {:>7.2}% {:>18}",
            label,
            row.slices,
            row.percentage,
            format_cents(row.total_value)
        );
        match (row.vested_slices, row.vested_value) {
            (Some(vested), Some(value)) => {
                println!(" {:>10} {:>18}", vested, format_cents(value))
            }
            _ => println!(),
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let today = Local::now().date_naive();
    let as_of = args.as_of.unwrap_or(today);

    // Resolved once here and passed down; the calculators never see them
    let store = load_store(&args)?;
    let flags = FeatureFlags::from_args_and_env(args.vesting, args.pricing, &store)
        .context("resolving feature flags")?;
    let vesting_enabled = flags.vesting_enabled;

    let roster = load_roster_auto(&args.roster)
        .with_context(|| format!("loading roster {}", args.roster.display()))?;
    let projection = ProjectionEngine::new()
        .project(as_of, &roster)
        .context("projecting roster")?;

    let valuation = if flags.valuation_enabled {
        load_valuation(&args, &store, today.year())?
    } else {
        None
    };
    let total_value = valuation
        .as_ref()
        .map(compute_valuation)
        .transpose()?
        .unwrap_or(0);

    let rows: Vec<EquityValueRow> = allocate(total_value, &projection)
        .into_iter()
        .map(|row| {
            if vesting_enabled {
                row
            } else {
                row.without_vesting()
            }
        })
        .collect();

    if args.json {
        let output = serde_json::json!({
            "projection": projection,
            "totalValue": total_value,
            "rows": rows,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("Equity as of {} ({} contributors)", as_of, roster.len());
    println!();
    print_table(&rows, vesting_enabled);

    let summary = projection.summary();
    println!();
    println!("Total slices: {}", summary.total_slices);
    if vesting_enabled {
        println!("Vested: {} ({:.2}%)", summary.total_vested, summary.percent_vested);
        println!(
            "  pre-cliff: {}, vesting: {}, fully vested: {}, no schedule: {}",
            summary.pre_cliff, summary.vesting, summary.fully_vested, summary.unrestricted
        );
        if let Some(date) = projection.next_cliff_date {
            println!("Next cliff: {}", date);
        }
        if let Some(date) = projection.next_full_vest_date {
            println!("Next full vest: {}", date);
        }
    }
    if valuation.is_some() {
        println!("Company value: {}", format_cents(total_value));
    }

    Ok(())
}
