//! Contributor roster data structures and loading

mod data;
pub mod loader;

pub use data::{Contributor, VestingConfig};
pub use loader::{load_roster, load_roster_auto, load_roster_from_reader, load_roster_json, validate_roster};
