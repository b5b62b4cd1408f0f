//! Feature flags and the persisted settings seam
//!
//! Flags are resolved once at startup (`override ?? persisted ?? default`)
//! and passed down as plain values. The calculators never read them. The
//! CLI layers its arguments over the environment to form the override.

use std::collections::HashMap;
use std::env;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::valuation::{ValuationConfig, ValuationHistory};

pub const VESTING_ENABLED_KEY: &str = "vesting_enabled";
pub const VALUATION_ENABLED_KEY: &str = "valuation_enabled";
pub const VALUATION_CONFIG_KEY: &str = "valuation_config";
pub const VALUATION_HISTORY_KEY: &str = "valuation_history";

pub const VESTING_ENABLED_ENV: &str = "VESTING_ENABLED";
pub const VALUATION_ENABLED_ENV: &str = "VALUATION_ENABLED";

/// Opaque key-value store owned by the persistence layer
pub trait BlobStore: Send + Sync {
    /// Value for `key`, `None` when unset
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// In-process `BlobStore`
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store from a JSON object of settings.
    ///
    /// String values are stored as-is; any other value is stored as its JSON
    /// text, so `{"vesting_enabled": true, "valuation_config": {...}}` works.
    pub fn from_json(raw: &str) -> Result<Self> {
        let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(raw)?;
        let values = map
            .into_iter()
            .map(|(key, value)| match value {
                serde_json::Value::String(text) => (key, text),
                other => (key, other.to_string()),
            })
            .collect();
        Ok(Self {
            values: RwLock::new(values),
        })
    }
}

impl BlobStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let values = self
            .values
            .read()
            .map_err(|e| Error::Store(format!("lock poisoned: {}", e)))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut values = self
            .values
            .write()
            .map_err(|e| Error::Store(format!("lock poisoned: {}", e)))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// `explicit_override ?? persisted ?? default`
pub fn resolve_flag(explicit_override: Option<bool>, persisted: Option<bool>, default: bool) -> bool {
    explicit_override.or(persisted).unwrap_or(default)
}

/// Lenient boolean parse for env vars and stored values
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Read a flag override from the environment, ignoring unparsable values
pub fn env_override(var: &str) -> Option<bool> {
    let raw = env::var(var).ok()?;
    let parsed = parse_flag(&raw);
    if parsed.is_none() {
        log::warn!("ignoring {}={:?}: not a boolean", var, raw);
    }
    parsed
}

fn persisted_flag(store: &dyn BlobStore, key: &str) -> Result<Option<bool>> {
    Ok(store.get(key)?.as_deref().and_then(parse_flag))
}

/// UI feature switches, resolved once and handed to the composition root
///
/// Both default to off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFlags {
    pub vesting_enabled: bool,
    pub valuation_enabled: bool,
}

impl FeatureFlags {
    /// Resolve from explicit overrides and the store, falling back to defaults
    pub fn resolve(
        vesting_override: Option<bool>,
        valuation_override: Option<bool>,
        store: &dyn BlobStore,
    ) -> Result<Self> {
        let defaults = Self::default();
        let flags = Self {
            vesting_enabled: resolve_flag(
                vesting_override,
                persisted_flag(store, VESTING_ENABLED_KEY)?,
                defaults.vesting_enabled,
            ),
            valuation_enabled: resolve_flag(
                valuation_override,
                persisted_flag(store, VALUATION_ENABLED_KEY)?,
                defaults.valuation_enabled,
            ),
        };
        log::debug!("resolved feature flags: {:?}", flags);
        Ok(flags)
    }

    /// Resolve with overrides taken from `VESTING_ENABLED` / `VALUATION_ENABLED`
    pub fn from_env(store: &dyn BlobStore) -> Result<Self> {
        Self::from_args_and_env(None, None, store)
    }

    /// Resolve `argument ?? environment ?? persisted ?? default` per flag
    pub fn from_args_and_env(
        vesting_arg: Option<bool>,
        valuation_arg: Option<bool>,
        store: &dyn BlobStore,
    ) -> Result<Self> {
        Self::resolve(
            vesting_arg.or_else(|| env_override(VESTING_ENABLED_ENV)),
            valuation_arg.or_else(|| env_override(VALUATION_ENABLED_ENV)),
            store,
        )
    }
}

/// Persist the vesting toggle. Only the flag key is written.
pub fn set_vesting_enabled(store: &dyn BlobStore, enabled: bool) -> Result<()> {
    store.set(VESTING_ENABLED_KEY, &enabled.to_string())
}

/// Persist the valuation toggle. Only the flag key is written.
pub fn set_valuation_enabled(store: &dyn BlobStore, enabled: bool) -> Result<()> {
    store.set(VALUATION_ENABLED_KEY, &enabled.to_string())
}

/// Validate and store a valuation config; nothing is written on error
pub fn save_valuation_config(
    store: &dyn BlobStore,
    config: &ValuationConfig,
    current_year: i32,
) -> Result<()> {
    config.validate(current_year)?;
    store.set(VALUATION_CONFIG_KEY, &serde_json::to_string(config)?)
}

pub fn load_valuation_config(store: &dyn BlobStore) -> Result<Option<ValuationConfig>> {
    match store.get(VALUATION_CONFIG_KEY)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub fn save_valuation_history(store: &dyn BlobStore, history: &ValuationHistory) -> Result<()> {
    store.set(VALUATION_HISTORY_KEY, &serde_json::to_string(history)?)
}

/// Stored history, empty when nothing has been recorded yet
pub fn load_valuation_history(store: &dyn BlobStore) -> Result<ValuationHistory> {
    match store.get(VALUATION_HISTORY_KEY)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(ValuationHistory::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigurationError;
    use crate::valuation::compute_valuation;

    #[test]
    fn test_resolve_flag_precedence() {
        assert!(resolve_flag(Some(true), Some(false), false));
        assert!(!resolve_flag(Some(false), Some(true), true));
        assert!(resolve_flag(None, Some(true), false));
        assert!(resolve_flag(None, None, true));
        assert!(!resolve_flag(None, None, false));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag(" on "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn test_flags_from_store_and_overrides() {
        let store = MemoryStore::new();
        assert_eq!(FeatureFlags::resolve(None, None, &store).unwrap(), FeatureFlags::default());

        set_vesting_enabled(&store, true).unwrap();
        let flags = FeatureFlags::resolve(None, Some(true), &store).unwrap();
        assert!(flags.vesting_enabled);
        assert!(flags.valuation_enabled);

        let flags = FeatureFlags::resolve(Some(false), None, &store).unwrap();
        assert!(!flags.vesting_enabled);
    }

    // The only test that touches the flag env vars
    #[test]
    fn test_flag_layers_args_env_store_default() {
        env::remove_var(VESTING_ENABLED_ENV);
        env::remove_var(VALUATION_ENABLED_ENV);

        let empty = MemoryStore::new();
        assert_eq!(FeatureFlags::from_env(&empty).unwrap(), FeatureFlags::default());
        assert_eq!(
            FeatureFlags::from_args_and_env(None, None, &empty).unwrap(),
            FeatureFlags::default()
        );

        let store = MemoryStore::new();
        set_vesting_enabled(&store, true).unwrap();
        set_valuation_enabled(&store, false).unwrap();

        env::set_var(VALUATION_ENABLED_ENV, "on");
        let flags = FeatureFlags::from_args_and_env(None, None, &store).unwrap();
        assert!(flags.vesting_enabled);
        assert!(flags.valuation_enabled);

        env::set_var(VESTING_ENABLED_ENV, "off");
        let flags = FeatureFlags::from_args_and_env(Some(true), Some(false), &store).unwrap();
        assert!(flags.vesting_enabled);
        assert!(!flags.valuation_enabled);

        let flags = FeatureFlags::from_args_and_env(None, None, &store).unwrap();
        assert!(!flags.vesting_enabled);

        env::remove_var(VESTING_ENABLED_ENV);
        env::remove_var(VALUATION_ENABLED_ENV);
    }

    #[test]
    fn test_store_from_json() {
        let store = MemoryStore::from_json(
            r#"{"vesting_enabled": true, "valuation_enabled": "off",
                "valuation_config": {"enabled": true, "disclaimerAcknowledged": true,
                                     "mode": "manual", "manualValue": 1000}}"#,
        )
        .unwrap();

        let flags = FeatureFlags::resolve(None, None, &store).unwrap();
        assert!(flags.vesting_enabled);
        assert!(!flags.valuation_enabled);

        let config = load_valuation_config(&store).unwrap().unwrap();
        assert_eq!(config.manual_value, Some(1_000));

        assert!(MemoryStore::from_json("[1, 2]").is_err());
    }

    #[test]
    fn test_toggling_preserves_valuation_config() {
        let store = MemoryStore::new();
        let config = ValuationConfig::manual(50_000_000);
        save_valuation_config(&store, &config, 2026).unwrap();

        set_valuation_enabled(&store, false).unwrap();
        set_valuation_enabled(&store, true).unwrap();

        assert_eq!(load_valuation_config(&store).unwrap(), Some(config));
    }

    #[test]
    fn test_invalid_config_not_saved() {
        let store = MemoryStore::new();
        let err = save_valuation_config(&store, &ValuationConfig::manual(-1), 2026).unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration(ConfigurationError::NegativeManualValue(-1))
        ));
        assert_eq!(load_valuation_config(&store).unwrap(), None);
    }

    #[test]
    fn test_history_persists() {
        let store = MemoryStore::new();
        assert!(load_valuation_history(&store).unwrap().is_empty());

        let config = ValuationConfig::manual(1_000);
        let mut history = ValuationHistory::new();
        history.record(&config, compute_valuation(&config).unwrap());
        save_valuation_history(&store, &history).unwrap();

        let restored = load_valuation_history(&store).unwrap();
        assert_eq!(restored.len(), 1);
        assert_eq!(restored.latest().unwrap().value, 1_000);
    }

    #[test]
    fn test_oversized_stored_history_loads_bounded() {
        use crate::valuation::HISTORY_CAPACITY;
        use chrono::{Duration, TimeZone, Utc};

        let start = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        let mut entries = Vec::new();
        for i in 0..25u64 {
            let mut history = ValuationHistory::new();
            let config = ValuationConfig::manual(i as i64);
            history.record_at(&config, i, start + Duration::days(i as i64));
            entries.push(history.latest().unwrap().clone());
        }

        let store = MemoryStore::new();
        store
            .set(VALUATION_HISTORY_KEY, &serde_json::to_string(&entries).unwrap())
            .unwrap();

        let loaded = load_valuation_history(&store).unwrap();
        assert_eq!(loaded.len(), HISTORY_CAPACITY);
        assert_eq!(loaded.latest().unwrap().value, 24);
        assert_eq!(loaded.iter().last().unwrap().value, 5);
    }
}
