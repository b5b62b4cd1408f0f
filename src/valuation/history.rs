//! Append-only log of computed valuations, newest first

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::VecDeque;
use uuid::Uuid;

use super::config::{BusinessMetrics, ValuationConfig, ValuationMode};

/// Entries retained before the oldest is evicted
pub const HISTORY_CAPACITY: usize = 20;

/// Inputs frozen at the time a valuation was recorded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationInputs {
    pub manual_value: Option<i64>,
    pub business_metrics: Option<BusinessMetrics>,
}

/// One recorded valuation, immutable once created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationHistoryEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub mode: ValuationMode,
    /// Cents
    pub value: u64,
    pub inputs: ValuationInputs,
}

impl ValuationHistoryEntry {
    /// Snapshot only the inputs the selected mode reads
    fn snapshot(config: &ValuationConfig, value: u64, timestamp: DateTime<Utc>) -> Self {
        let inputs = match config.mode {
            ValuationMode::Manual => ValuationInputs {
                manual_value: config.manual_value,
                business_metrics: None,
            },
            ValuationMode::Auto => ValuationInputs {
                manual_value: None,
                business_metrics: config.business_metrics.clone(),
            },
        };

        Self {
            id: Uuid::new_v4(),
            timestamp,
            mode: config.mode,
            value,
            inputs,
        }
    }
}

/// Bounded valuation log
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ValuationHistory {
    entries: VecDeque<ValuationHistoryEntry>,
}

impl<'de> Deserialize<'de> for ValuationHistory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = Vec::<ValuationHistoryEntry>::deserialize(deserializer)?;
        Ok(Self::from_entries(entries))
    }
}

impl ValuationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a log from stored entries, keeping the newest `HISTORY_CAPACITY`.
    ///
    /// Entries are ordered newest first by timestamp; ties keep their given order.
    pub fn from_entries(entries: impl IntoIterator<Item = ValuationHistoryEntry>) -> Self {
        let mut entries: Vec<_> = entries.into_iter().collect();
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        if entries.len() > HISTORY_CAPACITY {
            log::warn!(
                "dropping {} valuation history entries beyond capacity {}",
                entries.len() - HISTORY_CAPACITY,
                HISTORY_CAPACITY
            );
            entries.truncate(HISTORY_CAPACITY);
        }

        Self {
            entries: entries.into(),
        }
    }

    /// Record a valuation now
    pub fn record(&mut self, config: &ValuationConfig, value: u64) -> &ValuationHistoryEntry {
        self.record_at(config, value, Utc::now())
    }

    /// Record a valuation with an explicit timestamp
    pub fn record_at(
        &mut self,
        config: &ValuationConfig,
        value: u64,
        timestamp: DateTime<Utc>,
    ) -> &ValuationHistoryEntry {
        self.entries
            .push_front(ValuationHistoryEntry::snapshot(config, value, timestamp));

        while self.entries.len() > HISTORY_CAPACITY {
            if let Some(evicted) = self.entries.pop_back() {
                log::debug!("evicted valuation history entry {}", evicted.id);
            }
        }

        &self.entries[0]
    }

    /// Newest entry
    pub fn latest(&self) -> Option<&ValuationHistoryEntry> {
        self.entries.front()
    }

    /// Entries, newest first
    pub fn iter(&self) -> impl Iterator<Item = &ValuationHistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
