//! Valuation settings and business metrics

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Most profit-history years kept on a valuation config
pub const MAX_PROFIT_HISTORY: usize = 5;

/// Source of the company's total value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ValuationMode {
    /// User-entered figure
    Manual,
    /// Derived from business metrics
    Auto,
}

/// Profit for one past year, in cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfitRecord {
    pub year: i32,
    pub profit: i64,
}

/// Inputs to the auto valuation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessMetrics {
    /// Current-year profit in cents, may be negative
    pub current_year_profit: i64,

    /// Up to five past years, most recent first
    #[serde(default)]
    pub profit_history: Vec<ProfitRecord>,

    /// Annual churn in percent
    #[serde(default)]
    pub churn_rate: Option<f64>,
}

impl BusinessMetrics {
    pub fn new(current_year_profit: i64) -> Self {
        Self {
            current_year_profit,
            profit_history: Vec::new(),
            churn_rate: None,
        }
    }

    pub fn with_history(mut self, history: Vec<ProfitRecord>) -> Self {
        self.profit_history = history;
        self
    }

    pub fn with_churn_rate(mut self, churn_rate: f64) -> Self {
        self.churn_rate = Some(churn_rate);
        self
    }

    /// Churn must be a number within [0, 100] when present
    pub fn validate_churn(&self) -> Result<(), ConfigurationError> {
        match self.churn_rate {
            Some(rate) if !(0.0..=100.0).contains(&rate) => {
                Err(ConfigurationError::ChurnRateOutOfRange(rate))
            }
            _ => Ok(()),
        }
    }

    /// Full entry-time check against the current calendar year
    pub fn validate(&self, current_year: i32) -> Result<(), ConfigurationError> {
        if self.profit_history.len() > MAX_PROFIT_HISTORY {
            return Err(ConfigurationError::ProfitHistoryTooLong(self.profit_history.len()));
        }

        for record in &self.profit_history {
            if record.year >= current_year {
                return Err(ConfigurationError::ProfitHistoryNotPast {
                    year: record.year,
                    current_year,
                });
            }
        }

        for pair in self.profit_history.windows(2) {
            if pair[1].year >= pair[0].year {
                return Err(ConfigurationError::ProfitHistoryOrder {
                    previous: pair[0].year,
                    next: pair[1].year,
                });
            }
        }

        self.validate_churn()
    }
}

/// Valuation settings as persisted by the settings collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValuationConfig {
    /// Display gate, not read by the calculators
    #[serde(default)]
    pub enabled: bool,

    /// Display gate, not read by the calculators
    #[serde(default)]
    pub disclaimer_acknowledged: bool,

    pub mode: ValuationMode,

    /// Company value in cents, authoritative in manual mode
    #[serde(default)]
    pub manual_value: Option<i64>,

    /// Authoritative in auto mode
    #[serde(default)]
    pub business_metrics: Option<BusinessMetrics>,
}

impl ValuationConfig {
    pub fn manual(value_cents: i64) -> Self {
        Self {
            enabled: true,
            disclaimer_acknowledged: false,
            mode: ValuationMode::Manual,
            manual_value: Some(value_cents),
            business_metrics: None,
        }
    }

    pub fn auto(metrics: BusinessMetrics) -> Self {
        Self {
            enabled: true,
            disclaimer_acknowledged: false,
            mode: ValuationMode::Auto,
            manual_value: None,
            business_metrics: Some(metrics),
        }
    }

    /// Manual value, checked present and non-negative
    pub fn required_manual_value(&self) -> Result<i64, ConfigurationError> {
        match self.manual_value {
            None => Err(ConfigurationError::MissingManualValue),
            Some(v) if v < 0 => Err(ConfigurationError::NegativeManualValue(v)),
            Some(v) => Ok(v),
        }
    }

    /// Business metrics, checked present
    pub fn required_business_metrics(&self) -> Result<&BusinessMetrics, ConfigurationError> {
        self.business_metrics
            .as_ref()
            .ok_or(ConfigurationError::MissingBusinessMetrics)
    }

    /// Settings-save validation: the selected mode's inputs must be well formed.
    ///
    /// The field belonging to the other mode is kept untouched so switching
    /// modes back and forth loses nothing.
    pub fn validate(&self, current_year: i32) -> Result<(), ConfigurationError> {
        match self.mode {
            ValuationMode::Manual => self.required_manual_value().map(|_| ()),
            ValuationMode::Auto => self.required_business_metrics()?.validate(current_year),
        }
    }
}
