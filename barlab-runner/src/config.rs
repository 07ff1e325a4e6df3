//! Serializable backtest configuration.
//!
//! A run is fully described by a TOML document: the `[backtest]` section
//! (symbol, data source, capital, price field, risk-free rate) and a
//! `[strategy]` table that deserializes into the core `StrategySpec`.
//! Validation happens before any bar is processed — a run never starts
//! partially configured.

use barlab_core::domain::PriceField;
use barlab_core::strategy::{self, StrategySpec};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Unique identifier for a backtest run (content-addressable hash).
pub type RunId = String;

/// Errors from configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("symbol must not be empty")]
    EmptySymbol,

    #[error("initial_capital must be > 0, got {0}")]
    NonPositiveCapital(f64),

    #[error("risk_free_rate must be within [0, 1), got {0}")]
    BadRiskFreeRate(f64),

    #[error("exactly one of data_file or synthetic = true is required")]
    AmbiguousDataSource,

    #[error("synthetic start date {start} is not before end date {end}")]
    BadSyntheticRange { start: NaiveDate, end: NaiveDate },

    #[error("strategy: {0}")]
    Strategy(#[from] strategy::ConfigError),
}

/// Serializable configuration for a single backtest run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    pub backtest: BacktestSection,
    pub strategy: StrategySpec,
}

/// The `[backtest]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSection {
    /// Ticker of the instrument under test.
    pub symbol: String,

    /// CSV file with the historical bars. Mutually exclusive with `synthetic`.
    #[serde(default)]
    pub data_file: Option<PathBuf>,

    /// Generate deterministic synthetic bars instead of reading a file.
    #[serde(default)]
    pub synthetic: bool,

    /// Synthetic date range (defaults to 2020-01-02 .. 2023-12-29).
    #[serde(default)]
    pub synthetic_start: Option<NaiveDate>,
    #[serde(default)]
    pub synthetic_end: Option<NaiveDate>,

    pub initial_capital: f64,

    /// Which price column drives indicators and fills.
    #[serde(default)]
    pub price_field: PriceField,

    /// Annual risk-free rate for the Sharpe ratio (e.g. 0.05).
    #[serde(default)]
    pub risk_free_rate: f64,
}

impl BacktestConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every parameter; reports the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let b = &self.backtest;
        if b.symbol.trim().is_empty() {
            return Err(ConfigError::EmptySymbol);
        }
        if b.initial_capital <= 0.0 {
            return Err(ConfigError::NonPositiveCapital(b.initial_capital));
        }
        if !(0.0..1.0).contains(&b.risk_free_rate) {
            return Err(ConfigError::BadRiskFreeRate(b.risk_free_rate));
        }
        if b.data_file.is_some() == b.synthetic {
            return Err(ConfigError::AmbiguousDataSource);
        }
        if b.synthetic {
            let (start, end) = self.synthetic_range();
            if start >= end {
                return Err(ConfigError::BadSyntheticRange { start, end });
            }
        }
        self.strategy.validate()?;
        Ok(())
    }

    /// The synthetic date range with defaults applied.
    pub fn synthetic_range(&self) -> (NaiveDate, NaiveDate) {
        let start = self
            .backtest
            .synthetic_start
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(2020, 1, 2).expect("valid date"));
        let end = self
            .backtest
            .synthetic_end
            .unwrap_or_else(|| NaiveDate::from_ymd_opt(2023, 12, 29).expect("valid date"));
        (start, end)
    }

    /// Computes a deterministic hash ID for this configuration.
    ///
    /// Two runs with identical configs share a RunId, which makes results
    /// content-addressable.
    pub fn run_id(&self) -> RunId {
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
