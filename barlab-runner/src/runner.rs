//! Backtest runner — wires together config, data, engine, and analysis.
//!
//! Two entry points:
//! - `run_single_backtest()`: loads bars per the config, then runs. Used by
//!   the CLI.
//! - `run_backtest_on_series()`: takes a pre-loaded series. Used by the
//!   parameter sweep to avoid re-reading the data file per combination.

use barlab_core::data::{generate_synthetic_bars, load_bars_csv, DataError};
use barlab_core::domain::{BarSeries, Position, PriceField, SeriesError, TradeRecord};
use barlab_core::engine::{run_backtest, EngineConfig, EquityPoint};
use barlab_core::strategy::StrategySpec;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::{BacktestConfig, ConfigError, RunId};
use crate::metrics::{cumulative_returns, PerformanceSummary};
use crate::trade_stats::TradeStats;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("data error: {0}")]
    Data(#[from] DataError),

    #[error("synthetic data error: {0}")]
    Synthetic(#[from] SeriesError),
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// Complete result of a single backtest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub run_id: RunId,
    pub symbol: String,
    pub strategy: StrategySpec,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub bar_count: usize,
    pub warmup_bars: usize,
    pub initial_capital: f64,
    pub price_field: PriceField,
    pub risk_free_rate: f64,
    pub final_cash: f64,
    pub final_holdings: f64,
    pub final_equity: f64,
    pub rejection_count: usize,
    pub metrics: PerformanceSummary,
    pub trade_stats: TradeStats,
    pub trades: Vec<TradeRecord>,
    pub equity_curve: Vec<EquityPoint>,
    /// Cumulative return at each bar, aligned with `equity_curve`.
    pub cumulative_returns: Vec<f64>,
    /// Position still open at the end of the series, if any.
    pub open_position: Option<Position>,
    /// Whether the run used generated bars instead of a data file.
    pub synthetic_data: bool,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Run a single backtest from a config, loading bars as configured.
pub fn run_single_backtest(config: &BacktestConfig) -> Result<BacktestResult, RunError> {
    config.validate()?;
    let series = load_series(config)?;
    run_backtest_on_series(config, &series)
}

/// Run a backtest over a pre-loaded series — no I/O.
pub fn run_backtest_on_series(
    config: &BacktestConfig,
    series: &BarSeries,
) -> Result<BacktestResult, RunError> {
    config.validate()?;

    let price_field = config.backtest.price_field;
    let mut strategy = config.strategy.build(price_field).map_err(ConfigError::from)?;
    let engine_config = EngineConfig::new(config.backtest.initial_capital, price_field);

    let result = run_backtest(series, strategy.as_mut(), &engine_config);

    let metrics = PerformanceSummary::compute(&result.equity_curve, config.backtest.risk_free_rate);
    let trade_stats = TradeStats::compute(&result.trades);
    let cumulative = cumulative_returns(&result.equity_curve);

    let start_date = series.first_date().unwrap_or_default();
    let end_date = series.last_date().unwrap_or_default();

    Ok(BacktestResult {
        schema_version: SCHEMA_VERSION,
        run_id: config.run_id(),
        symbol: config.backtest.symbol.clone(),
        strategy: config.strategy.clone(),
        start_date,
        end_date,
        bar_count: result.bar_count,
        warmup_bars: result.warmup_bars,
        initial_capital: result.initial_capital,
        price_field,
        risk_free_rate: config.backtest.risk_free_rate,
        final_cash: result.final_cash,
        final_holdings: result.final_holdings,
        final_equity: result.final_equity,
        rejection_count: result.rejection_count,
        metrics,
        trade_stats,
        trades: result.trades,
        equity_curve: result.equity_curve,
        cumulative_returns: cumulative,
        open_position: result.open_position,
        synthetic_data: config.backtest.synthetic,
    })
}

/// Load the bar series the config points at.
pub fn load_series(config: &BacktestConfig) -> Result<BarSeries, RunError> {
    if let Some(path) = &config.backtest.data_file {
        return Ok(load_bars_csv(path, &config.backtest.symbol)?);
    }
    let (start, end) = config.synthetic_range();
    let bars = generate_synthetic_bars(&config.backtest.symbol, start, end);
    Ok(BarSeries::from_bars(bars)?)
}
