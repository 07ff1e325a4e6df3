//! Parameter sweep utilities for grid search over one strategy family.
//!
//! Each combination is a fully isolated run: the bar series is loaded once
//! and shared read-only, while every run owns its strategy, broker, and
//! position state — so the grid fans out safely across threads with rayon.

use barlab_core::domain::BarSeries;
use barlab_core::strategy::StrategySpec;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::BacktestConfig;
use crate::runner::{run_backtest_on_series, RunError};

/// Grid of SMA crossover parameters to test.
#[derive(Debug, Clone)]
pub struct SmaCrossoverGrid {
    pub periods: Vec<usize>,
    pub share_counts: Vec<f64>,
}

impl SmaCrossoverGrid {
    /// A small default grid: classic short/medium/long trend periods.
    pub fn default_grid() -> Self {
        Self {
            periods: vec![10, 15, 20, 50, 100, 200],
            share_counts: vec![10.0],
        }
    }

    /// Total number of combinations.
    pub fn size(&self) -> usize {
        self.periods.len() * self.share_counts.len()
    }

    /// All configurations in the grid, derived from a base config.
    pub fn generate_configs(&self, base: &BacktestConfig) -> Vec<BacktestConfig> {
        let mut configs = Vec::with_capacity(self.size());
        for &period in &self.periods {
            for &shares in &self.share_counts {
                let mut config = base.clone();
                config.strategy = StrategySpec::SmaCrossover { period, shares };
                configs.push(config);
            }
        }
        configs
    }
}

/// One row of a sweep report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepRow {
    pub strategy: StrategySpec,
    pub total_return: f64,
    pub sharpe: Option<f64>,
    pub max_drawdown: f64,
    pub trade_count: usize,
    pub final_equity: f64,
}

/// Run every configuration against the shared series, in parallel.
///
/// Rows come back in grid order regardless of which thread finished first.
pub fn run_sweep(
    configs: &[BacktestConfig],
    series: &BarSeries,
) -> Result<Vec<SweepRow>, RunError> {
    configs
        .par_iter()
        .map(|config| {
            let result = run_backtest_on_series(config, series)?;
            Ok(SweepRow {
                strategy: result.strategy,
                total_return: result.metrics.total_return,
                sharpe: result.metrics.sharpe,
                max_drawdown: result.metrics.max_drawdown,
                trade_count: result.trade_stats.count,
                final_equity: result.final_equity,
            })
        })
        .collect()
}
