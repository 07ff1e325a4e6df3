//! Report artifacts for a completed run.
//!
//! Writes a per-run directory under the output root:
//! - `summary.json` — headline numbers plus dataset provenance
//! - `trades.json` — profit/return statistics per ledger subset
//! - `trades.csv` — the full trade ledger, one row per round trip
//! - `equity.csv` — the equity curve for downstream charting
//!
//! The engine knows nothing about these formats; everything here consumes
//! the plain result structs.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::metrics::PerformanceSummary;
use crate::runner::BacktestResult;
use crate::trade_stats::TradeProfile;

/// Headline summary written to `summary.json`.
#[derive(Debug, Serialize)]
struct SummaryArtifact<'a> {
    ticker: &'a str,
    run_id: &'a str,
    strategy: &'a barlab_core::strategy::StrategySpec,
    starting_capital: f64,
    final_portfolio_value: f64,
    metrics: &'a PerformanceSummary,
    total_trades: usize,
    wins: usize,
    losses: usize,
    rejections: usize,
    dataset: DatasetInfo,
}

#[derive(Debug, Serialize)]
struct DatasetInfo {
    rows: usize,
    frequency: &'static str,
    start_date: chrono::NaiveDate,
    end_date: chrono::NaiveDate,
    price_field: barlab_core::domain::PriceField,
    synthetic: bool,
}

/// Per-subset statistics written to `trades.json`. Subsets without trades
/// are omitted entirely rather than zero-filled.
#[derive(Debug, Serialize)]
struct TradesArtifact<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    total_trades: Option<&'a TradeProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    profitable_trades: Option<&'a TradeProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    unprofitable_trades: Option<&'a TradeProfile>,
}

/// Write the full artifact set. Returns the run directory.
pub fn save_artifacts(result: &BacktestResult, output_dir: &Path) -> Result<PathBuf> {
    let short_id = &result.run_id[..result.run_id.len().min(8)];
    let run_dir = output_dir.join(format!("{}_{short_id}", result.symbol));
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create {}", run_dir.display()))?;

    write_summary_json(&run_dir.join("summary.json"), result)?;
    write_trades_json(&run_dir.join("trades.json"), result)?;
    write_trades_csv(&run_dir.join("trades.csv"), result)?;
    write_equity_csv(&run_dir.join("equity.csv"), result)?;

    Ok(run_dir)
}

fn write_summary_json(path: &Path, result: &BacktestResult) -> Result<()> {
    let artifact = SummaryArtifact {
        ticker: &result.symbol,
        run_id: &result.run_id,
        strategy: &result.strategy,
        starting_capital: result.initial_capital,
        final_portfolio_value: result.final_equity,
        metrics: &result.metrics,
        total_trades: result.trade_stats.count,
        wins: result.trade_stats.winning_count,
        losses: result.trade_stats.losing_count,
        rejections: result.rejection_count,
        dataset: DatasetInfo {
            rows: result.bar_count,
            frequency: "daily",
            start_date: result.start_date,
            end_date: result.end_date,
            price_field: result.price_field,
            synthetic: result.synthetic_data,
        },
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create summary {}", path.display()))?;
    serde_json::to_writer_pretty(file, &artifact).context("failed to write summary.json")?;
    Ok(())
}

fn write_trades_json(path: &Path, result: &BacktestResult) -> Result<()> {
    let artifact = TradesArtifact {
        total_trades: result.trade_stats.all.as_ref(),
        profitable_trades: result.trade_stats.winning.as_ref(),
        unprofitable_trades: result.trade_stats.losing.as_ref(),
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create trades {}", path.display()))?;
    serde_json::to_writer_pretty(file, &artifact).context("failed to write trades.json")?;
    Ok(())
}

fn write_trades_csv(path: &Path, result: &BacktestResult) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create trades CSV {}", path.display()))?;
    for trade in &result.trades {
        writer
            .serialize(trade)
            .context("failed to write trade record")?;
    }
    writer.flush().context("failed to flush trades CSV")?;
    Ok(())
}

fn write_equity_csv(path: &Path, result: &BacktestResult) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("failed to create equity CSV {}", path.display()))?;
    writeln!(file, "date,equity,cumulative_return")?;
    for (point, cum) in result
        .equity_curve
        .iter()
        .zip(result.cumulative_returns.iter())
    {
        writeln!(file, "{},{:.4},{:.6}", point.date, point.equity, cum)?;
    }
    Ok(())
}
