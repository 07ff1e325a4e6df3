//! BarLab CLI — run backtests and parameter sweeps.
//!
//! Commands:
//! - `run` — execute a backtest from a TOML config file, print a summary,
//!   save report artifacts
//! - `sweep` — grid-search SMA crossover periods over one data set
//!
//! Exit codes follow the monitoring convention the reports feed into:
//! 0 (ok) when the run's Sharpe ratio is positive, 2 (critical) when it is
//! not, 3 (unknown) when the run could not be evaluated at all (bad
//! arguments, config, or data). This policy lives here, not in the engine.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use barlab_runner::{
    run_single_backtest, runner::load_series, save_artifacts, BacktestConfig, BacktestResult,
    SmaCrossoverGrid,
};

const EXIT_OK: u8 = 0;
const EXIT_CRITICAL: u8 = 2;
const EXIT_UNKNOWN: u8 = 3;

#[derive(Parser)]
#[command(name = "barlab", about = "BarLab — bar-driven strategy backtesting engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a backtest from a TOML config file.
    Run {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// Output directory for report artifacts.
        #[arg(long, default_value = "results")]
        output_dir: PathBuf,

        /// Skip writing artifacts; print the summary only.
        #[arg(long, default_value_t = false)]
        no_artifacts: bool,
    },
    /// Grid-search SMA crossover periods using a config as the base run.
    Sweep {
        /// Path to a TOML config file (symbol, data source, capital).
        #[arg(long)]
        config: PathBuf,

        /// Periods to test.
        #[arg(long, value_delimiter = ',', default_values_t = vec![10usize, 15, 20, 50, 100, 200])]
        periods: Vec<usize>,

        /// Fixed share count per entry.
        #[arg(long, default_value_t = 10.0)]
        shares: f64,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let outcome = match cli.command {
        Commands::Run {
            config,
            output_dir,
            no_artifacts,
        } => cmd_run(&config, &output_dir, no_artifacts),
        Commands::Sweep {
            config,
            periods,
            shares,
        } => cmd_sweep(&config, periods, shares),
    };

    match outcome {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("UNKNOWN - {err:#}");
            ExitCode::from(EXIT_UNKNOWN)
        }
    }
}

fn cmd_run(config_path: &PathBuf, output_dir: &PathBuf, no_artifacts: bool) -> Result<u8> {
    let config = BacktestConfig::from_file(config_path)?;
    let result = run_single_backtest(&config)?;

    print_summary(&result);

    if !no_artifacts {
        let run_dir = save_artifacts(&result, output_dir)?;
        println!("Artifacts saved to: {}", run_dir.display());
    }

    // Monitoring status from the Sharpe sign; undefined stays unknown.
    Ok(match result.metrics.sharpe {
        Some(sharpe) if sharpe > 0.0 => EXIT_OK,
        Some(_) => EXIT_CRITICAL,
        None => EXIT_UNKNOWN,
    })
}

fn cmd_sweep(config_path: &PathBuf, periods: Vec<usize>, shares: f64) -> Result<u8> {
    let base = BacktestConfig::from_file(config_path)?;
    let series = load_series(&base)?;
    let grid = SmaCrossoverGrid {
        periods,
        share_counts: vec![shares],
    };
    let configs = grid.generate_configs(&base);
    let rows = barlab_runner::run_sweep(&configs, &series)?;

    println!(
        "{:<24} {:>12} {:>10} {:>10} {:>8} {:>14}",
        "Strategy", "Return", "Sharpe", "MaxDD", "Trades", "Final Equity"
    );
    println!("{}", "-".repeat(82));
    for row in &rows {
        let sharpe = row
            .sharpe
            .map(|s| format!("{s:.3}"))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "{:<24} {:>11.2}% {:>10} {:>9.2}% {:>8} {:>14.2}",
            describe_strategy(&row.strategy),
            row.total_return * 100.0,
            sharpe,
            row.max_drawdown * 100.0,
            row.trade_count,
            row.final_equity,
        );
    }

    Ok(EXIT_OK)
}

fn describe_strategy(spec: &barlab_core::strategy::StrategySpec) -> String {
    use barlab_core::strategy::StrategySpec::*;
    match spec {
        BollingerReversion { period, multiplier } => {
            format!("bollinger({period},{multiplier})")
        }
        SmaCrossover { period, shares } => format!("sma_cross({period})x{shares}"),
        Rsi2 {
            entry_period,
            exit_period,
            rsi_period,
            ..
        } => format!("rsi2({entry_period},{exit_period},{rsi_period})"),
    }
}

fn print_summary(result: &BacktestResult) {
    println!();
    println!("=== Backtest Result ===");
    println!("Symbol:         {}", result.symbol);
    println!("Strategy:       {}", describe_strategy(&result.strategy));
    println!(
        "Period:         {} to {}",
        result.start_date, result.end_date
    );
    println!(
        "Bars:           {} ({} warmup)",
        result.bar_count, result.warmup_bars
    );
    println!("Rejections:     {}", result.rejection_count);
    println!();
    println!("--- Performance ---");
    println!("Starting Cash:  {:.2}", result.initial_capital);
    println!("Final Value:    {:.2}", result.final_equity);
    println!(
        "Total Return:   {:.2}%",
        result.metrics.total_return * 100.0
    );
    match result.metrics.sharpe {
        Some(sharpe) => println!("Sharpe:         {sharpe:.3}"),
        None => println!("Sharpe:         undefined (zero-variance returns)"),
    }
    println!(
        "Max Drawdown:   {:.2}% ({} bars)",
        result.metrics.max_drawdown * 100.0,
        result.metrics.max_drawdown_duration
    );
    println!(
        "Trades:         {} ({} wins, {} losses)",
        result.trade_stats.count, result.trade_stats.winning_count, result.trade_stats.losing_count
    );
    if let Some(all) = &result.trade_stats.all {
        println!(
            "Avg Trade PnL:  {:.2} (best {:.2}, worst {:.2})",
            all.mean_pnl, all.max_pnl, all.min_pnl
        );
    }
    if let Some(open) = &result.open_position {
        println!(
            "Open Position:  {:?} {} @ {:.2} (left open at end of series)",
            open.side, open.quantity, open.entry_price
        );
    }
    if result.synthetic_data {
        println!();
        println!("WARNING: results based on SYNTHETIC data");
    }
    println!();
}
