//! Backtest engine: broker simulator and the bar-by-bar run loop.

pub mod broker;
pub mod run;

pub use broker::{AccountView, Broker, EquityPoint, TradingMode};
pub use run::{run_backtest, EngineConfig, RunResult};
