//! BarLab Core — engine, domain types, indicators, strategies, broker simulator.
//!
//! This crate contains the heart of the backtesting engine:
//! - Domain types (bars, orders, fills, positions, trades)
//! - Incremental indicators (SMA, Bollinger Bands, RSI, crossover detection)
//! - Strategy decision engine with an explicit position state machine
//! - Broker simulator with market-order fills and per-bar mark-to-market
//! - Bar-by-bar run loop producing the equity curve and trade ledger

pub mod data;
pub mod domain;
pub mod engine;
pub mod indicators;
pub mod strategy;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: all core types are Send + Sync.
    ///
    /// Independent backtests may be fanned out across threads (the runner's
    /// sweep does exactly that); each run owns its state wholesale, so every
    /// piece of that state must cross thread boundaries.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::BarSeries>();
        require_sync::<domain::BarSeries>();
        require_send::<domain::Order>();
        require_sync::<domain::Order>();
        require_send::<domain::Fill>();
        require_sync::<domain::Fill>();
        require_send::<domain::Position>();
        require_sync::<domain::Position>();
        require_send::<domain::TradeRecord>();
        require_sync::<domain::TradeRecord>();

        require_send::<engine::Broker>();
        require_sync::<engine::Broker>();
        require_send::<engine::EngineConfig>();
        require_sync::<engine::EngineConfig>();
        require_send::<engine::RunResult>();
        require_sync::<engine::RunResult>();

        require_send::<indicators::Sma>();
        require_sync::<indicators::Sma>();
        require_send::<indicators::BollingerBands>();
        require_sync::<indicators::BollingerBands>();
        require_send::<indicators::Rsi>();
        require_sync::<indicators::Rsi>();
        require_send::<indicators::Crossover>();
        require_sync::<indicators::Crossover>();

        require_send::<strategy::StrategySpec>();
        require_sync::<strategy::StrategySpec>();
        require_send::<Box<dyn strategy::Strategy>>();
    }
}
