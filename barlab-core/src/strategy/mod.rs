//! Strategy decision engine.
//!
//! Each strategy is a per-bar decision function over (bar, indicator state,
//! position state) that emits at most one market order. The run loop — not
//! a callback registry — drives every transition: it calls `on_bar`,
//! submits the order, then reports the outcome back through `order_filled`
//! or `order_rejected`.

pub mod bollinger_reversion;
pub mod rsi2;
pub mod sma_crossover;

pub use bollinger_reversion::BollingerReversion;
pub use rsi2::Rsi2;
pub use sma_crossover::SmaCrossover;

use crate::domain::{Bar, Fill, Order, PositionSide, PriceField, RejectReason};
use crate::engine::{AccountView, TradingMode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A pluggable per-bar decision rule set.
pub trait Strategy: Send {
    /// Human-readable name (e.g., "bollinger_reversion").
    fn name(&self) -> &str;

    /// Whether this strategy needs short selling enabled.
    fn trading_mode(&self) -> TradingMode {
        TradingMode::LongOnly
    }

    /// Bars consumed before the strategy can emit its first order.
    fn warmup(&self) -> usize;

    /// Evaluate one bar. Returns at most one order.
    fn on_bar(&mut self, bar: &Bar, account: &AccountView) -> Option<Order>;

    /// The order emitted this bar was filled.
    fn order_filled(&mut self, fill: &Fill);

    /// The order emitted this bar was rejected.
    fn order_rejected(&mut self, order: &Order, reason: &RejectReason);
}

/// Strategy-side view of the position lifecycle.
///
/// `Flat` plus the pending/open states of the position itself; `Closed`
/// positions are flat again from the strategy's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeState {
    Flat,
    PendingEntry,
    Open,
    PendingExit,
}

/// Small state machine every strategy embeds.
///
/// Transitions: Flat → PendingEntry on entry submit; PendingEntry → Open on
/// fill, back to Flat on rejection; Open → PendingExit on exit submit;
/// PendingExit → Flat on fill, unchanged on rejection (so the strategy can
/// resubmit on the next bar).
#[derive(Debug, Clone)]
pub struct PositionTracker {
    state: TradeState,
    side: Option<PositionSide>,
    quantity: f64,
}

impl Default for PositionTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionTracker {
    pub fn new() -> Self {
        Self {
            state: TradeState::Flat,
            side: None,
            quantity: 0.0,
        }
    }

    pub fn state(&self) -> TradeState {
        self.state
    }

    pub fn side(&self) -> Option<PositionSide> {
        self.side
    }

    /// Shares held by the tracked position (entry fill quantity).
    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    pub fn is_flat(&self) -> bool {
        self.state == TradeState::Flat
    }

    pub fn is_open(&self) -> bool {
        self.state == TradeState::Open
    }

    pub fn exit_pending(&self) -> bool {
        self.state == TradeState::PendingExit
    }

    pub fn entry_submitted(&mut self, side: PositionSide) {
        debug_assert_eq!(self.state, TradeState::Flat);
        self.state = TradeState::PendingEntry;
        self.side = Some(side);
    }

    pub fn exit_submitted(&mut self) {
        debug_assert!(matches!(
            self.state,
            TradeState::Open | TradeState::PendingExit
        ));
        self.state = TradeState::PendingExit;
    }

    pub fn order_filled(&mut self, fill: &Fill) {
        match self.state {
            TradeState::PendingEntry => {
                self.quantity = fill.quantity;
                self.state = TradeState::Open;
            }
            TradeState::PendingExit => {
                self.quantity = 0.0;
                self.side = None;
                self.state = TradeState::Flat;
            }
            TradeState::Flat | TradeState::Open => {}
        }
    }

    pub fn order_rejected(&mut self) {
        match self.state {
            TradeState::PendingEntry => {
                self.side = None;
                self.state = TradeState::Flat;
            }
            // A rejected exit stays pending; the strategy retries next bar.
            TradeState::PendingExit => {}
            TradeState::Flat | TradeState::Open => {}
        }
    }
}

/// Serializable strategy selection with its numeric parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StrategySpec {
    /// Buy the lower Bollinger band with all cash, sell the upper band.
    BollingerReversion { period: usize, multiplier: f64 },

    /// Enter a fixed share count when price crosses above its SMA, exit on
    /// the cross below.
    SmaCrossover { period: usize, shares: f64 },

    /// RSI(2)-style mean reversion: long oversold dips above the entry SMA,
    /// short overbought pops below it, exit on the exit-SMA cross.
    Rsi2 {
        entry_period: usize,
        exit_period: usize,
        rsi_period: usize,
        oversold: f64,
        overbought: f64,
    },
}

/// Invalid or missing strategy parameters. Raised before any bar is
/// processed; a run never starts with a bad configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{param} must be >= 1")]
    NonPositivePeriod { param: &'static str },

    #[error("shares must be > 0")]
    NonPositiveShares,

    #[error("multiplier must be > 0")]
    NonPositiveMultiplier,

    #[error("{param} must be within [0, 100], got {value}")]
    ThresholdOutOfRange { param: &'static str, value: f64 },

    #[error("oversold ({oversold}) must be below overbought ({overbought})")]
    ThresholdsInverted { oversold: f64, overbought: f64 },
}

impl StrategySpec {
    /// Strategy name without constructing the strategy.
    pub fn name(&self) -> &'static str {
        match self {
            StrategySpec::BollingerReversion { .. } => "bollinger_reversion",
            StrategySpec::SmaCrossover { .. } => "sma_crossover",
            StrategySpec::Rsi2 { .. } => "rsi2",
        }
    }

    /// Check every parameter, reporting the first violation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match *self {
            StrategySpec::BollingerReversion { period, multiplier } => {
                if period < 1 {
                    return Err(ConfigError::NonPositivePeriod { param: "period" });
                }
                if multiplier <= 0.0 {
                    return Err(ConfigError::NonPositiveMultiplier);
                }
            }
            StrategySpec::SmaCrossover { period, shares } => {
                if period < 1 {
                    return Err(ConfigError::NonPositivePeriod { param: "period" });
                }
                if shares <= 0.0 {
                    return Err(ConfigError::NonPositiveShares);
                }
            }
            StrategySpec::Rsi2 {
                entry_period,
                exit_period,
                rsi_period,
                oversold,
                overbought,
            } => {
                if entry_period < 1 {
                    return Err(ConfigError::NonPositivePeriod { param: "entry_period" });
                }
                if exit_period < 1 {
                    return Err(ConfigError::NonPositivePeriod { param: "exit_period" });
                }
                if rsi_period < 1 {
                    return Err(ConfigError::NonPositivePeriod { param: "rsi_period" });
                }
                for (param, value) in [("oversold", oversold), ("overbought", overbought)] {
                    if !(0.0..=100.0).contains(&value) {
                        return Err(ConfigError::ThresholdOutOfRange { param, value });
                    }
                }
                if oversold >= overbought {
                    return Err(ConfigError::ThresholdsInverted {
                        oversold,
                        overbought,
                    });
                }
            }
        }
        Ok(())
    }

    /// Validate and construct the strategy, with indicators reading the
    /// given price field.
    pub fn build(&self, price_field: PriceField) -> Result<Box<dyn Strategy>, ConfigError> {
        self.validate()?;
        Ok(match *self {
            StrategySpec::BollingerReversion { period, multiplier } => {
                Box::new(BollingerReversion::new(period, multiplier, price_field))
            }
            StrategySpec::SmaCrossover { period, shares } => {
                Box::new(SmaCrossover::new(period, shares, price_field))
            }
            StrategySpec::Rsi2 {
                entry_period,
                exit_period,
                rsi_period,
                oversold,
                overbought,
            } => Box::new(Rsi2::new(
                entry_period,
                exit_period,
                rsi_period,
                oversold,
                overbought,
                price_field,
            )),
        })
    }
}
