//! RSI(2)-style mean reversion, long and short.
//!
//! Two SMAs (entry regime, exit trigger) and one short RSI:
//! - Flat, price above the entry SMA, RSI at or under the oversold
//!   threshold: go long with 90% of available cash.
//! - Flat, price below the entry SMA, RSI at or over the overbought
//!   threshold: go short with 90% of available cash.
//! - Exit a long when price crosses above the exit SMA; exit a short when
//!   price crosses below it.
//!
//! At most one position is open at a time. A rejected exit is resubmitted
//! unconditionally on the next bar.

use super::{PositionTracker, Strategy};
use crate::domain::{Bar, Fill, Order, PositionSide, PriceField, RejectReason};
use crate::engine::{AccountView, TradingMode};
use crate::indicators::{Crossover, Indicator, Rsi, Sma};

/// Fraction of available cash committed per entry.
const ENTRY_CASH_FRACTION: f64 = 0.9;

#[derive(Debug)]
pub struct Rsi2 {
    entry_sma: Sma,
    exit_sma: Sma,
    rsi: Rsi,
    exit_cross: Crossover,
    oversold: f64,
    overbought: f64,
    price_field: PriceField,
    tracker: PositionTracker,
}

impl Rsi2 {
    pub fn new(
        entry_period: usize,
        exit_period: usize,
        rsi_period: usize,
        oversold: f64,
        overbought: f64,
        price_field: PriceField,
    ) -> Self {
        Self {
            entry_sma: Sma::new(entry_period, price_field),
            exit_sma: Sma::new(exit_period, price_field),
            rsi: Rsi::new(rsi_period, price_field),
            exit_cross: Crossover::new(),
            oversold,
            overbought,
            price_field,
            tracker: PositionTracker::new(),
        }
    }

    fn exit_order(&self, bar: &Bar) -> Option<Order> {
        let quantity = self.tracker.quantity();
        match self.tracker.side()? {
            PositionSide::Long => Some(Order::sell(bar.symbol.clone(), quantity)),
            PositionSide::Short => Some(Order::buy(bar.symbol.clone(), quantity)),
        }
    }
}

impl Strategy for Rsi2 {
    fn name(&self) -> &str {
        "rsi2"
    }

    fn trading_mode(&self) -> TradingMode {
        TradingMode::LongShort
    }

    fn warmup(&self) -> usize {
        self.entry_sma
            .warmup()
            .max(self.exit_sma.warmup() + 1)
            .max(self.rsi.warmup())
    }

    fn on_bar(&mut self, bar: &Bar, account: &AccountView) -> Option<Order> {
        self.entry_sma.update(bar);
        self.exit_sma.update(bar);
        self.rsi.update(bar);
        let price = bar.price(self.price_field);
        self.exit_cross.update(Some(price), self.exit_sma.value());

        // A rejected exit from an earlier bar is retried before anything else.
        if self.tracker.exit_pending() {
            return self.exit_order(bar);
        }

        let (Some(entry_sma), Some(rsi)) = (self.entry_sma.value(), self.rsi.value()) else {
            return None;
        };
        if self.exit_sma.value().is_none() {
            return None;
        }

        match self.tracker.side() {
            Some(PositionSide::Long) => {
                if self.exit_cross.crossed_above() {
                    self.tracker.exit_submitted();
                    return self.exit_order(bar);
                }
            }
            Some(PositionSide::Short) => {
                if self.exit_cross.crossed_below() {
                    self.tracker.exit_submitted();
                    return self.exit_order(bar);
                }
            }
            None => {
                if price > entry_sma && rsi <= self.oversold {
                    let quantity = (account.cash * ENTRY_CASH_FRACTION / price).floor();
                    if quantity >= 1.0 {
                        self.tracker.entry_submitted(PositionSide::Long);
                        return Some(Order::buy(bar.symbol.clone(), quantity));
                    }
                } else if price < entry_sma && rsi >= self.overbought {
                    let quantity = (account.cash * ENTRY_CASH_FRACTION / price).floor();
                    if quantity >= 1.0 {
                        self.tracker.entry_submitted(PositionSide::Short);
                        return Some(Order::sell(bar.symbol.clone(), quantity));
                    }
                }
            }
        }

        None
    }

    fn order_filled(&mut self, fill: &Fill) {
        self.tracker.order_filled(fill);
    }

    fn order_rejected(&mut self, _order: &Order, _reason: &RejectReason) {
        self.tracker.order_rejected();
    }
}
