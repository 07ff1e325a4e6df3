//! SMA crossover trend entry.
//!
//! Flat and the price crosses above its SMA: buy a fixed, externally
//! configured share count. Long and the price crosses below the SMA, with
//! no exit already pending: sell the holding. A crossing needs both the
//! current and previous SMA values defined, so nothing fires off the
//! warm-up edge.

use super::{PositionTracker, Strategy};
use crate::domain::{Bar, Fill, Order, PositionSide, PriceField, RejectReason};
use crate::engine::AccountView;
use crate::indicators::{Crossover, Indicator, Sma};

#[derive(Debug)]
pub struct SmaCrossover {
    sma: Sma,
    cross: Crossover,
    shares: f64,
    price_field: PriceField,
    tracker: PositionTracker,
}

impl SmaCrossover {
    pub fn new(period: usize, shares: f64, price_field: PriceField) -> Self {
        Self {
            sma: Sma::new(period, price_field),
            cross: Crossover::new(),
            shares,
            price_field,
            tracker: PositionTracker::new(),
        }
    }
}

impl Strategy for SmaCrossover {
    fn name(&self) -> &str {
        "sma_crossover"
    }

    fn warmup(&self) -> usize {
        self.sma.warmup() + 1
    }

    fn on_bar(&mut self, bar: &Bar, _account: &AccountView) -> Option<Order> {
        self.sma.update(bar);
        let price = bar.price(self.price_field);
        self.cross.update(Some(price), self.sma.value());

        if self.tracker.is_flat() && self.cross.crossed_above() {
            self.tracker.entry_submitted(PositionSide::Long);
            return Some(Order::buy(bar.symbol.clone(), self.shares));
        }

        if self.tracker.is_open() && self.cross.crossed_below() && !self.tracker.exit_pending() {
            self.tracker.exit_submitted();
            return Some(Order::sell(bar.symbol.clone(), self.tracker.quantity()));
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
