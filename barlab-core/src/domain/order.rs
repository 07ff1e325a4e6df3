//! Orders, fills, and rejection reasons.
//!
//! An order is ephemeral: created by a strategy, consumed (filled or
//! rejected) by the broker within the same bar. A rejection is an ordinary
//! outcome the strategy observes, not a fatal error.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Buy or sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

/// A market order for a quantity of the instrument.
///
/// Quantities are carried as `f64` but strategies size them in whole
/// shares (`floor(cash / price)`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub symbol: String,
    pub side: OrderSide,
    pub quantity: f64,
}

impl Order {
    pub fn buy(symbol: impl Into<String>, quantity: f64) -> Self {
        Self {
            symbol: symbol.into(),
            side: OrderSide::Buy,
            quantity,
        }
    }

    pub fn sell(symbol: impl Into<String>, quantity: f64) -> Self {
        Self {
            symbol: symbol.into(),
            side: OrderSide::Sell,
            quantity,
        }
    }
}

/// Record of an executed order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fill {
    pub symbol: String,
    pub side: OrderSide,
    pub price: f64,
    pub quantity: f64,
    pub date: NaiveDate,
    pub bar_index: usize,
}

impl Fill {
    /// Cash delta of the fill: negative for buys, positive for sells.
    pub fn cash_flow(&self) -> f64 {
        match self.side {
            OrderSide::Buy => -self.price * self.quantity,
            OrderSide::Sell => self.price * self.quantity,
        }
    }
}

/// Why the broker refused an order.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum RejectReason {
    #[error("buy for {required:.2} exceeds available cash {available:.2}")]
    InsufficientCash { required: f64, available: f64 },

    #[error("sell for {requested} shares exceeds held {held}")]
    InsufficientShares { requested: f64, held: f64 },

    #[error("order quantity must be positive")]
    ZeroQuantity,
}
