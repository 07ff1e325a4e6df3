//! Position lifecycle tracking.
//!
//! At most one position exists per run. Its lifecycle is driven linearly by
//! the run loop around each order submission:
//!
//! ```text
//! PendingEntry ──entry fill──▶ Open ──exit requested──▶ PendingExit ──exit fill──▶ Closed
//!      │ entry rejected                                       │ exit rejected
//!      ▼                                                      ▼
//!   (discarded)                                     (stays pending, strategy retries)
//! ```

use super::order::Fill;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Direction of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionSide {
    Long,
    Short,
}

/// Lifecycle state of a position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionState {
    PendingEntry,
    Open,
    PendingExit,
    Closed,
}

/// A single entry/exit round trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub side: PositionSide,
    pub quantity: f64,
    pub entry_price: f64,
    pub entry_date: NaiveDate,
    pub entry_bar: usize,
    pub state: PositionState,
    pub exit_price: Option<f64>,
    pub exit_date: Option<NaiveDate>,
    pub exit_bar: Option<usize>,
}

impl Position {
    /// A position awaiting its entry fill. `price_hint` is the signaling
    /// bar's price; the actual fill price overwrites it.
    pub fn pending_entry(
        symbol: impl Into<String>,
        side: PositionSide,
        quantity: f64,
        price_hint: f64,
        date: NaiveDate,
        bar_index: usize,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            quantity,
            entry_price: price_hint,
            entry_date: date,
            entry_bar: bar_index,
            state: PositionState::PendingEntry,
            exit_price: None,
            exit_date: None,
            exit_bar: None,
        }
    }

    /// Confirm the entry fill: the position is now open at the fill price.
    pub fn entry_filled(&mut self, fill: &Fill) {
        self.entry_price = fill.price;
        self.entry_date = fill.date;
        self.entry_bar = fill.bar_index;
        self.quantity = fill.quantity;
        self.state = PositionState::Open;
    }

    /// An exit order has been submitted; remains pending until it fills.
    pub fn request_exit(&mut self) {
        self.state = PositionState::PendingExit;
    }

    /// Confirm the exit fill and close the position.
    pub fn close(&mut self, fill: &Fill) {
        self.exit_price = Some(fill.price);
        self.exit_date = Some(fill.date);
        self.exit_bar = Some(fill.bar_index);
        self.state = PositionState::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, PositionState::Open | PositionState::PendingExit)
    }

    /// Signed profit at the given price while the position is open.
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        match self.side {
            PositionSide::Long => (price - self.entry_price) * self.quantity,
            PositionSide::Short => (self.entry_price - price) * self.quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderSide;

    fn fill(side: OrderSide, price: f64, quantity: f64, bar_index: usize) -> Fill {
        Fill {
            symbol: "SPY".into(),
            side,
            price,
            quantity,
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
                + chrono::Duration::days(bar_index as i64),
            bar_index,
        }
    }

    fn open_long() -> Position {
        let mut pos = Position::pending_entry(
            "SPY",
            PositionSide::Long,
            100.0,
            10.0,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            0,
        );
        pos.entry_filled(&fill(OrderSide::Buy, 10.0, 100.0, 0));
        pos
    }

    #[test]
    fn lifecycle_to_closed() {
        let mut pos = open_long();
        assert_eq!(pos.state, PositionState::Open);
        assert!(pos.is_open());

        pos.request_exit();
        assert_eq!(pos.state, PositionState::PendingExit);
        assert!(pos.is_open());

        pos.close(&fill(OrderSide::Sell, 20.0, 100.0, 5));
        assert_eq!(pos.state, PositionState::Closed);
        assert!(!pos.is_open());
        assert_eq!(pos.exit_price, Some(20.0));
        assert_eq!(pos.exit_bar, Some(5));
    }

    #[test]
    fn entry_fill_overwrites_hint() {
        let mut pos = Position::pending_entry(
            "SPY",
            PositionSide::Long,
            100.0,
            9.5,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            0,
        );
        assert_eq!(pos.state, PositionState::PendingEntry);
        pos.entry_filled(&fill(OrderSide::Buy, 10.0, 100.0, 0));
        assert_eq!(pos.entry_price, 10.0);
    }

    #[test]
    fn unrealized_pnl_long_and_short() {
        let pos = open_long();
        assert_eq!(pos.unrealized_pnl(15.0), 500.0);

        let mut short = open_long();
        short.side = PositionSide::Short;
        assert_eq!(short.unrealized_pnl(15.0), -500.0);
        assert_eq!(short.unrealized_pnl(5.0), 500.0);
    }
}
