//! TradeRecord — a completed round-trip trade.

use super::position::{Position, PositionSide};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A complete round-trip trade record: entry → exit.
///
/// Created when a position closes; immutable afterwards. The ordered list
/// of these records is the trade ledger the performance analyzer consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeRecord {
    pub symbol: String,
    pub side: PositionSide,

    pub entry_bar: usize,
    pub entry_date: NaiveDate,
    pub entry_price: f64,

    pub exit_bar: usize,
    pub exit_date: NaiveDate,
    pub exit_price: f64,

    pub quantity: f64,

    /// Signed profit in account currency.
    pub pnl: f64,
    /// Profit as a fraction of entry cost (0.5 = +50%).
    pub return_pct: f64,

    pub bars_held: usize,
}

impl TradeRecord {
    /// Build a record from a closed position.
    ///
    /// Returns `None` if the position has not closed yet.
    pub fn from_closed(position: &Position) -> Option<Self> {
        let exit_price = position.exit_price?;
        let exit_date = position.exit_date?;
        let exit_bar = position.exit_bar?;

        let pnl = match position.side {
            PositionSide::Long => (exit_price - position.entry_price) * position.quantity,
            PositionSide::Short => (position.entry_price - exit_price) * position.quantity,
        };
        let entry_cost = position.entry_price * position.quantity;
        let return_pct = if entry_cost > 0.0 { pnl / entry_cost } else { 0.0 };

        Some(Self {
            symbol: position.symbol.clone(),
            side: position.side,
            entry_bar: position.entry_bar,
            entry_date: position.entry_date,
            entry_price: position.entry_price,
            exit_bar,
            exit_date,
            exit_price,
            quantity: position.quantity,
            pnl,
            return_pct,
            bars_held: exit_bar.saturating_sub(position.entry_bar),
        })
    }

    pub fn is_winner(&self) -> bool {
        self.pnl > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Fill, OrderSide};

    fn closed_position(side: PositionSide, entry: f64, exit: f64) -> Position {
        let mut pos = Position::pending_entry(
            "SPY",
            side,
            100.0,
            entry,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            0,
        );
        let entry_side = match side {
            PositionSide::Long => OrderSide::Buy,
            PositionSide::Short => OrderSide::Sell,
        };
        let exit_side = match side {
            PositionSide::Long => OrderSide::Sell,
            PositionSide::Short => OrderSide::Buy,
        };
        pos.entry_filled(&Fill {
            symbol: "SPY".into(),
            side: entry_side,
            price: entry,
            quantity: 100.0,
            date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            bar_index: 0,
        });
        pos.close(&Fill {
            symbol: "SPY".into(),
            side: exit_side,
            price: exit,
            quantity: 100.0,
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            bar_index: 5,
        });
        pos
    }

    #[test]
    fn long_round_trip() {
        let trade = TradeRecord::from_closed(&closed_position(PositionSide::Long, 10.0, 20.0))
            .unwrap();
        assert_eq!(trade.pnl, 1000.0);
        assert!((trade.return_pct - 1.0).abs() < 1e-10);
        assert_eq!(trade.bars_held, 5);
        assert!(trade.is_winner());
    }

    #[test]
    fn short_round_trip() {
        let trade = TradeRecord::from_closed(&closed_position(PositionSide::Short, 20.0, 10.0))
            .unwrap();
        assert_eq!(trade.pnl, 1000.0);
        assert!((trade.return_pct - 0.5).abs() < 1e-10);
        assert!(trade.is_winner());
    }

    #[test]
    fn losing_trade_is_not_winner() {
        let trade = TradeRecord::from_closed(&closed_position(PositionSide::Long, 20.0, 15.0))
            .unwrap();
        assert_eq!(trade.pnl, -500.0);
        assert!(!trade.is_winner());
    }

    #[test]
    fn open_position_yields_no_record() {
        let pos = Position::pending_entry(
            "SPY",
            PositionSide::Long,
            100.0,
            10.0,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap(),
            0,
        );
        assert!(TradeRecord::from_closed(&pos).is_none());
    }

    #[test]
    fn trade_serialization_roundtrip() {
        let trade = TradeRecord::from_closed(&closed_position(PositionSide::Long, 10.0, 20.0))
            .unwrap();
        let json = serde_json::to_string(&trade).unwrap();
        let deser: TradeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(trade.symbol, deser.symbol);
        assert_eq!(trade.pnl, deser.pnl);
    }
}
