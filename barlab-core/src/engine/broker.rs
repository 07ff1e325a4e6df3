//! Broker simulator — cash, share inventory, fills, and the equity curve.
//!
//! All fills are immediate and complete at the signaling bar's configured
//! price: no partial fills, no slippage, no commission (extension points,
//! not core behavior). An order the account cannot support is rejected as
//! an ordinary outcome; the strategy observes it and may retry.

use crate::domain::{Bar, Fill, Order, OrderSide, PriceField, RejectReason};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Tolerance for cash/share comparisons after float share-sizing.
const QTY_EPSILON: f64 = 1e-9;

/// Whether the account may hold negative share inventory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradingMode {
    #[default]
    LongOnly,
    LongShort,
}

/// One point of the equity curve: total account value at a bar close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    pub date: NaiveDate,
    pub equity: f64,
}

/// Read-only account snapshot handed to strategies each bar.
#[derive(Debug, Clone, Copy)]
pub struct AccountView {
    pub cash: f64,
    pub holdings: f64,
}

/// Virtual broker with finite cash and share inventory.
///
/// Holdings are signed: negative inventory is a short position and is only
/// reachable in [`TradingMode::LongShort`].
#[derive(Debug, Clone)]
pub struct Broker {
    cash: f64,
    holdings: f64,
    initial_capital: f64,
    price_field: PriceField,
    mode: TradingMode,
    equity_history: Vec<EquityPoint>,
    fills: Vec<Fill>,
}

impl Broker {
    pub fn new(initial_capital: f64, price_field: PriceField, mode: TradingMode) -> Self {
        Self {
            cash: initial_capital,
            holdings: 0.0,
            initial_capital,
            price_field,
            mode,
            equity_history: Vec::new(),
            fills: Vec::new(),
        }
    }

    /// Fill or reject a market order at the bar's configured price.
    pub fn submit(
        &mut self,
        order: &Order,
        bar: &Bar,
        bar_index: usize,
    ) -> Result<Fill, RejectReason> {
        if order.quantity <= 0.0 {
            return Err(RejectReason::ZeroQuantity);
        }
        let price = self.price_field.of(bar);

        match order.side {
            OrderSide::Buy => {
                let required = order.quantity * price;
                if required > self.cash + QTY_EPSILON {
                    return Err(RejectReason::InsufficientCash {
                        required,
                        available: self.cash,
                    });
                }
                self.cash -= required;
                self.holdings += order.quantity;
            }
            OrderSide::Sell => {
                if self.mode == TradingMode::LongOnly
                    && order.quantity > self.holdings + QTY_EPSILON
                {
                    return Err(RejectReason::InsufficientShares {
                        requested: order.quantity,
                        held: self.holdings,
                    });
                }
                self.cash += order.quantity * price;
                self.holdings -= order.quantity;
            }
        }

        let fill = Fill {
            symbol: order.symbol.clone(),
            side: order.side,
            price,
            quantity: order.quantity,
            date: bar.date,
            bar_index,
        };
        self.fills.push(fill.clone());
        Ok(fill)
    }

    /// Append `cash + holdings × price` to the equity history.
    ///
    /// Called exactly once per bar by the run loop, trade or no trade.
    pub fn mark_to_market(&mut self, bar: &Bar) {
        let price = self.price_field.of(bar);
        self.equity_history.push(EquityPoint {
            date: bar.date,
            equity: self.cash + self.holdings * price,
        });
    }

    pub fn account(&self) -> AccountView {
        AccountView {
            cash: self.cash,
            holdings: self.holdings,
        }
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    pub fn holdings(&self) -> f64 {
        self.holdings
    }

    pub fn initial_capital(&self) -> f64 {
        self.initial_capital
    }

    pub fn equity_history(&self) -> &[EquityPoint] {
        &self.equity_history
    }

    pub fn fills(&self) -> &[Fill] {
        &self.fills
    }

    /// Latest marked equity, or the initial capital before the first bar.
    pub fn equity(&self) -> f64 {
        self.equity_history
            .last()
            .map(|p| p.equity)
            .unwrap_or(self.initial_capital)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(day: u32, close: f64) -> Bar {
        Bar {
            symbol: "SPY".into(),
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1000,
            adj_close: close,
        }
    }

    #[test]
    fn round_trip_scenario() {
        // 1000 cash, buy floor(1000/10)=100 shares at 10, sell them at 20.
        let mut broker = Broker::new(1000.0, PriceField::Close, TradingMode::LongOnly);

        let fill = broker
            .submit(&Order::buy("SPY", 100.0), &bar(2, 10.0), 0)
            .unwrap();
        assert_eq!(fill.price, 10.0);
        assert_eq!(broker.cash(), 0.0);
        assert_eq!(broker.holdings(), 100.0);

        broker
            .submit(&Order::sell("SPY", 100.0), &bar(3, 20.0), 1)
            .unwrap();
        assert_eq!(broker.cash(), 2000.0);
        assert_eq!(broker.holdings(), 0.0);
    }

    #[test]
    fn buy_beyond_cash_rejected_not_partially_filled() {
        let mut broker = Broker::new(500.0, PriceField::Close, TradingMode::LongOnly);
        let err = broker
            .submit(&Order::buy("SPY", 100.0), &bar(2, 10.0), 0)
            .unwrap_err();
        assert!(matches!(err, RejectReason::InsufficientCash { .. }));
        assert_eq!(broker.cash(), 500.0);
        assert_eq!(broker.holdings(), 0.0);
        assert!(broker.fills().is_empty());
    }

    #[test]
    fn sell_beyond_holdings_rejected_long_only() {
        let mut broker = Broker::new(1000.0, PriceField::Close, TradingMode::LongOnly);
        broker
            .submit(&Order::buy("SPY", 50.0), &bar(2, 10.0), 0)
            .unwrap();
        let err = broker
            .submit(&Order::sell("SPY", 60.0), &bar(3, 10.0), 1)
            .unwrap_err();
        assert!(matches!(err, RejectReason::InsufficientShares { .. }));
        assert_eq!(broker.holdings(), 50.0);
    }

    #[test]
    fn short_sale_allowed_in_long_short_mode() {
        let mut broker = Broker::new(1000.0, PriceField::Close, TradingMode::LongShort);
        broker
            .submit(&Order::sell("SPY", 50.0), &bar(2, 10.0), 0)
            .unwrap();
        assert_eq!(broker.holdings(), -50.0);
        assert_eq!(broker.cash(), 1500.0);

        // Cover at a lower price: profit stays in cash.
        broker
            .submit(&Order::buy("SPY", 50.0), &bar(3, 8.0), 1)
            .unwrap();
        assert_eq!(broker.holdings(), 0.0);
        assert_eq!(broker.cash(), 1100.0);
    }

    #[test]
    fn zero_quantity_rejected() {
        let mut broker = Broker::new(1000.0, PriceField::Close, TradingMode::LongOnly);
        let err = broker
            .submit(&Order::buy("SPY", 0.0), &bar(2, 10.0), 0)
            .unwrap_err();
        assert_eq!(err, RejectReason::ZeroQuantity);
    }

    #[test]
    fn mark_to_market_once_per_bar() {
        let mut broker = Broker::new(1000.0, PriceField::Close, TradingMode::LongOnly);
        broker.mark_to_market(&bar(2, 10.0));
        broker
            .submit(&Order::buy("SPY", 100.0), &bar(3, 10.0), 1)
            .unwrap();
        broker.mark_to_market(&bar(3, 10.0));
        broker.mark_to_market(&bar(4, 12.0));

        let history = broker.equity_history();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].equity, 1000.0);
        assert_eq!(history[1].equity, 1000.0); // cash 0 + 100 × 10
        assert_eq!(history[2].equity, 1200.0); // marked to 12
    }

    #[test]
    fn adj_close_fill_price() {
        let mut broker = Broker::new(1000.0, PriceField::AdjClose, TradingMode::LongOnly);
        let mut b = bar(2, 10.0);
        b.adj_close = 9.5;
        let fill = broker.submit(&Order::buy("SPY", 100.0), &b, 0).unwrap();
        assert_eq!(fill.price, 9.5);
        assert!((broker.cash() - 50.0).abs() < 1e-9);
    }
}
