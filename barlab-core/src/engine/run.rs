//! The bar-by-bar run loop.
//!
//! Single-threaded and synchronous: bars are consumed strictly in series
//! order, one at a time. The loop is the only writer of broker and
//! position state. Each bar it asks the strategy for a decision, settles
//! the resulting order with the broker, reports the outcome back to the
//! strategy, and marks the account to market.
//!
//! End-of-series policy: a position still open when the series is
//! exhausted is left open — the final equity marks it to market, and the
//! trade ledger contains completed round trips only.

use crate::domain::{
    BarSeries, Fill, OrderSide, Position, PositionSide, PriceField, TradeRecord,
};
use crate::engine::broker::{Broker, EquityPoint};
use crate::strategy::Strategy;

/// Configuration for a single backtest run.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub initial_capital: f64,
    /// Which price column drives indicator updates and fills.
    pub price_field: PriceField,
}

impl EngineConfig {
    pub fn new(initial_capital: f64, price_field: PriceField) -> Self {
        Self {
            initial_capital,
            price_field,
        }
    }
}

/// Result of a complete backtest run.
#[derive(Debug, Clone)]
pub struct RunResult {
    /// Account value at each bar close, one point per bar.
    pub equity_curve: Vec<EquityPoint>,
    /// All fills generated during the run.
    pub fills: Vec<Fill>,
    /// Completed round-trip trades.
    pub trades: Vec<TradeRecord>,
    /// Orders the broker refused.
    pub rejection_count: usize,
    /// Position still open at the end of the series, if any.
    pub open_position: Option<Position>,
    pub initial_capital: f64,
    pub final_cash: f64,
    pub final_holdings: f64,
    pub final_equity: f64,
    pub bar_count: usize,
    pub warmup_bars: usize,
}

/// Run a strategy over a bar series and record the full history.
pub fn run_backtest(
    series: &BarSeries,
    strategy: &mut dyn Strategy,
    config: &EngineConfig,
) -> RunResult {
    let mut broker = Broker::new(
        config.initial_capital,
        config.price_field,
        strategy.trading_mode(),
    );
    let warmup_bars = strategy.warmup();
    let mut open_position: Option<Position> = None;
    let mut trades: Vec<TradeRecord> = Vec::new();
    let mut rejection_count = 0usize;

    for (bar_index, bar) in series.iter().enumerate() {
        let account = broker.account();
        if let Some(order) = strategy.on_bar(bar, &account) {
            match open_position.as_mut() {
                None => {
                    // Entry: a fill opens the position, a rejection discards it.
                    let mut position = Position::pending_entry(
                        order.symbol.clone(),
                        entry_side(order.side),
                        order.quantity,
                        config.price_field.of(bar),
                        bar.date,
                        bar_index,
                    );
                    match broker.submit(&order, bar, bar_index) {
                        Ok(fill) => {
                            position.entry_filled(&fill);
                            open_position = Some(position);
                            strategy.order_filled(&fill);
                        }
                        Err(reason) => {
                            rejection_count += 1;
                            strategy.order_rejected(&order, &reason);
                        }
                    }
                }
                Some(position) => {
                    // Exit: a rejection leaves the position pending so the
                    // strategy can resubmit on the next bar.
                    position.request_exit();
                    match broker.submit(&order, bar, bar_index) {
                        Ok(fill) => {
                            position.close(&fill);
                            if let Some(trade) = TradeRecord::from_closed(position) {
                                trades.push(trade);
                            }
                            open_position = None;
                            strategy.order_filled(&fill);
                        }
                        Err(reason) => {
                            rejection_count += 1;
                            strategy.order_rejected(&order, &reason);
                        }
                    }
                }
            }
        }
        broker.mark_to_market(bar);
    }

    RunResult {
        equity_curve: broker.equity_history().to_vec(),
        fills: broker.fills().to_vec(),
        trades,
        rejection_count,
        open_position,
        initial_capital: config.initial_capital,
        final_cash: broker.cash(),
        final_holdings: broker.holdings(),
        final_equity: broker.equity(),
        bar_count: series.len(),
        warmup_bars,
    }
}

fn entry_side(side: OrderSide) -> PositionSide {
    match side {
        OrderSide::Buy => PositionSide::Long,
        OrderSide::Sell => PositionSide::Short,
    }
}
