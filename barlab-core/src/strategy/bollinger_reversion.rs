//! Bollinger band mean reversion.
//!
//! Flat and the price closes below the lower band: buy with all available
//! cash, `floor(cash / price)` shares. Long and the price closes above the
//! upper band: sell the entire holding.

use super::{PositionTracker, Strategy};
use crate::domain::{Bar, Fill, Order, PositionSide, PriceField, RejectReason};
use crate::engine::AccountView;
use crate::indicators::{BollingerBands, Indicator};

#[derive(Debug)]
pub struct BollingerReversion {
    bands: BollingerBands,
    price_field: PriceField,
    tracker: PositionTracker,
}

impl BollingerReversion {
    pub fn new(period: usize, multiplier: f64, price_field: PriceField) -> Self {
        Self {
            bands: BollingerBands::new(period, multiplier, price_field),
            price_field,
            tracker: PositionTracker::new(),
        }
    }
}

impl Strategy for BollingerReversion {
    fn name(&self) -> &str {
        "bollinger_reversion"
    }

    fn warmup(&self) -> usize {
        self.bands.warmup()
    }

    fn on_bar(&mut self, bar: &Bar, account: &AccountView) -> Option<Order> {
        self.bands.update(bar);
        let lower = self.bands.lower()?;
        let upper = self.bands.upper()?;
        let price = bar.price(self.price_field);

        if self.tracker.is_flat() && price < lower {
            let quantity = (account.cash / price).floor();
            if quantity < 1.0 {
                return None;
            }
            self.tracker.entry_submitted(PositionSide::Long);
            return Some(Order::buy(bar.symbol.clone(), quantity));
        }

        if self.tracker.is_open() && price > upper {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{BarSeries, PriceField};
    use crate::engine::{run_backtest, EngineConfig};
    use crate::indicators::make_bars;

    fn series(closes: &[f64]) -> BarSeries {
        let mut series = BarSeries::new();
        for bar in make_bars(closes) {
            series.push(bar).unwrap();
        }
        series
    }

    #[test]
    fn buys_below_lower_band_and_sells_above_upper() {
        // Stable prices around 100, a sharp dip, recovery, then a spike.
        let closes = [
            100.0, 101.0, 99.0, 100.0, 101.0, 99.0, 100.0, 101.0, 99.0, 100.0, //
            80.0, // deep below the lower band → entry
            100.0, 101.0, 100.0, 99.0, 100.0, 101.0, 100.0, 99.0, 100.0, //
            130.0, // far above the upper band → exit
            100.0,
        ];
        let mut strategy = BollingerReversion::new(10, 2.0, PriceField::Close);
        let result = run_backtest(
            &series(&closes),
            &mut strategy,
            &EngineConfig::new(10_000.0, PriceField::Close),
        );

        assert_eq!(result.trades.len(), 1);
        let trade = &result.trades[0];
        assert_eq!(trade.entry_price, 80.0);
        assert_eq!(trade.exit_price, 130.0);
        assert_eq!(trade.quantity, (10_000.0_f64 / 80.0).floor());
        assert!(trade.is_winner());
    }

    #[test]
    fn flat_market_never_trades() {
        let closes = vec![100.0; 40];
        let mut strategy = BollingerReversion::new(10, 2.0, PriceField::Close);
        let result = run_backtest(
            &series(&closes),
            &mut strategy,
            &EngineConfig::new(10_000.0, PriceField::Close),
        );
        assert!(result.trades.is_empty());
        assert!(result.fills.is_empty());
    }

    #[test]
    fn no_entry_during_warmup() {
        // A dip inside the warm-up window must not trigger anything.
        let closes = [100.0, 60.0, 100.0, 100.0, 100.0];
        let mut strategy = BollingerReversion::new(10, 2.0, PriceField::Close);
        let result = run_backtest(
            &series(&closes),
            &mut strategy,
            &EngineConfig::new(10_000.0, PriceField::Close),
        );
        assert!(result.fills.is_empty());
    }
}
