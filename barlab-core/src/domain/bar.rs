//! Bar — the fundamental market data unit.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// OHLCV bar for a single symbol on a single day.
///
/// The `adj_close` column carries the dividend/split-adjusted close as
/// provided by the data source; which column drives indicator and fill
/// prices is a per-run choice (see [`PriceField`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub adj_close: f64,
}

impl Bar {
    /// Returns true if any price field is NaN.
    pub fn is_void(&self) -> bool {
        self.open.is_nan()
            || self.high.is_nan()
            || self.low.is_nan()
            || self.close.is_nan()
            || self.adj_close.is_nan()
    }

    /// Basic OHLC sanity check: high >= low, high bounds open/close, prices positive.
    pub fn is_sane(&self) -> bool {
        if self.is_void() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
            && self.adj_close > 0.0
    }

    /// The bar's price under the given field selection.
    pub fn price(&self, field: PriceField) -> f64 {
        field.of(self)
    }
}

/// Which price column indicators and fills read.
///
/// Mirrors the upstream data convention: strategies that trade raw prices
/// use `Close`, dividend-aware runs use `AdjClose`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceField {
    #[default]
    Close,
    AdjClose,
}

impl PriceField {
    pub fn of(self, bar: &Bar) -> f64 {
        match self {
            PriceField::Close => bar.close,
            PriceField::AdjClose => bar.adj_close,
        }
    }
}
