//! Incremental indicator implementations.
//!
//! Indicators are stateful accumulators fed one bar at a time by the run
//! loop: `update(&bar)` then `value()`. A value is `None` until the
//! warm-up period has elapsed — callers skip decision logic while
//! undefined rather than reading a placeholder.
//!
//! # Look-ahead contamination guard
//! After the i-th update, no indicator may report a value that depends on
//! bars later than i. Updates are O(1) amortized: rolling windows carry a
//! running sum (and sum of squares), never a full-history rescan.

pub mod bollinger;
pub mod cross;
pub mod rsi;
pub mod sma;

pub use bollinger::BollingerBands;
pub use cross::Crossover;
pub use rsi::Rsi;
pub use sma::Sma;

use crate::domain::Bar;

/// Trait for single-valued incremental indicators.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "sma_20", "rsi_14").
    fn name(&self) -> &str;

    /// Number of bars consumed before `value()` becomes defined.
    fn warmup(&self) -> usize;

    /// Feed the next bar.
    fn update(&mut self, bar: &Bar);

    /// Current value, or `None` during warm-up.
    fn value(&self) -> Option<f64>;

    /// Value as of the previous bar, or `None` if not yet defined then.
    fn prev(&self) -> Option<f64>;
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            let high = open.max(close) + 1.0;
            let low = open.min(close) - 1.0;
            Bar {
                symbol: "TEST".to_string(),
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high,
                low,
                close,
                volume: 1000,
                adj_close: close,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
