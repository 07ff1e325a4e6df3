//! Bollinger Bands — moving average +/- standard deviation multiplier.
//!
//! - Middle: SMA(price, period)
//! - Upper: middle + mult * stddev(price, period)
//! - Lower: middle - mult * stddev(price, period)
//!
//! Uses population stddev (divide by N), maintained incrementally from a
//! running sum and sum of squares over the window. All three bands share
//! one warm-up boundary: defined once `period` bars have arrived.

use super::Indicator;
use crate::domain::{Bar, PriceField};
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct BollingerBands {
    period: usize,
    multiplier: f64,
    field: PriceField,
    name: String,
    window: VecDeque<f64>,
    sum: f64,
    sum_sq: f64,
    middle: Option<f64>,
    band: Option<f64>,
    prev_middle: Option<f64>,
}

impl BollingerBands {
    pub fn new(period: usize, multiplier: f64, field: PriceField) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        assert!(multiplier >= 0.0, "Bollinger multiplier must be >= 0");
        Self {
            period,
            multiplier,
            field,
            name: format!("bollinger_{period}_{multiplier}"),
            window: VecDeque::with_capacity(period),
            sum: 0.0,
            sum_sq: 0.0,
            middle: None,
            band: None,
            prev_middle: None,
        }
    }

    pub fn middle(&self) -> Option<f64> {
        self.middle
    }

    pub fn upper(&self) -> Option<f64> {
        Some(self.middle? + self.band?)
    }

    pub fn lower(&self) -> Option<f64> {
        Some(self.middle? - self.band?)
    }
}

impl Indicator for BollingerBands {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        self.period
    }

    fn update(&mut self, bar: &Bar) {
        let price = self.field.of(bar);
        self.window.push_back(price);
        self.sum += price;
        self.sum_sq += price * price;
        if self.window.len() > self.period {
            if let Some(leaving) = self.window.pop_front() {
                self.sum -= leaving;
                self.sum_sq -= leaving * leaving;
            }
        }

        self.prev_middle = self.middle;

        if self.window.len() == self.period {
            let n = self.period as f64;
            let mean = self.sum / n;
            // Catastrophic cancellation can push the variance a hair below
            // zero for constant windows; clamp before sqrt.
            let variance = (self.sum_sq / n - mean * mean).max(0.0);
            self.middle = Some(mean);
            self.band = Some(self.multiplier * variance.sqrt());
        } else {
            self.middle = None;
            self.band = None;
        }
    }

    /// The middle band, matching SMA(period) wherever defined.
    fn value(&self) -> Option<f64> {
        self.middle
    }

    fn prev(&self) -> Option<f64> {
        self.prev_middle
    }
}
