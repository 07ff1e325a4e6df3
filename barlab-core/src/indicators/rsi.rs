//! Relative Strength Index (RSI).
//!
//! Wilder smoothing of average gains and average losses over price deltas:
//! each new delta enters with weight 1/period, the prior average keeps
//! weight (period-1)/period. The first average is seeded from the first
//! `period` deltas, so the value is defined from bar `period + 1` (the
//! first delta needs two prices).
//!
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Edge cases: avg_loss == 0 → 100; avg_gain == 0 → 0; both zero → 50.

use super::Indicator;
use crate::domain::{Bar, PriceField};

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    field: PriceField,
    name: String,
    prev_price: Option<f64>,
    deltas_seen: usize,
    avg_gain: f64,
    avg_loss: f64,
    value: Option<f64>,
    prev: Option<f64>,
}

impl Rsi {
    pub fn new(period: usize, field: PriceField) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            field,
            name: format!("rsi_{period}"),
            prev_price: None,
            deltas_seen: 0,
            avg_gain: 0.0,
            avg_loss: 0.0,
            value: None,
            prev: None,
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn warmup(&self) -> usize {
        self.period + 1
    }

    fn update(&mut self, bar: &Bar) {
        let price = self.field.of(bar);
        self.prev = self.value;

        let Some(prev_price) = self.prev_price.replace(price) else {
            return;
        };

        let delta = price - prev_price;
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);
        self.deltas_seen += 1;

        if self.deltas_seen <= self.period {
            // Seed phase: plain accumulation of the first `period` deltas.
            self.avg_gain += gain;
            self.avg_loss += loss;
            if self.deltas_seen == self.period {
                self.avg_gain /= self.period as f64;
                self.avg_loss /= self.period as f64;
                self.value = Some(rsi_from_averages(self.avg_gain, self.avg_loss));
            }
            return;
        }

        let alpha = 1.0 / self.period as f64;
        self.avg_gain = alpha * gain + (1.0 - alpha) * self.avg_gain;
        self.avg_loss = alpha * loss + (1.0 - alpha) * self.avg_loss;
        self.value = Some(rsi_from_averages(self.avg_gain, self.avg_loss));
    }

    fn value(&self) -> Option<f64> {
        self.value
    }

    fn prev(&self) -> Option<f64> {
        self.prev
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0 // no movement
    } else if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
