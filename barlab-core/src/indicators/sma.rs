//! Simple Moving Average (SMA).
//!
//! Rolling mean of the selected price over a fixed window, maintained as a
//! ring buffer with a running sum. Defined once `period` bars have arrived
//! (first value after the update at index period-1).

use super::Indicator;
use crate::domain::{Bar, PriceField};
use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    field: PriceField,
    name: String,
    window: VecDeque<f64>,
    sum: f64,
    value: Option<f64>,
    prev: Option<f64>,
}

impl Sma {
    pub fn new(period: usize, field: PriceField) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            field,
            name: format!("sma_{period}"),
            window: VecDeque::with_capacity(period),
            sum: 0.0,
            value: None,
            prev: None,
        }
    }
}

impl Indicator for Sma {
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
        if self.window.len() > self.period {
            if let Some(leaving) = self.window.pop_front() {
                self.sum -= leaving;
            }
        }
        self.prev = self.value;
        self.value = if self.window.len() == self.period {
            Some(self.sum / self.period as f64)
        } else {
            None
        };
    }

    fn value(&self) -> Option<f64> {
        self.value
    }

    fn prev(&self) -> Option<f64> {
        self.prev
    }
}
