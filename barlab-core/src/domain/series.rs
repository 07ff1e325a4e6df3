//! BarSeries — ordered, append-only bar container.
//!
//! Append-only during load, read-only during simulation. `push` is the
//! single validation gate: a bar that is out of order, duplicated, or
//! internally inconsistent never enters the series.

use super::bar::Bar;
use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while building a series.
#[derive(Debug, Error)]
pub enum SeriesError {
    #[error("bar {index} ({date}) is not after the previous bar ({prev_date})")]
    NonMonotonicDate {
        index: usize,
        date: NaiveDate,
        prev_date: NaiveDate,
    },

    #[error("bar {index} ({date}) fails the OHLC sanity check")]
    InsaneBar { index: usize, date: NaiveDate },

    #[error("bar {index} ({date}) has symbol '{got}', series is for '{expected}'")]
    SymbolMismatch {
        index: usize,
        date: NaiveDate,
        got: String,
        expected: String,
    },
}

/// Ordered sequence of bars for one instrument.
#[derive(Debug, Clone, Default)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bar, enforcing strictly-increasing dates, OHLC sanity,
    /// and a single symbol per series.
    pub fn push(&mut self, bar: Bar) -> Result<(), SeriesError> {
        let index = self.bars.len();
        if let Some(prev) = self.bars.last() {
            if bar.date <= prev.date {
                return Err(SeriesError::NonMonotonicDate {
                    index,
                    date: bar.date,
                    prev_date: prev.date,
                });
            }
            if bar.symbol != prev.symbol {
                return Err(SeriesError::SymbolMismatch {
                    index,
                    date: bar.date,
                    got: bar.symbol.clone(),
                    expected: prev.symbol.clone(),
                });
            }
        }
        if !bar.is_sane() {
            return Err(SeriesError::InsaneBar {
                index,
                date: bar.date,
            });
        }
        self.bars.push(bar);
        Ok(())
    }

    /// Build a series from bars already in order, validating each one.
    pub fn from_bars(bars: impl IntoIterator<Item = Bar>) -> Result<Self, SeriesError> {
        let mut series = Self::new();
        for bar in bars {
            series.push(bar)?;
        }
        Ok(series)
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn get(&self, index: usize) -> Option<&Bar> {
        self.bars.get(index)
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }

    pub fn symbol(&self) -> Option<&str> {
        self.bars.first().map(|b| b.symbol.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Bar> {
        self.bars.iter()
    }
}

impl<'a> IntoIterator for &'a BarSeries {
    type Item = &'a Bar;
    type IntoIter = std::slice::Iter<'a, Bar>;

    fn into_iter(self) -> Self::IntoIter {
        self.bars.iter()
    }
}
