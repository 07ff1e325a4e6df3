//! CSV bar loading.
//!
//! Reads the Yahoo Finance daily-bar layout: `Date,Open,High,Low,Close,
//! Adj Close,Volume`, one row per trading session, ascending dates. Any
//! malformed or out-of-order record aborts the load with the offending
//! line identified — bad bars are never skipped or interpolated.

use crate::domain::{Bar, BarSeries, SeriesError};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Errors from the bar loading layer.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to open '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}:{line}: {message}")]
    MalformedRecord {
        path: String,
        line: u64,
        message: String,
    },

    #[error("{path}:{line}: {source}")]
    BadBar {
        path: String,
        line: u64,
        #[source]
        source: SeriesError,
    },

    #[error("'{path}' contains no bars")]
    Empty { path: String },
}

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open")]
    open: f64,
    #[serde(rename = "High")]
    high: f64,
    #[serde(rename = "Low")]
    low: f64,
    #[serde(rename = "Close")]
    close: f64,
    #[serde(rename = "Adj Close")]
    adj_close: f64,
    #[serde(rename = "Volume")]
    volume: u64,
}

/// Load a bar series for one symbol from a Yahoo-format CSV file.
pub fn load_bars_csv(path: &Path, symbol: &str) -> Result<BarSeries, DataError> {
    let path_str = path.display().to_string();
    let mut reader = csv::Reader::from_path(path).map_err(|e| match e.into_kind() {
        csv::ErrorKind::Io(source) => DataError::Io {
            path: path_str.clone(),
            source,
        },
        other => DataError::MalformedRecord {
            path: path_str.clone(),
            line: 1,
            message: format!("{other:?}"),
        },
    })?;

    let mut series = BarSeries::new();
    for (index, row) in reader.deserialize::<CsvRow>().enumerate() {
        // Line 1 is the header.
        let line = index as u64 + 2;
        let row = row.map_err(|e| DataError::MalformedRecord {
            path: path_str.clone(),
            line: e
                .position()
                .map(|p| p.line())
                .unwrap_or(line),
            message: e.to_string(),
        })?;

        let date = NaiveDate::parse_from_str(&row.date, "%Y-%m-%d").map_err(|e| {
            DataError::MalformedRecord {
                path: path_str.clone(),
                line,
                message: format!("bad date '{}': {e}", row.date),
            }
        })?;

        let bar = Bar {
            symbol: symbol.to_string(),
            date,
            open: row.open,
            high: row.high,
            low: row.low,
            close: row.close,
            volume: row.volume,
            adj_close: row.adj_close,
        };
        series.push(bar).map_err(|source| DataError::BadBar {
            path: path_str.clone(),
            line,
            source,
        })?;
    }

    if series.is_empty() {
        return Err(DataError::Empty { path: path_str });
    }
    Ok(series)
}
