//! Bar data ingestion: CSV loading and synthetic generation.

pub mod csv_loader;
pub mod synthetic;

pub use csv_loader::{load_bars_csv, DataError};
pub use synthetic::generate_synthetic_bars;
