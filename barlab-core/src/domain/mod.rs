//! Domain types for BarLab.

pub mod bar;
pub mod order;
pub mod position;
pub mod series;
pub mod trade;

pub use bar::{Bar, PriceField};
pub use order::{Fill, Order, OrderSide, RejectReason};
pub use position::{Position, PositionSide, PositionState};
pub use series::{BarSeries, SeriesError};
pub use trade::TradeRecord;

/// Symbol type alias
pub type Symbol = String;
