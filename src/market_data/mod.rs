pub mod adapter;
pub mod frame;
pub mod series;

// Re-export the frame types for convenient access (e.g. `use crate::market_data::PriceFrame`).
pub use frame::{ColumnKey, PriceFrame, RawColumn};
pub use series::PriceSeries;

use chrono::NaiveDate;
use thiserror::Error;

/// Malformed or mismatched price input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("column {column} is not present in the price frame")]
    UnresolvableColumn { column: String },
    #[error("dates must be strictly increasing (index {index}: {date})")]
    NonMonotonicTimestamps { index: usize, date: NaiveDate },
    #[error("column {column} has {actual} values but the frame has {expected} dates")]
    LengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },
    #[error("column {field} needs a ticker when more than one ticker is charted")]
    UnqualifiedColumn { field: crate::types::PriceField },
    #[error("a price frame needs at least one ticker")]
    NoTickers,
}
