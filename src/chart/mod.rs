// =============================================================================
// Chart assembly
// =============================================================================
//
// Turns a price frame, a method selection and indicator parameters into the
// payload the front-end renders: a figure layout plus ordered traces.

pub mod traces;

pub use traces::{assemble_chart, ChartPayload, FigureLayout, Trace, TraceData};

use thiserror::Error;

use crate::indicators::IndicatorError;
use crate::market_data::FrameError;

/// Anything that can stop a chart from being assembled.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error(transparent)]
    Indicator(#[from] IndicatorError),
    #[error(transparent)]
    Frame(#[from] FrameError),
}

impl ChartError {
    /// True when the caller supplied a bad parameter rather than bad data.
    pub fn is_invalid_parameter(&self) -> bool {
        matches!(self, Self::Indicator(_))
    }
}
