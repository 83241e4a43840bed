use chrono::NaiveDate;
use serde::Serialize;

use super::FrameError;

// ---------------------------------------------------------------------------
// PriceSeries -- one field of one ticker over consecutive trading days
// ---------------------------------------------------------------------------

/// Ordered daily values for a single ticker and price field.
///
/// Dates are strictly increasing. A missing quote is `None`; NaN inputs are
/// normalised to `None` on construction so downstream code only ever sees one
/// representation of "undefined".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    dates: Vec<NaiveDate>,
    values: Vec<Option<f64>>,
}

impl PriceSeries {
    /// Build a series, validating date order and length agreement.
    pub fn new(dates: Vec<NaiveDate>, values: Vec<Option<f64>>) -> Result<Self, FrameError> {
        check_dates(&dates)?;
        if dates.len() != values.len() {
            return Err(FrameError::LengthMismatch {
                column: "series".to_string(),
                expected: dates.len(),
                actual: values.len(),
            });
        }
        let values = values
            .into_iter()
            .map(|v| v.filter(|x| !x.is_nan()))
            .collect();
        Ok(Self { dates, values })
    }

    #[cfg(test)]
    pub fn dates(&self) -> &[NaiveDate] {
        &self.dates
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Keep only the points inside the inclusive `[start, end]` window. An
    /// open bound keeps everything on that side.
    pub fn between(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        let (lo, hi) = window_bounds(&self.dates, start, end);
        Self {
            dates: self.dates[lo..hi].to_vec(),
            values: self.values[lo..hi].to_vec(),
        }
    }
}

/// Reject duplicate or out-of-order dates.
pub(crate) fn check_dates(dates: &[NaiveDate]) -> Result<(), FrameError> {
    for (i, pair) in dates.windows(2).enumerate() {
        if pair[1] <= pair[0] {
            return Err(FrameError::NonMonotonicTimestamps {
                index: i + 1,
                date: pair[1],
            });
        }
    }
    Ok(())
}

/// Index range `[lo, hi)` of `dates` inside the inclusive window.
pub(crate) fn window_bounds(
    dates: &[NaiveDate],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> (usize, usize) {
    let lo = start.map_or(0, |s| dates.partition_point(|d| *d < s));
    let hi = end.map_or(dates.len(), |e| dates.partition_point(|d| *d <= e));
    (lo, hi.max(lo))
}
