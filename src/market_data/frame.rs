use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::debug;

use super::series::{check_dates, window_bounds, PriceSeries};
use super::FrameError;
use crate::types::PriceField;

// ---------------------------------------------------------------------------
// Column addressing
// ---------------------------------------------------------------------------

/// Address of a column inside a [`PriceFrame`].
///
/// A single-ticker frame is addressed by field alone; a multi-ticker frame by
/// (field, ticker). Which shape applies is fixed by the frame variant, so
/// callers obtain keys through [`PriceFrame::column_key`] and never build the
/// shape themselves.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub enum ColumnKey {
    Field(PriceField),
    Qualified(PriceField, String),
}

impl std::fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Field(field) => write!(f, "{field}"),
            Self::Qualified(field, ticker) => write!(f, "({field}, {ticker})"),
        }
    }
}

/// One column as supplied by a price provider.
#[derive(Debug, Clone, Deserialize)]
pub struct RawColumn {
    pub field: PriceField,
    #[serde(default)]
    pub ticker: Option<String>,
    pub values: Vec<Option<f64>>,
}

// ---------------------------------------------------------------------------
// PriceFrame
// ---------------------------------------------------------------------------

/// Daily prices for the active tickers, sharing one date index.
///
/// The variant is chosen once, at construction, from the number of active
/// tickers. Every field read goes through that choice.
#[derive(Debug, Clone)]
pub enum PriceFrame {
    Single(SingleTickerFrame),
    Multi(MultiTickerFrame),
}

#[derive(Debug, Clone)]
pub struct SingleTickerFrame {
    ticker: String,
    dates: Vec<NaiveDate>,
    columns: HashMap<PriceField, PriceSeries>,
}

#[derive(Debug, Clone)]
pub struct MultiTickerFrame {
    tickers: Vec<String>,
    dates: Vec<NaiveDate>,
    columns: HashMap<(PriceField, String), PriceSeries>,
}

impl PriceFrame {
    /// Assemble a frame for `tickers` from provider columns.
    ///
    /// * One ticker: columns are keyed by field; a column tagged with some
    ///   other ticker is dropped.
    /// * Several tickers: every column must carry a ticker; columns for
    ///   tickers outside the active set are dropped.
    pub fn from_columns(
        tickers: &[String],
        dates: Vec<NaiveDate>,
        columns: Vec<RawColumn>,
    ) -> Result<Self, FrameError> {
        check_dates(&dates)?;

        match tickers {
            [] => Err(FrameError::NoTickers),
            [ticker] => {
                let mut map = HashMap::new();
                for col in columns {
                    if col.ticker.as_ref().is_some_and(|t| t != ticker) {
                        debug!(field = %col.field, ticker = ?col.ticker, "dropping column for inactive ticker");
                        continue;
                    }
                    let key = ColumnKey::Field(col.field);
                    let series = build_series(&key, &dates, col.values)?;
                    map.insert(col.field, series);
                }
                Ok(Self::Single(SingleTickerFrame {
                    ticker: ticker.clone(),
                    dates,
                    columns: map,
                }))
            }
            _ => {
                let mut map = HashMap::new();
                for col in columns {
                    let ticker = col
                        .ticker
                        .ok_or(FrameError::UnqualifiedColumn { field: col.field })?;
                    if !tickers.contains(&ticker) {
                        debug!(field = %col.field, ticker = %ticker, "dropping column for inactive ticker");
                        continue;
                    }
                    let key = ColumnKey::Qualified(col.field, ticker.clone());
                    let series = build_series(&key, &dates, col.values)?;
                    map.insert((col.field, ticker), series);
                }
                Ok(Self::Multi(MultiTickerFrame {
                    tickers: tickers.to_vec(),
                    dates,
                    columns: map,
                }))
            }
        }
    }

    /// Active tickers in selection order.
    pub fn tickers(&self) -> &[String] {
        match self {
            Self::Single(f) => std::slice::from_ref(&f.ticker),
            Self::Multi(f) => &f.tickers,
        }
    }

    pub fn ticker_count(&self) -> usize {
        self.tickers().len()
    }

    /// The shared date index.
    pub fn dates(&self) -> &[NaiveDate] {
        match self {
            Self::Single(f) => &f.dates,
            Self::Multi(f) => &f.dates,
        }
    }

    /// The key addressing `field` of `ticker` in this frame.
    pub fn column_key(&self, field: PriceField, ticker: &str) -> ColumnKey {
        match self {
            Self::Single(_) => ColumnKey::Field(field),
            Self::Multi(_) => ColumnKey::Qualified(field, ticker.to_string()),
        }
    }

    /// Look up a column by key. A key of the wrong shape never resolves.
    pub fn column(&self, key: &ColumnKey) -> Result<&PriceSeries, FrameError> {
        let found = match (self, key) {
            (Self::Single(f), ColumnKey::Field(field)) => f.columns.get(field),
            (Self::Multi(f), ColumnKey::Qualified(field, ticker)) => {
                f.columns.get(&(*field, ticker.clone()))
            }
            _ => None,
        };
        found.ok_or_else(|| FrameError::UnresolvableColumn {
            column: key.to_string(),
        })
    }

    /// Resolve `field` of `ticker`, honouring the frame's addressing shape.
    pub fn resolve(&self, field: PriceField, ticker: &str) -> Result<&PriceSeries, FrameError> {
        self.column(&self.column_key(field, ticker))
    }

    /// Restrict every column to the inclusive `[start, end]` date window.
    pub fn between(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        if start.is_none() && end.is_none() {
            return self.clone();
        }
        let (lo, hi) = window_bounds(self.dates(), start, end);
        match self {
            Self::Single(f) => Self::Single(SingleTickerFrame {
                ticker: f.ticker.clone(),
                dates: f.dates[lo..hi].to_vec(),
                columns: f
                    .columns
                    .iter()
                    .map(|(k, s)| (*k, s.between(start, end)))
                    .collect(),
            }),
            Self::Multi(f) => Self::Multi(MultiTickerFrame {
                tickers: f.tickers.clone(),
                dates: f.dates[lo..hi].to_vec(),
                columns: f
                    .columns
                    .iter()
                    .map(|(k, s)| (k.clone(), s.between(start, end)))
                    .collect(),
            }),
        }
    }
}

fn build_series(
    key: &ColumnKey,
    dates: &[NaiveDate],
    values: Vec<Option<f64>>,
) -> Result<PriceSeries, FrameError> {
    if values.len() != dates.len() {
        return Err(FrameError::LengthMismatch {
            column: key.to_string(),
            expected: dates.len(),
            actual: values.len(),
        });
    }
    PriceSeries::new(dates.to_vec(), values)
}
