// =============================================================================
// Multi-series adapter - fans indicator calls out across tickers
// =============================================================================
//
// The indicator functions know nothing about tickers.  This module resolves
// the right column for every active ticker through the frame's addressing
// shape, runs the computation on the bare values and tags each result with
// its ticker for labelling downstream.

use serde::Serialize;
use tracing::debug;

use super::{FrameError, PriceFrame};
use crate::chart::ChartError;
use crate::indicators::{self, IndicatorError, IndicatorResult, MacdResult};
use crate::runtime_config::IndicatorParams;
use crate::types::{Method, PriceField};

/// A per-ticker result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tagged<T> {
    pub ticker: String,
    pub value: T,
}

/// Open / high / low / close columns of one ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ohlc {
    pub open: IndicatorResult,
    pub high: IndicatorResult,
    pub low: IndicatorResult,
    pub close: IndicatorResult,
}

/// What a method produces for one ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum IndicatorOutput {
    Line(IndicatorResult),
    Macd(MacdResult),
    Candles(Ohlc),
}

/// Run `f` on `field` of every active ticker, in ticker order.
pub fn fan_out<T, F>(frame: &PriceFrame, field: PriceField, mut f: F) -> Result<Vec<Tagged<T>>, ChartError>
where
    F: FnMut(&[Option<f64>]) -> Result<T, IndicatorError>,
{
    frame
        .tickers()
        .iter()
        .map(|ticker| -> Result<Tagged<T>, ChartError> {
            let series = frame.resolve(field, ticker)?;
            let value = f(series.values())?;
            Ok(Tagged {
                ticker: ticker.clone(),
                value,
            })
        })
        .collect()
}

/// Resolve all four price fields of `ticker`.
pub fn resolve_ohlc(frame: &PriceFrame, ticker: &str) -> Result<Ohlc, FrameError> {
    let column = |field| frame.resolve(field, ticker).map(|s| s.values().to_vec());
    Ok(Ohlc {
        open: column(PriceField::Open)?,
        high: column(PriceField::High)?,
        low: column(PriceField::Low)?,
        close: column(PriceField::Close)?,
    })
}

/// Compute `method` for every active ticker.
pub fn compute_method(
    frame: &PriceFrame,
    method: Method,
    params: &IndicatorParams,
) -> Result<Vec<Tagged<IndicatorOutput>>, ChartError> {
    debug!(%method, tickers = frame.ticker_count(), "computing indicator");

    let close = PriceField::Close;
    match method {
        Method::Close => fan_out(frame, close, |v| Ok(IndicatorOutput::Line(v.to_vec()))),
        Method::Ma => fan_out(frame, close, |v| {
            indicators::moving_average(v, params.ma_window).map(IndicatorOutput::Line)
        }),
        Method::Rsi => fan_out(frame, close, |v| {
            indicators::rsi(v, params.rsi_window).map(IndicatorOutput::Line)
        }),
        Method::Swing => fan_out(frame, close, |v| {
            indicators::swing(v, params.swing_shift).map(IndicatorOutput::Line)
        }),
        Method::Macd => fan_out(frame, close, |v| {
            indicators::macd(v, params.macd_slow, params.macd_fast, params.macd_signal)
                .map(IndicatorOutput::Macd)
        }),
        Method::Candles => frame
            .tickers()
            .iter()
            .map(|ticker| -> Result<_, ChartError> {
                Ok(Tagged {
                    ticker: ticker.clone(),
                    value: IndicatorOutput::Candles(resolve_ohlc(frame, ticker)?),
                })
            })
            .collect(),
    }
}
