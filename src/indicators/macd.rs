// =============================================================================
// Moving Average Convergence / Divergence (MACD)
// =============================================================================
//
//   macd      = EMA(close, fast) - EMA(close, slow)
//   signal    = EMA(macd, signal)
//   histogram = macd - signal
//
// All three lines are index-aligned with the input and defined from index 0
// for a fully-defined series.  `fast < slow` is the usual configuration but is
// not required.

use serde::Serialize;

use super::ema::ema;
use super::{IndicatorError, IndicatorResult};

/// The three MACD lines, sharing one index.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MacdResult {
    pub macd: IndicatorResult,
    pub signal: IndicatorResult,
    pub histogram: IndicatorResult,
}

/// Compute MACD with the given `slow`, `fast` and `signal` spans.
///
/// Fails with `InvalidPeriod` when any span is zero.
pub fn macd(
    values: &[Option<f64>],
    slow: usize,
    fast: usize,
    signal: usize,
) -> Result<MacdResult, IndicatorError> {
    super::check_period("slow", slow)?;
    super::check_period("fast", fast)?;
    super::check_period("signal", signal)?;

    let fast_ema = ema(values, fast);
    let slow_ema = ema(values, slow);

    let macd_line: IndicatorResult = fast_ema
        .iter()
        .zip(&slow_ema)
        .map(|(f, s)| Some((*f)? - (*s)?))
        .collect();
    let signal_line = ema(&macd_line, signal);
    let histogram = macd_line
        .iter()
        .zip(&signal_line)
        .map(|(m, s)| Some((*m)? - (*s)?))
        .collect();

    Ok(MacdResult {
        macd: macd_line,
        signal: signal_line,
        histogram,
    })
}
