// =============================================================================
// Simple Moving Average
// =============================================================================
//
// MA_t = mean(close_{t-window+1} ..= close_t)
//
// Positions with fewer than `window` observations behind them are undefined,
// as is any position whose window touches a missing quote.

use super::{IndicatorError, IndicatorResult};

/// Compute the trailing simple moving average of `values`.
///
/// # Edge cases
/// - `window == 0` => `InvalidWindow`
/// - `i < window - 1` => `None`
/// - a `None` inside the window => `None`
pub fn moving_average(values: &[Option<f64>], window: usize) -> Result<IndicatorResult, IndicatorError> {
    super::check_window("MA", window)?;

    let mut result = vec![None; values.len()];
    if values.len() < window {
        return Ok(result);
    }

    for (offset, slice) in values.windows(window).enumerate() {
        let sum: Option<f64> = slice.iter().copied().sum();
        result[offset + window - 1] = sum.map(|s| s / window as f64);
    }
    Ok(result)
}
