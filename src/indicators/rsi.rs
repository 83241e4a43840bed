// =============================================================================
// Relative Strength Index (RSI) - rolling-mean smoothing
// =============================================================================
//
// RSI measures the speed and magnitude of recent price changes to evaluate
// whether an asset is overbought or oversold.
//
// Step 1 - Compute price changes (deltas) from consecutive closes.
// Step 2 - Split each delta into a gain (positive part) and a loss (negative
//          part, sign-flipped).  An undefined delta counts as zero gain and
//          zero loss.
// Step 3 - Average gain / average loss are plain rolling means over `window`
//          positions, started early: before a full window exists the mean is
//          taken over however many positions are available.
// Step 4 - RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
// =============================================================================

use std::collections::VecDeque;

use super::{IndicatorError, IndicatorResult};

/// Compute the RSI series for `values` over `window`.
///
/// Output is index-aligned with the input.
///
/// # Edge cases
/// - `window == 0` => `InvalidWindow`
/// - index 0, or any position whose delta is undefined => `None`
/// - average loss zero with positive average gain => exactly 100.0
/// - average loss and average gain both zero => `None`
pub fn rsi(values: &[Option<f64>], window: usize) -> Result<IndicatorResult, IndicatorError> {
    super::check_window("RSI", window)?;

    let mut result = Vec::with_capacity(values.len());
    let mut recent: VecDeque<(f64, f64)> = VecDeque::with_capacity(window.min(values.len()) + 1);

    for i in 0..values.len() {
        // --- Delta and its gain / loss split ---------------------------------
        let delta = match (i.checked_sub(1).and_then(|p| values[p]), values[i]) {
            (Some(prev), Some(cur)) => Some(cur - prev),
            _ => None,
        };
        let (gain, loss) = match delta {
            Some(d) if d > 0.0 => (d, 0.0),
            Some(d) if d < 0.0 => (0.0, -d),
            _ => (0.0, 0.0),
        };

        // --- Rolling window, min_periods = 1 ---------------------------------
        // Sums are recomputed from the window so a zero loss stays exactly zero.
        recent.push_back((gain, loss));
        if recent.len() > window {
            recent.pop_front();
        }
        let (sum_gain, sum_loss) = recent
            .iter()
            .fold((0.0_f64, 0.0_f64), |(sg, sl), &(g, l)| (sg + g, sl + l));

        let count = recent.len() as f64;
        let value = delta.and_then(|_| rsi_from_averages(sum_gain / count, sum_loss / count));
        result.push(value);
    }

    Ok(result)
}

// =============================================================================
// Internal helpers
// =============================================================================

/// Convert average gain / average loss into an RSI value in [0, 100].
///
/// Zero average loss is handled explicitly instead of relying on infinite RS.
fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss <= 0.0 {
        return if avg_gain > 0.0 { Some(100.0) } else { None };
    }
    let rs = avg_gain / avg_loss;
    let rsi = 100.0 - 100.0 / (1.0 + rs);
    rsi.is_finite().then_some(rsi)
}
