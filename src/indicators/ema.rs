// =============================================================================
// Exponential Moving Average (EMA) - recursive form
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than a simple moving average.
//
// Formula (no bias adjustment):
//   alpha  = 2 / (span + 1)
//   EMA_0  = close_0
//   EMA_t  = alpha * close_t + (1 - alpha) * EMA_{t-1}
//
// The series is seeded with the first observation rather than an SMA, so it
// is defined from index 0.
// =============================================================================

use super::IndicatorResult;

/// Compute the EMA of `values` with smoothing `span`.
///
/// Output is index-aligned with the input. `span` must be >= 1; callers
/// validate it against their own parameter names.
///
/// # Edge cases
/// - A leading run of undefined values stays undefined; the seed is the first
///   defined value.
/// - An undefined value inside the series yields an undefined output at that
///   position and the recurrence resumes from the last defined EMA.
pub fn ema(values: &[Option<f64>], span: usize) -> IndicatorResult {
    let alpha = 2.0 / (span as f64 + 1.0);

    let mut prev: Option<f64> = None;
    values
        .iter()
        .map(|value| {
            let value = (*value)?;
            let next = match prev {
                Some(prev) => alpha * value + (1.0 - alpha) * prev,
                None => value,
            };
            prev = Some(next);
            Some(next)
        })
        .collect()
}
