// =============================================================================
// Technical Indicators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the indicators offered on the
// dashboard.  Inputs are `&[Option<f64>]` where `None` marks a missing quote;
// every output is index-aligned with its input and uses `None` for positions
// that cannot be computed.  Undefined values are never coerced to zero.
//
// Parameters are validated before anything else, so an invalid window fails
// even on an empty series.  A valid call on an empty series returns an empty
// result.

pub mod ema;
pub mod ma;
pub mod macd;
pub mod rsi;
pub mod swing;

pub use ma::moving_average;
pub use macd::{macd, MacdResult};
pub use rsi::rsi;
pub use swing::swing;

use thiserror::Error;

/// Index-aligned indicator output; `None` marks an undefined position.
pub type IndicatorResult = Vec<Option<f64>>;

/// Parameter validation failures. Numeric edge cases are never errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndicatorError {
    #[error("invalid {name} window: {value} (must be >= 1)")]
    InvalidWindow { name: &'static str, value: usize },
    #[error("invalid MACD {name} period: {value} (must be >= 1)")]
    InvalidPeriod { name: &'static str, value: usize },
}

pub(crate) fn check_window(name: &'static str, value: usize) -> Result<(), IndicatorError> {
    if value < 1 {
        return Err(IndicatorError::InvalidWindow { name, value });
    }
    Ok(())
}

pub(crate) fn check_period(name: &'static str, value: usize) -> Result<(), IndicatorError> {
    if value < 1 {
        return Err(IndicatorError::InvalidPeriod { name, value });
    }
    Ok(())
}


// =============================================================================
// Reference values
// =============================================================================
//
// Hand-computed expectations for a 10-point synthetic series, checked against
// every indicator in one place.
#[cfg(test)]
mod tests {
    use super::test_support::{assert_close, defined};
    use super::*;

    const SERIES: [f64; 10] = [10.0, 11.0, 12.0, 11.0, 13.0, 14.0, 13.0, 12.0, 14.0, 15.0];
    const TOL: f64 = 1e-9;

    #[test]
    fn moving_average_window_3() {
        let ma = moving_average(&defined(&SERIES), 3).unwrap();
        let expected = [
            None,
            None,
            Some(11.0),
            Some(34.0 / 3.0),
            Some(12.0),
            Some(38.0 / 3.0),
            Some(40.0 / 3.0),
            Some(13.0),
            Some(13.0),
            Some(41.0 / 3.0),
        ];
        assert_close(&ma, &expected, TOL);
    }

    #[test]
    fn rsi_window_2() {
        // deltas: _, 1, 1, -1, 2, 1, -1, -1, 2, 1
        // avg gain/loss over the last two deltas (index 0 contributes zeros).
        let out = rsi(&defined(&SERIES), 2).unwrap();
        let expected = [
            None,
            Some(100.0),
            Some(100.0),
            Some(50.0),
            Some(100.0 - 100.0 / 3.0),
            Some(100.0),
            Some(50.0),
            Some(0.0),
            Some(100.0 - 100.0 / 3.0),
            Some(100.0),
        ];
        assert_close(&out, &expected, TOL);
    }

    #[test]
    fn macd_3_2_2() {
        let out = macd(&defined(&SERIES), 3, 2, 2).unwrap();

        // fast alpha = 2/3, slow alpha = 1/2, signal alpha = 2/3
        let mut fast = SERIES[0];
        let mut slow = SERIES[0];
        let mut signal = 0.0;
        for (i, &v) in SERIES.iter().enumerate() {
            if i > 0 {
                fast = 2.0 / 3.0 * v + 1.0 / 3.0 * fast;
                slow = 0.5 * v + 0.5 * slow;
            }
            let line = fast - slow;
            signal = if i == 0 { line } else { 2.0 / 3.0 * line + 1.0 / 3.0 * signal };
            let m = out.macd[i].unwrap();
            let s = out.signal[i].unwrap();
            let h = out.histogram[i].unwrap();
            assert!((m - line).abs() < TOL, "macd[{i}] = {m}, expected {line}");
            assert!((s - signal).abs() < TOL, "signal[{i}] = {s}, expected {signal}");
            assert!((h - (line - signal)).abs() < TOL);
        }

        // Spot-check the first few positions against literal arithmetic.
        assert_close(
            &out.macd[..3],
            &[Some(0.0), Some(1.0 / 6.0), Some(11.0 / 36.0)],
            TOL,
        );
        assert_close(
            &out.signal[..3],
            &[Some(0.0), Some(1.0 / 9.0), Some(13.0 / 54.0)],
            TOL,
        );
    }

    #[test]
    fn swing_shift_1() {
        let out = swing(&defined(&SERIES), 1).unwrap();
        let expected = [
            None,
            Some(10.0),
            Some(100.0 / 11.0),
            Some(-100.0 / 12.0),
            Some(200.0 / 11.0),
            Some(100.0 / 13.0),
            Some(-100.0 / 14.0),
            Some(-100.0 / 13.0),
            Some(200.0 / 12.0),
            Some(100.0 / 14.0),
        ];
        assert_close(&out, &expected, TOL);
    }

    #[test]
    fn repeated_calls_are_bit_identical() {
        let series = defined(&SERIES);
        let bits = |v: &[Option<f64>]| v.iter().map(|x| x.map(f64::to_bits)).collect::<Vec<_>>();

        assert_eq!(
            bits(&moving_average(&series, 3).unwrap()),
            bits(&moving_average(&series, 3).unwrap())
        );
        assert_eq!(bits(&rsi(&series, 2).unwrap()), bits(&rsi(&series, 2).unwrap()));
        assert_eq!(bits(&swing(&series, 1).unwrap()), bits(&swing(&series, 1).unwrap()));
        let a = macd(&series, 3, 2, 2).unwrap();
        let b = macd(&series, 3, 2, 2).unwrap();
        assert_eq!(bits(&a.histogram), bits(&b.histogram));
    }

    #[test]
    fn error_messages_name_the_parameter() {
        let err = moving_average(&[], 0).unwrap_err();
        assert_eq!(err.to_string(), "invalid MA window: 0 (must be >= 1)");
        let err = macd(&[], 26, 12, 0).unwrap_err();
        assert_eq!(err.to_string(), "invalid MACD signal period: 0 (must be >= 1)");
    }

    #[test]
    fn oversized_parameters_are_values_not_allocations() {
        let series = defined(&SERIES);
        for n in [1usize << 44, usize::MAX] {
            assert!(moving_average(&series, n).unwrap().iter().all(Option::is_none));
            assert!(swing(&series, n).unwrap().iter().all(Option::is_none));
            assert_eq!(rsi(&series, n).unwrap().len(), SERIES.len());
            let m = macd(&series, n, n, n).unwrap();
            assert_eq!(m.macd.len(), SERIES.len());
            assert_eq!(m.histogram[0], Some(0.0));
        }
    }
}
