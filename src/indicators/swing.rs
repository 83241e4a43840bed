// =============================================================================
// Swing - percentage change over a look-back shift
// =============================================================================
//
//   swing_t = (close_t / close_{t-shift} - 1) * 100
//
// A zero historical close yields signed infinity, which is passed through as
// a value.  0 / 0 has no meaning and is reported as undefined.

use super::{IndicatorError, IndicatorResult};

/// Calculate the swing of `values` against the value `shift` positions back.
///
/// # Edge cases
/// - `shift == 0` => `InvalidWindow`
/// - `i < shift`, or either operand undefined => `None`
pub fn swing(values: &[Option<f64>], shift: usize) -> Result<IndicatorResult, IndicatorError> {
    super::check_window("Swing shift", shift)?;

    let result = (0..values.len())
        .map(|i| {
            let prev = values[i.checked_sub(shift)?]?;
            let cur = values[i]?;
            let pct = (cur / prev - 1.0) * 100.0;
            (!pct.is_nan()).then_some(pct)
        })
        .collect();
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::test_support::defined;
    use quickcheck_macros::quickcheck;

    #[test]
    fn swing_empty_input() {
        assert!(swing(&[], 7).unwrap().is_empty());
    }

    #[test]
    fn swing_shift_zero() {
        assert!(matches!(
            swing(&defined(&[1.0]), 0),
            Err(IndicatorError::InvalidWindow { value: 0, .. })
        ));
    }

    #[test]
    fn swing_basic() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let out = swing(&defined(&closes), 14).unwrap();
        assert!(out[..14].iter().all(Option::is_none));
        // From 1 to 15: (15 / 1 - 1) * 100 = 1400%
        assert!((out[14].unwrap() - 1400.0).abs() < 1e-10);
    }

    #[test]
    fn swing_zero_base_is_signed_infinity() {
        let out = swing(&defined(&[0.0, 0.0, 0.0, -5.0]), 2).unwrap();
        assert_eq!(out[2], None); // 0 / 0
        assert_eq!(out[3], Some(f64::NEG_INFINITY));

        let out = swing(&defined(&[0.0, 3.0]), 1).unwrap();
        assert_eq!(out[1], Some(f64::INFINITY));
    }

    #[test]
    fn swing_gap_is_undefined() {
        let out = swing(&[Some(1.0), None, Some(2.0), Some(4.0)], 1).unwrap();
        assert_eq!(out, vec![None, None, None, Some(100.0)]);
    }

    #[quickcheck]
    fn swing_matches_formula(raw: Vec<u16>, shift: u8) -> bool {
        let shift = (shift % 10) as usize + 1;
        let closes: Vec<f64> = raw.iter().map(|v| *v as f64 + 1.0).collect();
        let out = swing(&defined(&closes), shift).unwrap();

        out.len() == closes.len()
            && out.iter().enumerate().all(|(i, v)| {
                if i < shift {
                    v.is_none()
                } else {
                    *v == Some((closes[i] / closes[i - shift] - 1.0) * 100.0)
                }
            })
    }
}
