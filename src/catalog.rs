// =============================================================================
// Catalog - what the selector offers and the parameter ranges it allows
// =============================================================================
//
// The indicator functions accept any window >= 1.  The narrower ranges here
// are what the dashboard sliders offer; they are published to clients and
// enforced when the stored defaults are changed.
// =============================================================================

use serde::Serialize;
use thiserror::Error;

use crate::runtime_config::{IndicatorParams, RuntimeConfig, TickerEntry};
use crate::types::Method;

/// Inclusive slider range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParamRange {
    pub min: usize,
    pub max: usize,
}

impl ParamRange {
    const fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    pub fn contains(self, value: usize) -> bool {
        (self.min..=self.max).contains(&value)
    }
}

/// Allowed range per indicator parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ParamBounds {
    pub ma_window: ParamRange,
    pub rsi_window: ParamRange,
    pub macd_slow: ParamRange,
    pub macd_fast: ParamRange,
    pub macd_signal: ParamRange,
    pub swing_shift: ParamRange,
}

pub const PARAM_BOUNDS: ParamBounds = ParamBounds {
    ma_window: ParamRange::new(2, 365),
    rsi_window: ParamRange::new(2, 365),
    macd_slow: ParamRange::new(20, 40),
    macd_fast: ParamRange::new(5, 19),
    macd_signal: ParamRange::new(6, 12),
    swing_shift: ParamRange::new(1, 100),
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{param} = {value} is outside the allowed range [{min}, {max}]")]
pub struct OutOfBounds {
    pub param: &'static str,
    pub value: usize,
    pub min: usize,
    pub max: usize,
}

impl ParamBounds {
    /// Check every parameter, reporting the first one out of range.
    pub fn check(&self, params: &IndicatorParams) -> Result<(), OutOfBounds> {
        macro_rules! check_field {
            ($($field:ident),*) => {
                $(if !self.$field.contains(params.$field) {
                    return Err(OutOfBounds {
                        param: stringify!($field),
                        value: params.$field,
                        min: self.$field.min,
                        max: self.$field.max,
                    });
                })*
            };
        }

        check_field!(ma_window, rsi_window, macd_slow, macd_fast, macd_signal, swing_shift);
        Ok(())
    }
}

// =============================================================================
// Catalog snapshot
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct MethodInfo {
    pub name: &'static str,
    pub description: &'static str,
}

/// Everything a client needs to render the selectors.
#[derive(Debug, Clone, Serialize)]
pub struct Catalog {
    pub tickers: Vec<TickerEntry>,
    pub methods: Vec<MethodInfo>,
    pub bounds: ParamBounds,
    pub defaults: IndicatorParams,
}

impl Catalog {
    pub fn from_config(config: &RuntimeConfig) -> Self {
        Self {
            tickers: config.tickers.clone(),
            methods: Method::ALL
                .into_iter()
                .map(|m| MethodInfo {
                    name: m.name(),
                    description: m.description(),
                })
                .collect(),
            bounds: PARAM_BOUNDS,
            defaults: config.indicator_defaults,
        }
    }
}
