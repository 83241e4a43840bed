// =============================================================================
// Runtime Configuration - dashboard settings with atomic save
// =============================================================================
//
// Central configuration for the dashboard service: where to listen, which
// tickers the selector offers, and the indicator parameters used when a
// request leaves them out.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash.  All fields carry `#[serde(default)]` so that adding new fields
// never breaks loading an older config file.
//
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:8050".to_string()
}

fn default_tickers() -> Vec<TickerEntry> {
    [
        ("Apple", "AAPL"),
        ("Tesla", "TSLA"),
        ("Google", "GOOG"),
        ("Microsoft", "MSFT"),
        ("Uber", "UBER"),
        ("Meta", "META"),
        ("Nvidia", "NVDA"),
        ("Intel", "INTC"),
        ("Amazon", "AMZN"),
        ("Visa", "V"),
    ]
    .into_iter()
    .map(|(name, symbol)| TickerEntry::new(name, symbol))
    .collect()
}

fn default_ma_window() -> usize {
    14
}

fn default_rsi_window() -> usize {
    14
}

fn default_macd_slow() -> usize {
    26
}

fn default_macd_fast() -> usize {
    12
}

fn default_macd_signal() -> usize {
    9
}

fn default_swing_shift() -> usize {
    7
}

// =============================================================================
// TickerEntry
// =============================================================================

/// A selectable company: display name and exchange symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerEntry {
    pub name: String,
    pub symbol: String,
}

impl TickerEntry {
    pub fn new(name: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            symbol: symbol.into(),
        }
    }
}

/// Parse a `Name=SYMBOL,Name=SYMBOL` list. Malformed or empty entries are
/// skipped; symbols are upper-cased.
pub fn parse_ticker_list(raw: &str) -> Vec<TickerEntry> {
    raw.split(',')
        .filter_map(|item| {
            let (name, symbol) = item.split_once('=')?;
            let (name, symbol) = (name.trim(), symbol.trim().to_uppercase());
            (!name.is_empty() && !symbol.is_empty()).then(|| TickerEntry::new(name, symbol))
        })
        .collect()
}

// =============================================================================
// IndicatorParams
// =============================================================================

/// Indicator parameters applied to a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorParams {
    /// Moving average window, in trading days.
    #[serde(default = "default_ma_window")]
    pub ma_window: usize,

    /// RSI rolling window, in trading days.
    #[serde(default = "default_rsi_window")]
    pub rsi_window: usize,

    /// MACD slow EMA span.
    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,

    /// MACD fast EMA span.
    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,

    /// MACD signal EMA span.
    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,

    /// Swing look-back, in trading days.
    #[serde(default = "default_swing_shift")]
    pub swing_shift: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            ma_window: default_ma_window(),
            rsi_window: default_rsi_window(),
            macd_slow: default_macd_slow(),
            macd_fast: default_macd_fast(),
            macd_signal: default_macd_signal(),
            swing_shift: default_swing_shift(),
        }
    }
}

/// Per-request overrides; anything left out falls back to the configured
/// defaults.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct IndicatorParamsUpdate {
    #[serde(default)]
    pub ma_window: Option<usize>,
    #[serde(default)]
    pub rsi_window: Option<usize>,
    #[serde(default)]
    pub macd_slow: Option<usize>,
    #[serde(default)]
    pub macd_fast: Option<usize>,
    #[serde(default)]
    pub macd_signal: Option<usize>,
    #[serde(default)]
    pub swing_shift: Option<usize>,
}

impl IndicatorParams {
    /// Overlay `update` onto `self`, returning the merged parameters.
    pub fn merged(self, update: &IndicatorParamsUpdate) -> Self {
        let mut merged = self;

        macro_rules! overlay {
            ($($field:ident),*) => {
                $(if let Some(v) = update.$field {
                    merged.$field = v;
                })*
            };
        }

        overlay!(ma_window, rsi_window, macd_slow, macd_fast, macd_signal, swing_shift);
        merged
    }
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level runtime configuration for the dashboard service.
///
/// Every field has a serde default so that older JSON files missing new fields
/// will still deserialise correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Address the HTTP API listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Companies offered by the ticker selector, in display order.
    #[serde(default = "default_tickers")]
    pub tickers: Vec<TickerEntry>,

    /// Parameters used when a chart request does not specify them.
    #[serde(default)]
    pub indicator_defaults: IndicatorParams,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            tickers: default_tickers(),
            indicator_defaults: IndicatorParams::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        info!(
            path = %path.display(),
            tickers = config.tickers.len(),
            bind_addr = %config.bind_addr,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }

    /// Map a display name or a raw symbol to its symbol.
    ///
    /// Known display names map through the catalog; anything else is taken to
    /// be a symbol already and is upper-cased.
    pub fn symbol_for(&self, name_or_symbol: &str) -> String {
        self.tickers
            .iter()
            .find(|t| t.name == name_or_symbol)
            .map(|t| t.symbol.clone())
            .unwrap_or_else(|| name_or_symbol.trim().to_uppercase())
    }
}
