// =============================================================================
// Shared types used across the dashboard engine
// =============================================================================

use serde::{Deserialize, Serialize};

/// An analysis method the user can overlay on the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Method {
    Close,
    #[serde(rename = "MA")]
    Ma,
    Swing,
    #[serde(rename = "RSI")]
    Rsi,
    #[serde(rename = "MACD")]
    Macd,
    Candles,
}

impl Method {
    /// Every method in catalog order.
    pub const ALL: [Method; 6] = [
        Method::Close,
        Method::Ma,
        Method::Swing,
        Method::Rsi,
        Method::Macd,
        Method::Candles,
    ];

    /// Wire name, identical to the serde representation.
    pub fn name(self) -> &'static str {
        match self {
            Self::Close => "Close",
            Self::Ma => "MA",
            Self::Swing => "Swing",
            Self::Rsi => "RSI",
            Self::Macd => "MACD",
            Self::Candles => "Candles",
        }
    }

    /// Human-readable description shown next to the selector.
    pub fn description(self) -> &'static str {
        match self {
            Self::Close => "Close price",
            Self::Ma => "Moving Average",
            Self::Swing => "Swing price",
            Self::Rsi => "Relative strength index",
            Self::Macd => "Moving Average convergence/divergence",
            Self::Candles => "Candles",
        }
    }

    /// Parse a wire name. Matching is exact; unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.name() == name)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// One of the four daily price fields a provider supplies per ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
}

impl std::fmt::Display for PriceField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "Open"),
            Self::High => write!(f, "High"),
            Self::Low => write!(f, "Low"),
            Self::Close => write!(f, "Close"),
        }
    }
}

/// Light or dark chart template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartTheme {
    Light,
    Dark,
}

impl Default for ChartTheme {
    fn default() -> Self {
        Self::Light
    }
}

impl ChartTheme {
    /// Plotly template name for this theme.
    pub fn template(self) -> &'static str {
        match self {
            Self::Light => "plotly_white",
            Self::Dark => "plotly_dark",
        }
    }
}
