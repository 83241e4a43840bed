// =============================================================================
// Trace Assembler
// =============================================================================
//
// Builds the renderable figure for one request.
//
// Step 1: Plan rows from the method selection (see `layout`).
// Step 2: Compute every selected method for every active ticker.
// Step 3: Emit traces ticker-major, in the order MA, Close, RSI, MACD,
//         Swing, Candles, each tagged with its row and y-axis.
//
// The figure always has a secondary y-axis available on row 1; only RSI
// ever uses it, and only when prices are drawn on the same row.
// =============================================================================

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use super::ChartError;
use crate::indicators::IndicatorResult;
use crate::layout::{LayoutPlan, MethodSelection, RowSpec};
use crate::market_data::adapter::{compute_method, IndicatorOutput, Tagged};
use crate::market_data::PriceFrame;
use crate::runtime_config::IndicatorParams;
use crate::types::{ChartTheme, Method};

const VERTICAL_SPACING: f64 = 0.2;
const X_AXIS_TITLE: &str = "Date";

// =============================================================================
// Payload types
// =============================================================================

/// Figure-level settings: subplot grid, template and axis titles.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureLayout {
    pub rows: usize,
    pub vertical_spacing: f64,
    /// Rows whose subplot carries a secondary y-axis.
    pub secondary_y_rows: Vec<usize>,
    pub template: &'static str,
    pub x_title: &'static str,
    pub row_specs: Vec<RowSpec>,
}

impl FigureLayout {
    fn new(plan: LayoutPlan, theme: ChartTheme) -> Self {
        Self {
            rows: plan.rows,
            vertical_spacing: VERTICAL_SPACING,
            secondary_y_rows: vec![1],
            template: theme.template(),
            x_title: X_AXIS_TITLE,
            row_specs: plan.row_specs,
        }
    }
}

/// Plotted values of one trace.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TraceData {
    Line {
        y: IndicatorResult,
    },
    Bar {
        y: IndicatorResult,
    },
    Candlestick {
        open: IndicatorResult,
        high: IndicatorResult,
        low: IndicatorResult,
        close: IndicatorResult,
    },
}

/// One named series placed on the figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    pub name: String,
    pub ticker: String,
    pub method: Method,
    pub row: usize,
    pub secondary_y: bool,
    pub x: Vec<NaiveDate>,
    #[serde(flatten)]
    pub data: TraceData,
}

/// Everything the front-end needs to draw the chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPayload {
    pub layout: FigureLayout,
    pub traces: Vec<Trace>,
}

impl ChartPayload {
    /// The figure for `selection` with nothing drawn on it.
    ///
    /// Used when no ticker is selected.
    pub fn empty(selection: &MethodSelection, theme: ChartTheme) -> Self {
        Self {
            layout: FigureLayout::new(LayoutPlan::for_selection(selection), theme),
            traces: Vec::new(),
        }
    }
}

// =============================================================================
// Assembly
// =============================================================================

/// Compute and lay out every selected method for every ticker in `frame`.
pub fn assemble_chart(
    frame: &PriceFrame,
    selection: &MethodSelection,
    params: &IndicatorParams,
    theme: ChartTheme,
) -> Result<ChartPayload, ChartError> {
    let plan = LayoutPlan::for_selection(selection);

    // Placements are already in trace order within a ticker.
    let mut computed = Vec::with_capacity(plan.placements.len());
    for placement in &plan.placements {
        let outputs = compute_method(frame, placement.method, params)?;
        computed.push((*placement, outputs));
    }

    let dates = frame.dates();
    let mut traces = Vec::new();
    for (idx, ticker) in frame.tickers().iter().enumerate() {
        for (placement, outputs) in &computed {
            let Some(Tagged { value, .. }) = outputs.get(idx) else {
                continue;
            };
            let base = TraceBase {
                ticker,
                method: placement.method,
                row: placement.row,
                secondary_y: placement.secondary_y,
                dates,
            };
            traces.extend(base.traces_for(value));
        }
    }

    debug!(
        rows = plan.rows,
        tickers = frame.ticker_count(),
        traces = traces.len(),
        "chart assembled"
    );

    Ok(ChartPayload {
        layout: FigureLayout::new(plan, theme),
        traces,
    })
}

/// Shared fields of every trace one (method, ticker) pair produces.
struct TraceBase<'a> {
    ticker: &'a str,
    method: Method,
    row: usize,
    secondary_y: bool,
    dates: &'a [NaiveDate],
}

impl TraceBase<'_> {
    fn trace(&self, label: &str, data: TraceData) -> Trace {
        Trace {
            name: format!("{label} {}", self.ticker),
            ticker: self.ticker.to_string(),
            method: self.method,
            row: self.row,
            secondary_y: self.secondary_y,
            x: self.dates.to_vec(),
            data,
        }
    }

    fn traces_for(&self, output: &IndicatorOutput) -> Vec<Trace> {
        match output {
            IndicatorOutput::Line(y) => {
                vec![self.trace(self.method.name(), TraceData::Line { y: y.clone() })]
            }
            IndicatorOutput::Macd(m) => vec![
                self.trace("MACD", TraceData::Line { y: m.macd.clone() }),
                self.trace("Signal", TraceData::Line { y: m.signal.clone() }),
                self.trace("Histogram", TraceData::Bar { y: m.histogram.clone() }),
            ],
            IndicatorOutput::Candles(ohlc) => vec![self.trace(
                "Candles",
                TraceData::Candlestick {
                    open: ohlc.open.clone(),
                    high: ohlc.high.clone(),
                    low: ohlc.low.clone(),
                    close: ohlc.close.clone(),
                },
            )],
        }
    }
}
