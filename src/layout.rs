// =============================================================================
// Chart Layout Planner
// =============================================================================
//
// Decides how many chart rows a method selection needs and where each method
// goes.  The rule is fixed:
//
//   - Close, MA and RSI share row 1.
//   - MACD, Swing and Candles each get an exclusive row, stacked in that
//     precedence directly below the shared row (or from row 1 without it).
//   - RSI moves to the secondary y-axis of row 1 whenever Close or MA is also
//     drawn there, so its 0-100 scale does not collide with prices.
//   - An empty selection still yields one placeholder row.
//
// The plan depends only on the selection, never on the number of tickers:
// every ticker's trace for a method lands in the same row.
// =============================================================================

use std::collections::BTreeSet;

use serde::Serialize;

use crate::types::Method;

/// Methods that share the top row, in trace order.
const SHARED_ROW: [Method; 3] = [Method::Ma, Method::Close, Method::Rsi];

/// Methods that each take an exclusive row, in stacking order.
const STACKED_ROWS: [Method; 3] = [Method::Macd, Method::Swing, Method::Candles];

/// Y-axis title used when a row has nothing to show.
const PLACEHOLDER_TITLE: &str = "Price $";

// =============================================================================
// MethodSelection
// =============================================================================

/// The set of methods the user ticked. Order and duplicates are irrelevant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MethodSelection(BTreeSet<Method>);

impl MethodSelection {
    /// Build a selection from wire names, silently dropping unknown ones.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        names
            .into_iter()
            .filter_map(|n| Method::from_name(n.as_ref()))
            .collect()
    }

    pub fn contains(&self, method: Method) -> bool {
        self.0.contains(&method)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    fn any_of(&self, methods: &[Method]) -> bool {
        methods.iter().any(|m| self.contains(*m))
    }
}

impl FromIterator<Method> for MethodSelection {
    fn from_iter<T: IntoIterator<Item = Method>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

// =============================================================================
// LayoutPlan
// =============================================================================

/// Where a single method is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Placement {
    pub method: Method,
    /// 1-based row index.
    pub row: usize,
    pub secondary_y: bool,
}

/// Per-row description consumed by the trace assembler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowSpec {
    /// 1-based row index.
    pub row: usize,
    pub methods: Vec<Method>,
    pub y_title: &'static str,
    /// Only ever set on row 1.
    pub secondary_y_title: Option<&'static str>,
}

/// Row count and method placement for one selection. Never mutated; a new
/// selection produces a new plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LayoutPlan {
    pub rows: usize,
    pub placements: Vec<Placement>,
    pub row_specs: Vec<RowSpec>,
}

impl LayoutPlan {
    /// Plan the rows for `selection`.
    pub fn for_selection(selection: &MethodSelection) -> Self {
        let mut placements = Vec::with_capacity(selection.len());
        let mut row_specs = Vec::new();

        // --- Shared row --------------------------------------------------------
        if selection.any_of(&SHARED_ROW) {
            let price_drawn = selection.contains(Method::Close) || selection.contains(Method::Ma);
            let members: Vec<Method> = SHARED_ROW
                .into_iter()
                .filter(|m| selection.contains(*m))
                .collect();

            for &method in &members {
                placements.push(Placement {
                    method,
                    row: 1,
                    secondary_y: method == Method::Rsi && price_drawn,
                });
            }

            let rsi_secondary = price_drawn && selection.contains(Method::Rsi);
            row_specs.push(RowSpec {
                row: 1,
                methods: members,
                y_title: if price_drawn {
                    axis_title(Method::Close)
                } else {
                    axis_title(Method::Rsi)
                },
                secondary_y_title: rsi_secondary.then(|| axis_title(Method::Rsi)),
            });
        }

        // --- Stacked rows ------------------------------------------------------
        for method in STACKED_ROWS.into_iter().filter(|m| selection.contains(*m)) {
            let row = row_specs.len() + 1;
            placements.push(Placement {
                method,
                row,
                secondary_y: false,
            });
            row_specs.push(RowSpec {
                row,
                methods: vec![method],
                y_title: axis_title(method),
                secondary_y_title: None,
            });
        }

        // --- Placeholder -------------------------------------------------------
        if row_specs.is_empty() {
            row_specs.push(RowSpec {
                row: 1,
                methods: Vec::new(),
                y_title: PLACEHOLDER_TITLE,
                secondary_y_title: None,
            });
        }

        Self {
            rows: row_specs.len(),
            placements,
            row_specs,
        }
    }
}

#[cfg(test)]
impl LayoutPlan {
    /// Placement of `method`, if it is part of the selection.
    pub fn placement(&self, method: Method) -> Option<Placement> {
        self.placements.iter().copied().find(|p| p.method == method)
    }

    /// Row of `method`, if it is part of the selection.
    pub fn row_of(&self, method: Method) -> Option<usize> {
        self.placement(method).map(|p| p.row)
    }
}

/// Y-axis title for the row hosting `method`.
pub fn axis_title(method: Method) -> &'static str {
    match method {
        Method::Close | Method::Ma => "Close Price $",
        Method::Rsi => "RSI value",
        Method::Macd => "MACD value",
        Method::Swing => "Swing Value",
        Method::Candles => "Price $",
    }
}
