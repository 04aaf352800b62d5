//! Room sheet engine API.
//!
//! - [`Cell`], [`CellValue`], [`ColumnKind`] - typed cells with display rounding
//! - [`Row`], [`Column`], [`Composite`] - the fixed six-column row layout
//! - [`Grid`], [`CellPos`] - ordered rows and structural operations
//! - [`RecalculationEngine`] - area/volume, composite folding and totals
//! - [`SelectionHighlighter`] - selection overlay merged with fold marks
//! - [`Sheet`] - the event router hosts talk to

mod cell;
mod format;
mod grid;
mod highlight;
mod matrix;
mod recalc;
mod row;
mod sheet;

pub use cell::{Cell, CellValue, ColumnKind, DEFAULT_LABEL, HighlightTag, MAX_INPUT_MAGNITUDE};
pub use format::{format_fixed, parse_decimal, round_half_up};
pub use grid::{CellPos, Grid};
pub use highlight::SelectionHighlighter;
pub use matrix::MatrixShape;
pub use recalc::{
    CalcConfig, DEFAULT_DWELLING_MARKERS, EngineState, FoldMark, RecalculationEngine, Summary,
};
pub use row::{COLUMN_COUNT, Column, Composite, OVERRIDE_MARKER, Row};
pub use sheet::Sheet;
