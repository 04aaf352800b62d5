//! Cell data structures for the calculation grid.
//!
//! This module provides the core data types for representing cells:
//! - [`ColumnKind`] - The fixed kind of a column (label or decimal)
//! - [`CellValue`] - A parsed, validated cell value
//! - [`HighlightTag`] - The background tag a host renders for a cell
//! - [`Cell`] - A typed value slot with its display text, rounding and editability

use rust_decimal::Decimal;

use super::format::{format_fixed, parse_decimal, round_half_up};
use crate::error::{CalcError, Result};

/// Label cells fall back to this when the input is empty or invalid.
pub const DEFAULT_LABEL: &str = "A";

/// Largest magnitude a decimal cell accepts as input. Anything beyond it is
/// treated as malformed, which keeps every product and sum in a recompute
/// pass far below `Decimal::MAX`.
pub const MAX_INPUT_MAGNITUDE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Apostrophe look-alikes that are stored as a plain `'` in labels.
const ALTERNATE_APOSTROPHES: [char; 4] = ['\u{2019}', '\u{2018}', '\u{02BC}', '`'];

/// The kind of value a column holds. Fixed per column index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Label,
    Decimal,
}

/// A parsed cell value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CellValue {
    Label(String),
    Decimal(Decimal),
}

impl CellValue {
    pub fn kind(&self) -> ColumnKind {
        match self {
            CellValue::Label(_) => ColumnKind::Label,
            CellValue::Decimal(_) => ColumnKind::Decimal,
        }
    }

    pub fn as_decimal(&self) -> Option<Decimal> {
        match self {
            CellValue::Decimal(d) => Some(*d),
            CellValue::Label(_) => None,
        }
    }

    pub fn as_label(&self) -> Option<&str> {
        match self {
            CellValue::Label(s) => Some(s),
            CellValue::Decimal(_) => None,
        }
    }
}

/// Background tag for a cell.
///
/// The final tag of every cell is computed in one render step from both the
/// selection and the composite-fold marks, see [`crate::engine::Sheet::render`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HighlightTag {
    #[default]
    None,
    /// The row contains a selected cell.
    Selected,
    /// A `+` row whose area was folded into the row above.
    Absorbed,
    /// A row that received a folded `+` or `-` row.
    Receiving,
    /// A `-` row whose area was subtracted from the row above.
    Subtracted,
}

/// A single typed, validated, formatted value slot.
#[derive(Clone, Debug)]
pub struct Cell {
    kind: ColumnKind,
    raw_text: String,
    value: CellValue,
    rounding: Option<u32>,
    editable: bool,
    default_value: CellValue,
    highlight_tag: HighlightTag,
}

impl Cell {
    /// Create a label cell holding [`DEFAULT_LABEL`].
    pub fn new_label() -> Cell {
        let default_value = CellValue::Label(DEFAULT_LABEL.to_string());
        Cell {
            kind: ColumnKind::Label,
            raw_text: DEFAULT_LABEL.to_string(),
            value: default_value.clone(),
            rounding: None,
            editable: true,
            default_value,
            highlight_tag: HighlightTag::None,
        }
    }

    /// Create a decimal cell holding zero, displayed with `rounding` places.
    pub fn new_decimal(rounding: Option<u32>) -> Cell {
        let default_value = CellValue::Decimal(Decimal::ZERO);
        let mut cell = Cell {
            kind: ColumnKind::Decimal,
            raw_text: String::new(),
            value: default_value.clone(),
            rounding,
            editable: true,
            default_value,
            highlight_tag: HighlightTag::None,
        };
        cell.raw_text = cell.format(Decimal::ZERO);
        cell
    }

    pub fn kind(&self) -> ColumnKind {
        self.kind
    }

    pub fn rounding(&self) -> Option<u32> {
        self.rounding
    }

    /// The normalized display text.
    pub fn text(&self) -> &str {
        &self.raw_text
    }

    /// The current value without the empty-resets-to-default side effect.
    pub fn value(&self) -> &CellValue {
        &self.value
    }

    pub fn default_value(&self) -> &CellValue {
        &self.default_value
    }

    pub fn editable(&self) -> bool {
        self.editable
    }

    pub fn set_editable(&mut self, flag: bool) {
        self.editable = flag;
    }

    pub fn tag(&self) -> HighlightTag {
        self.highlight_tag
    }

    pub(crate) fn set_tag(&mut self, tag: HighlightTag) {
        self.highlight_tag = tag;
    }

    /// Decimal value, or zero for label cells.
    pub fn decimal(&self) -> Decimal {
        self.value.as_decimal().unwrap_or(Decimal::ZERO)
    }

    /// Normalize and store user text.
    ///
    /// Text that does not parse as the cell's kind, or a number larger than
    /// [`MAX_INPUT_MAGNITUDE`], is replaced by the default value. Decimal
    /// input is rounded to the cell's precision before it is stored, so
    /// later arithmetic sees exactly what is displayed.
    /// Returns whether the stored value changed.
    pub fn set_raw(&mut self, text: &str) -> bool {
        let parsed = match self.kind {
            ColumnKind::Label => normalize_label(text).map(CellValue::Label),
            ColumnKind::Decimal => parse_decimal(text)
                .filter(|d| d.abs() <= MAX_INPUT_MAGNITUDE)
                .map(|d| CellValue::Decimal(self.round(d))),
        };
        let value = parsed.unwrap_or_else(|| self.default_value.clone());
        self.store(value)
    }

    /// Store a computed decimal (derived write). Rounds like user input.
    pub(crate) fn set_decimal(&mut self, value: Decimal) -> bool {
        debug_assert_eq!(self.kind, ColumnKind::Decimal);
        let rounded = self.round(value);
        self.store(CellValue::Decimal(rounded))
    }

    /// Read the current value. An empty label is reset to the default first.
    pub fn read(&mut self) -> &CellValue {
        let empty = matches!(&self.value, CellValue::Label(s) if s.is_empty());
        if empty {
            let default_value = self.default_value.clone();
            self.store(default_value);
        }
        &self.value
    }

    /// Add another decimal cell into this one (composite folding).
    pub fn try_add(&mut self, other: &Cell) -> Result<()> {
        let (lhs, rhs) = self.operands(other)?;
        self.set_decimal(lhs.saturating_add(rhs));
        Ok(())
    }

    /// Subtract another decimal cell from this one (composite folding).
    pub fn try_sub(&mut self, other: &Cell) -> Result<()> {
        let (lhs, rhs) = self.operands(other)?;
        self.set_decimal(lhs.saturating_sub(rhs));
        Ok(())
    }

    fn operands(&self, other: &Cell) -> Result<(Decimal, Decimal)> {
        match (&self.value, &other.value) {
            (CellValue::Decimal(a), CellValue::Decimal(b)) => Ok((*a, *b)),
            _ => Err(CalcError::ValueTypeMismatch {
                left: self.kind,
                right: other.kind,
            }),
        }
    }

    fn round(&self, value: Decimal) -> Decimal {
        match self.rounding {
            Some(dp) => round_half_up(value, dp),
            None => value,
        }
    }

    fn format(&self, value: Decimal) -> String {
        match self.rounding {
            Some(dp) => format_fixed(value, dp),
            None => value.normalize().to_string(),
        }
    }

    fn store(&mut self, value: CellValue) -> bool {
        let text = match &value {
            CellValue::Label(s) => s.clone(),
            CellValue::Decimal(d) => self.format(*d),
        };
        let changed = self.value != value || self.raw_text != text;
        self.value = value;
        self.raw_text = text;
        changed
    }
}

/// Trim, unify apostrophes and reject empty or control-character labels.
fn normalize_label(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.chars().any(char::is_control) {
        return None;
    }
    Some(
        trimmed
            .chars()
            .map(|c| {
                if ALTERNATE_APOSTROPHES.contains(&c) {
                    '\''
                } else {
                    c
                }
            })
            .collect(),
    )
}
