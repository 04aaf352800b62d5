//! Fixed six-column rows.
//!
//! Every row holds `Label, Width, Length, Height, Area, Volume` in that order.
//! The column layout is static, so the kind of every cell is known from its
//! column index alone.

use rust_decimal::Decimal;
use std::fmt;

use super::cell::{Cell, ColumnKind};
use super::format::round_half_up;

pub const COLUMN_COUNT: usize = 6;

/// Marks a row as an override row: Area is entered, Width/Length are derived.
pub const OVERRIDE_MARKER: char = '!';

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Label,
    Width,
    Length,
    Height,
    Area,
    Volume,
}

impl Column {
    pub const ALL: [Column; COLUMN_COUNT] = [
        Column::Label,
        Column::Width,
        Column::Length,
        Column::Height,
        Column::Area,
        Column::Volume,
    ];

    /// Columns the user types into on a regular row.
    pub const RAW: [Column; 4] = [Column::Label, Column::Width, Column::Length, Column::Height];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Column> {
        Column::ALL.get(index).copied()
    }

    pub fn kind(self) -> ColumnKind {
        match self {
            Column::Label => ColumnKind::Label,
            _ => ColumnKind::Decimal,
        }
    }

    /// Display precision in decimal places.
    pub fn rounding(self) -> Option<u32> {
        match self {
            Column::Label => None,
            Column::Width | Column::Length | Column::Height => Some(2),
            Column::Area => Some(1),
            Column::Volume => Some(0),
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            Column::Label => "Room",
            Column::Width => "Width",
            Column::Length => "Length",
            Column::Height => "Height",
            Column::Area => "Area",
            Column::Volume => "Volume",
        }
    }

    pub fn is_derived(self) -> bool {
        matches!(self, Column::Area | Column::Volume)
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// How a composite row folds into the row above it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Composite {
    /// Label starts with `+`.
    Add,
    /// Label starts with `-`.
    Subtract,
}

impl Composite {
    pub fn marker(self) -> char {
        match self {
            Composite::Add => '+',
            Composite::Subtract => '-',
        }
    }

    pub fn from_label(label: &str) -> Option<Composite> {
        match label.chars().next() {
            Some('+') => Some(Composite::Add),
            Some('-') => Some(Composite::Subtract),
            _ => None,
        }
    }
}

/// A fixed ordered sequence of six cells.
#[derive(Clone, Debug)]
pub struct Row {
    cells: [Cell; COLUMN_COUNT],
    override_mode: bool,
}

impl Row {
    /// A freshly filled row: label `A`, zero dimensions, derived columns locked.
    pub fn new() -> Row {
        let cells = Column::ALL.map(|col| match col.kind() {
            ColumnKind::Label => Cell::new_label(),
            ColumnKind::Decimal => Cell::new_decimal(col.rounding()),
        });
        let mut row = Row {
            cells,
            override_mode: false,
        };
        row.apply_editability();
        row
    }

    pub fn cell(&self, col: Column) -> &Cell {
        &self.cells[col.index()]
    }

    pub(crate) fn cell_mut(&mut self, col: Column) -> &mut Cell {
        &mut self.cells[col.index()]
    }

    pub fn cells(&self) -> &[Cell; COLUMN_COUNT] {
        &self.cells
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [Cell; COLUMN_COUNT] {
        &mut self.cells
    }

    pub fn label(&self) -> &str {
        self.cell(Column::Label).text()
    }

    pub fn decimal(&self, col: Column) -> Decimal {
        self.cell(col).decimal()
    }

    /// Whether the label asks for override mode.
    pub fn is_override(&self) -> bool {
        self.label().contains(OVERRIDE_MARKER)
    }

    pub fn composite(&self) -> Option<Composite> {
        Composite::from_label(self.label())
    }

    /// Whether the row is currently in override mode (Area is the source).
    pub fn override_mode(&self) -> bool {
        self.override_mode
    }

    /// Bring the row's mode in line with its label.
    ///
    /// Entering override mode turns the current `Width×Length` into the
    /// override source (`Width := round(Width×Length, 1dp)`, `Length := 1`).
    /// Returns whether the mode changed.
    pub(crate) fn sync_mode(&mut self) -> bool {
        let wanted = self.is_override();
        if wanted == self.override_mode {
            return false;
        }
        if wanted {
            let base = self
                .decimal(Column::Width)
                .saturating_mul(self.decimal(Column::Length));
            self.set_override_source(base);
        }
        self.override_mode = wanted;
        self.apply_editability();
        true
    }

    /// Store `area` as the override source: `Width := round(area, 1dp)`, `Length := 1`.
    pub(crate) fn set_override_source(&mut self, area: Decimal) {
        let width = round_half_up(area, 1);
        self.cell_mut(Column::Width).set_decimal(width);
        self.cell_mut(Column::Length).set_decimal(Decimal::ONE);
    }

    /// Take `text` typed into Area as the row's own area.
    ///
    /// The displayed Area may already include folded composite rows, so the
    /// comparison is against the stored source, not the Area cell. Returns
    /// whether the source changed; the Area cell is left as it was if not.
    pub(crate) fn set_override_area(&mut self, text: &str) -> bool {
        let previous = self.cell(Column::Area).clone();
        let source = self.decimal(Column::Width);
        self.cell_mut(Column::Area).set_raw(text);
        let area = self.decimal(Column::Area);
        if round_half_up(area, 1) == source {
            *self.cell_mut(Column::Area) = previous;
            return false;
        }
        self.set_override_source(area);
        true
    }

    /// The row's own area on an override row, before any folding.
    pub fn override_source(&self) -> Option<Decimal> {
        self.override_mode.then(|| self.decimal(Column::Width))
    }

    fn apply_editability(&mut self) {
        let area_source = self.override_mode;
        self.cell_mut(Column::Width).set_editable(!area_source);
        self.cell_mut(Column::Length).set_editable(!area_source);
        self.cell_mut(Column::Area).set_editable(area_source);
        self.cell_mut(Column::Volume).set_editable(false);
    }
}

impl Default for Row {
    fn default() -> Self {
        Self::new()
    }
}
