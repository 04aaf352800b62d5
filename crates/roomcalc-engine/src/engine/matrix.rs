//! Bulk load and dump of a sheet as a matrix of strings.
//!
//! Storage formats hand rows over as plain text fields. Only the four raw
//! columns are authoritative. On an override row Width already carries the
//! row's own area (Length is 1), while the Area field includes anything
//! folded into the row, so Area is only read when Width and Length are blank.
//! Volume is always recomputed.

use tracing::debug;

use super::recalc::Summary;
use super::row::{COLUMN_COUNT, Column};
use super::sheet::Sheet;
use crate::error::Result;

/// Which columns a matrix carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MatrixShape {
    /// `Label, Width, Length, Height`.
    #[default]
    Raw,
    /// All six columns.
    Full,
}

impl MatrixShape {
    pub fn columns(self) -> &'static [Column] {
        match self {
            MatrixShape::Raw => &Column::RAW,
            MatrixShape::Full => &Column::ALL,
        }
    }

    pub fn width(self) -> usize {
        self.columns().len()
    }
}

impl Sheet {
    /// Replace the sheet's contents with `rows`.
    ///
    /// Fields beyond the sixth are ignored; missing fields keep their
    /// defaults. An override row takes its area from `Width×Length`, or from
    /// the Area field when both dimensions are blank. Selection is cleared.
    pub fn load_matrix<S: AsRef<str>>(&mut self, rows: &[Vec<S>]) -> Result<Summary> {
        self.grid.set_row_count(0);
        self.grid.set_row_count(rows.len());

        for (index, fields) in rows.iter().enumerate() {
            let row = self.grid.row_mut(index)?;
            let mut area_field = None;
            let mut has_dimensions = false;
            for (col, field) in fields.iter().take(COLUMN_COUNT).enumerate() {
                match Column::from_index(col) {
                    Some(Column::Area) => area_field = Some(field.as_ref()),
                    Some(column @ (Column::Width | Column::Length)) => {
                        has_dimensions |= !field.as_ref().trim().is_empty();
                        row.cell_mut(column).set_raw(field.as_ref());
                    }
                    Some(Column::Volume) | None => {}
                    Some(column) => {
                        row.cell_mut(column).set_raw(field.as_ref());
                    }
                }
            }
            row.sync_mode();
            if let Some(text) = area_field.filter(|_| row.override_mode() && !has_dimensions) {
                row.set_override_area(text);
            }
        }

        debug!(rows = rows.len(), "loaded matrix");
        self.clear_selection();
        self.refresh()
    }

    /// Dump every row's display text in the given shape.
    pub fn to_matrix(&self, shape: MatrixShape) -> Vec<Vec<String>> {
        self.grid
            .rows()
            .map(|row| {
                shape
                    .columns()
                    .iter()
                    .map(|&col| row.cell(col).text().to_string())
                    .collect()
            })
            .collect()
    }
}
