//! Ordered row storage and structural operations.

use super::cell::Cell;
use super::row::{COLUMN_COUNT, Column, Row};
use crate::error::{CalcError, Result};

/// A `(row, column)` coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellPos {
    pub row: usize,
    pub col: usize,
}

impl CellPos {
    pub fn new(row: usize, col: usize) -> CellPos {
        CellPos { row, col }
    }
}

/// An ordered sequence of rows. Row order matters: composite rows fold into
/// the row directly above them.
#[derive(Clone, Debug, Default)]
pub struct Grid {
    rows: Vec<Row>,
}

impl Grid {
    pub fn new() -> Grid {
        Grid { rows: Vec::new() }
    }

    pub fn with_rows(count: usize) -> Grid {
        let mut grid = Grid::new();
        grid.set_row_count(count);
        grid
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Grow with default-filled rows or truncate from the end.
    /// Existing rows are never touched.
    pub fn set_row_count(&mut self, count: usize) {
        if count < self.rows.len() {
            self.rows.truncate(count);
        } else {
            self.rows.resize_with(count, Row::new);
        }
    }

    /// Insert a default-filled row directly after `index`.
    pub fn insert_row_after(&mut self, index: usize) -> Result<()> {
        self.check_row(index)?;
        self.rows.insert(index + 1, Row::new());
        Ok(())
    }

    /// Remove the given rows.
    ///
    /// `cursor` is the host's current cell. When something was removed, the
    /// returned position is the same coordinate in the shorter grid, clamped
    /// to the last row, or `None` if the grid is now empty.
    pub fn remove_rows(&mut self, indices: &[usize], cursor: CellPos) -> Result<Option<CellPos>> {
        let mut sorted = indices.to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        for &index in &sorted {
            self.check_row(index)?;
        }
        if sorted.is_empty() {
            return Ok(None);
        }
        for &index in sorted.iter().rev() {
            self.rows.remove(index);
        }
        if self.rows.is_empty() {
            return Ok(None);
        }
        let row = cursor.row.min(self.rows.len() - 1);
        let col = cursor.col.min(COLUMN_COUNT - 1);
        Ok(Some(CellPos::new(row, col)))
    }

    pub fn row(&self, index: usize) -> Result<&Row> {
        let len = self.rows.len();
        self.rows
            .get(index)
            .ok_or(CalcError::RowOutOfRange { row: index, len })
    }

    pub(crate) fn row_mut(&mut self, index: usize) -> Result<&mut Row> {
        let len = self.rows.len();
        self.rows
            .get_mut(index)
            .ok_or(CalcError::RowOutOfRange { row: index, len })
    }

    pub fn get(&self, row: usize, col: usize) -> Result<&Cell> {
        let column = column_at(col)?;
        Ok(self.row(row)?.cell(column))
    }

    /// Write raw text into a cell. No recomputation happens here; hosts go
    /// through [`crate::engine::Sheet::edit`].
    /// Returns whether the cell's value changed.
    pub fn set(&mut self, row: usize, col: usize, text: &str) -> Result<bool> {
        let column = column_at(col)?;
        Ok(self.row_mut(row)?.cell_mut(column).set_raw(text))
    }

    /// Find the coordinates of a cell owned by this grid.
    pub fn coordinates_of(&self, cell: &Cell) -> Result<CellPos> {
        for (r, row) in self.rows.iter().enumerate() {
            for (c, candidate) in row.cells().iter().enumerate() {
                if std::ptr::eq(candidate, cell) {
                    return Ok(CellPos::new(r, c));
                }
            }
        }
        Err(CalcError::ForeignCell)
    }

    /// Iterate rows top to bottom. Each call starts a fresh pass.
    pub fn rows(&self) -> impl Iterator<Item = &Row> + '_ {
        self.rows.iter()
    }

    pub(crate) fn rows_mut(&mut self) -> impl Iterator<Item = &mut Row> + '_ {
        self.rows.iter_mut()
    }

    /// Two rows at once, `upper < lower`.
    pub(crate) fn pair_mut(&mut self, upper: usize, lower: usize) -> (&mut Row, &Row) {
        debug_assert!(upper < lower);
        let (head, tail) = self.rows.split_at_mut(lower);
        (&mut head[upper], &tail[0])
    }

    fn check_row(&self, index: usize) -> Result<()> {
        if index < self.rows.len() {
            Ok(())
        } else {
            Err(CalcError::RowOutOfRange {
                row: index,
                len: self.rows.len(),
            })
        }
    }
}

fn column_at(col: usize) -> Result<Column> {
    Column::from_index(col).ok_or(CalcError::ColumnOutOfRange { col })
}
