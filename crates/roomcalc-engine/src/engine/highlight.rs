use std::collections::BTreeSet;

use super::cell::HighlightTag;
use super::grid::CellPos;
use super::recalc::FoldMark;

/// Tracks the host's selection and derives the row-highlight overlay.
///
/// Selection does not trigger recomputation. The final tag of a cell is
/// resolved by [`SelectionHighlighter::resolve`], which combines the latest
/// selection with the latest fold marks: a selected row shows as selected,
/// otherwise the fold mark decides.
#[derive(Clone, Debug, Default)]
pub struct SelectionHighlighter {
    selected: BTreeSet<CellPos>,
    cursor: Option<CellPos>,
}

impl SelectionHighlighter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the selection. The first cell given becomes the cursor.
    pub fn select<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = CellPos>,
    {
        self.selected.clear();
        self.cursor = None;
        for pos in cells {
            if self.cursor.is_none() {
                self.cursor = Some(pos);
            }
            self.selected.insert(pos);
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
        self.cursor = None;
    }

    pub fn selected(&self) -> impl Iterator<Item = CellPos> + '_ {
        self.selected.iter().copied()
    }

    pub fn cursor(&self) -> Option<CellPos> {
        self.cursor
    }

    /// Rows that contain at least one selected cell, ascending.
    pub fn selected_rows(&self) -> Vec<usize> {
        let mut rows: Vec<usize> = self.selected.iter().map(|pos| pos.row).collect();
        rows.dedup();
        rows
    }

    pub fn is_row_selected(&self, row: usize) -> bool {
        self.selected.iter().any(|pos| pos.row == row)
    }

    /// The tag every cell in `row` should carry.
    pub fn resolve(&self, row: usize, mark: FoldMark) -> HighlightTag {
        if self.is_row_selected(row) {
            HighlightTag::Selected
        } else {
            mark.tag()
        }
    }
}
