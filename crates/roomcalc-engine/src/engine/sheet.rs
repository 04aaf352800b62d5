//! One sheet: a grid, its recalculation engine and its selection overlay.
//!
//! Hosts talk to a [`Sheet`] only. Edits, structural changes and loads each
//! run exactly one recompute pass; selection changes only re-render tags.
//! Multi-floor projects hold one independent `Sheet` per floor.

use tracing::debug;

use super::cell::HighlightTag;
use super::format::format_fixed;
use super::grid::{CellPos, Grid};
use super::highlight::SelectionHighlighter;
use super::recalc::{CalcConfig, RecalculationEngine, Summary};
use super::row::Column;
use crate::error::{CalcError, Result};

#[derive(Clone, Debug, Default)]
pub struct Sheet {
    pub(crate) grid: Grid,
    engine: RecalculationEngine,
    highlighter: SelectionHighlighter,
}

impl Sheet {
    /// Create a sheet with `rows` default-filled rows.
    pub fn new(config: CalcConfig, rows: usize) -> Sheet {
        let mut sheet = Sheet {
            grid: Grid::with_rows(rows),
            engine: RecalculationEngine::new(config),
            highlighter: SelectionHighlighter::new(),
        };
        sheet.refresh();
        sheet
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn engine(&self) -> &RecalculationEngine {
        &self.engine
    }

    pub fn highlighter(&self) -> &SelectionHighlighter {
        &self.highlighter
    }

    pub fn config(&self) -> &CalcConfig {
        self.engine.config()
    }

    pub fn row_count(&self) -> usize {
        self.grid.row_count()
    }

    /// The most recently emitted summary.
    pub fn summary(&self) -> Summary {
        self.engine.summary()
    }

    /// The display text of a cell.
    pub fn text(&self, row: usize, col: usize) -> Result<&str> {
        Ok(self.grid.get(row, col)?.text())
    }

    pub fn tag(&self, row: usize, col: usize) -> Result<HighlightTag> {
        Ok(self.grid.get(row, col)?.tag())
    }

    pub fn is_editable(&self, row: usize, col: usize) -> Result<bool> {
        Ok(self.grid.get(row, col)?.editable())
    }

    /// The text a host should put in front of the user when editing a cell.
    ///
    /// Same as [`Sheet::text`], except for Area on an override row: there the
    /// row's own area is shown, without anything folded into it.
    pub fn input_text(&self, row: usize, col: usize) -> Result<String> {
        let target = self.grid.row(row)?;
        match (Column::from_index(col), target.override_source()) {
            (Some(Column::Area), Some(source)) => Ok(format_fixed(source, 1)),
            _ => Ok(self.text(row, col)?.to_string()),
        }
    }

    /// Handle an external edit.
    ///
    /// Returns the new summary, or `None` when the normalized value did not
    /// change and nothing was recomputed.
    pub fn edit(&mut self, row: usize, col: usize, text: &str) -> Result<Option<Summary>> {
        if !self.grid.get(row, col)?.editable() {
            return Err(CalcError::ReadOnlyCell { row, col });
        }
        let changed = match Column::from_index(col) {
            // Only editable on override rows.
            Some(Column::Area) => self.grid.row_mut(row)?.set_override_area(text),
            _ => self.grid.set(row, col, text)?,
        };
        if !changed {
            debug!(row, col, "edit left value unchanged");
            return Ok(None);
        }
        if col == Column::Label.index() {
            self.grid.row_mut(row)?.sync_mode();
        }
        let summary = self.recompute()?;
        self.render();
        Ok(Some(summary))
    }

    /// Selection notification from the host. Never recomputes.
    pub fn select<I>(&mut self, cells: I)
    where
        I: IntoIterator<Item = CellPos>,
    {
        self.highlighter.select(cells);
        self.render();
    }

    pub fn clear_selection(&mut self) {
        self.highlighter.clear();
        self.render();
    }

    pub fn set_row_count(&mut self, count: usize) -> Result<Summary> {
        self.grid.set_row_count(count);
        let kept: Vec<CellPos> = self
            .highlighter
            .selected()
            .filter(|pos| pos.row < count)
            .collect();
        self.highlighter.select(kept);
        self.refresh()
    }

    pub fn append_row(&mut self) -> Result<Summary> {
        let count = self.grid.row_count() + 1;
        self.set_row_count(count)
    }

    pub fn insert_row_after(&mut self, index: usize) -> Result<Summary> {
        self.grid.insert_row_after(index)?;
        self.refresh()
    }

    /// Remove rows and re-select the cursor's coordinate in the shorter grid.
    ///
    /// Returns the re-selected position, if any.
    pub fn remove_rows(&mut self, indices: &[usize]) -> Result<Option<CellPos>> {
        let fallback = indices.iter().min().map(|&row| CellPos::new(row, 0));
        let Some(cursor) = self.highlighter.cursor().or(fallback) else {
            return Ok(None);
        };
        let reselect = self.grid.remove_rows(indices, cursor)?;
        match reselect {
            Some(pos) => self.highlighter.select([pos]),
            None => self.highlighter.clear(),
        }
        self.refresh()?;
        Ok(reselect)
    }

    /// Run one recompute pass and emit its summary.
    pub fn recompute(&mut self) -> Result<Summary> {
        let summary = self.engine.recompute(&mut self.grid)?;
        Ok(summary.unwrap_or_else(|| self.engine.summary()))
    }

    /// Resolve every cell's highlight tag from the current selection and the
    /// latest fold marks.
    pub fn render(&mut self) {
        let Sheet {
            grid,
            engine,
            highlighter,
        } = self;
        for (index, row) in grid.rows_mut().enumerate() {
            let tag = highlighter.resolve(index, engine.fold_mark(index));
            for cell in row.cells_mut() {
                cell.set_tag(tag);
            }
        }
    }

    pub(crate) fn refresh(&mut self) -> Result<Summary> {
        let summary = self.recompute()?;
        self.render();
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn sheet_with(rows: &[[&str; 4]]) -> Sheet {
        let mut sheet = Sheet::new(CalcConfig::default(), rows.len());
        for (r, fields) in rows.iter().enumerate() {
            for (c, text) in fields.iter().enumerate() {
                sheet.edit(r, c, text).unwrap();
            }
        }
        sheet
    }

    #[test]
    fn test_new_sheet_has_default_rows() {
        let sheet = Sheet::new(CalcConfig::default(), 1);
        assert_eq!(sheet.row_count(), 1);
        assert_eq!(sheet.text(0, 0).unwrap(), "A");
        assert_eq!(sheet.text(0, 4).unwrap(), "0.0");
        assert_eq!(sheet.summary(), Summary::default());
    }

    #[test]
    fn test_edit_recomputes_derived_columns() {
        let mut sheet = Sheet::new(CalcConfig::default(), 1);
        sheet.edit(0, 1, "3").unwrap();
        sheet.edit(0, 2, "4").unwrap();
        let summary = sheet.edit(0, 3, "2,5").unwrap().unwrap();

        assert_eq!(sheet.text(0, 4).unwrap(), "12.0");
        assert_eq!(sheet.text(0, 5).unwrap(), "30");
        assert_eq!(summary.total_area, d("12.0"));
        assert_eq!(summary.dwelling_area, d("12.0"));
    }

    #[test]
    fn test_resubmitting_same_value_changes_nothing() {
        let mut sheet = sheet_with(&[["A", "3.00", "4.00", "2.50"]]);
        let before = sheet.summary();

        assert_eq!(sheet.edit(0, 1, "3").unwrap(), None);
        assert_eq!(sheet.edit(0, 1, "3,00").unwrap(), None);
        assert_eq!(sheet.summary(), before);
        assert_eq!(sheet.text(0, 4).unwrap(), "12.0");
        assert_eq!(sheet.text(0, 5).unwrap(), "30");
    }

    #[test]
    fn test_edit_rejects_derived_cells() {
        let mut sheet = Sheet::new(CalcConfig::default(), 1);
        assert_eq!(
            sheet.edit(0, 4, "10").unwrap_err(),
            CalcError::ReadOnlyCell { row: 0, col: 4 }
        );
        assert_eq!(
            sheet.edit(0, 5, "10").unwrap_err(),
            CalcError::ReadOnlyCell { row: 0, col: 5 }
        );
    }

    #[test]
    fn test_edit_out_of_range() {
        let mut sheet = Sheet::new(CalcConfig::default(), 1);
        assert!(matches!(
            sheet.edit(3, 0, "x"),
            Err(CalcError::RowOutOfRange { row: 3, len: 1 })
        ));
    }

    #[test]
    fn test_malformed_input_is_coerced() {
        let mut sheet = sheet_with(&[["A", "3", "4", "1"]]);
        sheet.edit(0, 1, "three").unwrap();
        assert_eq!(sheet.text(0, 1).unwrap(), "0.00");
        assert_eq!(sheet.text(0, 4).unwrap(), "0.0");
    }

    #[test]
    fn test_override_row_area_is_the_source() {
        let mut sheet = sheet_with(&[["A", "3", "4", "2"]]);
        sheet.edit(0, 0, "A!").unwrap();

        // Entering override mode keeps the current area.
        assert_eq!(sheet.text(0, 1).unwrap(), "12.00");
        assert_eq!(sheet.text(0, 2).unwrap(), "1.00");
        assert_eq!(sheet.text(0, 4).unwrap(), "12.0");
        assert!(sheet.is_editable(0, 4).unwrap());
        assert!(!sheet.is_editable(0, 1).unwrap());
        assert!(!sheet.is_editable(0, 2).unwrap());

        let summary = sheet.edit(0, 4, "20,25").unwrap().unwrap();
        assert_eq!(sheet.text(0, 1).unwrap(), "20.30");
        assert_eq!(sheet.text(0, 4).unwrap(), "20.3");
        assert_eq!(sheet.text(0, 5).unwrap(), "41");
        assert_eq!(summary.total_area, d("20.3"));

        assert!(matches!(
            sheet.edit(0, 1, "5"),
            Err(CalcError::ReadOnlyCell { .. })
        ));
    }

    #[test]
    fn test_area_edit_on_receiving_override_row_sets_own_area() {
        let mut sheet = sheet_with(&[["Hall", "7.3", "1", "2"], ["+", "1", "2", "2"]]);
        sheet.edit(0, 0, "Hall!").unwrap();
        assert_eq!(sheet.text(0, 4).unwrap(), "9.3");
        assert_eq!(sheet.input_text(0, 4).unwrap(), "7.3");

        // Committing the shown value is not a change.
        assert_eq!(sheet.edit(0, 4, "7.3").unwrap(), None);
        assert_eq!(sheet.text(0, 4).unwrap(), "9.3");

        let summary = sheet.edit(0, 4, "8").unwrap().unwrap();
        assert_eq!(sheet.text(0, 1).unwrap(), "8.00");
        assert_eq!(sheet.text(0, 4).unwrap(), "10.0");
        assert_eq!(summary.total_area, d("10.0"));
    }

    #[test]
    fn test_oversized_dimensions_do_not_overflow() {
        let mut sheet = Sheet::new(CalcConfig::default(), 1);
        sheet.edit(0, 1, "79228162514264337593543950").unwrap();
        assert_eq!(sheet.text(0, 1).unwrap(), "0.00");
        sheet.edit(0, 2, "10000").unwrap();
        assert_eq!(sheet.text(0, 4).unwrap(), "0.0");

        sheet.edit(0, 1, "1000000").unwrap();
        let summary = sheet.edit(0, 3, "1000000").unwrap().unwrap();
        assert_eq!(sheet.text(0, 4).unwrap(), "10000000000.0");
        assert_eq!(summary.total_area, d("10000000000"));
        assert_eq!(sheet.text(0, 5).unwrap(), "10000000000000000");
    }

    #[test]
    fn test_leaving_override_mode_unlocks_dimensions() {
        let mut sheet = sheet_with(&[["A", "3", "4", "2"]]);
        sheet.edit(0, 0, "A!").unwrap();
        sheet.edit(0, 4, "9").unwrap();
        sheet.edit(0, 0, "A").unwrap();

        assert!(sheet.is_editable(0, 1).unwrap());
        assert!(!sheet.is_editable(0, 4).unwrap());
        assert_eq!(sheet.text(0, 4).unwrap(), "9.0");
        sheet.edit(0, 2, "2").unwrap();
        assert_eq!(sheet.text(0, 4).unwrap(), "18.0");
    }

    #[test]
    fn test_composite_fold_tags_rows() {
        let sheet = sheet_with(&[
            ["A", "3.00", "4.00", "2.50"],
            ["+", "1.00", "2.00", "2.50"],
        ]);
        assert_eq!(sheet.text(0, 4).unwrap(), "14.0");
        assert_eq!(sheet.summary().total_area, d("14.0"));
        assert_eq!(sheet.tag(0, 0).unwrap(), HighlightTag::Receiving);
        assert_eq!(sheet.tag(1, 3).unwrap(), HighlightTag::Absorbed);
    }

    #[test]
    fn test_selection_and_fold_tags_combine() {
        let mut sheet = sheet_with(&[["A", "3", "4", "1"], ["+", "1", "2", "1"], ["B", "1", "1", "1"]]);
        sheet.select([CellPos::new(1, 2)]);

        assert_eq!(sheet.tag(1, 0).unwrap(), HighlightTag::Selected);
        assert_eq!(sheet.tag(1, 5).unwrap(), HighlightTag::Selected);
        assert_eq!(sheet.tag(0, 0).unwrap(), HighlightTag::Receiving);
        assert_eq!(sheet.tag(2, 0).unwrap(), HighlightTag::None);

        // A recompute keeps the selection visible.
        sheet.edit(2, 1, "2").unwrap();
        assert_eq!(sheet.tag(1, 0).unwrap(), HighlightTag::Selected);

        // Clearing the selection brings the fold mark back.
        sheet.clear_selection();
        assert_eq!(sheet.tag(1, 0).unwrap(), HighlightTag::Absorbed);
    }

    #[test]
    fn test_selection_does_not_recompute() {
        let mut sheet = sheet_with(&[["A", "3", "4", "1"]]);
        let before = sheet.summary();
        sheet.select([CellPos::new(0, 0)]);
        assert_eq!(sheet.summary(), before);
    }

    #[test]
    fn test_remove_only_selected_row_reselects_same_coordinate() {
        let mut sheet = sheet_with(&[["A", "1", "1", "1"], ["B", "2", "1", "1"], ["C", "3", "1", "1"]]);
        sheet.select([CellPos::new(1, 3)]);

        let pos = sheet.remove_rows(&[1]).unwrap();
        assert_eq!(pos, Some(CellPos::new(1, 3)));
        assert_eq!(sheet.text(1, 0).unwrap(), "C");
        assert_eq!(sheet.tag(1, 0).unwrap(), HighlightTag::Selected);
        assert_eq!(sheet.summary().total_area, d("4.0"));
    }

    #[test]
    fn test_remove_last_selected_row_clamps() {
        let mut sheet = sheet_with(&[["A", "1", "1", "1"], ["B", "2", "1", "1"]]);
        sheet.select([CellPos::new(1, 1)]);

        let pos = sheet.remove_rows(&[1]).unwrap();
        assert_eq!(pos, Some(CellPos::new(0, 1)));
        assert_eq!(sheet.highlighter().cursor(), Some(CellPos::new(0, 1)));
    }

    #[test]
    fn test_removing_row_reconnects_fold() {
        let mut sheet = sheet_with(&[["A", "3", "4", "1"], ["B", "1", "1", "1"], ["+", "1", "2", "1"]]);
        assert_eq!(sheet.text(1, 4).unwrap(), "3.0");

        sheet.remove_rows(&[1]).unwrap();
        assert_eq!(sheet.text(0, 4).unwrap(), "14.0");
    }

    #[test]
    fn test_insert_and_append_rows() {
        let mut sheet = sheet_with(&[["Hall", "1", "1", "1"], ["Bath", "1", "1", "1"]]);
        sheet.insert_row_after(0).unwrap();
        sheet.append_row().unwrap();

        assert_eq!(sheet.row_count(), 4);
        assert_eq!(sheet.text(1, 0).unwrap(), "A");
        assert_eq!(sheet.text(2, 0).unwrap(), "Bath");
        assert!(sheet.insert_row_after(9).is_err());
    }

    #[test]
    fn test_shrinking_drops_selection_past_the_end() {
        let mut sheet = Sheet::new(CalcConfig::default(), 3);
        sheet.select([CellPos::new(2, 0)]);
        sheet.set_row_count(2).unwrap();
        assert!(sheet.highlighter().selected_rows().is_empty());
    }
}
