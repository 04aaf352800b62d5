//! The recomputation engine.
//!
//! Every externally originated change runs one full pass sequence:
//! area, volume, composite fold, aggregation. The order is fixed; later
//! passes read what earlier passes wrote.

use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{debug, trace};

use super::cell::HighlightTag;
use super::format::round_half_up;
use super::grid::Grid;
use super::row::{Column, Composite, Row};
use crate::error::Result;

/// Characters that mark a label as dwelling space.
pub const DEFAULT_DWELLING_MARKERS: &str = "AaАаЖж";

/// Engine settings.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalcConfig {
    /// A non-composite row counts as dwelling area when its label contains
    /// any of these characters.
    pub dwelling_markers: String,
}

impl Default for CalcConfig {
    fn default() -> Self {
        CalcConfig {
            dwelling_markers: DEFAULT_DWELLING_MARKERS.to_string(),
        }
    }
}

impl CalcConfig {
    pub fn is_dwelling(&self, label: &str) -> bool {
        label.chars().any(|c| self.dwelling_markers.contains(c))
    }
}

/// Totals emitted after every pass.
///
/// Economical area (`total - dwelling`) is left to the consumer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub total_area: Decimal,
    pub dwelling_area: Decimal,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EngineState {
    #[default]
    Idle,
    Recomputing,
}

/// What the fold pass did to one row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FoldMark {
    pub absorbed: bool,
    pub receiving: bool,
    pub subtracted: bool,
}

impl FoldMark {
    pub fn tag(self) -> HighlightTag {
        if self.subtracted {
            HighlightTag::Subtracted
        } else if self.absorbed {
            HighlightTag::Absorbed
        } else if self.receiving {
            HighlightTag::Receiving
        } else {
            HighlightTag::None
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RecalculationEngine {
    config: CalcConfig,
    state: EngineState,
    fold_marks: Vec<FoldMark>,
    summary: Summary,
}

impl RecalculationEngine {
    pub fn new(config: CalcConfig) -> Self {
        RecalculationEngine {
            config,
            ..Default::default()
        }
    }

    pub fn config(&self) -> &CalcConfig {
        &self.config
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// The summary emitted by the most recent pass.
    pub fn summary(&self) -> Summary {
        self.summary
    }

    /// Fold marks from the most recent pass, one per row.
    pub fn fold_marks(&self) -> &[FoldMark] {
        &self.fold_marks
    }

    pub fn fold_mark(&self, row: usize) -> FoldMark {
        self.fold_marks.get(row).copied().unwrap_or_default()
    }

    /// Run the full pass sequence over `grid`.
    ///
    /// Returns `None` without touching the grid when a pass is already in
    /// progress: writes made by the engine are not external edits.
    pub fn recompute(&mut self, grid: &mut Grid) -> Result<Option<Summary>> {
        if self.state == EngineState::Recomputing {
            trace!("recompute suppressed: pass already running");
            return Ok(None);
        }
        self.state = EngineState::Recomputing;
        let result = self.run_passes(grid);
        self.state = EngineState::Idle;

        let summary = result?;
        self.summary = summary;
        debug!(
            rows = grid.row_count(),
            total = %summary.total_area,
            dwelling = %summary.dwelling_area,
            "recompute finished"
        );
        Ok(Some(summary))
    }

    fn run_passes(&mut self, grid: &mut Grid) -> Result<Summary> {
        area_pass(grid);
        volume_pass(grid);
        self.fold_marks = fold_pass(grid)?;
        Ok(self.aggregate(grid))
    }

    fn aggregate(&self, grid: &Grid) -> Summary {
        let mut summary = Summary::default();
        for row in grid.rows().filter(|row| row.composite().is_none()) {
            let area = row.decimal(Column::Area);
            summary.total_area = summary.total_area.saturating_add(area);
            if self.config.is_dwelling(row.label()) {
                summary.dwelling_area = summary.dwelling_area.saturating_add(area);
            }
        }
        summary
    }
}

/// `Area := round(Width×Length, 1dp)`. Override rows keep their back-computed
/// source in Width with Length pinned to 1, so the same product yields the
/// entered area.
fn area_pass(grid: &mut Grid) {
    for row in grid.rows_mut() {
        row.sync_mode();
        if row.override_mode() {
            let width = row.decimal(Column::Width);
            row.set_override_source(width);
        }
        let product = row
            .decimal(Column::Width)
            .saturating_mul(row.decimal(Column::Length));
        let area = round_half_up(product, 1);
        row.cell_mut(Column::Area).set_decimal(area);
    }
}

/// `Volume := round(Height×Area, 0dp)`.
fn volume_pass(grid: &mut Grid) {
    for row in grid.rows_mut() {
        let product = row
            .decimal(Column::Height)
            .saturating_mul(row.decimal(Column::Area));
        let volume = round_half_up(product, 0);
        row.cell_mut(Column::Volume).set_decimal(volume);
    }
}

/// Fold composite rows into the row above, bottom to top so chains of
/// composite rows accumulate into the first regular row.
fn fold_pass(grid: &mut Grid) -> Result<Vec<FoldMark>> {
    let mut marks = vec![FoldMark::default(); grid.row_count()];
    for index in (0..grid.row_count()).rev() {
        let Some(composite) = grid.row(index)?.composite() else {
            continue;
        };
        if index == 0 {
            strip_marker(grid.row_mut(0)?);
            continue;
        }
        let (upper, lower) = grid.pair_mut(index - 1, index);
        fold_into(upper, lower, composite)?;
        trace!(from = index, into = index - 1, ?composite, "folded composite row");
        marks[index - 1].receiving = true;
        match composite {
            Composite::Add => marks[index].absorbed = true,
            Composite::Subtract => marks[index].subtracted = true,
        }
    }
    Ok(marks)
}

fn fold_into(upper: &mut Row, lower: &Row, composite: Composite) -> Result<()> {
    for col in [Column::Area, Column::Volume] {
        let target = upper.cell_mut(col);
        match composite {
            Composite::Add => target.try_add(lower.cell(col))?,
            Composite::Subtract => target.try_sub(lower.cell(col))?,
        }
    }
    Ok(())
}

/// A composite row with nothing above it becomes a regular row. Every
/// leading marker goes, so the label cannot parse as composite again.
fn strip_marker(row: &mut Row) {
    let stripped = row
        .label()
        .trim_start_matches([Composite::Add.marker(), Composite::Subtract.marker()])
        .to_string();
    row.cell_mut(Column::Label).set_raw(&stripped);
    row.sync_mode();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn grid_from(rows: &[[&str; 4]]) -> Grid {
        let mut grid = Grid::with_rows(rows.len());
        for (r, fields) in rows.iter().enumerate() {
            for (c, text) in fields.iter().enumerate() {
                grid.set(r, c, text).unwrap();
            }
        }
        grid
    }

    fn text(grid: &Grid, row: usize, col: Column) -> String {
        grid.get(row, col.index()).unwrap().text().to_string()
    }

    #[test]
    fn test_area_and_volume() {
        let mut grid = grid_from(&[["A", "3.00", "4.00", "2.50"]]);
        let mut engine = RecalculationEngine::default();
        engine.recompute(&mut grid).unwrap();

        assert_eq!(text(&grid, 0, Column::Area), "12.0");
        assert_eq!(text(&grid, 0, Column::Volume), "30");
    }

    #[test]
    fn test_area_rounds_half_up() {
        // 1.75 * 1.4 = 2.45 -> 2.5 (round-half-even would give 2.4)
        let mut grid = grid_from(&[["A", "1.75", "1.4", "1"]]);
        RecalculationEngine::default().recompute(&mut grid).unwrap();
        assert_eq!(text(&grid, 0, Column::Area), "2.5");
        // 1.00 * 2.5 = 2.5 -> 3
        assert_eq!(text(&grid, 0, Column::Volume), "3");
    }

    #[test]
    fn test_volume_uses_rounded_area() {
        // Area 1.04 -> 1.0, so volume is 100 * 1.0 rather than 100 * 1.04.
        let mut grid = grid_from(&[["A", "1.04", "1", "100"]]);
        RecalculationEngine::default().recompute(&mut grid).unwrap();
        assert_eq!(text(&grid, 0, Column::Area), "1.0");
        assert_eq!(text(&grid, 0, Column::Volume), "100");
    }

    #[test]
    fn test_aggregation_splits_dwelling() {
        let mut grid = grid_from(&[
            ["A", "3.00", "4.00", "2.50"],
            ["B", "2.00", "5.00", "2.50"],
        ]);
        let mut engine = RecalculationEngine::default();
        let summary = engine.recompute(&mut grid).unwrap().unwrap();

        assert_eq!(text(&grid, 0, Column::Area), "12.0");
        assert_eq!(text(&grid, 1, Column::Area), "10.0");
        assert_eq!(summary.total_area, d("22.0"));
        assert_eq!(summary.dwelling_area, d("12.0"));
        assert_eq!(engine.summary(), summary);
    }

    #[test]
    fn test_dwelling_markers_include_cyrillic() {
        let mut grid = grid_from(&[
            ["Жилая", "2", "2", "1"],
            ["кухня", "1", "1", "1"],
            ["Спальня", "3", "1", "1"],
        ]);
        let summary = RecalculationEngine::default()
            .recompute(&mut grid)
            .unwrap()
            .unwrap();
        assert_eq!(summary.total_area, d("8.0"));
        // "Жилая" (Ж, а) and "Спальня" (а) are dwelling; "кухня" is not.
        assert_eq!(summary.dwelling_area, d("7.0"));
    }

    #[test]
    fn test_custom_dwelling_markers() {
        let mut grid = grid_from(&[["A", "1", "1", "1"], ["L", "2", "1", "1"]]);
        let config = CalcConfig {
            dwelling_markers: "L".to_string(),
        };
        let summary = RecalculationEngine::new(config)
            .recompute(&mut grid)
            .unwrap()
            .unwrap();
        assert_eq!(summary.dwelling_area, d("2.0"));
    }

    #[test]
    fn test_composite_add_folds_into_previous_row() {
        let mut grid = grid_from(&[
            ["A", "3.00", "4.00", "2.50"],
            ["+", "1.00", "2.00", "2.50"],
        ]);
        let mut engine = RecalculationEngine::default();
        let summary = engine.recompute(&mut grid).unwrap().unwrap();

        assert_eq!(text(&grid, 0, Column::Area), "14.0");
        assert_eq!(text(&grid, 0, Column::Volume), "35");
        assert_eq!(text(&grid, 1, Column::Area), "2.0");
        assert_eq!(summary.total_area, d("14.0"));
        assert!(engine.fold_mark(0).receiving);
        assert!(engine.fold_mark(1).absorbed);
        assert_eq!(engine.fold_mark(1).tag(), HighlightTag::Absorbed);
    }

    #[test]
    fn test_composite_fold_is_stable_across_passes() {
        let mut grid = grid_from(&[["A", "3", "4", "1"], ["+", "1", "2", "1"]]);
        let mut engine = RecalculationEngine::default();
        engine.recompute(&mut grid).unwrap();
        engine.recompute(&mut grid).unwrap();
        assert_eq!(text(&grid, 0, Column::Area), "14.0");
    }

    #[test]
    fn test_composite_chain_accumulates_bottom_up() {
        let mut grid = grid_from(&[
            ["A", "3", "4", "1"],
            ["+", "1", "2", "1"],
            ["+", "1", "1", "1"],
        ]);
        let mut engine = RecalculationEngine::default();
        let summary = engine.recompute(&mut grid).unwrap().unwrap();

        assert_eq!(text(&grid, 1, Column::Area), "3.0");
        assert_eq!(text(&grid, 0, Column::Area), "15.0");
        assert_eq!(summary.total_area, d("15.0"));
        // Middle row both received and was absorbed; absorbed wins.
        assert_eq!(engine.fold_mark(1).tag(), HighlightTag::Absorbed);
    }

    #[test]
    fn test_composite_subtract() {
        let mut grid = grid_from(&[["A", "3", "4", "2"], ["-", "1", "2", "2"]]);
        let mut engine = RecalculationEngine::default();
        let summary = engine.recompute(&mut grid).unwrap().unwrap();

        assert_eq!(text(&grid, 0, Column::Area), "10.0");
        assert_eq!(text(&grid, 0, Column::Volume), "20");
        assert_eq!(summary.total_area, d("10.0"));
        assert_eq!(summary.dwelling_area, d("10.0"));
        assert!(engine.fold_mark(1).subtracted);
        assert_eq!(engine.fold_mark(0).tag(), HighlightTag::Receiving);
    }

    #[test]
    fn test_top_row_marker_is_stripped() {
        let mut grid = grid_from(&[["+A", "1.00", "1.00", "1.00"]]);
        let mut engine = RecalculationEngine::default();
        let summary = engine.recompute(&mut grid).unwrap().unwrap();

        assert_eq!(text(&grid, 0, Column::Label), "A");
        assert_eq!(engine.fold_mark(0), FoldMark::default());
        assert_eq!(summary.total_area, d("1.0"));
    }

    #[test]
    fn test_top_row_bare_marker_becomes_default_label() {
        let mut grid = grid_from(&[["-", "1", "1", "1"]]);
        RecalculationEngine::default().recompute(&mut grid).unwrap();
        assert_eq!(text(&grid, 0, Column::Label), "A");
    }

    #[test]
    fn test_top_row_stacked_markers_are_all_stripped() {
        for (label, expected) in [("--x", "x"), ("+-A", "A"), ("+-", "A")] {
            let mut grid = grid_from(&[[label, "2", "2", "1"]]);
            let summary = RecalculationEngine::default()
                .recompute(&mut grid)
                .unwrap()
                .unwrap();

            assert_eq!(text(&grid, 0, Column::Label), expected);
            assert_eq!(grid.row(0).unwrap().composite(), None);
            assert_eq!(summary.total_area, d("4.0"), "label {}", label);
        }
    }

    #[test]
    fn test_override_row_keeps_entered_area() {
        let mut grid = grid_from(&[["A!", "0", "0", "2"]]);
        grid.row_mut(0).unwrap().sync_mode();
        grid.row_mut(0).unwrap().set_override_source(d("7.25"));

        RecalculationEngine::default().recompute(&mut grid).unwrap();
        assert_eq!(text(&grid, 0, Column::Width), "7.30");
        assert_eq!(text(&grid, 0, Column::Length), "1.00");
        assert_eq!(text(&grid, 0, Column::Area), "7.3");
        assert_eq!(text(&grid, 0, Column::Volume), "15");
    }

    #[test]
    fn test_override_row_receiving_fold_does_not_accumulate() {
        let mut grid = grid_from(&[["A!", "5", "1", "1"], ["+", "1", "1", "1"]]);
        let mut engine = RecalculationEngine::default();
        engine.recompute(&mut grid).unwrap();
        engine.recompute(&mut grid).unwrap();
        assert_eq!(text(&grid, 0, Column::Area), "6.0");
    }

    #[test]
    fn test_empty_grid_summary_is_zero() {
        let mut grid = Grid::new();
        let summary = RecalculationEngine::default()
            .recompute(&mut grid)
            .unwrap()
            .unwrap();
        assert_eq!(summary, Summary::default());
    }

    #[test]
    fn test_recompute_returns_to_idle() {
        let mut grid = Grid::with_rows(1);
        let mut engine = RecalculationEngine::default();
        engine.recompute(&mut grid).unwrap();
        assert_eq!(engine.state(), EngineState::Idle);
    }

    #[test]
    fn test_recompute_while_recomputing_is_suppressed() {
        let mut grid = Grid::with_rows(1);
        grid.set(0, 1, "2").unwrap();
        let mut engine = RecalculationEngine::default();
        engine.state = EngineState::Recomputing;

        assert_eq!(engine.recompute(&mut grid).unwrap(), None);
        assert_eq!(text(&grid, 0, Column::Area), "0.0");
    }
}
