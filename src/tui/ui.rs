//! UI rendering

use super::app::{App, Mode};
use super::keymap::status_hint;
use roomcalc_core::AreaReport;
use roomcalc_engine::engine::{Column, HighlightTag, format_fixed};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
};

pub(crate) const INPUT_BAR_HEIGHT: u16 = 3;
pub(crate) const GRID_MIN_HEIGHT: u16 = 5;
pub(crate) const STATUS_BAR_HEIGHT: u16 = 2;
pub(crate) const ROW_HEADER_WIDTH: u16 = 4;
pub(crate) const GRID_COLUMN_SPACING: u16 = 1;

pub(crate) fn split_main_chunks(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(INPUT_BAR_HEIGHT),
            Constraint::Min(GRID_MIN_HEIGHT),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

/// Draw the application UI
pub fn draw(f: &mut Frame, app: &mut App) {
    let [input_area, grid_area, status_area] = split_main_chunks(f.area());

    // header + borders
    app.visible_rows = (grid_area.height.saturating_sub(3) as usize).max(1);
    app.update_viewport();

    draw_input_bar(f, app, input_area);
    draw_grid(f, app, grid_area);
    draw_status_bar(f, app, status_area);
}

fn draw_input_bar(f: &mut Frame, app: &App, area: Rect) {
    let cell_name = format!("R{} {}", app.cursor_row + 1, app.current_column().header());

    let content = match app.mode {
        Mode::Edit => {
            let (before, after) = app.edit_buffer.split_at(app.edit_cursor);
            format!("{}: {}│{}", cell_name, before, after)
        }
        Mode::Command => {
            let (before, after) = app.command_buffer.split_at(app.command_cursor);
            format!(":{}│{}", before, after)
        }
        Mode::Visual => match app.selected_row_range() {
            Some((start, end)) => format!("rows {}-{}", start + 1, end + 1),
            None => cell_name,
        },
        Mode::Normal => match app.project.active_sheet().text(app.cursor_row, app.cursor_col) {
            Ok(text) => format!("{}: {}", cell_name, text),
            Err(_) => "(no rows)".to_string(),
        },
    };

    let title = match app.mode {
        Mode::Edit => " Edit ",
        Mode::Command => " Command ",
        Mode::Visual => " Visual ",
        Mode::Normal => " Cell ",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(match app.mode {
            Mode::Edit => Color::Yellow,
            Mode::Command => Color::Cyan,
            Mode::Visual => Color::Magenta,
            Mode::Normal => Color::White,
        }));

    f.render_widget(Paragraph::new(content).block(block), area);
}

pub(crate) fn tag_style(tag: HighlightTag) -> Style {
    match tag {
        HighlightTag::None => Style::default(),
        HighlightTag::Selected => Style::default().fg(Color::White).bg(Color::Blue),
        HighlightTag::Receiving => Style::default().fg(Color::Green),
        HighlightTag::Absorbed => Style::default().fg(Color::DarkGray),
        HighlightTag::Subtracted => Style::default().fg(Color::Red),
    }
}

fn draw_grid(f: &mut Frame, app: &App, area: Rect) {
    let sheet = app.project.active_sheet();

    let mut header_cells = vec![Cell::from(" ")];
    for column in Column::ALL {
        let style = if column.index() == app.cursor_col {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else if column.is_derived() {
            Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        header_cells.push(Cell::from(column.header()).style(style));
    }
    let header = Row::new(header_cells).height(1);

    let end = (app.viewport_row + app.visible_rows).min(sheet.row_count());
    let mut rows = Vec::new();
    for row in app.viewport_row..end {
        let row_style = if row == app.cursor_row {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let mut cells = vec![Cell::from(format!("{}", row + 1)).style(row_style)];

        for column in Column::ALL {
            let col = column.index();
            let text = sheet.text(row, col).unwrap_or_default();
            let style = if row == app.cursor_row && col == app.cursor_col {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                tag_style(sheet.tag(row, col).unwrap_or_default())
            };
            let text = if column == Column::Label {
                text.to_string()
            } else {
                format!("{:>width$}", text, width = app.col_width)
            };
            cells.push(Cell::from(text).style(style));
        }
        rows.push(Row::new(cells));
    }

    let mut widths = vec![Constraint::Length(ROW_HEADER_WIDTH)];
    widths.push(Constraint::Length((app.col_width * 2) as u16));
    widths.extend(std::iter::repeat_n(
        Constraint::Length(app.col_width as u16),
        Column::ALL.len() - 1,
    ));

    let floor = app.project.active_floor();
    let title = format!(
        " {} ({}/{}) ",
        floor.name,
        app.project.active_index() + 1,
        app.project.floor_count()
    );
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .column_spacing(GRID_COLUMN_SPACING);

    f.render_widget(table, area);
}

pub(crate) fn report_line(label: &str, report: AreaReport) -> String {
    format!(
        "{}: {} (dwelling {}, economical {})",
        label,
        format_fixed(report.total, 1),
        format_fixed(report.dwelling, 1),
        format_fixed(report.economical, 1)
    )
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let file_info = if let Some(ref path) = app.project.file_path {
        let modified_indicator = if app.project.modified { " [+]" } else { "" };
        format!("{}{}", path.display(), modified_indicator)
    } else if app.project.modified {
        "[New File] [+]".to_string()
    } else {
        "[New File]".to_string()
    };

    let mut summary = format!(
        "{}  |  {}",
        file_info,
        report_line("Floor", app.project.active_floor().report())
    );
    if app.project.floor_count() > 1 {
        summary.push_str("  |  ");
        summary.push_str(&report_line("All floors", app.project.totals()));
    }

    let (message, style) = if app.status_message.starts_with("Error") {
        (app.status_message.as_str(), Style::default().fg(Color::Red))
    } else if !app.status_message.is_empty() {
        (app.status_message.as_str(), Style::default().fg(Color::Yellow))
    } else {
        (status_hint(), Style::default().fg(Color::DarkGray))
    };

    let lines = vec![
        Line::from(Span::styled(summary, Style::default().fg(Color::White))),
        Line::from(Span::styled(message, style)),
    ];
    f.render_widget(Paragraph::new(lines), area);
}
