//! Application state and the operations bound to keys and commands.

use roomcalc_core::{Project, RoomcalcError};
use roomcalc_engine::engine::{COLUMN_COUNT, CellPos, Column};
use std::path::PathBuf;
use tracing::{info, warn};

/// Application mode (vim-like)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    Edit,
    Command,
    /// Row selection
    Visual,
}

pub struct App {
    pub project: Project,
    pub cursor_row: usize,
    pub cursor_col: usize,
    pub viewport_row: usize,
    pub visible_rows: usize,
    pub mode: Mode,
    pub edit_buffer: String,
    pub edit_cursor: usize,
    pub command_buffer: String,
    pub command_cursor: usize,
    pub status_message: String,
    pub col_width: usize,
    /// Row where Visual mode started.
    pub selection_anchor: Option<usize>,
}

impl App {
    pub fn new(project: Project, col_width: usize) -> Self {
        let mut app = App {
            project,
            cursor_row: 0,
            cursor_col: 0,
            viewport_row: 0,
            visible_rows: 20,
            mode: Mode::Normal,
            edit_buffer: String::new(),
            edit_cursor: 0,
            command_buffer: String::new(),
            command_cursor: 0,
            status_message: String::new(),
            col_width,
            selection_anchor: None,
        };
        app.sync_selection();
        app
    }

    pub fn row_count(&self) -> usize {
        self.project.active_sheet().row_count()
    }

    pub fn current_column(&self) -> Column {
        Column::from_index(self.cursor_col).unwrap_or(Column::Label)
    }

    /// Inclusive row range covered by the Visual selection.
    pub fn selected_row_range(&self) -> Option<(usize, usize)> {
        let anchor = self.selection_anchor?;
        Some((anchor.min(self.cursor_row), anchor.max(self.cursor_row)))
    }

    /// Tell the sheet which cells are selected. The cursor cell goes first so
    /// the sheet treats it as the current cell.
    pub fn sync_selection(&mut self) {
        if self.row_count() == 0 {
            self.project.active_sheet_mut().clear_selection();
            return;
        }
        let cursor = CellPos::new(self.cursor_row, self.cursor_col);
        let mut cells = vec![cursor];
        if let Some((start, end)) = self.selected_row_range() {
            for row in start..=end {
                cells.extend(
                    (0..COLUMN_COUNT)
                        .map(|col| CellPos::new(row, col))
                        .filter(|pos| *pos != cursor),
                );
            }
        }
        self.project.select(cells);
    }

    /// Keep the cursor inside the active floor.
    fn clamp_cursor(&mut self) {
        self.cursor_row = self.cursor_row.min(self.row_count().saturating_sub(1));
        self.cursor_col = self.cursor_col.min(COLUMN_COUNT - 1);
        if let Some(anchor) = self.selection_anchor {
            self.selection_anchor = Some(anchor.min(self.cursor_row));
        }
        self.update_viewport();
    }

    /// Move cursor by delta
    pub fn move_cursor(&mut self, dx: i32, dy: i32) {
        let max_row = self.row_count().saturating_sub(1) as i64;
        let max_col = (COLUMN_COUNT - 1) as i64;
        self.cursor_col = (self.cursor_col as i64 + dx as i64).clamp(0, max_col) as usize;
        self.cursor_row = (self.cursor_row as i64 + dy as i64).clamp(0, max_row) as usize;
        self.update_viewport();
        self.sync_selection();
    }

    pub fn goto_first(&mut self) {
        self.cursor_row = 0;
        self.update_viewport();
        self.sync_selection();
    }

    pub fn goto_last(&mut self) {
        self.cursor_row = self.row_count().saturating_sub(1);
        self.update_viewport();
        self.sync_selection();
    }

    pub fn set_column(&mut self, col: usize) {
        self.cursor_col = col.min(COLUMN_COUNT - 1);
        self.sync_selection();
    }

    /// Update viewport to keep cursor visible
    pub fn update_viewport(&mut self) {
        let visible = self.visible_rows.max(1);
        if self.cursor_row < self.viewport_row {
            self.viewport_row = self.cursor_row;
        } else if self.cursor_row >= self.viewport_row + visible {
            self.viewport_row = self.cursor_row + 1 - visible;
        }
    }

    /// Enter edit mode for current cell. Derived cells stay read-only.
    pub fn enter_edit_mode(&mut self) {
        let sheet = self.project.active_sheet();
        match sheet.is_editable(self.cursor_row, self.cursor_col) {
            Ok(true) => {}
            Ok(false) => {
                self.status_message =
                    format!("{} is calculated on this row", self.current_column().header());
                return;
            }
            Err(_) => {
                self.status_message = "No rows on this floor; press a to add one".to_string();
                return;
            }
        }
        self.edit_buffer = sheet
            .input_text(self.cursor_row, self.cursor_col)
            .unwrap_or_default();
        self.edit_cursor = self.edit_buffer.len();
        self.status_message.clear();
        self.mode = Mode::Edit;
    }

    /// Commit the current edit
    pub fn commit_edit(&mut self) {
        let text = std::mem::take(&mut self.edit_buffer);
        self.edit_cursor = 0;
        self.mode = Mode::Normal;
        match self.project.edit(self.cursor_row, self.cursor_col, &text) {
            Ok(_) => self.status_message.clear(),
            Err(e) => self.set_error(e),
        }
    }

    pub fn cancel_edit(&mut self) {
        self.mode = Mode::Normal;
        self.edit_buffer.clear();
        self.edit_cursor = 0;
    }

    pub fn enter_command_mode(&mut self) {
        self.mode = Mode::Command;
        self.command_buffer.clear();
        self.command_cursor = 0;
    }

    pub fn cancel_command(&mut self) {
        self.mode = Mode::Normal;
        self.command_buffer.clear();
        self.command_cursor = 0;
    }

    pub fn enter_visual_mode(&mut self) {
        if self.row_count() == 0 {
            return;
        }
        self.mode = Mode::Visual;
        self.selection_anchor = Some(self.cursor_row);
        self.sync_selection();
    }

    pub fn exit_visual_mode(&mut self) {
        self.mode = Mode::Normal;
        self.selection_anchor = None;
        self.sync_selection();
    }

    /// Insert a row below the cursor and move onto it.
    pub fn insert_row_after_cursor(&mut self) {
        if self.row_count() == 0 {
            self.append_row();
            return;
        }
        match self.project.insert_row_after(self.cursor_row) {
            Ok(_) => {
                self.cursor_row += 1;
                self.cursor_col = 0;
                self.update_viewport();
                self.sync_selection();
            }
            Err(e) => self.set_error(e),
        }
    }

    pub fn append_row(&mut self) {
        match self.project.append_row() {
            Ok(_) => {
                self.cursor_row = self.row_count().saturating_sub(1);
                self.cursor_col = 0;
                self.update_viewport();
                self.sync_selection();
            }
            Err(e) => self.set_error(e),
        }
    }

    /// Remove the Visual selection, or the cursor row in Normal mode.
    pub fn remove_selected_rows(&mut self) {
        if self.row_count() == 0 {
            return;
        }
        let (start, end) = self
            .selected_row_range()
            .unwrap_or((self.cursor_row, self.cursor_row));
        let rows: Vec<usize> = (start..=end).collect();
        self.mode = Mode::Normal;
        self.selection_anchor = None;
        self.sync_selection();

        match self.project.remove_rows(&rows) {
            Ok(Some(pos)) => {
                self.cursor_row = pos.row;
                self.cursor_col = pos.col;
            }
            Ok(None) => {}
            Err(e) => {
                self.set_error(e);
                return;
            }
        }
        self.clamp_cursor();
        self.sync_selection();
        self.status_message = match rows.len() {
            1 => "Removed 1 row".to_string(),
            n => format!("Removed {} rows", n),
        };
    }

    pub fn switch_floor(&mut self, step: i32) {
        if self.mode == Mode::Visual {
            self.exit_visual_mode();
        }
        self.project.cycle_active(step >= 0);
        self.after_floor_change();
    }

    fn after_floor_change(&mut self) {
        self.viewport_row = 0;
        self.clamp_cursor();
        self.sync_selection();
        let floor = self.project.active_floor();
        self.status_message = format!(
            "Floor {}/{}: {}",
            self.project.active_index() + 1,
            self.project.floor_count(),
            floor.name
        );
    }

    /// Save to the current path, or to `path` when given. Returns whether
    /// the save succeeded.
    pub fn save_file(&mut self, path: Option<PathBuf>) -> bool {
        let result = match path {
            Some(path) => self.project.save_as(&path),
            None => self.project.save_file(),
        };
        match result {
            Ok(path) => {
                info!(path = %path.display(), "saved from ui");
                self.status_message = format!("Saved to {}", path.display());
                true
            }
            Err(RoomcalcError::NoFilePath) => {
                self.status_message = "Error: No file name; use :w <file>".to_string();
                false
            }
            Err(e) => {
                self.set_error(e);
                false
            }
        }
    }

    pub fn load_file(&mut self, path: PathBuf) {
        match self.project.load_file(&path) {
            Ok(()) => {
                self.mode = Mode::Normal;
                self.selection_anchor = None;
                self.cursor_row = 0;
                self.cursor_col = 0;
                self.viewport_row = 0;
                self.sync_selection();
                self.status_message = format!(
                    "Loaded {} ({} floors)",
                    path.display(),
                    self.project.floor_count()
                );
            }
            Err(e) => self.set_error(e),
        }
    }

    pub fn export_file(&mut self, path: PathBuf) {
        match self.project.export(&path) {
            Ok(_) => self.status_message = format!("Exported to {}", path.display()),
            Err(e) => self.set_error(e),
        }
    }

    fn set_error(&mut self, e: RoomcalcError) {
        warn!(error = %e, "command failed");
        self.status_message = format!("Error: {}", e);
    }

    /// Execute the command buffer. Returns true when the app should quit.
    pub fn execute_command(&mut self) -> bool {
        let cmd = self.command_buffer.trim().to_string();
        self.command_buffer.clear();
        self.command_cursor = 0;
        self.mode = Mode::Normal;

        let (command, args) = match cmd.split_once(' ') {
            Some((command, args)) => (command, Some(args.trim()).filter(|a| !a.is_empty())),
            None => (cmd.as_str(), None),
        };

        match command {
            "" => {}
            "q" | "quit" => {
                if self.project.modified {
                    self.status_message =
                        "Unsaved changes! Use :q! to force quit or :wq to save and quit"
                            .to_string();
                    return false;
                }
                return true;
            }
            "q!" => return true,
            "w" | "save" => {
                self.save_file(args.map(PathBuf::from));
            }
            "wq" | "x" => return self.save_file(args.map(PathBuf::from)),
            "e" | "open" => match args {
                Some(path) => self.load_file(PathBuf::from(path)),
                None => self.status_message = "Usage: :e <file>".to_string(),
            },
            "export" => match args {
                Some(path) => self.export_file(PathBuf::from(path)),
                None => self.status_message = "Usage: :export <file.md|file.csv>".to_string(),
            },
            "rows" => match args.and_then(|a| a.parse::<usize>().ok()) {
                Some(count) => match self.project.set_row_count(count) {
                    Ok(_) => {
                        self.clamp_cursor();
                        self.sync_selection();
                    }
                    Err(e) => self.set_error(e),
                },
                None => self.status_message = "Usage: :rows <count>".to_string(),
            },
            "floor" => self.floor_command(args),
            _ => {
                self.status_message = format!("Unknown command: {}", command);
            }
        }
        false
    }

    fn floor_command(&mut self, args: Option<&str>) {
        let (sub, rest) = match args.map(|a| a.split_once(' ').unwrap_or((a, ""))) {
            Some((sub, rest)) => (sub, rest.trim()),
            None => {
                self.status_message =
                    "Usage: :floor new [name] | rename <name> | delete | <number>".to_string();
                return;
            }
        };

        match sub {
            "new" | "add" => {
                self.project.add_floor(rest);
                self.cursor_row = 0;
                self.cursor_col = 0;
                self.after_floor_change();
            }
            "rename" => {
                if rest.is_empty() {
                    self.status_message = "Usage: :floor rename <name>".to_string();
                    return;
                }
                let index = self.project.active_index();
                match self.project.rename_floor(index, rest) {
                    Ok(()) => self.after_floor_change(),
                    Err(e) => self.set_error(e),
                }
            }
            "delete" | "rm" => {
                let index = self.project.active_index();
                match self.project.remove_floor(index) {
                    Ok(floor) => {
                        self.after_floor_change();
                        self.status_message = format!("Removed floor {}", floor.name);
                    }
                    Err(e) => self.set_error(e),
                }
            }
            number => match number.parse::<usize>() {
                Ok(n) if n >= 1 => match self.project.set_active(n - 1) {
                    Ok(()) => self.after_floor_change(),
                    Err(e) => self.set_error(e),
                },
                _ => self.status_message = format!("Unknown floor command: {}", number),
            },
        }
    }
}
