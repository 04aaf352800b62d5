//! Key translation layer.
//!
//! Keeps key handling separate from app behavior: input.rs maps a key to an
//! [`Action`], actions.rs applies it.

use super::app::Mode;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Actions that can be triggered by keybindings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Cancel current operation and return to Normal mode.
    Cancel,
    /// Enter Edit mode for the current cell.
    EnterEdit,
    /// Enter Edit mode with an empty buffer.
    ChangeCell,
    /// Commit the current edit and return to Normal mode.
    CommitEdit,
    /// Enter Command mode (`:` prompt).
    EnterCommand,
    /// Execute the command in the command buffer.
    ExecuteCommand,
    /// Enter Visual row selection mode.
    EnterVisual,
    /// Exit Visual mode without action.
    ExitVisual,

    /// Move cursor by (dx, dy).
    Move(i32, i32),
    /// Page up (-1) or down (+1).
    Page(i32),
    /// Jump to first column.
    HomeCol,
    /// Jump to last column.
    EndCol,
    /// Jump to the first row.
    GotoFirst,
    /// Jump to the last row.
    GotoLast,

    /// Insert a row below the cursor.
    InsertRowAfter,
    /// Append a row at the end of the floor.
    AppendRow,
    /// Remove the selected rows (the cursor row outside Visual mode).
    RemoveRows,
    /// Switch to the next (+1) or previous (-1) floor.
    SwitchFloor(i32),
    /// Save the file.
    Save,
}

pub fn translate(mode: Mode, key: KeyEvent) -> Option<Action> {
    match mode {
        Mode::Normal => match key.code {
            KeyCode::Up | KeyCode::Char('k') => Some(Action::Move(0, -1)),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::Move(0, 1)),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::Move(-1, 0)),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::Move(1, 0)),

            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => {
                Some(Action::SwitchFloor(-1))
            }
            KeyCode::Tab => Some(Action::SwitchFloor(1)),
            KeyCode::BackTab => Some(Action::SwitchFloor(-1)),

            KeyCode::PageUp => Some(Action::Page(-1)),
            KeyCode::PageDown => Some(Action::Page(1)),
            KeyCode::Home if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::GotoFirst)
            }
            KeyCode::End if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::GotoLast)
            }
            KeyCode::Home | KeyCode::Char('0') => Some(Action::HomeCol),
            KeyCode::End | KeyCode::Char('$') => Some(Action::EndCol),
            KeyCode::Char('g') => Some(Action::GotoFirst),
            KeyCode::Char('G') => Some(Action::GotoLast),

            KeyCode::Enter | KeyCode::Char('i') => Some(Action::EnterEdit),
            KeyCode::Char('c') => Some(Action::ChangeCell),
            KeyCode::Char('o') => Some(Action::InsertRowAfter),
            KeyCode::Char('a') => Some(Action::AppendRow),
            KeyCode::Char('d') => Some(Action::RemoveRows),
            KeyCode::Char(':') => Some(Action::EnterCommand),
            KeyCode::Char('v') => Some(Action::EnterVisual),
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                Some(Action::Save)
            }
            _ => None,
        },

        Mode::Visual => match key.code {
            KeyCode::Esc | KeyCode::Char('v') => Some(Action::ExitVisual),

            KeyCode::Up | KeyCode::Char('k') => Some(Action::Move(0, -1)),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::Move(0, 1)),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::Move(-1, 0)),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::Move(1, 0)),

            KeyCode::PageUp => Some(Action::Page(-1)),
            KeyCode::PageDown => Some(Action::Page(1)),
            KeyCode::Char('d') | KeyCode::Char('x') => Some(Action::RemoveRows),
            _ => None,
        },

        Mode::Edit => match key.code {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::CommitEdit),
            _ => None,
        },

        Mode::Command => match key.code {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::ExecuteCommand),
            _ => None,
        },
    }
}

/// One-line hint shown in the status bar.
pub fn status_hint() -> &'static str {
    "hjkl:move  i:edit  c:change  o/a:add row  d:delete  v:visual  Tab:floor  :w:save  :q:quit"
}
