//! Storage: flat text and structured project files, Markdown/CSV export.

mod csv;
mod flat;
mod md;
mod project_file;

pub use csv::{write_csv, write_csv_content};
pub use flat::{parse_flat_content, read_flat, write_flat, write_flat_content};
pub use md::{write_markdown, write_markdown_content};
pub use project_file::{
    PROJECT_FORMAT_VERSION, parse_project_content, read_project, write_project,
    write_project_content,
};

use crate::error::{Result, RoomcalcError};
use std::path::Path;

/// Largest file the loaders will read.
pub const MAX_PROJECT_FILE_BYTES: u64 = 16 * 1_048_576;

/// One floor as plain text: a name and its row matrix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FloorData {
    pub name: String,
    pub rows: Vec<Vec<String>>,
}

/// Formats a project can be saved to and loaded from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileFormat {
    /// Comma-separated raw columns, one floor.
    Flat,
    /// Versioned JSON, any number of floors.
    Project,
}

impl FileFormat {
    pub fn from_path(path: &Path) -> Result<FileFormat> {
        match extension(path).as_deref() {
            Some("csv" | "txt") => Ok(FileFormat::Flat),
            Some("json" | "rcalc") => Ok(FileFormat::Project),
            _ => Err(RoomcalcError::UnknownFormat(path.display().to_string())),
        }
    }
}

/// Formats a project can be exported to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Markdown,
    Csv,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Result<ExportFormat> {
        match extension(path).as_deref() {
            Some("md" | "markdown") => Ok(ExportFormat::Markdown),
            Some("csv") => Ok(ExportFormat::Csv),
            _ => Err(RoomcalcError::UnknownFormat(path.display().to_string())),
        }
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Read a whole file, refusing anything larger than [`MAX_PROJECT_FILE_BYTES`].
pub(crate) fn read_capped(path: &Path) -> Result<String> {
    let meta = std::fs::metadata(path)?;
    if meta.len() > MAX_PROJECT_FILE_BYTES {
        return Err(RoomcalcError::Io(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_PROJECT_FILE_BYTES
            ),
        )));
    }
    Ok(std::fs::read_to_string(path)?)
}
