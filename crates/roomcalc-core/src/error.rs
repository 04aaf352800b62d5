//! Error types for Roomcalc core.

use thiserror::Error;

use roomcalc_engine::error::CalcError;

/// Errors that can occur while managing or persisting a project
#[derive(Error, Debug)]
pub enum RoomcalcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error at line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported project file version {0}")]
    UnsupportedVersion(u64),

    #[error(transparent)]
    Calc(#[from] CalcError),

    #[error("No file path set")]
    NoFilePath,

    #[error("Cannot remove the last floor")]
    LastFloor,

    #[error("Floor {index} out of range (project has {len} floors)")]
    FloorOutOfRange { index: usize, len: usize },

    #[error("Unknown file format: {0}")]
    UnknownFormat(String),

    #[error("Flat files hold a single floor, project has {0}")]
    FlatFormatFloors(usize),
}

pub type Result<T> = std::result::Result<T, RoomcalcError>;
