//! Error types for the recalculation engine.

use thiserror::Error;

use crate::engine::ColumnKind;

/// Errors raised by the engine.
///
/// Malformed user input is never an error here: cells coerce it to their
/// default value. Everything below is an out-of-contract condition.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalcError {
    #[error("Value type mismatch: cannot combine {left:?} with {right:?}")]
    ValueTypeMismatch { left: ColumnKind, right: ColumnKind },

    #[error("Row {row} out of range (grid has {len} rows)")]
    RowOutOfRange { row: usize, len: usize },

    #[error("Column {col} out of range")]
    ColumnOutOfRange { col: usize },

    #[error("Cell at row {row}, column {col} is not editable")]
    ReadOnlyCell { row: usize, col: usize },

    #[error("Cell does not belong to this grid")]
    ForeignCell,
}

pub type Result<T> = std::result::Result<T, CalcError>;
