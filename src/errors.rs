/// Error types shared by the store backends, the data sections and the spreadsheet import.
use std::path::PathBuf;

use thiserror::Error;

use crate::types::{RecordId, RecordKind};

/// A failure reported by a backing store. Messages are surfaced verbatim.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Connection failed: {0}")]
    Transport(String),

    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Unexpected response: {0}")]
    Malformed(String),

    #[error("{kind} '{id}' not found")]
    NotFound { kind: RecordKind, id: RecordId },
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A batch save that stopped at its first rejected row.
#[derive(Error, Debug)]
#[error(
    "Saving row '{failed}' failed after {} row(s) were stored: {source}",
    .persisted.len()
)]
pub struct SaveFailure {
    pub failed: RecordId,
    pub persisted: Vec<RecordId>,
    #[source]
    pub source: StoreError,
}

/// Failures of a single data section operation.
#[derive(Error, Debug)]
pub enum SectionError {
    #[error("Not in edit mode. Press 'e' to start editing.")]
    NotInEditMode,

    #[error("Finish or cancel edit mode first.")]
    EditModeActive,

    #[error("The ID column cannot be edited.")]
    IdColumnNotEditable,

    #[error("Row '{0}' does not exist.")]
    UnknownRow(RecordId),

    #[error("Column {0} does not exist.")]
    ColumnOutOfRange(usize),

    #[error("No cell is being edited.")]
    NoActiveEdit,

    #[error("Field '{0}' is required.")]
    MissingField(String),

    #[error("Select at least one date.")]
    NoDatesSelected,

    #[error("Invalid date '{0}'. Please use DD.MM.YYYY.")]
    InvalidDate(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Save(#[from] SaveFailure),
}

pub type SectionResult<T> = Result<T, SectionError>;

/// Failures of the spreadsheet import. Missing sheets or columns are not
/// errors; they yield empty lists.
#[derive(Error, Debug)]
pub enum SpreadsheetError {
    #[error("Spreadsheet '{}' does not exist", .0.display())]
    NotFound(PathBuf),

    #[error("Could not read spreadsheet: {0}")]
    Open(#[from] calamine::Error),
}
