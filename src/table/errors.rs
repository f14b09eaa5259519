//! Table error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("a table needs at least one column")]
    NoColumns,

    #[error("page size must be greater than zero")]
    ZeroPageSize,

    #[error("no row with the requested identity")]
    UnknownRow,

    #[error("this table has no drop-down editor")]
    NoDropdown,

    #[error("'{value}' is not an allowed value for '{field}'")]
    UnknownOption { field: String, value: String },

    #[error("action '{0}' is not enabled for this table")]
    ActionNotEnabled(&'static str),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported export format: {0}. Supported formats: csv, json")]
    UnknownFormat(String),
}
