//! Query layer errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    /// The select names a table that was never created.
    #[error("Unknown table: {0}")]
    UnknownTable(String),

    /// Rows are JSON objects keyed by column.
    #[error("Row must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    /// A row did not match the requested shape.
    #[error("Failed to decode row: {0}")]
    Decode(#[from] serde_json::Error),
}
