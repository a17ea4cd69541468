//! Error types for taxopath-table operations.

use std::io;
use thiserror::Error;

/// The error type for taxopath-table operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred while reading or writing.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The underlying CSV parser or writer failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A column required by the caller is not present in the header row.
    #[error("missing column: {column}")]
    MissingColumn {
        /// Name of the missing column.
        column: String,
    },

    /// The table does not have the expected shape.
    #[error("Invalid table format: {0}")]
    InvalidFormat(String),
}

/// A specialized Result type for taxopath-table operations.
pub type Result<T> = std::result::Result<T, Error>;
