//! Error types for taxopath operations.
//!
//! Every variant here aborts the batch run. Conditions the run tolerates
//! (cycles, forward references, unlinked entities, repaired table rows) are
//! reported as values instead: see [`CycleBreak`](crate::hierarchy::CycleBreak)
//! and [`taxopath_table::Warning`].

use std::io;
use thiserror::Error;

/// The error type for taxopath operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing a table failed.
    #[error("table error: {0}")]
    Table(#[from] taxopath_table::Error),

    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// A relation row is missing its parent or child ID.
    #[error("malformed relation on line {line}: {reason}")]
    MalformedRelation {
        /// 1-based line of the offending row
        line: u64,
        /// What is wrong with it
        reason: String,
    },

    /// An entity row is missing its ID.
    #[error("malformed entity on line {line}: {reason}")]
    MalformedEntity {
        /// 1-based line of the offending row
        line: u64,
        /// What is wrong with it
        reason: String,
    },

    /// A node ID contains the path delimiter, so the rendered path could
    /// not be split back into IDs.
    #[error("node ID {id:?} contains the path delimiter {delimiter:?}")]
    DelimiterInId {
        /// The offending ID
        id: String,
        /// The configured path delimiter
        delimiter: String,
    },
}

/// A specialized Result type for taxopath operations.
pub type Result<T> = std::result::Result<T, Error>;
