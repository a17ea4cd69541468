//! Header-aware delimited table reading and writing.
//!
//! This library loads taxonomy export tables (skills, skill groups,
//! hierarchy relations, task statements) into memory, keeps the original
//! column order and 1-based line numbers for error reporting, and writes
//! derived tables back out atomically.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod atomic;
pub mod error;
pub mod reader;
pub mod table;
pub mod warning;
pub mod writer;

pub use atomic::write_table_atomic;
pub use error::{Error, Result};
pub use reader::TableReader;
pub use table::{Record, Row, Table};
pub use warning::Warning;
pub use writer::TableWriter;
