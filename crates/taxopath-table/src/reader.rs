//! Table reading operations.
//!
//! [`TableReader`] parses delimited text into a [`Table`], tolerating short
//! and blank rows (reported as [`Warning`]s) and rejecting rows that carry
//! more values than the header row declares.

use std::io;
use std::path::Path;

use tracing::debug;

use crate::error::{Error, Result};
use crate::table::{Row, Table};
use crate::warning::Warning;

/// Byte order mark some spreadsheet exports put in front of the first header.
const UTF8_BOM: char = '\u{feff}';

/// Reader for header-first delimited tables.
///
/// # Examples
///
/// ```
/// use taxopath_table::TableReader;
///
/// let data = "PARENTID,CHILDID\nA,B\nA,C\n";
/// let (table, warnings) = TableReader::new().read(data.as_bytes())?;
///
/// assert_eq!(table.len(), 2);
/// assert!(warnings.is_empty());
/// # Ok::<(), taxopath_table::Error>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TableReader {
    delimiter: u8,
}

impl Default for TableReader {
    fn default() -> Self {
        Self::new()
    }
}

impl TableReader {
    /// Creates a comma-delimited reader.
    #[must_use]
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    /// Use a different field delimiter (e.g. `b'\t'`).
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Reads the table stored at `path`.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be opened, or for any reason listed on
    /// [`read`](Self::read).
    pub fn read_path(&self, path: &Path) -> Result<(Table, Vec<Warning>)> {
        let file = std::fs::File::open(path).map_err(|e| {
            Error::Io(io::Error::new(
                e.kind(),
                format!("cannot open {}: {e}", path.display()),
            ))
        })?;
        let (table, warnings) = self.read(file)?;
        debug!(
            path = %path.display(),
            rows = table.len(),
            columns = table.width(),
            warnings = warnings.len(),
            "Loaded table"
        );
        Ok((table, warnings))
    }

    /// Reads a table from any byte source.
    ///
    /// The first record is the header row. Rows where every value is blank
    /// are skipped and rows with missing trailing values are padded; both
    /// produce a [`Warning`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] if the header row is missing or empty
    /// or a row has more values than there are headers, and [`Error::Csv`]
    /// if the input is not valid delimited text.
    pub fn read<R: io::Read>(&self, source: R) -> Result<(Table, Vec<Warning>)> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .flexible(true)
            .has_headers(true)
            .from_reader(source);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .enumerate()
            .map(|(idx, h)| {
                let h = if idx == 0 {
                    h.trim_start_matches(UTF8_BOM)
                } else {
                    h
                };
                h.trim().to_string()
            })
            .collect();

        if headers.is_empty() || headers.iter().all(String::is_empty) {
            return Err(Error::InvalidFormat("missing header row".to_string()));
        }

        let width = headers.len();
        let mut table = Table::new(headers);
        let mut warnings = Vec::new();

        for result in reader.records() {
            let record = result?;
            let line_number = record.position().map_or(0, csv::Position::line);

            if record.iter().all(|v| v.trim().is_empty()) {
                warnings.push(Warning::BlankRow { line_number });
                continue;
            }

            let found = record.len();
            if found > width {
                return Err(Error::InvalidFormat(format!(
                    "line {line_number}: expected {width} values, found {found}"
                )));
            }

            let mut values: Vec<String> = record.iter().map(str::to_string).collect();
            if found < width {
                warnings.push(Warning::ShortRow {
                    line_number,
                    expected: width,
                    found,
                });
                values.resize(width, String::new());
            }

            table.push_row(Row::new(line_number, values))?;
        }

        Ok((table, warnings))
    }
}
