//! In-memory table model.
//!
//! A [`Table`] is a header row plus a list of [`Row`]s that all have exactly
//! as many values as there are headers. Rows remember the 1-based line they
//! were read from so callers can point at the offending record when a value
//! is rejected.

use crate::error::{Error, Result};

/// A single row of values, aligned with the table headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based source line, or 0 for rows built in memory.
    line: u64,
    values: Vec<String>,
}

impl Row {
    /// Create a row read from the given source line.
    #[must_use]
    pub fn new(line: u64, values: Vec<String>) -> Self {
        Self { line, values }
    }

    /// The 1-based source line (0 when the row was not read from a file).
    #[must_use]
    pub fn line(&self) -> u64 {
        self.line
    }

    /// The row values in header order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// A header row and its data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Create an empty table with the given headers.
    #[must_use]
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
        }
    }

    /// Column names in order.
    #[must_use]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of columns.
    #[must_use]
    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Data rows in insertion order.
    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Index of the named column, if present.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of the named column.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingColumn`] if no header matches `name`.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name).ok_or_else(|| Error::MissingColumn {
            column: name.to_string(),
        })
    }

    /// Append a row built in memory.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] if the row width differs from the
    /// header width.
    pub fn push_values(&mut self, values: Vec<String>) -> Result<()> {
        self.push_row(Row::new(0, values))
    }

    /// Append a row, keeping its source line.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] if the row width differs from the
    /// header width.
    pub fn push_row(&mut self, row: Row) -> Result<()> {
        if row.values.len() != self.headers.len() {
            return Err(Error::InvalidFormat(format!(
                "row has {} values but the table has {} columns",
                row.values.len(),
                self.headers.len()
            )));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Iterate rows as header-aware records.
    pub fn records(&self) -> impl Iterator<Item = Record<'_>> {
        self.rows.iter().map(|row| Record {
            headers: &self.headers,
            row,
        })
    }
}

/// A borrowed view of one row together with the table headers.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    headers: &'a [String],
    row: &'a Row,
}

impl<'a> Record<'a> {
    /// Value of the named column, if the column exists.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&'a str> {
        let idx = self.headers.iter().position(|h| h == column)?;
        self.get_at(idx)
    }

    /// Value at a column index.
    #[must_use]
    pub fn get_at(&self, idx: usize) -> Option<&'a str> {
        self.row.values.get(idx).map(String::as_str)
    }

    /// Trimmed value at a column index, `None` when absent or blank.
    #[must_use]
    pub fn non_empty_at(&self, idx: usize) -> Option<&'a str> {
        self.get_at(idx).map(str::trim).filter(|v| !v.is_empty())
    }

    /// The 1-based source line of the row.
    #[must_use]
    pub fn line(&self) -> u64 {
        self.row.line
    }

    /// All values in header order.
    #[must_use]
    pub fn values(&self) -> &'a [String] {
        &self.row.values
    }

    /// `(header, value)` pairs in column order.
    pub fn fields(&self) -> impl Iterator<Item = (&'a str, &'a str)> {
        self.headers
            .iter()
            .map(String::as_str)
            .zip(self.row.values.iter().map(String::as_str))
    }
}
