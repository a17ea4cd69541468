//! Table writing operations.

use std::io;

use crate::error::{Error, Result};
use crate::table::Table;

/// Buffered writer for delimited tables.
///
/// The header row is written on construction; every subsequent row must
/// have exactly as many values as there are headers.
///
/// # Examples
///
/// ```
/// use taxopath_table::TableWriter;
///
/// let headers = vec!["ID".to_string(), "LEVEL".to_string()];
/// let mut writer = TableWriter::new(Vec::new(), &headers)?;
/// writer.write_row(["s1", "3"])?;
/// let bytes = writer.into_inner()?;
///
/// assert_eq!(String::from_utf8(bytes).unwrap(), "ID,LEVEL\ns1,3\n");
/// # Ok::<(), taxopath_table::Error>(())
/// ```
pub struct TableWriter<W: io::Write> {
    inner: csv::Writer<W>,
    width: usize,
}

impl<W: io::Write> TableWriter<W> {
    /// Creates a comma-delimited writer and writes the header row.
    ///
    /// # Errors
    ///
    /// Returns an error if the header row cannot be written.
    pub fn new(writer: W, headers: &[String]) -> Result<Self> {
        Self::with_delimiter(writer, b',', headers)
    }

    /// Creates a writer using `delimiter` and writes the header row.
    ///
    /// # Errors
    ///
    /// Returns an error if the header row cannot be written.
    pub fn with_delimiter(writer: W, delimiter: u8, headers: &[String]) -> Result<Self> {
        let mut inner = csv::WriterBuilder::new()
            .delimiter(delimiter)
            .from_writer(writer);
        inner.write_record(headers)?;
        Ok(Self {
            inner,
            width: headers.len(),
        })
    }

    /// Writes one data row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] if the row width differs from the
    /// header width, or a CSV error if writing fails.
    pub fn write_row<I, S>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<[u8]>,
    {
        let values: Vec<S> = values.into_iter().collect();
        if values.len() != self.width {
            return Err(Error::InvalidFormat(format!(
                "row has {} values but the table has {} columns",
                values.len(),
                self.width
            )));
        }
        self.inner.write_record(values)?;
        Ok(())
    }

    /// Writes every row of `table`.
    ///
    /// # Errors
    ///
    /// See [`write_row`](Self::write_row).
    pub fn write_table_rows(&mut self, table: &Table) -> Result<()> {
        for row in table.rows() {
            self.write_row(row.values())?;
        }
        Ok(())
    }

    /// Flushes buffered rows to the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    /// Flushes and returns the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the final flush fails.
    pub fn into_inner(self) -> Result<W> {
        self.inner
            .into_inner()
            .map_err(|e| Error::Io(io::Error::new(e.error().kind(), e.error().to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers() -> Vec<String> {
        vec!["ID".to_string(), "HIERARCHY_PATH".to_string()]
    }

    #[test]
    fn quotes_values_containing_delimiter() {
        let mut writer = TableWriter::new(Vec::new(), &headers()).unwrap();
        writer.write_row(["s1", "a, b"]).unwrap();

        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(out, "ID,HIERARCHY_PATH\ns1,\"a, b\"\n");
    }

    #[test]
    fn rejects_rows_of_wrong_width() {
        let mut writer = TableWriter::new(Vec::new(), &headers()).unwrap();

        let err = writer.write_row(["only-one"]).unwrap_err();
        assert!(matches!(err, Error::InvalidFormat(_)));
    }

    #[test]
    fn writes_with_custom_delimiter() {
        let mut writer = TableWriter::with_delimiter(Vec::new(), b'\t', &headers()).unwrap();
        writer.write_row(["s1", "g1;s1"]).unwrap();

        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(out, "ID\tHIERARCHY_PATH\ns1\tg1;s1\n");
    }

    #[test]
    fn writes_all_rows_of_a_table() {
        let mut table = Table::new(headers());
        table
            .push_values(vec!["s1".to_string(), "g;s1".to_string()])
            .unwrap();
        table
            .push_values(vec!["s2".to_string(), String::new()])
            .unwrap();

        let mut writer = TableWriter::new(Vec::new(), table.headers()).unwrap();
        writer.write_table_rows(&table).unwrap();

        let out = String::from_utf8(writer.into_inner().unwrap()).unwrap();
        assert_eq!(out.lines().count(), 3);
    }
}
