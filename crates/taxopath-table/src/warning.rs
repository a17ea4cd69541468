//! Warning types for non-fatal problems found while loading a table.
//!
//! Export files produced by spreadsheet tools regularly contain trailing
//! blank rows or rows with missing trailing cells. These are not worth
//! aborting a batch run for, so the reader repairs or skips them and returns
//! a [`Warning`] for each one alongside the loaded table.
//!
//! # Examples
//!
//! ```
//! use taxopath_table::Warning;
//!
//! let warning = Warning::ShortRow {
//!     line_number: 5,
//!     expected: 4,
//!     found: 3,
//! };
//! assert_eq!(warning.line_number(), 5);
//! assert_eq!(warning.kind(), "short_row");
//! ```

/// A non-fatal warning produced while reading a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// A row had fewer values than the header row.
    ///
    /// The missing trailing values are filled with empty strings.
    ShortRow {
        /// The 1-based line number of the row.
        line_number: u64,
        /// Number of columns in the header row.
        expected: usize,
        /// Number of values found on the row.
        found: usize,
    },

    /// A row where every value was blank; it was skipped.
    BlankRow {
        /// The 1-based line number of the row.
        line_number: u64,
    },
}

impl Warning {
    /// Returns the line number associated with this warning.
    #[must_use]
    pub fn line_number(&self) -> u64 {
        match self {
            Self::ShortRow { line_number, .. } | Self::BlankRow { line_number } => *line_number,
        }
    }

    /// Returns a human-readable description of the warning.
    ///
    /// # Examples
    ///
    /// ```
    /// use taxopath_table::Warning;
    ///
    /// let warning = Warning::BlankRow { line_number: 12 };
    /// assert!(warning.description().contains("line 12"));
    /// ```
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::ShortRow {
                line_number,
                expected,
                found,
            } => format!(
                "line {line_number}: expected {expected} values, found {found}; padded with empty values"
            ),
            Self::BlankRow { line_number } => format!("line {line_number}: blank row skipped"),
        }
    }

    /// Returns a static string identifying the warning kind.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ShortRow { .. } => "short_row",
            Self::BlankRow { .. } => "blank_row",
        }
    }
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::error::Error for Warning {}
