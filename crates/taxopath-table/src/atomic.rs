//! Atomic write operations for derived tables.
//!
//! Output tables are written to a sibling temporary file which is then
//! renamed over the target path. On POSIX systems a rename within one
//! filesystem is atomic, so a failed run never leaves a half-written
//! output table behind, and an existing output file survives intact.
//!
//! # Examples
//!
//! ```no_run
//! use taxopath_table::{write_table_atomic, Table};
//!
//! let mut table = Table::new(vec!["ID".to_string(), "LEVEL".to_string()]);
//! table.push_values(vec!["s1".to_string(), "2".to_string()])?;
//!
//! write_table_atomic("skills_with_levels.csv", &table, b',')?;
//! # Ok::<(), taxopath_table::Error>(())
//! ```

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::table::Table;
use crate::writer::TableWriter;

/// Atomically writes `table` to `path`.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created or written, or
/// if the final rename fails (e.g. across filesystems). On failure the
/// temporary file is removed on a best-effort basis and the target path is
/// left unchanged.
pub fn write_table_atomic<P: AsRef<Path>>(path: P, table: &Table, delimiter: u8) -> Result<()> {
    let path = path.as_ref();
    let temp_path = make_temp_path(path);

    let result = write_to_temp_file(&temp_path, table, delimiter)
        .and_then(|()| std::fs::rename(&temp_path, path).map_err(Into::into));
    if result.is_err() {
        let _ = std::fs::remove_file(&temp_path);
    }
    result
}

/// Appends `.tmp` to the file name, keeping any existing extension.
fn make_temp_path(path: &Path) -> PathBuf {
    let mut temp_path = path.to_path_buf();
    let new_extension = match path.extension() {
        Some(ext) => {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".tmp");
            new_ext
        }
        None => std::ffi::OsString::from("tmp"),
    };
    temp_path.set_extension(new_extension);
    temp_path
}

fn write_to_temp_file(temp_path: &Path, table: &Table, delimiter: u8) -> Result<()> {
    let file = File::create(temp_path)?;
    let mut writer = TableWriter::with_delimiter(BufWriter::new(file), delimiter, table.headers())?;
    writer.write_table_rows(table)?;
    let buffered = writer.into_inner()?;
    buffered
        .into_inner()
        .map_err(std::io::IntoInnerError::into_error)?
        .sync_all()?;
    Ok(())
}
