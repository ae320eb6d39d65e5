//! Table parsing for DataZen.
//!
//! Turns raw, already-decoded file bytes into a [`Table`] given format
//! parameters. Delimited text goes through the polars CSV reader; workbooks
//! (`.xlsx`, `.xls`, `.ods`, ...) go through calamine.
//!
//! # Example
//!
//! ```ignore
//! use dz_ingest::{ImportOptions, parse_table};
//!
//! let table = parse_table("scores.csv", b"name,score\na,1\n", &ImportOptions::default())?;
//! assert_eq!(table.height(), 1);
//! ```

mod csv;
mod error;
mod options;
mod outcome;
mod spreadsheet;

use dz_model::Table;

// === Error Types ===
pub use error::{ImportError, Result};

// === Options ===
pub use options::{ImportOptions, NA_VALUES, SheetSelector, SourceFormat, is_na_value};

// === Readers ===
pub use csv::{read_delimited, validate_encoding};
pub use spreadsheet::read_spreadsheet;

// === Results ===
pub use outcome::ImportOutcome;

/// Parses `bytes` into a table, choosing the reader from the file extension.
pub fn parse_table(filename: &str, bytes: &[u8], options: &ImportOptions) -> Result<Table> {
    if bytes.is_empty() {
        return Err(ImportError::Empty {
            filename: filename.to_string(),
        });
    }
    let df = match SourceFormat::from_filename(filename)? {
        SourceFormat::Delimited => read_delimited(filename, bytes, options)?,
        SourceFormat::Spreadsheet => read_spreadsheet(filename, bytes, options)?,
    };
    Ok(Table::new(df))
}
