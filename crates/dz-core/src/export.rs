use dz_model::Table;
use polars::prelude::{CsvWriter, SerWriter};

use crate::error::Result;

/// Render a table as CSV bytes with a header row.
pub fn write_csv(table: &Table) -> Result<Vec<u8>> {
    let mut df = table.data().clone();
    let mut buffer = Vec::new();
    CsvWriter::new(&mut buffer)
        .include_header(true)
        .finish(&mut df)?;
    Ok(buffer)
}
