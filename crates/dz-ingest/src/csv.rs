//! Delimited text reading with explicit separator, decimal mark and header row.

use std::io::Cursor;

use polars::prelude::*;

use crate::error::{ImportError, Result};
use crate::options::{ImportOptions, NA_VALUES};

/// Rows scanned for schema inference.
const INFER_SCHEMA_ROWS: usize = 1000;

/// Reject encodings other than UTF-8 and strip a UTF-8 BOM.
pub fn validate_encoding<'a>(filename: &str, bytes: &'a [u8]) -> Result<&'a [u8]> {
    if bytes.starts_with(&[0xFF, 0xFE]) || bytes.starts_with(&[0xFE, 0xFF]) {
        return Err(ImportError::Encoding {
            filename: filename.to_string(),
            reason: "UTF-16 content is not supported".to_string(),
        });
    }
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    std::str::from_utf8(bytes).map_err(|e| ImportError::Encoding {
        filename: filename.to_string(),
        reason: format!("invalid byte sequence at offset {}", e.valid_up_to()),
    })?;
    Ok(bytes)
}

/// Reads delimited text into a Polars DataFrame.
///
/// Without a header row polars names the columns `column_1`, `column_2`, ...
pub fn read_delimited(filename: &str, bytes: &[u8], options: &ImportOptions) -> Result<DataFrame> {
    let bytes = validate_encoding(filename, bytes)?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Err(ImportError::Empty {
            filename: filename.to_string(),
        });
    }

    let separator = options.delimiter;
    let decimal_comma = options.decimal == b',';
    let null_values =
        NullValues::AllColumns(NA_VALUES.iter().map(|&token| token.into()).collect());
    let df = CsvReadOptions::default()
        .with_has_header(options.header.is_some())
        .with_skip_rows(options.header.unwrap_or(0))
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .map_parse_options(|parse| {
            parse
                .with_separator(separator)
                .with_decimal_comma(decimal_comma)
                .with_null_values(Some(null_values.clone()))
        })
        .into_reader_with_file_handle(Cursor::new(bytes.to_vec()))
        .finish()
        .map_err(|e| ImportError::Csv {
            filename: filename.to_string(),
            message: e.to_string(),
        })?;

    if df.width() == 0 {
        return Err(ImportError::Empty {
            filename: filename.to_string(),
        });
    }

    tracing::debug!(
        filename,
        rows = df.height(),
        columns = df.width(),
        "parsed delimited text"
    );
    Ok(df)
}
