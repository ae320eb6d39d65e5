//! Format parameters for import.

use std::path::Path;
use std::str::FromStr;

use crate::error::{ImportError, Result};

/// Which worksheet of a workbook to read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetSelector {
    Index(usize),
    Name(String),
}

impl Default for SheetSelector {
    fn default() -> Self {
        SheetSelector::Index(0)
    }
}

impl FromStr for SheetSelector {
    type Err = std::convert::Infallible;

    /// All-digit input selects by position, anything else by name.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.parse::<usize>() {
            Ok(index) => SheetSelector::Index(index),
            Err(_) => SheetSelector::Name(trimmed.to_string()),
        })
    }
}

/// Cell texts read as missing values, matched exactly.
pub const NA_VALUES: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Whether `text` is one of [`NA_VALUES`].
pub fn is_na_value(text: &str) -> bool {
    NA_VALUES.contains(&text)
}

/// Parameters controlling how raw bytes are decoded into a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    /// Field separator for delimited text.
    pub delimiter: u8,
    /// Decimal mark, `.` or `,`.
    pub decimal: u8,
    /// Zero-based header row; `None` means the data has no header.
    pub header: Option<usize>,
    /// Worksheet to read from workbooks.
    pub sheet: SheetSelector,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            decimal: b'.',
            header: Some(0),
            sheet: SheetSelector::default(),
        }
    }
}

/// Source format, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Delimited,
    Spreadsheet,
}

impl SourceFormat {
    pub fn from_filename(filename: &str) -> Result<Self> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match extension.as_str() {
            "csv" | "tsv" | "txt" => Ok(SourceFormat::Delimited),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(SourceFormat::Spreadsheet),
            _ => Err(ImportError::UnsupportedExtension {
                filename: filename.to_string(),
                extension,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn na_values_are_case_sensitive() {
        assert!(is_na_value("NA"));
        assert!(is_na_value("#N/A"));
        assert!(!is_na_value("Na"));
        assert!(!is_na_value("NA "));
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            SourceFormat::from_filename("data.CSV").unwrap(),
            SourceFormat::Delimited
        );
        assert_eq!(
            SourceFormat::from_filename("book.xlsx").unwrap(),
            SourceFormat::Spreadsheet
        );
        assert!(matches!(
            SourceFormat::from_filename("notes.pdf"),
            Err(ImportError::UnsupportedExtension { extension, .. }) if extension == "pdf"
        ));
        assert!(SourceFormat::from_filename("noext").is_err());
    }

    #[test]
    fn sheet_selector_parses_index_or_name() {
        assert_eq!("2".parse::<SheetSelector>(), Ok(SheetSelector::Index(2)));
        assert_eq!(
            "Results".parse::<SheetSelector>(),
            Ok(SheetSelector::Name("Results".to_string()))
        );
    }
}
