//! Error types for table import.

use thiserror::Error;

/// Errors that can occur while turning raw bytes into a table.
#[derive(Debug, Error)]
pub enum ImportError {
    /// The file extension maps to no supported format.
    #[error("unsupported file extension '{extension}' for {filename}")]
    UnsupportedExtension { filename: String, extension: String },

    /// Text content is not valid UTF-8.
    #[error("{filename} is not valid UTF-8: {reason}")]
    Encoding { filename: String, reason: String },

    /// Polars rejected the CSV content.
    #[error("failed to parse CSV {filename}: {message}")]
    Csv { filename: String, message: String },

    /// The workbook could not be opened or read.
    #[error("failed to read spreadsheet {filename}: {message}")]
    Spreadsheet { filename: String, message: String },

    /// The requested worksheet does not exist.
    #[error("worksheet '{sheet}' not found in {filename} (available: {available})")]
    UnknownSheet {
        filename: String,
        sheet: String,
        available: String,
    },

    /// Nothing to read: empty bytes, or a header row past the end.
    #[error("{filename} contains no data")]
    Empty { filename: String },
}

impl ImportError {
    /// A short hint for resolving the error, when one exists.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            ImportError::UnsupportedExtension { .. } => {
                Some("Supported formats are .csv, .tsv, .txt, .xlsx, .xlsm, .xls and .ods")
            }
            ImportError::Encoding { .. } => Some("Re-save the file as UTF-8"),
            ImportError::Csv { .. } => Some("Check the separator, decimal mark and header row"),
            ImportError::UnknownSheet { .. } => Some("Pick one of the available sheets"),
            ImportError::Spreadsheet { .. } | ImportError::Empty { .. } => None,
        }
    }
}

/// Result type for import operations.
pub type Result<T> = std::result::Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_names_the_sheet() {
        let err = ImportError::UnknownSheet {
            filename: "book.xlsx".to_string(),
            sheet: "Data".to_string(),
            available: "Sheet1, Sheet2".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "worksheet 'Data' not found in book.xlsx (available: Sheet1, Sheet2)"
        );
        assert!(err.suggestion().is_some());
    }
}
