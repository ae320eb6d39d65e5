use thiserror::Error;

/// Errors raised by summary computations.
#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("column '{column}' not found")]
    ColumnNotFound { column: String },

    #[error("column '{column}' is {kind}, expected numeric")]
    NotNumeric { column: String, kind: &'static str },

    #[error("not enough data: {message}")]
    InsufficientData { message: String },

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for SummaryError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SummaryError>;
