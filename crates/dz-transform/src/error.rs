//! Error types for the transformation engines.

use dz_model::{ColumnKind, FilterId};
use thiserror::Error;

/// Errors raised while filtering, sorting or combining tables.
#[derive(Debug, Error)]
pub enum TransformError {
    /// A named column does not exist in the table.
    #[error("column '{column}' not found")]
    ColumnNotFound { column: String },

    /// The operation does not apply to the column's kind.
    #[error("cannot apply {operation} to {kind} column '{column}'")]
    UnsupportedOperation {
        operation: String,
        column: String,
        kind: &'static str,
    },

    /// Concat operands have incompatible shapes.
    #[error("shape mismatch: {message}")]
    ShapeMismatch { message: String },

    /// A required operand is missing or invalid.
    #[error("invalid request: {message}")]
    Validation { message: String },

    /// A filter in a pipeline failed.
    #[error("filter {id} failed: {source}")]
    Filter {
        id: FilterId,
        #[source]
        source: Box<TransformError>,
    },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl TransformError {
    pub(crate) fn unsupported(operation: impl Into<String>, column: &str, kind: ColumnKind) -> Self {
        Self::UnsupportedOperation {
            operation: operation.into(),
            column: column.to_string(),
            kind: kind.as_str(),
        }
    }

    pub(crate) fn column_not_found(column: &str) -> Self {
        Self::ColumnNotFound {
            column: column.to_string(),
        }
    }
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for transformation operations.
pub type Result<T> = std::result::Result<T, TransformError>;
