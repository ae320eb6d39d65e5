//! Error types for workspace operations.

use dz_cache::CacheError;
use dz_ingest::ImportError;
use dz_summary::SummaryError;
use dz_transform::TransformError;
use thiserror::Error;

/// Errors surfaced by [`Workspace`](crate::Workspace) operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Summary(#[from] SummaryError),

    #[error("failed to write CSV: {message}")]
    Export { message: String },
}

impl CoreError {
    /// Whether the caller should ask for the file to be imported again.
    pub fn is_cache_miss(&self) -> bool {
        matches!(self, CoreError::Cache(CacheError::Miss { .. }))
    }

    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            CoreError::Cache(err) => err.user_message(),
            CoreError::Import(err) => match err.suggestion() {
                Some(hint) => format!("{err}. {hint}."),
                None => err.to_string(),
            },
            other => other.to_string(),
        }
    }
}

impl From<polars::prelude::PolarsError> for CoreError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::Export {
            message: err.to_string(),
        }
    }
}

/// Result type for workspace operations.
pub type Result<T> = std::result::Result<T, CoreError>;
