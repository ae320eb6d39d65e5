//! Cache error types.

use dz_model::CacheKey;
use thiserror::Error;

/// Cache operation error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// No entry under the key: never stored, or removed since.
    #[error("no cached table for key {key}")]
    Miss { key: CacheKey },
}

impl CacheError {
    /// Get a user-friendly message for this error.
    pub fn user_message(&self) -> String {
        match self {
            Self::Miss { .. } => {
                "This dataset is no longer available. Please import the file again.".to_string()
            }
        }
    }
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;
