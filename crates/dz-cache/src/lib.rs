//! Content-addressed table cache.
//!
//! Imported tables are stored under the SHA-256 digest of the raw bytes
//! they were parsed from, so importing identical bytes twice lands on the
//! same entry. Combined tables are stored under generated keys.
//!
//! The cache is an explicit service object: create one [`TableCache`] and
//! share it (usually as `Arc<TableCache>`) with everything that needs it.

mod cache;
mod error;
pub mod names;

pub use cache::{CacheEntry, EntrySummary, TableCache};
pub use error::{CacheError, Result};
pub use names::{combined_name, display_name};
