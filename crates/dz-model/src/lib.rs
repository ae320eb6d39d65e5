//! Data model for the DataZen transformation engine.
//!
//! Tables carry a per-column kind computed once when they are built. Views
//! describe "which cached table, filtered how, sorted how" as plain values
//! that are replaced, never mutated, on every edit.

pub mod filter;
pub mod key;
pub mod sort;
pub mod table;
pub mod view;

pub use filter::{
    ComparisonOp, FilterId, FilterPipeline, FilterSpec, MissingAction, Operand, OutlierAction,
};
pub use key::{CacheKey, sha256_hex};
pub use sort::{SortDirection, SortPipeline, SortSpec};
pub use table::{ColumnKind, Table, TableSchema};
pub use view::{ActiveView, ViewEdit, ViewPipeline};
