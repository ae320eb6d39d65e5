//! Transformation engines for DataZen tables.
//!
//! - **Filters**: [`apply_filters`] runs a [`FilterPipeline`](dz_model::FilterPipeline)
//!   in insertion order; [`apply_filters_reporting`] skips failing specs
//!   and reports them instead.
//! - **Sort**: [`apply_sort`] runs a [`SortPipeline`](dz_model::SortPipeline)
//!   as one stable multi-key sort.
//! - **Combine**: [`concat`] and [`merge`] build a new table from two.
//!
//! Every function takes tables by reference and returns a new table.

mod combine;
mod error;
mod filters;
mod sort;

pub use combine::{Axis, COLLISION_SUFFIX, JoinKind, concat, merge};
pub use error::{Result, TransformError};
pub use filters::{
    FAKE_NULL_TOKENS, FilterOutcome, IQR_MULTIPLIER, SkippedFilter, apply_filter, apply_filters,
    apply_filters_reporting, outlier_bounds,
};
pub use sort::{apply_sort, sort_lexical, sort_numeric};
