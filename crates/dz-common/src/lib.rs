//! Shared utilities for DataZen crates.
//!
//! This crate provides common utilities used across the DataZen workspace:
//! Polars `AnyValue` helpers and the small descriptive-statistics kernels
//! shared by the filter and summary engines.

pub mod polars;
pub mod stats;

// Re-export commonly used functions at crate root for convenience
pub use self::polars::{
    any_to_f64, any_to_json, any_to_string, column_f64_values, column_string_values,
    format_numeric, parse_f64,
};
pub use stats::{complete_pairs, linear_quantile, mean, median, pearson, round_to, sample_std};
