//! Summary engine for DataZen tables.
//!
//! Stateless functions over an (often already filtered) table. Every
//! function tolerates an empty table and returns zero or empty results for it.

mod correlation;
mod counts;
mod describe;
mod error;
mod regression;

pub use correlation::{CORRELATION_DECIMALS, CorrelationMatrix, correlation_matrix};
pub use counts::{
    TableCounts, count_missing, count_qualitative, count_quantitative, count_rows, summarize,
};
pub use describe::{
    ColumnDescription, DESCRIBE_DECIMALS, FrequencyRow, MISSING_LABEL, describe_column,
    frequency_table,
};
pub use error::{Result, SummaryError};
pub use regression::{LinearFit, linear_fit};
