//! Sort engine.
//!
//! Numeric and boolean columns sort by value, everything else by text.
//! Multi-column sorts are a single stable pass where earlier directives are
//! the primary keys. Nulls go last in both directions.

use std::cmp::Ordering;

use dz_common::{column_f64_values, column_string_values};
use dz_model::{SortDirection, SortPipeline, Table};
use polars::prelude::*;

use crate::error::{Result, TransformError};

enum SortValues {
    Numeric(Vec<Option<f64>>),
    Lexical(Vec<Option<String>>),
}

struct SortKey {
    values: SortValues,
    direction: SortDirection,
}

impl SortKey {
    fn compare(&self, a: usize, b: usize) -> Ordering {
        let directed = |ordering: Ordering| match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        match &self.values {
            SortValues::Numeric(values) => match (values[a], values[b]) {
                (Some(x), Some(y)) => directed(x.total_cmp(&y)),
                (x, y) => null_order(x.is_none(), y.is_none()),
            },
            SortValues::Lexical(values) => match (&values[a], &values[b]) {
                (Some(x), Some(y)) => directed(x.cmp(y)),
                (x, y) => null_order(x.is_none(), y.is_none()),
            },
        }
    }
}

/// Ordering when at least one side is null: nulls after values.
fn null_order(a_null: bool, b_null: bool) -> Ordering {
    match (a_null, b_null) {
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        _ => Ordering::Equal,
    }
}

fn sort_by_keys(table: &Table, keys: &[SortKey]) -> Result<Table> {
    if keys.is_empty() {
        return Ok(table.clone());
    }
    let mut order: Vec<IdxSize> = (0..table.height() as IdxSize).collect();
    order.sort_by(|&a, &b| {
        keys.iter()
            .map(|key| key.compare(a as usize, b as usize))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });
    let indices = IdxCa::from_vec("order".into(), order);
    Ok(table.derive(table.data().take(&indices)?))
}

fn numeric_key(table: &Table, column: &str, direction: SortDirection) -> Result<SortKey> {
    let data = table
        .data()
        .column(column)
        .map_err(|_| TransformError::column_not_found(column))?;
    Ok(SortKey {
        values: SortValues::Numeric(column_f64_values(data)?),
        direction,
    })
}

fn lexical_key(table: &Table, column: &str, direction: SortDirection) -> Result<SortKey> {
    let data = table
        .data()
        .column(column)
        .map_err(|_| TransformError::column_not_found(column))?;
    Ok(SortKey {
        values: SortValues::Lexical(column_string_values(data)),
        direction,
    })
}

/// Sort by one column comparing values as numbers. Text that does not
/// parse as a number sorts with the nulls.
pub fn sort_numeric(table: &Table, column: &str, direction: SortDirection) -> Result<Table> {
    sort_by_keys(table, &[numeric_key(table, column, direction)?])
}

/// Sort by one column comparing rendered text.
pub fn sort_lexical(table: &Table, column: &str, direction: SortDirection) -> Result<Table> {
    sort_by_keys(table, &[lexical_key(table, column, direction)?])
}

/// Apply a sort pipeline. Directives on columns absent from the table are
/// skipped.
pub fn apply_sort(table: &Table, pipeline: &SortPipeline) -> Result<Table> {
    let mut keys = Vec::with_capacity(pipeline.len());
    for spec in pipeline.iter() {
        let Some(kind) = table.kind(&spec.column) else {
            tracing::warn!(column = %spec.column, "skipped sort on missing column");
            continue;
        };
        let key = if kind.is_orderable_by_value() {
            numeric_key(table, &spec.column, spec.direction)?
        } else {
            lexical_key(table, &spec.column, spec.direction)?
        };
        keys.push(key);
    }
    let sorted = sort_by_keys(table, &keys)?;
    tracing::debug!(keys = keys.len(), rows = sorted.height(), "applied sort");
    Ok(sorted)
}
