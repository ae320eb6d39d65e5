//! Filter engine: applies filter specs to tables.
//!
//! Each spec yields a new table: a row subset, a column subset, or a table
//! with one column rewritten. Specs run in pipeline order, so a spec that
//! targets a column dropped by an earlier spec fails with
//! [`TransformError::ColumnNotFound`].

use dz_common::{column_f64_values, column_string_values, linear_quantile, mean, median};
use dz_model::{
    ColumnKind, ComparisonOp, FilterId, FilterPipeline, FilterSpec, MissingAction, Operand,
    OutlierAction, Table,
};
use polars::prelude::*;

use crate::error::{Result, TransformError};

/// Tokens normalized to null before missing-value handling (compared
/// case-insensitively after trimming; whitespace-only counts as empty).
pub const FAKE_NULL_TOKENS: &[&str] = &["na", "n/a", "nan", "null", "none", "?", "-", "--", ""];

/// Multiplier applied to the interquartile range to get outlier bounds.
pub const IQR_MULTIPLIER: f64 = 1.5;

/// A spec skipped by [`apply_filters_reporting`].
#[derive(Debug)]
pub struct SkippedFilter {
    pub id: FilterId,
    pub spec: FilterSpec,
    pub error: TransformError,
}

/// Table produced by [`apply_filters_reporting`] plus the specs it skipped.
#[derive(Debug)]
pub struct FilterOutcome {
    pub table: Table,
    pub skipped: Vec<SkippedFilter>,
}

/// Apply every spec in order; the first failure aborts and names the spec.
pub fn apply_filters(table: &Table, pipeline: &FilterPipeline) -> Result<Table> {
    let mut current = table.clone();
    for (id, spec) in pipeline.iter() {
        current = apply_filter(&current, spec).map_err(|source| TransformError::Filter {
            id: id.clone(),
            source: Box::new(source),
        })?;
        tracing::debug!(
            id = %id,
            kind = spec.kind_name(),
            rows = current.height(),
            columns = current.width(),
            "applied filter"
        );
    }
    Ok(current)
}

/// Apply every spec in order, skipping the ones that fail.
pub fn apply_filters_reporting(table: &Table, pipeline: &FilterPipeline) -> FilterOutcome {
    let mut current = table.clone();
    let mut skipped = Vec::new();
    for (id, spec) in pipeline.iter() {
        match apply_filter(&current, spec) {
            Ok(next) => current = next,
            Err(error) => {
                tracing::warn!(id = %id, kind = spec.kind_name(), %error, "skipped filter");
                skipped.push(SkippedFilter {
                    id: id.clone(),
                    spec: spec.clone(),
                    error,
                });
            }
        }
    }
    FilterOutcome {
        table: current,
        skipped,
    }
}

/// Apply a single spec.
pub fn apply_filter(table: &Table, spec: &FilterSpec) -> Result<Table> {
    match spec {
        FilterSpec::ExactText { column, value } => {
            let needle = normalize_text(value);
            filter_text(table, column, |text| text == needle)
        }
        FilterSpec::SubstringText { column, value } => {
            let needle = normalize_text(value);
            filter_text(table, column, |text| text.contains(&needle))
        }
        FilterSpec::Comparison {
            column,
            value,
            operator,
        } => filter_comparison(table, column, value, *operator),
        FilterSpec::ColumnTypeKeep { kind } => {
            let names = table.schema().columns_of_kind(*kind);
            Ok(table.derive(table.data().select(names)?))
        }
        FilterSpec::ColumnsKeep { columns } => keep_columns(table, columns),
        FilterSpec::MissingValue { column, action } => missing_values(table, column, *action),
        FilterSpec::Outlier { column, action } => outliers(table, column, *action),
    }
}

fn require_column<'a>(table: &'a Table, column: &str) -> Result<(&'a Column, ColumnKind)> {
    match (table.data().column(column), table.kind(column)) {
        (Ok(data), Some(kind)) => Ok((data, kind)),
        _ => Err(TransformError::column_not_found(column)),
    }
}

fn normalize_text(value: &str) -> String {
    value.trim().to_lowercase()
}

fn filter_rows(table: &Table, keep: &[bool]) -> Result<Table> {
    let mask = BooleanChunked::from_slice("mask".into(), keep);
    Ok(table.derive(table.data().filter(&mask)?))
}

fn replace_column(table: &Table, column: Column) -> Result<Table> {
    let mut df = table.data().clone();
    df.with_column(column)?;
    Ok(table.derive(df))
}

fn filter_text(table: &Table, column: &str, matches: impl Fn(&str) -> bool) -> Result<Table> {
    let (data, _) = require_column(table, column)?;
    let keep: Vec<bool> = column_string_values(data)
        .iter()
        .map(|cell| {
            cell.as_deref()
                .is_some_and(|text| matches(&normalize_text(text)))
        })
        .collect();
    filter_rows(table, &keep)
}

fn filter_comparison(
    table: &Table,
    column: &str,
    operand: &Operand,
    operator: ComparisonOp,
) -> Result<Table> {
    let (data, kind) = require_column(table, column)?;
    let operation = format!("comparison {} {operand}", operator.symbol());
    let keep: Vec<bool> = match (kind, operand) {
        (ColumnKind::Numeric | ColumnKind::Boolean, _) => {
            let target = operand
                .as_f64()
                .ok_or_else(|| TransformError::unsupported(&operation, column, kind))?;
            column_f64_values(data)?
                .iter()
                .map(|cell| {
                    cell.and_then(|v| v.partial_cmp(&target))
                        .is_some_and(|ordering| operator.holds(ordering))
                })
                .collect()
        }
        (ColumnKind::Text, Operand::Text(target)) => column_string_values(data)
            .iter()
            .map(|cell| {
                cell.as_deref()
                    .is_some_and(|text| operator.holds(text.cmp(target.as_str())))
            })
            .collect(),
        _ => return Err(TransformError::unsupported(operation, column, kind)),
    };
    filter_rows(table, &keep)
}

fn keep_columns(table: &Table, columns: &[String]) -> Result<Table> {
    if columns.is_empty() {
        return Ok(table.clone());
    }
    if let Some(missing) = columns.iter().find(|name| !table.has_column(name)) {
        return Err(TransformError::column_not_found(missing));
    }
    let names: Vec<&str> = table
        .schema()
        .names()
        .filter(|name| columns.iter().any(|wanted| wanted == name))
        .collect();
    Ok(table.derive(table.data().select(names)?))
}

fn is_fake_null(text: &str) -> bool {
    let normalized = normalize_text(text);
    FAKE_NULL_TOKENS.contains(&normalized.as_str())
}

fn missing_values(table: &Table, column: &str, action: MissingAction) -> Result<Table> {
    let (data, kind) = require_column(table, column)?;
    let name = data.name().clone();

    // Normalize placeholder tokens first; every action keeps the result.
    let (table, data) = if kind == ColumnKind::Text {
        let cleaned: Vec<Option<String>> = column_string_values(data)
            .into_iter()
            .map(|cell| cell.filter(|text| !is_fake_null(text)))
            .collect();
        let table = replace_column(table, Column::new(name.clone(), cleaned))?;
        let data = table.data().column(column)?.clone();
        (table, data)
    } else {
        (table.clone(), data.clone())
    };

    let missing: Vec<bool> = match kind {
        ColumnKind::Numeric => column_f64_values(&data)?
            .iter()
            .map(Option::is_none)
            .collect(),
        _ => column_string_values(&data)
            .iter()
            .map(Option::is_none)
            .collect(),
    };
    if !missing.contains(&true) {
        return Ok(table);
    }

    match (action, kind) {
        (MissingAction::Drop, _) => {
            let keep: Vec<bool> = missing.iter().map(|m| !m).collect();
            filter_rows(&table, &keep)
        }
        (MissingAction::Mean | MissingAction::Median, ColumnKind::Numeric) => {
            let values = column_f64_values(&data)?;
            let present: Vec<f64> = values.iter().flatten().copied().collect();
            let fill = match action {
                MissingAction::Mean => mean(&present),
                _ => median(&present),
            };
            let Some(fill) = fill else {
                return Ok(table);
            };
            let filled: Vec<Option<f64>> = values.iter().map(|v| Some(v.unwrap_or(fill))).collect();
            replace_column(&table, Column::new(name, filled))
        }
        (MissingAction::Mean | MissingAction::Median, _)
        | (MissingAction::Zero, ColumnKind::Other) => Ok(table),
        (MissingAction::Zero, ColumnKind::Numeric) => {
            let filled = if data.dtype().is_float() {
                let values: Vec<Option<f64>> = column_f64_values(&data)?
                    .iter()
                    .map(|v| Some(v.unwrap_or(0.0)))
                    .collect();
                Column::new(name, values)
            } else {
                let ints = data.cast(&DataType::Int64)?;
                let values: Vec<Option<i64>> = ints
                    .as_materialized_series()
                    .i64()?
                    .into_iter()
                    .map(|v| Some(v.unwrap_or(0)))
                    .collect();
                Column::new(name, values)
            };
            replace_column(&table, filled)
        }
        (MissingAction::Zero, ColumnKind::Text) => {
            let values: Vec<Option<String>> = column_string_values(&data)
                .into_iter()
                .map(|v| Some(v.unwrap_or_else(|| "0".to_string())))
                .collect();
            replace_column(&table, Column::new(name, values))
        }
        (MissingAction::Zero, ColumnKind::Boolean) => {
            let values: Vec<Option<bool>> = data
                .as_materialized_series()
                .bool()?
                .into_iter()
                .map(|v| Some(v.unwrap_or(false)))
                .collect();
            replace_column(&table, Column::new(name, values))
        }
    }
}

/// Inclusive `[Q1 - 1.5 IQR, Q3 + 1.5 IQR]` bounds of the present values.
pub fn outlier_bounds(values: &[f64]) -> Option<(f64, f64)> {
    let q1 = linear_quantile(values, 0.25)?;
    let q3 = linear_quantile(values, 0.75)?;
    let iqr = q3 - q1;
    Some((q1 - IQR_MULTIPLIER * iqr, q3 + IQR_MULTIPLIER * iqr))
}

fn outliers(table: &Table, column: &str, action: OutlierAction) -> Result<Table> {
    let (data, kind) = require_column(table, column)?;
    if kind != ColumnKind::Numeric {
        return Err(TransformError::unsupported("outlier treatment", column, kind));
    }

    let values = column_f64_values(data)?;
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    let Some((lower, upper)) = outlier_bounds(&present) else {
        return Ok(table.clone());
    };
    let is_outlier = |v: f64| v < lower || v > upper;
    if !present.iter().any(|v| is_outlier(*v)) {
        return Ok(table.clone());
    }

    let name = data.name().clone();
    match action {
        OutlierAction::Drop => {
            let keep: Vec<bool> = values
                .iter()
                .map(|v| !v.is_some_and(is_outlier))
                .collect();
            filter_rows(table, &keep)
        }
        OutlierAction::Median => {
            let Some(center) = median(&present) else {
                return Ok(table.clone());
            };
            let replaced: Vec<Option<f64>> = values
                .iter()
                .map(|v| v.map(|v| if is_outlier(v) { center } else { v }))
                .collect();
            replace_column(table, Column::new(name, replaced))
        }
        OutlierAction::Winsorize => {
            let clamped: Vec<Option<f64>> = values
                .iter()
                .map(|v| v.map(|v| v.clamp(lower, upper)))
                .collect();
            replace_column(table, Column::new(name, clamped))
        }
    }
}
