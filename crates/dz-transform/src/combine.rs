//! Combine engine: concatenation and relational merge of two tables.

use std::collections::{HashMap, HashSet};

use dz_common::{column_f64_values, column_string_values, format_numeric};
use dz_model::{ColumnKind, Table};
use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TransformError};

/// Suffix given to right-hand columns whose name is already taken.
pub const COLLISION_SUFFIX: &str = "_right";

/// Direction of a concatenation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    /// Stack rows; both tables need the same column set.
    Rows,
    /// Place columns side by side; both tables need the same row count.
    Columns,
}

/// SQL-style join kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Outer,
}

/// Concatenate `other` onto `main`.
pub fn concat(main: &Table, other: &Table, axis: Axis) -> Result<Table> {
    let combined = match axis {
        Axis::Rows => concat_rows(main, other)?,
        Axis::Columns => concat_columns(main, other)?,
    };
    tracing::info!(
        ?axis,
        rows = combined.height(),
        columns = combined.width(),
        "concatenated tables"
    );
    Ok(combined)
}

fn concat_rows(main: &Table, other: &Table) -> Result<Table> {
    let main_names: HashSet<&str> = main.schema().names().collect();
    let other_names: HashSet<&str> = other.schema().names().collect();
    if main_names != other_names {
        return Err(TransformError::ShapeMismatch {
            message: format!(
                "row concatenation needs the same columns, got [{}] and [{}]",
                main.column_names().join(", "),
                other.column_names().join(", ")
            ),
        });
    }

    let mut top = Vec::with_capacity(main.width());
    let mut bottom = Vec::with_capacity(main.width());
    for (name, kind) in main.schema().iter() {
        let upper = main.data().column(name)?;
        let lower = other.data().column(name)?;
        if upper.dtype() == lower.dtype() {
            top.push(upper.clone());
            bottom.push(lower.clone());
            continue;
        }
        let target = if kind == ColumnKind::Numeric && other.kind(name) == Some(ColumnKind::Numeric)
        {
            DataType::Float64
        } else {
            DataType::String
        };
        top.push(upper.cast(&target)?);
        bottom.push(lower.cast(&target)?);
    }

    let stacked = DataFrame::new(top)?.vstack(&DataFrame::new(bottom)?)?;
    Ok(Table::new(stacked))
}

/// Right-hand column names made unique against `taken`.
fn unique_names(taken: &[String], incoming: &[String]) -> Vec<String> {
    let mut used: HashSet<String> = taken.iter().cloned().collect();
    incoming
        .iter()
        .map(|name| {
            let mut candidate = name.clone();
            while used.contains(&candidate) {
                candidate.push_str(COLLISION_SUFFIX);
            }
            used.insert(candidate.clone());
            candidate
        })
        .collect()
}

fn renamed_columns(main: &Table, other: &DataFrame) -> Vec<Column> {
    let incoming: Vec<String> = other
        .get_column_names_str()
        .into_iter()
        .map(str::to_string)
        .collect();
    unique_names(&main.column_names(), &incoming)
        .into_iter()
        .zip(other.get_columns())
        .map(|(name, column)| column.clone().with_name(name.into()))
        .collect()
}

fn concat_columns(main: &Table, other: &Table) -> Result<Table> {
    if main.height() != other.height() {
        return Err(TransformError::ShapeMismatch {
            message: format!(
                "column concatenation needs equal row counts, got {} and {}",
                main.height(),
                other.height()
            ),
        });
    }
    let joined = main.data().hstack(&renamed_columns(main, other.data()))?;
    Ok(Table::new(joined))
}

/// Join keys rendered so that equal values compare equal across tables.
fn join_keys(table: &Table, column: &str, numeric: bool) -> Result<Vec<Option<String>>> {
    let data = table.data().column(column)?;
    if numeric {
        Ok(column_f64_values(data)?
            .into_iter()
            .map(|v| v.map(format_numeric))
            .collect())
    } else {
        Ok(column_string_values(data))
    }
}

fn key_kind(table: &Table, column: &str, side: &str) -> Result<ColumnKind> {
    if column.trim().is_empty() {
        return Err(TransformError::Validation {
            message: format!("merge needs a {side} key column"),
        });
    }
    table.kind(column).ok_or_else(|| TransformError::Validation {
        message: format!("{side} key column '{column}' not found"),
    })
}

fn index_by_key(keys: &[Option<String>]) -> HashMap<&str, Vec<usize>> {
    let mut index: HashMap<&str, Vec<usize>> = HashMap::new();
    for (row, key) in keys.iter().enumerate() {
        if let Some(key) = key {
            index.entry(key.as_str()).or_default().push(row);
        }
    }
    index
}

/// Row pairs `(main row, other row)` of the join, `None` for the unmatched side.
fn join_pairs(
    left: &[Option<String>],
    right: &[Option<String>],
    how: JoinKind,
) -> Vec<(Option<usize>, Option<usize>)> {
    let mut pairs = Vec::new();
    match how {
        JoinKind::Right => {
            let by_left = index_by_key(left);
            for (j, key) in right.iter().enumerate() {
                match key.as_deref().and_then(|k| by_left.get(k)) {
                    Some(rows) => pairs.extend(rows.iter().map(|&i| (Some(i), Some(j)))),
                    None => pairs.push((None, Some(j))),
                }
            }
        }
        JoinKind::Inner | JoinKind::Left | JoinKind::Outer => {
            let by_right = index_by_key(right);
            let mut matched_right = vec![false; right.len()];
            for (i, key) in left.iter().enumerate() {
                match key.as_deref().and_then(|k| by_right.get(k)) {
                    Some(rows) => {
                        for &j in rows {
                            matched_right[j] = true;
                            pairs.push((Some(i), Some(j)));
                        }
                    }
                    None if how != JoinKind::Inner => pairs.push((Some(i), None)),
                    None => {}
                }
            }
            if how == JoinKind::Outer {
                pairs.extend(
                    matched_right
                        .iter()
                        .enumerate()
                        .filter(|(_, matched)| !**matched)
                        .map(|(j, _)| (None, Some(j))),
                );
            }
        }
    }
    pairs
}

fn gather(df: &DataFrame, rows: impl Iterator<Item = Option<usize>>) -> Result<DataFrame> {
    let indices: IdxCa = rows.map(|row| row.map(|r| r as IdxSize)).collect();
    Ok(df.take(&indices)?)
}

/// Relational join of `main` and `other` on `main[left_key] == other[right_key]`.
///
/// Both key columns are kept. Null keys never match. Row order follows
/// `main` for inner and left joins, `other` for right joins, and `main`
/// then unmatched `other` rows for outer joins.
pub fn merge(
    main: &Table,
    other: &Table,
    left_key: &str,
    right_key: &str,
    how: JoinKind,
) -> Result<Table> {
    let left_kind = key_kind(main, left_key, "left")?;
    let right_kind = key_kind(other, right_key, "right")?;
    let numeric = left_kind == ColumnKind::Numeric && right_kind == ColumnKind::Numeric;
    if left_kind != right_kind {
        return Err(TransformError::UnsupportedOperation {
            operation: format!("merge with {} key '{right_key}'", right_kind.as_str()),
            column: left_key.to_string(),
            kind: left_kind.as_str(),
        });
    }

    let left = join_keys(main, left_key, numeric)?;
    let right = join_keys(other, right_key, numeric)?;
    let pairs = join_pairs(&left, &right, how);

    let left_rows = gather(main.data(), pairs.iter().map(|(i, _)| *i))?;
    let right_rows = gather(other.data(), pairs.iter().map(|(_, j)| *j))?;
    let merged = left_rows.hstack(&renamed_columns(main, &right_rows))?;

    tracing::info!(
        left_key,
        right_key,
        ?how,
        rows = merged.height(),
        columns = merged.width(),
        "merged tables"
    );
    Ok(Table::new(merged))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: Vec<Column>) -> Table {
        Table::new(DataFrame::new(columns).unwrap())
    }

    #[test]
    fn unique_names_suffix_collisions() {
        let taken = vec!["a".to_string(), "a_right".to_string()];
        let incoming = vec!["a".to_string(), "b".to_string()];
        assert_eq!(unique_names(&taken, &incoming), vec!["a_right_right", "b"]);
    }

    #[test]
    fn join_pairs_orders() {
        let key = |v: &str| Some(v.to_string());
        let left = vec![key("1"), key("2"), None];
        let right = vec![key("3"), key("2"), None];
        assert_eq!(
            join_pairs(&left, &right, JoinKind::Inner),
            vec![(Some(1), Some(1))]
        );
        assert_eq!(
            join_pairs(&left, &right, JoinKind::Left),
            vec![(Some(0), None), (Some(1), Some(1)), (Some(2), None)]
        );
        assert_eq!(
            join_pairs(&left, &right, JoinKind::Right),
            vec![(None, Some(0)), (Some(1), Some(1)), (None, Some(2))]
        );
        assert_eq!(
            join_pairs(&left, &right, JoinKind::Outer),
            vec![
                (Some(0), None),
                (Some(1), Some(1)),
                (Some(2), None),
                (None, Some(0)),
                (None, Some(2))
            ]
        );
    }

    #[test]
    fn row_concat_aligns_column_order() {
        let main = table(vec![
            Column::new("A".into(), [1i64]),
            Column::new("B".into(), ["x"]),
        ]);
        let other = table(vec![
            Column::new("B".into(), ["y"]),
            Column::new("A".into(), [2.5f64]),
        ]);
        let out = concat(&main, &other, Axis::Rows).unwrap();
        assert_eq!(out.column_names(), vec!["A", "B"]);
        assert_eq!(out.height(), 2);
        assert_eq!(out.data().column("A").unwrap().dtype(), &DataType::Float64);
    }

    #[test]
    fn column_concat_renames_collisions() {
        let main = table(vec![Column::new("A".into(), [1i64, 2])]);
        let other = table(vec![Column::new("A".into(), [3i64, 4])]);
        let out = concat(&main, &other, Axis::Columns).unwrap();
        assert_eq!(out.column_names(), vec!["A", "A_right"]);
    }

    #[test]
    fn merge_requires_key_columns() {
        let main = table(vec![Column::new("A".into(), [1i64])]);
        let other = table(vec![Column::new("C".into(), [1i64])]);
        let err = merge(&main, &other, "A", "", JoinKind::Inner).unwrap_err();
        assert!(matches!(err, TransformError::Validation { .. }));
        let err = merge(&main, &other, "Z", "C", JoinKind::Inner).unwrap_err();
        assert!(err.to_string().contains("'Z'"));
    }

    #[test]
    fn merge_matches_integers_against_floats() {
        let main = table(vec![Column::new("A".into(), [1i64, 2])]);
        let other = table(vec![
            Column::new("C".into(), [2.0f64, 1.0]),
            Column::new("D".into(), ["two", "one"]),
        ]);
        let out = merge(&main, &other, "A", "C", JoinKind::Inner).unwrap();
        assert_eq!(out.height(), 2);
        assert_eq!(
            column_string_values(out.data().column("D").unwrap()),
            vec![Some("one".to_string()), Some("two".to_string())]
        );
    }

    #[test]
    fn merge_rejects_mismatched_key_kinds() {
        let main = table(vec![Column::new("A".into(), [1i64])]);
        let other = table(vec![Column::new("C".into(), ["1"])]);
        let err = merge(&main, &other, "A", "C", JoinKind::Inner).unwrap_err();
        assert!(matches!(err, TransformError::UnsupportedOperation { .. }));
    }
}
