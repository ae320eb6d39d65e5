//! Table-level counts.

use dz_common::column_f64_values;
use dz_model::{ColumnKind, Table};
use serde::Serialize;

use crate::error::Result;

/// Headline counts of a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TableCounts {
    pub rows: usize,
    pub quantitative: usize,
    pub qualitative: usize,
    pub missing: usize,
}

pub fn count_rows(table: &Table) -> usize {
    table.height()
}

/// Numeric columns; zero for a table without rows.
pub fn count_quantitative(table: &Table) -> usize {
    if table.height() == 0 {
        return 0;
    }
    table.schema().count_of_kind(ColumnKind::Numeric)
}

/// Text columns; zero for a table without rows.
pub fn count_qualitative(table: &Table) -> usize {
    if table.height() == 0 {
        return 0;
    }
    table.schema().count_of_kind(ColumnKind::Text)
}

/// Null cells across all columns; NaN counts as missing.
pub fn count_missing(table: &Table) -> Result<usize> {
    let mut missing = 0;
    for (name, kind) in table.schema().iter() {
        let column = table.data().column(name)?;
        missing += match kind {
            ColumnKind::Numeric => column_f64_values(column)?
                .iter()
                .filter(|v| v.is_none())
                .count(),
            _ => column.null_count(),
        };
    }
    Ok(missing)
}

pub fn summarize(table: &Table) -> Result<TableCounts> {
    Ok(TableCounts {
        rows: count_rows(table),
        quantitative: count_quantitative(table),
        qualitative: count_qualitative(table),
        missing: count_missing(table)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{Column, DataFrame};

    #[test]
    fn empty_table_counts_zero() {
        let counts = summarize(&Table::default()).unwrap();
        assert_eq!(
            counts,
            TableCounts {
                rows: 0,
                quantitative: 0,
                qualitative: 0,
                missing: 0
            }
        );
    }

    #[test]
    fn zero_rows_hide_column_kinds() {
        let empty: [i64; 0] = [];
        let table = Table::new(DataFrame::new(vec![Column::new("x".into(), empty)]).unwrap());
        assert_eq!(count_quantitative(&table), 0);
    }

    #[test]
    fn nan_counts_as_missing() {
        let table = Table::new(
            DataFrame::new(vec![
                Column::new("x".into(), [Some(1.0f64), None, Some(f64::NAN)]),
                Column::new("s".into(), [Some("a"), None, None]),
            ])
            .unwrap(),
        );
        assert_eq!(count_missing(&table).unwrap(), 4);
    }
}
