//! Pearson correlation between numeric columns.

use dz_common::{column_f64_values, complete_pairs, pearson, round_to};
use dz_model::{ColumnKind, Table};
use polars::prelude::{Column, DataFrame};
use serde::Serialize;

use crate::error::Result;

/// Decimal places kept in correlation coefficients.
pub const CORRELATION_DECIMALS: u32 = 3;

/// Square matrix of pairwise-complete Pearson coefficients.
///
/// `None` marks pairs without enough variation or overlap.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        self.values[i][j]
    }

    /// Matrix as a table: a `column` label column, then one column per
    /// numeric column.
    pub fn to_table(&self) -> Result<Table> {
        let mut columns = Vec::with_capacity(self.columns.len() + 1);
        columns.push(Column::new("column".into(), self.columns.clone()));
        for (j, name) in self.columns.iter().enumerate() {
            let values: Vec<Option<f64>> = self.values.iter().map(|row| row[j]).collect();
            columns.push(Column::new(name.as_str().into(), values));
        }
        Ok(Table::new(DataFrame::new(columns)?))
    }
}

pub fn correlation_matrix(table: &Table) -> Result<CorrelationMatrix> {
    let columns: Vec<String> = table
        .schema()
        .columns_of_kind(ColumnKind::Numeric)
        .into_iter()
        .map(str::to_string)
        .collect();
    let series = columns
        .iter()
        .map(|name| column_f64_values(table.data().column(name)?))
        .collect::<polars::prelude::PolarsResult<Vec<_>>>()?;

    let values = series
        .iter()
        .map(|xs| {
            series
                .iter()
                .map(|ys| {
                    let (xs, ys) = complete_pairs(xs, ys);
                    pearson(&xs, &ys).map(|r| round_to(r, CORRELATION_DECIMALS))
                })
                .collect()
        })
        .collect();
    tracing::debug!(columns = columns.len(), "computed correlation matrix");
    Ok(CorrelationMatrix { columns, values })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correlates_numeric_columns_only() {
        let table = Table::new(
            DataFrame::new(vec![
                Column::new("x".into(), [1i64, 2, 3, 4]),
                Column::new("y".into(), [2.0f64, 4.1, 5.9, 8.0]),
                Column::new("z".into(), [4i64, 3, 2, 1]),
                Column::new("label".into(), ["a", "b", "c", "d"]),
            ])
            .unwrap(),
        );
        let matrix = correlation_matrix(&table).unwrap();
        assert_eq!(matrix.columns, vec!["x", "y", "z"]);
        assert_eq!(matrix.get("x", "x"), Some(1.0));
        assert_eq!(matrix.get("x", "z"), Some(-1.0));
        assert_eq!(matrix.get("x", "y"), matrix.get("y", "x"));
        assert_eq!(matrix.get("x", "label"), None);

        let rendered = matrix.to_table().unwrap();
        assert_eq!(rendered.column_names(), vec!["column", "x", "y", "z"]);
        assert_eq!(rendered.height(), 3);
    }

    #[test]
    fn constant_columns_have_no_coefficient() {
        let table = Table::new(
            DataFrame::new(vec![
                Column::new("x".into(), [1i64, 2, 3]),
                Column::new("c".into(), [5i64, 5, 5]),
            ])
            .unwrap(),
        );
        let matrix = correlation_matrix(&table).unwrap();
        assert_eq!(matrix.get("x", "c"), None);
    }

    #[test]
    fn empty_table_gives_empty_matrix() {
        assert!(correlation_matrix(&Table::default()).unwrap().is_empty());
    }
}
