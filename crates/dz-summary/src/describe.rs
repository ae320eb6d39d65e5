//! Per-column descriptions: numeric statistics and categorical frequencies.

use std::collections::HashMap;

use dz_common::{
    column_f64_values, column_string_values, linear_quantile, mean, round_to, sample_std,
};
use dz_model::{ColumnKind, Table};
use polars::prelude::Column;
use serde::Serialize;

use crate::error::{Result, SummaryError};

/// Label given to missing and empty values in frequency tables.
pub const MISSING_LABEL: &str = "NA";

/// Decimals kept when a description is shown.
pub const DESCRIBE_DECIMALS: u32 = 3;

/// Descriptive statistics of a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnDescription {
    pub column: String,
    pub count: usize,
    pub mean: Option<f64>,
    pub std: Option<f64>,
    pub min: Option<f64>,
    #[serde(rename = "25%")]
    pub q1: Option<f64>,
    #[serde(rename = "50%")]
    pub median: Option<f64>,
    #[serde(rename = "75%")]
    pub q3: Option<f64>,
    pub max: Option<f64>,
    pub missing: usize,
}

/// One distinct value of a categorical column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequencyRow {
    pub value: String,
    pub count: usize,
    /// Share of rows, in percent, rounded to two decimals.
    pub percentage: f64,
}

impl ColumnDescription {
    /// Copy with every statistic rounded to `decimals` places.
    pub fn rounded(&self, decimals: u32) -> Self {
        let round = |value: Option<f64>| value.map(|v| round_to(v, decimals));
        Self {
            column: self.column.clone(),
            count: self.count,
            mean: round(self.mean),
            std: round(self.std),
            min: round(self.min),
            q1: round(self.q1),
            median: round(self.median),
            q3: round(self.q3),
            max: round(self.max),
            missing: self.missing,
        }
    }
}

fn column<'a>(table: &'a Table, name: &str) -> Result<(&'a Column, ColumnKind)> {
    match (table.data().column(name), table.kind(name)) {
        (Ok(column), Some(kind)) => Ok((column, kind)),
        _ => Err(SummaryError::ColumnNotFound {
            column: name.to_string(),
        }),
    }
}

/// Count, mean, sample std, min, quartiles, max and null count.
pub fn describe_column(table: &Table, name: &str) -> Result<ColumnDescription> {
    let (data, kind) = column(table, name)?;
    if kind != ColumnKind::Numeric {
        return Err(SummaryError::NotNumeric {
            column: name.to_string(),
            kind: kind.as_str(),
        });
    }
    let values = column_f64_values(data)?;
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    Ok(ColumnDescription {
        column: name.to_string(),
        count: present.len(),
        mean: mean(&present),
        std: sample_std(&present),
        min: present.iter().copied().reduce(f64::min),
        q1: linear_quantile(&present, 0.25),
        median: linear_quantile(&present, 0.5),
        q3: linear_quantile(&present, 0.75),
        max: present.iter().copied().reduce(f64::max),
        missing: values.len() - present.len(),
    })
}

/// Value counts with nulls and empty strings folded into [`MISSING_LABEL`],
/// most frequent first, ties in order of first appearance.
pub fn frequency_table(table: &Table, name: &str) -> Result<Vec<FrequencyRow>> {
    let (data, _) = column(table, name)?;
    let cells = column_string_values(data);
    let total = cells.len();

    let mut order: Vec<String> = Vec::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    for cell in cells {
        let value = match cell {
            Some(text) if !text.is_empty() => text,
            _ => MISSING_LABEL.to_string(),
        };
        let count = counts.entry(value.clone()).or_insert(0);
        if *count == 0 {
            order.push(value);
        }
        *count += 1;
    }

    let mut rows: Vec<FrequencyRow> = order
        .into_iter()
        .map(|value| {
            let count = counts.get(&value).copied().unwrap_or(0);
            FrequencyRow {
                percentage: round_to(count as f64 * 100.0 / total as f64, 2),
                value,
                count,
            }
        })
        .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    Ok(rows)
}
