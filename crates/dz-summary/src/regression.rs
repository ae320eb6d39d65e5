//! Ordinary least squares of one numeric column on another.

use dz_common::{column_f64_values, complete_pairs, mean, pearson};
use dz_model::{ColumnKind, Table};
use serde::Serialize;

use crate::error::{Result, SummaryError};

/// `y = slope * x + intercept` fitted over rows where both are present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub n: usize,
}

impl LinearFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

fn numeric_values(table: &Table, name: &str) -> Result<Vec<Option<f64>>> {
    match table.kind(name) {
        None => Err(SummaryError::ColumnNotFound {
            column: name.to_string(),
        }),
        Some(ColumnKind::Numeric) => Ok(column_f64_values(table.data().column(name)?)?),
        Some(kind) => Err(SummaryError::NotNumeric {
            column: name.to_string(),
            kind: kind.as_str(),
        }),
    }
}

pub fn linear_fit(table: &Table, x: &str, y: &str) -> Result<LinearFit> {
    let (xs, ys) = complete_pairs(&numeric_values(table, x)?, &numeric_values(table, y)?);
    let insufficient = || SummaryError::InsufficientData {
        message: format!("cannot fit '{y}' on '{x}' from {} complete rows", xs.len()),
    };
    let (Some(mean_x), Some(mean_y)) = (mean(&xs), mean(&ys)) else {
        return Err(insufficient());
    };

    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (xv, yv) in xs.iter().zip(&ys) {
        sxy += (xv - mean_x) * (yv - mean_y);
        sxx += (xv - mean_x).powi(2);
    }
    if xs.len() < 2 || sxx == 0.0 {
        return Err(insufficient());
    }
    let slope = sxy / sxx;
    // A constant y is fitted exactly.
    let r_squared = pearson(&xs, &ys).map_or(1.0, |r| r * r);
    Ok(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
        r_squared,
        n: xs.len(),
    })
}
