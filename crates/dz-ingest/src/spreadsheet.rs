//! Workbook reading via calamine.
//!
//! Cells are typed per column: a column whose non-empty cells are all
//! booleans becomes boolean, all numbers (textual numbers included, read
//! with the configured decimal mark) becomes integer or float, anything
//! else becomes text. Empty cells and the texts in
//! [`NA_VALUES`](crate::NA_VALUES) are missing.

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{Data, Range, Reader, open_workbook_auto_from_rs};
use dz_common::{format_numeric, parse_f64};
use polars::prelude::*;

use crate::error::{ImportError, Result};
use crate::options::{ImportOptions, SheetSelector, is_na_value};

/// Reads one worksheet of a workbook into a Polars DataFrame.
pub fn read_spreadsheet(
    filename: &str,
    bytes: &[u8],
    options: &ImportOptions,
) -> Result<DataFrame> {
    let spreadsheet_error = |message: String| ImportError::Spreadsheet {
        filename: filename.to_string(),
        message,
    };

    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| spreadsheet_error(e.to_string()))?;
    let sheet_names = workbook.sheet_names();
    let unknown_sheet = |sheet: String| ImportError::UnknownSheet {
        filename: filename.to_string(),
        sheet,
        available: sheet_names.join(", "),
    };

    let range = match &options.sheet {
        SheetSelector::Name(name) => {
            if !sheet_names.iter().any(|sheet| sheet == name) {
                return Err(unknown_sheet(name.clone()));
            }
            workbook
                .worksheet_range(name)
                .map_err(|e| spreadsheet_error(e.to_string()))?
        }
        SheetSelector::Index(index) => workbook
            .worksheet_range_at(*index)
            .ok_or_else(|| unknown_sheet(format!("#{index}")))?
            .map_err(|e| spreadsheet_error(e.to_string()))?,
    };

    let df = range_to_frame(filename, &range, options)?;

    tracing::debug!(
        filename,
        rows = df.height(),
        columns = df.width(),
        "parsed worksheet"
    );
    Ok(df)
}

/// Builds a frame from a cell range.
fn range_to_frame(filename: &str, range: &Range<Data>, options: &ImportOptions) -> Result<DataFrame> {
    let empty = || ImportError::Empty {
        filename: filename.to_string(),
    };
    let rows: Vec<&[Data]> = range.rows().collect();
    let width = range.width();
    if width == 0 {
        return Err(empty());
    }

    let (names, body) = match options.header {
        Some(header) => {
            let header_row = rows.get(header).ok_or_else(empty)?;
            (header_names(header_row, width), &rows[header + 1..])
        }
        None => (
            (1..=width).map(|i| format!("column_{i}")).collect(),
            &rows[..],
        ),
    };

    let columns = names
        .into_iter()
        .enumerate()
        .map(|(idx, name)| {
            let cells: Vec<&Data> = body
                .iter()
                .map(|row| row.get(idx).unwrap_or(&Data::Empty))
                .collect();
            build_column(name, &cells, options.decimal)
        })
        .collect();

    DataFrame::new(columns).map_err(|e| ImportError::Spreadsheet {
        filename: filename.to_string(),
        message: e.to_string(),
    })
}

/// Header cells as column names: blanks become `Unnamed: i`, repeats get
/// a `.n` suffix.
fn header_names(row: &[Data], width: usize) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    (0..width)
        .map(|idx| {
            let base = match row.get(idx) {
                None | Some(Data::Empty) => format!("Unnamed: {idx}"),
                Some(cell) => {
                    let text = cell_text(cell).unwrap_or_default();
                    let text = text.trim();
                    if text.is_empty() {
                        format!("Unnamed: {idx}")
                    } else {
                        text.to_string()
                    }
                }
            };
            let count = seen.entry(base.clone()).or_insert(0);
            let name = if *count == 0 {
                base
            } else {
                format!("{base}.{count}")
            };
            *count += 1;
            name
        })
        .collect()
}

fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        Data::String(s) => Some(s.clone()),
        Data::Float(f) => Some(format_numeric(*f)),
        Data::Int(i) => Some(i.to_string()),
        Data::Bool(b) => Some(b.to_string()),
        other => Some(other.to_string()),
    }
}

fn cell_number(cell: &Data, decimal: u8) -> Option<f64> {
    match cell {
        Data::Float(f) => Some(*f),
        Data::Int(i) => Some(*i as f64),
        Data::String(s) if decimal == b',' => parse_f64(&s.replace(',', ".")),
        Data::String(s) => parse_f64(s),
        _ => None,
    }
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty | Data::Error(_) => true,
        Data::String(s) => s.trim().is_empty() || is_na_value(s),
        _ => false,
    }
}

fn build_column(name: String, cells: &[&Data], decimal: u8) -> Column {
    let present: Vec<&Data> = cells.iter().copied().filter(|c| !is_blank(c)).collect();

    if !present.is_empty() && present.iter().all(|c| matches!(c, Data::Bool(_))) {
        let values: Vec<Option<bool>> = cells
            .iter()
            .map(|cell| match cell {
                Data::Bool(b) => Some(*b),
                _ => None,
            })
            .collect();
        return Column::new(name.into(), values);
    }

    let numbers: Option<Vec<f64>> = present.iter().map(|c| cell_number(c, decimal)).collect();
    if let Some(numbers) = numbers {
        let integral = !numbers.is_empty()
            && numbers
                .iter()
                .all(|n| n.fract() == 0.0 && n.abs() < i64::MAX as f64);
        let values = cells.iter().map(|cell| {
            if is_blank(cell) {
                None
            } else {
                cell_number(cell, decimal)
            }
        });
        return if integral {
            let values: Vec<Option<i64>> = values.map(|v| v.map(|n| n as i64)).collect();
            Column::new(name.into(), values)
        } else {
            let values: Vec<Option<f64>> = values.collect();
            Column::new(name.into(), values)
        };
    }

    let values: Vec<Option<String>> = cells
        .iter()
        .map(|cell| if is_blank(cell) { None } else { cell_text(cell) })
        .collect();
    Column::new(name.into(), values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(rows: Vec<Vec<Data>>) -> Range<Data> {
        let height = rows.len() as u32;
        let width = rows.iter().map(Vec::len).max().unwrap_or(0) as u32;
        let mut range = Range::new((0, 0), (height - 1, width - 1));
        for (r, row) in rows.into_iter().enumerate() {
            for (c, cell) in row.into_iter().enumerate() {
                range.set_value((r as u32, c as u32), cell);
            }
        }
        range
    }

    fn text(s: &str) -> Data {
        Data::String(s.to_string())
    }

    #[test]
    fn infers_column_types() {
        let range = range(vec![
            vec![text("id"), text("score"), text("ok"), text("name")],
            vec![Data::Float(1.0), Data::Float(1.5), Data::Bool(true), text("a")],
            vec![Data::Int(2), Data::Empty, Data::Bool(false), Data::Float(3.0)],
        ]);
        let df = range_to_frame("t.xlsx", &range, &ImportOptions::default()).unwrap();
        assert_eq!(df.column("id").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("score").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("ok").unwrap().dtype(), &DataType::Boolean);
        assert_eq!(df.column("name").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("score").unwrap().null_count(), 1);
        assert_eq!(
            df.column("name").unwrap().str().unwrap().get(1),
            Some("3")
        );
    }

    #[test]
    fn na_texts_keep_numeric_columns() {
        let range = range(vec![
            vec![text("age")],
            vec![Data::Int(31)],
            vec![text("NA")],
            vec![Data::Int(27)],
        ]);
        let df = range_to_frame("t.xlsx", &range, &ImportOptions::default()).unwrap();
        let age = df.column("age").unwrap();
        assert_eq!(age.dtype(), &DataType::Int64);
        assert_eq!(age.null_count(), 1);
    }

    #[test]
    fn textual_numbers_use_decimal_mark() {
        let range = range(vec![vec![text("x")], vec![text("1,5")], vec![text("2")]]);
        let options = ImportOptions {
            decimal: b',',
            ..ImportOptions::default()
        };
        let df = range_to_frame("t.xlsx", &range, &options).unwrap();
        let x = df.column("x").unwrap().f64().unwrap();
        assert_eq!(x.get(0), Some(1.5));
    }

    #[test]
    fn header_names_fill_blanks_and_dedupe() {
        let names = header_names(&[text("a"), Data::Empty, text("a"), text("a")], 4);
        assert_eq!(names, vec!["a", "Unnamed: 1", "a.1", "a.2"]);
    }

    #[test]
    fn no_header_uses_positional_names() {
        let range = range(vec![vec![Data::Int(1), Data::Int(2)]]);
        let options = ImportOptions {
            header: None,
            ..ImportOptions::default()
        };
        let df = range_to_frame("t.xlsx", &range, &options).unwrap();
        assert_eq!(df.get_column_names_str(), vec!["column_1", "column_2"]);
        assert_eq!(df.height(), 1);
    }

    #[test]
    fn header_past_end_is_empty() {
        let range = range(vec![vec![text("a")]]);
        let options = ImportOptions {
            header: Some(3),
            ..ImportOptions::default()
        };
        assert!(matches!(
            range_to_frame("t.xlsx", &range, &options),
            Err(ImportError::Empty { .. })
        ));
    }

    #[test]
    fn garbage_bytes_are_a_spreadsheet_error() {
        let result = read_spreadsheet("book.xlsx", b"not a workbook", &ImportOptions::default());
        assert!(matches!(result, Err(ImportError::Spreadsheet { .. })));
    }
}
