//! Terminal tables for command output.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ColumnConstraint, ContentArrangement, Table, Width,
};
use dz_common::{any_to_string, format_numeric, round_to};
use dz_model::{ColumnKind, Table as DataTable};
use dz_summary::{
    ColumnDescription, CorrelationMatrix, DESCRIBE_DECIMALS, FrequencyRow, TableCounts,
};
use dz_transform::SkippedFilter;

const TABLE_WIDTH: u16 = 120;
const DISPLAY_DECIMALS: u32 = 4;
const ELLIPSIS: &str = "...";

/// First `rows` rows of `table`, with the column kind under each header.
pub fn preview_table(table: &DataTable, rows: usize, max_column_width: u16) -> Table {
    let mut out = Table::new();
    let header = table
        .schema()
        .iter()
        .map(|(name, kind)| header_cell(&format!("{name}\n{}", kind.as_str())))
        .collect::<Vec<_>>();
    out.set_header(header);
    apply_table_style(&mut out);
    out.set_constraints(
        (0..table.width())
            .map(|_| ColumnConstraint::UpperBoundary(Width::Fixed(max_column_width)))
            .collect::<Vec<_>>(),
    );

    let columns = table.data().get_columns();
    for row in 0..table.height().min(rows) {
        let cells = columns
            .iter()
            .map(|column| match column.get(row) {
                Ok(value) if !value.is_null() => Cell::new(truncate(
                    &any_to_string(value),
                    usize::from(max_column_width),
                )),
                _ => dim_cell("null"),
            })
            .collect::<Vec<_>>();
        out.add_row(cells);
    }
    for (index, (_, kind)) in table.schema().iter().enumerate() {
        if kind == ColumnKind::Numeric {
            align_column(&mut out, index, CellAlignment::Right);
        }
    }
    out
}

pub fn counts_table(counts: &TableCounts) -> Table {
    let mut out = Table::new();
    out.set_header(vec![
        header_cell("Rows"),
        header_cell("Quantitative"),
        header_cell("Qualitative"),
        header_cell("Missing"),
    ]);
    apply_table_style(&mut out);
    for index in 0..4 {
        align_column(&mut out, index, CellAlignment::Right);
    }
    out.add_row(vec![
        Cell::new(counts.rows),
        Cell::new(counts.quantitative),
        Cell::new(counts.qualitative),
        missing_cell(counts.missing),
    ]);
    out
}

pub fn description_table(description: &ColumnDescription) -> Table {
    let description = description.rounded(DESCRIBE_DECIMALS);
    let mut out = Table::new();
    out.set_header(vec![header_cell("Statistic"), header_cell(&description.column)]);
    apply_table_style(&mut out);
    align_column(&mut out, 1, CellAlignment::Right);
    let rows = [
        ("count", Some(description.count as f64)),
        ("mean", description.mean),
        ("std", description.std),
        ("min", description.min),
        ("25%", description.q1),
        ("50%", description.median),
        ("75%", description.q3),
        ("max", description.max),
    ];
    for (label, value) in rows {
        out.add_row(vec![Cell::new(label), number_cell(value)]);
    }
    out.add_row(vec![Cell::new("missing"), missing_cell(description.missing)]);
    out
}

pub fn frequency_table(column: &str, rows: &[FrequencyRow]) -> Table {
    let mut out = Table::new();
    out.set_header(vec![
        header_cell(column),
        header_cell("Count"),
        header_cell("%"),
    ]);
    apply_table_style(&mut out);
    align_column(&mut out, 1, CellAlignment::Right);
    align_column(&mut out, 2, CellAlignment::Right);
    for row in rows {
        out.add_row(vec![
            Cell::new(&row.value),
            Cell::new(row.count),
            Cell::new(format_numeric(row.percentage)),
        ]);
    }
    out
}

pub fn correlation_table(matrix: &CorrelationMatrix) -> Table {
    let mut out = Table::new();
    let mut header = vec![header_cell("")];
    header.extend(matrix.columns.iter().map(|name| header_cell(name)));
    out.set_header(header);
    apply_table_style(&mut out);
    for index in 1..=matrix.columns.len() {
        align_column(&mut out, index, CellAlignment::Right);
    }
    for (name, values) in matrix.columns.iter().zip(&matrix.values) {
        let mut cells = vec![Cell::new(name).add_attribute(Attribute::Bold)];
        cells.extend(values.iter().map(|value| number_cell(*value)));
        out.add_row(cells);
    }
    out
}

/// Filters that could not be applied, with the reason.
pub fn skipped_table(skipped: &[SkippedFilter]) -> Table {
    let mut out = Table::new();
    out.set_header(vec![
        header_cell("Filter"),
        header_cell("Kind"),
        header_cell("Reason"),
    ]);
    apply_table_style(&mut out);
    for entry in skipped {
        out.add_row(vec![
            dim_cell(entry.id.as_str()),
            Cell::new(entry.spec.display_name()),
            Cell::new(entry.error.to_string()).fg(Color::Yellow),
        ]);
    }
    out
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(TABLE_WIDTH);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}

fn number_cell(value: Option<f64>) -> Cell {
    match value {
        Some(value) => Cell::new(format_numeric(round_to(value, DISPLAY_DECIMALS))),
        None => dim_cell("-"),
    }
}

fn missing_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).fg(Color::Yellow)
    } else {
        dim_cell(count)
    }
}

/// Cuts `text` to at most `limit` characters, marking the cut.
pub fn truncate(text: &str, limit: usize) -> String {
    if text.chars().count() <= limit {
        return text.to_string();
    }
    let keep = limit.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}
