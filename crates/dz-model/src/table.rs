//! Tables and their per-column kind schema.

use dz_common::any_to_json;
use polars::prelude::{AnyValue, DataFrame, DataType};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Inferred primitive kind of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    Numeric,
    Text,
    Boolean,
    Other,
}

impl ColumnKind {
    pub fn from_dtype(dtype: &DataType) -> Self {
        match dtype {
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64 => ColumnKind::Numeric,
            DataType::String => ColumnKind::Text,
            DataType::Boolean => ColumnKind::Boolean,
            _ => ColumnKind::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Text => "text",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Other => "other",
        }
    }

    /// Numeric and boolean columns order by value rather than by text.
    pub fn is_orderable_by_value(self) -> bool {
        matches!(self, ColumnKind::Numeric | ColumnKind::Boolean)
    }
}

/// Ordered column names with their kinds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    columns: Vec<(String, ColumnKind)>,
}

impl TableSchema {
    pub fn from_frame(data: &DataFrame) -> Self {
        let columns = data
            .get_columns()
            .iter()
            .map(|column| {
                (
                    column.name().to_string(),
                    ColumnKind::from_dtype(column.dtype()),
                )
            })
            .collect();
        Self { columns }
    }

    pub fn kind(&self, name: &str) -> Option<ColumnKind> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, kind)| *kind)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ColumnKind)> {
        self.columns.iter().map(|(name, kind)| (name.as_str(), *kind))
    }

    pub fn columns_of_kind(&self, kind: ColumnKind) -> Vec<&str> {
        self.iter()
            .filter(|(_, column_kind)| *column_kind == kind)
            .map(|(name, _)| name)
            .collect()
    }

    pub fn count_of_kind(&self, kind: ColumnKind) -> usize {
        self.columns.iter().filter(|(_, k)| *k == kind).count()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// An immutable table value: a polars frame plus its column kinds.
///
/// Engines never mutate a `Table`; they build a new one with
/// [`Table::derive`] so column kinds flow through the pipeline without
/// being re-inferred.
#[derive(Debug, Clone, Default)]
pub struct Table {
    data: DataFrame,
    schema: TableSchema,
}

impl Table {
    /// Build a table, inferring each column kind from its dtype.
    pub fn new(data: DataFrame) -> Self {
        let schema = TableSchema::from_frame(&data);
        Self { data, schema }
    }

    /// Build a table from `data` derived from this one.
    ///
    /// Surviving columns keep their kind; new columns are inferred.
    pub fn derive(&self, data: DataFrame) -> Self {
        let columns = data
            .get_columns()
            .iter()
            .map(|column| {
                let name = column.name().as_str();
                let kind = self
                    .schema
                    .kind(name)
                    .unwrap_or_else(|| ColumnKind::from_dtype(column.dtype()));
                (name.to_string(), kind)
            })
            .collect();
        Self {
            data,
            schema: TableSchema { columns },
        }
    }

    pub fn data(&self) -> &DataFrame {
        &self.data
    }

    pub fn into_data(self) -> DataFrame {
        self.data
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn kind(&self, column: &str) -> Option<ColumnKind> {
        self.schema.kind(column)
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.schema.kind(column).is_some()
    }

    pub fn height(&self) -> usize {
        self.data.height()
    }

    pub fn width(&self) -> usize {
        self.data.width()
    }

    pub fn column_names(&self) -> Vec<String> {
        self.schema.names().map(str::to_string).collect()
    }

    /// Rows as JSON objects keyed by column name.
    pub fn to_records(&self) -> Vec<Map<String, Value>> {
        let columns = self.data.get_columns();
        (0..self.data.height())
            .map(|idx| {
                columns
                    .iter()
                    .map(|column| {
                        let value = column.get(idx).unwrap_or(AnyValue::Null);
                        (column.name().to_string(), any_to_json(value))
                    })
                    .collect()
            })
            .collect()
    }
}

impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.schema == other.schema && self.data.equals_missing(&other.data)
    }
}

impl From<DataFrame> for Table {
    fn from(data: DataFrame) -> Self {
        Self::new(data)
    }
}
