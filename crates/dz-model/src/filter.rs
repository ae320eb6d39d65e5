//! Declarative filter specifications and the ordered pipeline holding them.
//!
//! Wire form of a spec is a JSON object tagged by `"type"`:
//!
//! ```json
//! { "type": "comparison", "col": "age", "operator": "ge", "value": 18 }
//! ```
//!
//! A pipeline serializes as an object keyed by spec id, in insertion order.

use std::cmp::Ordering;
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::table::ColumnKind;

/// Identifier of a spec within a pipeline.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterId(String);

impl FilterId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FilterId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for FilterId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Comparison operator.
///
/// Accepts the short tokens, the symbols and the French labels of the
/// dashboard's operator dropdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonOp {
    #[serde(alias = ">", alias = "plus grand que")]
    Gt,
    #[serde(alias = ">=", alias = "≥", alias = "plus grand ou égal à")]
    Ge,
    #[serde(alias = "<", alias = "plus petit que")]
    Lt,
    #[serde(alias = "<=", alias = "≤", alias = "plus petit ou égal à")]
    Le,
    #[serde(alias = "=", alias = "==", alias = "égal à")]
    Eq,
    #[serde(alias = "!=", alias = "≠", alias = "différent de")]
    Ne,
}

impl ComparisonOp {
    pub fn symbol(self) -> &'static str {
        match self {
            ComparisonOp::Gt => ">",
            ComparisonOp::Ge => ">=",
            ComparisonOp::Lt => "<",
            ComparisonOp::Le => "<=",
            ComparisonOp::Eq => "==",
            ComparisonOp::Ne => "!=",
        }
    }

    /// Whether `cell <op> operand` holds given `cell.cmp(operand)`.
    pub fn holds(self, ordering: Ordering) -> bool {
        match self {
            ComparisonOp::Gt => ordering == Ordering::Greater,
            ComparisonOp::Ge => ordering != Ordering::Less,
            ComparisonOp::Lt => ordering == Ordering::Less,
            ComparisonOp::Le => ordering != Ordering::Greater,
            ComparisonOp::Eq => ordering == Ordering::Equal,
            ComparisonOp::Ne => ordering != Ordering::Equal,
        }
    }
}

/// Typed right-hand side of a comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Operand {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl Operand {
    /// Numeric view of the operand: numbers as-is, booleans as 0/1.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Operand::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Operand::Number(n) => Some(*n),
            Operand::Text(_) => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Bool(b) => write!(f, "{b}"),
            Operand::Number(n) => f.write_str(&dz_common::format_numeric(*n)),
            Operand::Text(s) => write!(f, "{s:?}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingAction {
    Drop,
    Mean,
    Median,
    Zero,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutlierAction {
    Drop,
    Median,
    Winsorize,
}

/// One filter step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FilterSpec {
    /// Case-insensitive, trimmed equality on the cell text.
    #[serde(rename = "text")]
    ExactText {
        #[serde(rename = "col")]
        column: String,
        #[serde(deserialize_with = "text_value")]
        value: String,
    },
    /// Case-insensitive, trimmed substring containment.
    #[serde(rename = "in_text")]
    SubstringText {
        #[serde(rename = "col")]
        column: String,
        #[serde(deserialize_with = "text_value")]
        value: String,
    },
    #[serde(rename = "comparison", alias = "comparaison")]
    Comparison {
        #[serde(rename = "col")]
        column: String,
        value: Operand,
        operator: ComparisonOp,
    },
    /// Keep only columns of one kind.
    #[serde(rename = "types_columns")]
    ColumnTypeKeep {
        #[serde(rename = "col_type")]
        kind: ColumnKind,
    },
    /// Keep the named columns; an empty list keeps everything.
    #[serde(rename = "keep_columns")]
    ColumnsKeep {
        #[serde(default)]
        columns: Vec<String>,
    },
    #[serde(rename = "na")]
    MissingValue {
        #[serde(rename = "col")]
        column: String,
        action: MissingAction,
    },
    #[serde(rename = "outlier")]
    Outlier {
        #[serde(rename = "col")]
        column: String,
        action: OutlierAction,
    },
}

impl FilterSpec {
    /// The `"type"` tag of the wire form.
    pub fn kind_name(&self) -> &'static str {
        match self {
            FilterSpec::ExactText { .. } => "text",
            FilterSpec::SubstringText { .. } => "in_text",
            FilterSpec::Comparison { .. } => "comparison",
            FilterSpec::ColumnTypeKeep { .. } => "types_columns",
            FilterSpec::ColumnsKeep { .. } => "keep_columns",
            FilterSpec::MissingValue { .. } => "na",
            FilterSpec::Outlier { .. } => "outlier",
        }
    }

    /// Column the spec targets, if it targets a single one.
    pub fn column(&self) -> Option<&str> {
        match self {
            FilterSpec::ExactText { column, .. }
            | FilterSpec::SubstringText { column, .. }
            | FilterSpec::Comparison { column, .. }
            | FilterSpec::MissingValue { column, .. }
            | FilterSpec::Outlier { column, .. } => Some(column),
            FilterSpec::ColumnTypeKeep { .. } | FilterSpec::ColumnsKeep { .. } => None,
        }
    }

    /// Whether adding `self` evicts `existing` from a pipeline.
    ///
    /// Table-wide kinds hold one slot each; the others hold one slot per
    /// column.
    pub fn replaces(&self, existing: &FilterSpec) -> bool {
        self.kind_name() == existing.kind_name() && self.column() == existing.column()
    }

    pub fn display_name(&self) -> String {
        match self {
            FilterSpec::ExactText { column, value } => format!("{column} is {value:?}"),
            FilterSpec::SubstringText { column, value } => {
                format!("{column} contains {value:?}")
            }
            FilterSpec::Comparison {
                column,
                value,
                operator,
            } => format!("{column} {} {value}", operator.symbol()),
            FilterSpec::ColumnTypeKeep { kind } => format!("keep {} columns", kind.as_str()),
            FilterSpec::ColumnsKeep { columns } => format!("keep [{}]", columns.join(", ")),
            FilterSpec::MissingValue { column, action } => {
                format!("missing values in {column}: {action:?}")
            }
            FilterSpec::Outlier { column, action } => {
                format!("outliers in {column}: {action:?}")
            }
        }
    }
}

/// Text filter values may arrive as numbers or booleans from the UI.
fn text_value<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Operand::deserialize(deserializer)? {
        Operand::Text(s) => s,
        Operand::Bool(b) => b.to_string(),
        Operand::Number(n) => dz_common::format_numeric(n),
    })
}

/// Insertion-ordered mapping from spec id to spec.
///
/// Every edit returns a new pipeline; the receiver is left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterPipeline {
    entries: Vec<(FilterId, FilterSpec)>,
}

impl FilterPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FilterId, &FilterSpec)> {
        self.entries.iter().map(|(id, spec)| (id, spec))
    }

    pub fn get(&self, id: &FilterId) -> Option<&FilterSpec> {
        self.entries
            .iter()
            .find(|(entry_id, _)| entry_id == id)
            .map(|(_, spec)| spec)
    }

    /// Add `spec` under a fresh id, evicting any spec it replaces.
    pub fn with_filter(&self, spec: FilterSpec) -> (Self, FilterId) {
        let id = FilterId::generate();
        (self.with_filter_id(id.clone(), spec), id)
    }

    /// Add `spec` under `id`, evicting any spec it replaces and any spec
    /// already stored under `id`. The new spec goes last.
    pub fn with_filter_id(&self, id: FilterId, spec: FilterSpec) -> Self {
        let mut entries: Vec<_> = self
            .entries
            .iter()
            .filter(|(entry_id, existing)| *entry_id != id && !spec.replaces(existing))
            .cloned()
            .collect();
        entries.push((id, spec));
        Self { entries }
    }

    /// Pipeline without the spec stored under `id`.
    pub fn without_filter(&self, id: &FilterId) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(entry_id, _)| entry_id != id)
                .cloned()
                .collect(),
        }
    }
}

impl Serialize for FilterPipeline {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (id, spec) in &self.entries {
            map.serialize_entry(id, spec)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for FilterPipeline {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PipelineVisitor;

        impl<'de> Visitor<'de> for PipelineVisitor {
            type Value = FilterPipeline;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of filter id to filter spec")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut pipeline = FilterPipeline::new();
                while let Some((id, spec)) = access.next_entry::<FilterId, FilterSpec>()? {
                    pipeline = pipeline.with_filter_id(id, spec);
                }
                Ok(pipeline)
            }
        }

        deserializer.deserialize_map(PipelineVisitor)
    }
}
