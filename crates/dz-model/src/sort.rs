use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Sort directive for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    #[serde(rename = "column_id")]
    pub column: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(column: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            column: column.into(),
            direction,
        }
    }
}

/// Ordered sort directives, at most one per column.
///
/// Earlier entries are the primary keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<SortSpec>", into = "Vec<SortSpec>")]
pub struct SortPipeline {
    specs: Vec<SortSpec>,
}

impl SortPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SortSpec> {
        self.specs.iter()
    }

    /// Add a directive. Any prior directive for the same column is dropped
    /// and the new one goes last, lowering that column's precedence.
    pub fn with_sort(&self, spec: SortSpec) -> Self {
        let mut specs: Vec<_> = self
            .specs
            .iter()
            .filter(|existing| existing.column != spec.column)
            .cloned()
            .collect();
        specs.push(spec);
        Self { specs }
    }

    pub fn without_sort(&self, column: &str) -> Self {
        Self {
            specs: self
                .specs
                .iter()
                .filter(|existing| existing.column != column)
                .cloned()
                .collect(),
        }
    }
}

impl From<Vec<SortSpec>> for SortPipeline {
    fn from(specs: Vec<SortSpec>) -> Self {
        specs
            .into_iter()
            .fold(SortPipeline::new(), |pipeline, spec| pipeline.with_sort(spec))
    }
}

impl From<SortPipeline> for Vec<SortSpec> {
    fn from(pipeline: SortPipeline) -> Self {
        pipeline.specs
    }
}
