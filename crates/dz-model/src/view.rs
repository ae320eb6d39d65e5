//! Active views: a cache key plus the pipelines that derive a display table.

use serde::{Deserialize, Serialize};

use crate::filter::{FilterId, FilterPipeline, FilterSpec};
use crate::key::CacheKey;
use crate::sort::{SortPipeline, SortSpec};

/// Filter and sort pipelines without a bound table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewPipeline {
    #[serde(default)]
    pub filters: FilterPipeline,
    #[serde(default)]
    pub sort: SortPipeline,
}

/// Which cached table, filtered how, sorted how.
///
/// Edits return a new view; callers replace the view they hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveView {
    #[serde(rename = "id")]
    pub key: CacheKey,
    #[serde(default)]
    pub filters: FilterPipeline,
    #[serde(default)]
    pub sort: SortPipeline,
}

/// A single edit to a view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ViewEdit {
    AddFilter { spec: FilterSpec },
    RemoveFilter { id: FilterId },
    AddSort { spec: SortSpec },
    RemoveSort { column: String },
}

impl ActiveView {
    /// Fresh view over `key` with empty pipelines.
    pub fn new(key: CacheKey) -> Self {
        Self {
            key,
            filters: FilterPipeline::new(),
            sort: SortPipeline::new(),
        }
    }

    pub fn with_pipeline(key: CacheKey, pipeline: ViewPipeline) -> Self {
        Self {
            key,
            filters: pipeline.filters,
            sort: pipeline.sort,
        }
    }

    pub fn pipeline(&self) -> ViewPipeline {
        ViewPipeline {
            filters: self.filters.clone(),
            sort: self.sort.clone(),
        }
    }

    pub fn with_filter(&self, spec: FilterSpec) -> (Self, FilterId) {
        let (filters, id) = self.filters.with_filter(spec);
        (
            Self {
                filters,
                ..self.clone()
            },
            id,
        )
    }

    pub fn without_filter(&self, id: &FilterId) -> Self {
        Self {
            filters: self.filters.without_filter(id),
            ..self.clone()
        }
    }

    pub fn with_sort(&self, spec: SortSpec) -> Self {
        Self {
            sort: self.sort.with_sort(spec),
            ..self.clone()
        }
    }

    pub fn without_sort(&self, column: &str) -> Self {
        Self {
            sort: self.sort.without_sort(column),
            ..self.clone()
        }
    }

    /// Apply one edit, returning the new view.
    pub fn edit(&self, edit: ViewEdit) -> Self {
        match edit {
            ViewEdit::AddFilter { spec } => self.with_filter(spec).0,
            ViewEdit::RemoveFilter { id } => self.without_filter(&id),
            ViewEdit::AddSort { spec } => self.with_sort(spec),
            ViewEdit::RemoveSort { column } => self.without_sort(&column),
        }
    }
}
