//! The workspace service: one cache shared by every operation.

use std::sync::Arc;

use dz_cache::{EntrySummary, TableCache, combined_name, display_name};
use dz_ingest::{ImportOptions, ImportOutcome, parse_table};
use dz_model::{ActiveView, CacheKey, Table, ViewEdit};
use dz_summary::{
    ColumnDescription, CorrelationMatrix, FrequencyRow, LinearFit, TableCounts,
};
use dz_transform::{
    Axis, FilterOutcome, JoinKind, SkippedFilter, TransformError, apply_filters_reporting,
    apply_sort,
};
use serde::Serialize;

use crate::error::Result;
use crate::export::write_csv;

/// A derived view table plus the filters that could not be applied.
#[derive(Debug)]
pub struct RenderedView {
    pub table: Table,
    pub skipped: Vec<SkippedFilter>,
}

/// A combine result stored under a new key.
#[derive(Debug, Clone, Serialize)]
pub struct CombineOutcome {
    #[serde(flatten)]
    pub entry: EntrySummary,
    #[serde(skip)]
    pub table: Arc<Table>,
}

/// Entry point for every engine operation.
///
/// Holds the shared [`TableCache`]. Views are plain values owned by the
/// caller: each call takes the view it should work on and edits return a
/// replacement. A caller must not run two edits of the same view at once;
/// views over different keys share nothing and may be used in parallel.
#[derive(Debug, Clone)]
pub struct Workspace {
    cache: Arc<TableCache>,
}

impl Workspace {
    pub fn new(cache: Arc<TableCache>) -> Self {
        Self { cache }
    }

    pub fn cache(&self) -> &TableCache {
        &self.cache
    }

    /// Parse `bytes` and store the table under the digest of `bytes`.
    pub fn try_import(
        &self,
        filename: &str,
        bytes: &[u8],
        options: &ImportOptions,
    ) -> Result<(CacheKey, Arc<Table>)> {
        let table = parse_table(filename, bytes, options)?;
        let key = self.cache.put(&display_name(filename), bytes, table);
        tracing::info!(filename, key = %key, "imported file");
        let table = self.cache.get(&key)?;
        Ok((key, table))
    }

    /// Import one file, capturing failures in the outcome.
    pub fn import(&self, filename: &str, bytes: &[u8], options: &ImportOptions) -> ImportOutcome {
        match self.try_import(filename, bytes, options) {
            Ok((key, table)) => ImportOutcome::success(filename, key, (*table).clone()),
            Err(err) => {
                tracing::warn!(filename, error = %err, "import failed");
                ImportOutcome::failure(filename, &err)
            }
        }
    }

    /// Stored entries in insertion order.
    pub fn entries(&self) -> Vec<EntrySummary> {
        self.cache.list()
    }

    /// Fresh view over a stored table.
    pub fn open_view(&self, key: &CacheKey) -> Result<ActiveView> {
        self.cache.entry(key)?;
        Ok(ActiveView::new(key.clone()))
    }

    /// Stored table with the view's filters applied, unsorted.
    pub fn filtered(&self, view: &ActiveView) -> Result<FilterOutcome> {
        let table = self.cache.get(&view.key)?;
        Ok(apply_filters_reporting(&table, &view.filters))
    }

    /// Stored table with the view's filters and sort applied.
    pub fn render(&self, view: &ActiveView) -> Result<RenderedView> {
        let FilterOutcome { table, skipped } = self.filtered(view)?;
        let table = apply_sort(&table, &view.sort)?;
        Ok(RenderedView { table, skipped })
    }

    /// Apply `edit` and render the result in one step.
    pub fn update_view(
        &self,
        view: &ActiveView,
        edit: ViewEdit,
    ) -> Result<(ActiveView, RenderedView)> {
        let updated = view.edit(edit);
        let rendered = self.render(&updated)?;
        Ok((updated, rendered))
    }

    pub fn summary(&self, view: &ActiveView) -> Result<TableCounts> {
        Ok(dz_summary::summarize(&self.filtered(view)?.table)?)
    }

    pub fn describe_column(&self, view: &ActiveView, column: &str) -> Result<ColumnDescription> {
        Ok(dz_summary::describe_column(&self.filtered(view)?.table, column)?)
    }

    pub fn frequencies(&self, view: &ActiveView, column: &str) -> Result<Vec<FrequencyRow>> {
        Ok(dz_summary::frequency_table(&self.filtered(view)?.table, column)?)
    }

    pub fn correlation(&self, view: &ActiveView) -> Result<CorrelationMatrix> {
        Ok(dz_summary::correlation_matrix(&self.filtered(view)?.table)?)
    }

    pub fn linear_fit(&self, view: &ActiveView, x: &str, y: &str) -> Result<LinearFit> {
        Ok(dz_summary::linear_fit(&self.filtered(view)?.table, x, y)?)
    }

    fn store_combined(
        &self,
        prefix: &str,
        main: &CacheKey,
        other: &CacheKey,
        table: Table,
    ) -> Result<CombineOutcome> {
        let key = CacheKey::generate();
        let name = combined_name(prefix, main, other);
        self.cache.insert(key.clone(), &name, table);
        Ok(CombineOutcome {
            table: self.cache.get(&key)?,
            entry: EntrySummary { id: key, name },
        })
    }

    /// Concatenate two stored tables into a new entry.
    pub fn concat(&self, main: &CacheKey, other: &CacheKey, axis: Axis) -> Result<CombineOutcome> {
        let left = self.cache.get(main)?;
        let right = self.cache.get(other)?;
        let combined = dz_transform::concat(&left, &right, axis)?;
        self.store_combined("concat", main, other, combined)
    }

    /// Join two stored tables into a new entry.
    pub fn merge(
        &self,
        main: &CacheKey,
        other: &CacheKey,
        left_key: &str,
        right_key: &str,
        how: JoinKind,
    ) -> Result<CombineOutcome> {
        let left = self.cache.get(main)?;
        let right = self.cache.get(other)?;
        let merged = dz_transform::merge(&left, &right, left_key, right_key, how)?;
        self.store_combined("merged", main, other, merged)
    }

    /// Store edited cells back under `key`, in the stored column order.
    ///
    /// Every stored column must be present in `edited`; extra columns are
    /// dropped. On error the stored entry is left as it was.
    pub fn save_edits(&self, key: &CacheKey, edited: &Table) -> Result<()> {
        let stored = self.cache.get(key)?;
        let order = stored.column_names();
        if let Some(missing) = order.iter().find(|name| !edited.has_column(name)) {
            return Err(TransformError::ColumnNotFound {
                column: missing.clone(),
            }
            .into());
        }
        let reordered = edited
            .data()
            .select(order.iter().map(String::as_str))
            .map_err(TransformError::from)?;
        self.cache.set(key, Table::new(reordered));
        tracing::info!(key = %key, "saved edits");
        Ok(())
    }

    /// Remove a stored table. Views over it render as cache misses afterwards.
    pub fn remove(&self, key: &CacheKey) -> Result<EntrySummary> {
        let entry = self.cache.entry(key)?;
        self.cache.remove(key);
        Ok(EntrySummary {
            id: key.clone(),
            name: entry.name,
        })
    }

    /// Stored table as CSV bytes.
    pub fn export_csv(&self, key: &CacheKey) -> Result<Vec<u8>> {
        let table = self.cache.get(key)?;
        write_csv(&table)
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(Arc::new(TableCache::new()))
    }
}
