//! The content-addressed table store.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use dz_model::{CacheKey, Table};
use serde::Serialize;

use crate::error::{CacheError, Result};

/// A stored table with its display name.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub name: String,
    pub table: Arc<Table>,
}

/// `{id, name}` listing row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntrySummary {
    pub id: CacheKey,
    pub name: String,
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<CacheKey, CacheEntry>,
    order: Vec<CacheKey>,
}

impl CacheState {
    fn upsert(&mut self, key: CacheKey, entry: CacheEntry) {
        if self.entries.insert(key.clone(), entry).is_none() {
            self.order.push(key);
        }
    }
}

/// Process-lifetime table store keyed by [`CacheKey`].
///
/// Entries never expire; they live until removed or until the cache is
/// dropped. Each read or write is atomic for its key. [`set`](Self::set) and
/// [`insert`](Self::insert) on one key follow last-write-wins, while
/// [`put`](Self::put) keeps the entry already stored. Tables are shared as `Arc<Table>` and never
/// mutated in place.
#[derive(Debug, Default)]
pub struct TableCache {
    state: RwLock<CacheState>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, CacheState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, CacheState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store a table parsed from `raw` under the digest of `raw`.
    ///
    /// Byte-identical content always yields the same key. When the key is
    /// already stored the existing entry is kept as is, with its name and any
    /// saved edits, and `table` is discarded.
    pub fn put(&self, name: &str, raw: &[u8], table: Table) -> CacheKey {
        let key = CacheKey::from_content(raw);
        let mut state = self.write();
        if state.entries.contains_key(&key) {
            tracing::debug!(key = %key, name, "content already cached");
            return key;
        }
        tracing::info!(
            key = %key,
            name,
            rows = table.height(),
            columns = table.width(),
            "cached table"
        );
        state.upsert(
            key.clone(),
            CacheEntry {
                name: name.to_string(),
                table: Arc::new(table),
            },
        );
        key
    }

    /// Store a table under an explicit key, replacing any previous entry.
    pub fn insert(&self, key: CacheKey, name: &str, table: Table) {
        tracing::info!(
            key = %key,
            name,
            rows = table.height(),
            columns = table.width(),
            "cached table"
        );
        self.write().upsert(
            key,
            CacheEntry {
                name: name.to_string(),
                table: Arc::new(table),
            },
        );
    }

    /// Replace the table under `key`, keeping its name. An absent key is
    /// created with the key itself as name.
    pub fn set(&self, key: &CacheKey, table: Table) {
        let mut state = self.write();
        let name = state
            .entries
            .get(key)
            .map_or_else(|| key.to_string(), |entry| entry.name.clone());
        tracing::debug!(key = %key, rows = table.height(), "overwrote cached table");
        state.upsert(
            key.clone(),
            CacheEntry {
                name,
                table: Arc::new(table),
            },
        );
    }

    pub fn get(&self, key: &CacheKey) -> Result<Arc<Table>> {
        self.entry(key).map(|entry| entry.table)
    }

    pub fn entry(&self, key: &CacheKey) -> Result<CacheEntry> {
        match self.read().entries.get(key) {
            Some(entry) => Ok(entry.clone()),
            None => {
                tracing::warn!(key = %key, "cache miss");
                Err(CacheError::Miss { key: key.clone() })
            }
        }
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.read().entries.contains_key(key)
    }

    pub fn remove(&self, key: &CacheKey) -> Option<CacheEntry> {
        let mut state = self.write();
        let removed = state.entries.remove(key)?;
        state.order.retain(|existing| existing != key);
        tracing::info!(key = %key, name = %removed.name, "removed cached table");
        Some(removed)
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().entries.is_empty()
    }

    /// Entries in first-insertion order.
    pub fn list(&self) -> Vec<EntrySummary> {
        let state = self.read();
        state
            .order
            .iter()
            .filter_map(|key| {
                state.entries.get(key).map(|entry| EntrySummary {
                    id: key.clone(),
                    name: entry.name.clone(),
                })
            })
            .collect()
    }
}
