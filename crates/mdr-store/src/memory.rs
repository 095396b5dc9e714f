//! # In-Memory Record Store
//!
//! `RwLock`-backed implementation of [`RecordStore`] used by tests and the
//! CLI. Reads take the shared lock so validation runs for distinct records
//! proceed concurrently; updates take the exclusive lock.

use std::collections::HashMap;
use std::sync::RwLock;

use mdr_core::{RecordId, RecordKind};

use crate::record::{Record, RecordPatch};
use crate::store::{ListFilter, RecordStore, StoreError};

/// In-memory record store keyed by (kind, id).
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<(RecordKind, RecordId), Record>>,
}

impl InMemoryRecordStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-loaded with the given records.
    pub fn with_records(records: impl IntoIterator<Item = Record>) -> Self {
        let map = records
            .into_iter()
            .map(|r| ((r.kind, r.id), r))
            .collect();
        Self { records: RwLock::new(map) }
    }

    /// Snapshot of every record, in unspecified order. Used by the CLI to
    /// write the dataset back to disk.
    pub fn snapshot(&self) -> Vec<Record> {
        match self.records.read() {
            Ok(guard) => guard.values().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl RecordStore for InMemoryRecordStore {
    fn get(&self, kind: RecordKind, id: RecordId) -> Result<Record, StoreError> {
        let guard = self
            .records
            .read()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?;
        guard
            .get(&(kind, id))
            .cloned()
            .ok_or(StoreError::NotFound { kind, id })
    }

    fn list(&self, kind: RecordKind, filter: &ListFilter) -> Result<Vec<Record>, StoreError> {
        let guard = self
            .records
            .read()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?;
        let mut out: Vec<Record> = guard
            .values()
            .filter(|r| r.kind == kind && filter.matches(r))
            .cloned()
            .collect();
        // Deterministic order for rule evaluation and tests.
        out.sort_by_key(|r| *r.id.as_uuid());
        Ok(out)
    }

    fn update(
        &self,
        kind: RecordKind,
        id: RecordId,
        patch: &RecordPatch,
    ) -> Result<Record, StoreError> {
        let mut guard = self
            .records
            .write()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?;
        let current = guard
            .get(&(kind, id))
            .ok_or(StoreError::NotFound { kind, id })?;
        let merged = current.apply_patch(patch);
        guard.insert((kind, id), merged.clone());
        Ok(merged)
    }

    fn insert(&self, record: Record) -> Result<(), StoreError> {
        let mut guard = self
            .records
            .write()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?;
        let key = (record.kind, record.id);
        if guard.contains_key(&key) {
            return Err(StoreError::AlreadyExists { kind: record.kind, id: record.id });
        }
        guard.insert(key, record);
        Ok(())
    }
}
