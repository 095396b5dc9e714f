//! # Validation Run Persistence
//!
//! Validation runs are the audit trail of the promotion gate: every run
//! is appended, none are rewritten. The trait mirrors the narrow store
//! discipline of `mdr-store`; the in-memory implementation serves tests
//! and the CLI.

use std::sync::Mutex;

use mdr_core::{RecordId, RecordKind};
use mdr_store::StoreError;

use crate::validator::ValidationRun;

/// Persistence seam for validation runs.
pub trait RunStore: Send + Sync {
    /// Append a completed run.
    fn append(&self, run: ValidationRun) -> Result<(), StoreError>;

    /// The most recent run for a record, if any.
    fn latest_for(
        &self,
        kind: RecordKind,
        id: RecordId,
    ) -> Result<Option<ValidationRun>, StoreError>;

    /// All runs for a record, oldest first.
    fn all_for(&self, kind: RecordKind, id: RecordId) -> Result<Vec<ValidationRun>, StoreError>;
}

/// In-memory append-only run store.
#[derive(Debug, Default)]
pub struct InMemoryRunStore {
    runs: Mutex<Vec<ValidationRun>>,
}

impl InMemoryRunStore {
    /// An empty run store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-loaded with the given runs, in order.
    pub fn with_runs(runs: Vec<ValidationRun>) -> Self {
        Self { runs: Mutex::new(runs) }
    }

    /// Snapshot of all runs in append order.
    pub fn snapshot(&self) -> Vec<ValidationRun> {
        match self.runs.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => Vec::new(),
        }
    }
}

impl RunStore for InMemoryRunStore {
    fn append(&self, run: ValidationRun) -> Result<(), StoreError> {
        let mut guard = self
            .runs
            .lock()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?;
        guard.push(run);
        Ok(())
    }

    fn latest_for(
        &self,
        kind: RecordKind,
        id: RecordId,
    ) -> Result<Option<ValidationRun>, StoreError> {
        let guard = self
            .runs
            .lock()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?;
        Ok(guard
            .iter()
            .rev()
            .find(|r| r.kind == kind && r.record_id == id)
            .cloned())
    }

    fn all_for(&self, kind: RecordKind, id: RecordId) -> Result<Vec<ValidationRun>, StoreError> {
        let guard = self
            .runs
            .lock()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?;
        Ok(guard
            .iter()
            .filter(|r| r.kind == kind && r.record_id == id)
            .cloned()
            .collect())
    }
}
