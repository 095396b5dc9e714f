//! # Ledger Event Storage
//!
//! The storage seam for ledger chains. The surface is read-and-append
//! only; the append is a compare-and-append keyed on the chain tip, which
//! closes the read-modify-write race that would otherwise let two
//! concurrent writers fork a chain.

use std::collections::HashMap;
use std::sync::Mutex;

use thiserror::Error;

use mdr_core::{CanonicalizationError, RecordId, RecordKind};
use mdr_store::StoreError;

use crate::event::{genesis_hash, LedgerEvent};

/// Error from ledger operations.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// A concurrent append won the race for the chain tip. Retry with a
    /// fresh read.
    #[error("ledger append conflict: expected tip {expected}, found {found}")]
    Conflict {
        /// The tip hash the rejected event was built against.
        expected: String,
        /// The tip hash actually stored.
        found: String,
    },

    /// The snapshot could not be canonicalized.
    #[error(transparent)]
    Canonicalization(#[from] CanonicalizationError),

    /// Underlying storage failure; propagates unmodified.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Storage capability for ledger chains.
///
/// Deliberately has no update or delete operation: events are immutable
/// once written.
pub trait LedgerStore: Send + Sync {
    /// The most recent event of a record's chain, if any.
    fn tip(&self, kind: RecordKind, id: RecordId) -> Result<Option<LedgerEvent>, LedgerError>;

    /// All events of a record's chain in sequence order.
    fn events_for(&self, kind: RecordKind, id: RecordId)
        -> Result<Vec<LedgerEvent>, LedgerError>;

    /// Append an event iff its `prev_hash` matches the current tip's
    /// `event_hash` (or the genesis hash for an empty chain).
    ///
    /// # Errors
    ///
    /// `LedgerError::Conflict` when the tip moved since the caller read it.
    fn compare_and_append(&self, event: LedgerEvent) -> Result<(), LedgerError>;
}

/// In-memory ledger store, one `Vec` per chain behind a single mutex.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    chains: Mutex<HashMap<(RecordKind, RecordId), Vec<LedgerEvent>>>,
}

impl InMemoryLedgerStore {
    /// An empty ledger store.
    pub fn new() -> Self {
        Self::default()
    }

    /// A store loaded with pre-existing events, e.g. a dataset read from
    /// disk. Events are grouped per chain in the order given; no
    /// integrity check happens here — that is `verify_chain`'s job.
    pub fn with_events(events: impl IntoIterator<Item = LedgerEvent>) -> Self {
        let mut chains: HashMap<(RecordKind, RecordId), Vec<LedgerEvent>> = HashMap::new();
        for event in events {
            chains
                .entry((event.kind, event.record_id))
                .or_default()
                .push(event);
        }
        for chain in chains.values_mut() {
            chain.sort_by_key(|e| e.sequence);
        }
        Self { chains: Mutex::new(chains) }
    }

    /// Snapshot of every event across all chains, in chain order.
    pub fn snapshot(&self) -> Vec<LedgerEvent> {
        match self.chains.lock() {
            Ok(guard) => guard.values().flatten().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn tip(&self, kind: RecordKind, id: RecordId) -> Result<Option<LedgerEvent>, LedgerError> {
        let guard = self
            .chains
            .lock()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?;
        Ok(guard.get(&(kind, id)).and_then(|c| c.last().cloned()))
    }

    fn events_for(
        &self,
        kind: RecordKind,
        id: RecordId,
    ) -> Result<Vec<LedgerEvent>, LedgerError> {
        let guard = self
            .chains
            .lock()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?;
        Ok(guard.get(&(kind, id)).cloned().unwrap_or_default())
    }

    fn compare_and_append(&self, event: LedgerEvent) -> Result<(), LedgerError> {
        let mut guard = self
            .chains
            .lock()
            .map_err(|e| StoreError::Backend(format!("lock poisoned: {e}")))?;
        let chain = guard.entry((event.kind, event.record_id)).or_default();
        let current_tip = match chain.last() {
            Some(tip) => tip.event_hash.clone(),
            None => genesis_hash(&event.tenant, event.record_id),
        };
        if event.prev_hash != current_tip {
            return Err(LedgerError::Conflict {
                expected: event.prev_hash.clone(),
                found: current_tip,
            });
        }
        chain.push(event);
        Ok(())
    }
}
