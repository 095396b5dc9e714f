//! # Chain Operations
//!
//! `Ledger` is the operational surface: append an event for a committed
//! record change, and verify a chain end to end. Verification is a
//! diagnostic report, not a gate — it never fails on tampering, it
//! localizes it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use mdr_core::{CanonicalBytes, EventId, RecordId, RecordKind};
use mdr_store::{Clock, IdentitySource, Record};

use crate::event::{
    compute_event_hash, genesis_hash, recompute_event_hash, LedgerEvent, LedgerEventKind,
};
use crate::store::{LedgerError, LedgerStore};

/// A localized finding from chain verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "issue", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChainIssue {
    /// The event's stored payload no longer matches its stored hash.
    PayloadTampered {
        /// The affected event.
        event_id: EventId,
        /// Its position in the chain.
        sequence: u64,
        /// The hash stored on the event.
        stored: String,
        /// The hash recomputed from the stored payload and prev-hash.
        computed: String,
    },
    /// The event's prev-hash does not link to its predecessor.
    ChainBreak {
        /// The affected event.
        event_id: EventId,
        /// Its position in the chain.
        sequence: u64,
        /// The predecessor's event hash.
        expected: String,
        /// The prev-hash stored on the event.
        found: String,
    },
    /// The first event's prev-hash is not the chain's genesis value.
    GenesisMismatch {
        /// The affected event.
        event_id: EventId,
        /// The expected genesis hash.
        expected: String,
        /// The prev-hash stored on the event.
        found: String,
    },
}

impl std::fmt::Display for ChainIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PayloadTampered { event_id, sequence, .. } => {
                write!(f, "payload tampered at {event_id} (sequence {sequence})")
            }
            Self::ChainBreak { event_id, sequence, .. } => {
                write!(f, "chain break at {event_id} (sequence {sequence})")
            }
            Self::GenesisMismatch { event_id, .. } => {
                write!(f, "genesis mismatch at {event_id}")
            }
        }
    }
}

/// The result of verifying one record's chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainReport {
    /// Whether every check passed.
    pub valid: bool,
    /// Every finding, in chain order.
    pub issues: Vec<ChainIssue>,
    /// How many events were checked.
    pub events_checked: usize,
}

/// The ledger's operational surface.
pub struct Ledger {
    store: Arc<dyn LedgerStore>,
    identity: Arc<dyn IdentitySource>,
    clock: Arc<dyn Clock>,
}

impl Ledger {
    /// A ledger over the given store and collaborators.
    pub fn new(
        store: Arc<dyn LedgerStore>,
        identity: Arc<dyn IdentitySource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { store, identity, clock }
    }

    /// Append one event for a committed record change.
    ///
    /// Reads the current tip, canonicalizes the snapshot, computes the
    /// event hash, and hands the event to the store's compare-and-append.
    ///
    /// # Errors
    ///
    /// `LedgerError::Conflict` when a concurrent append moved the tip
    /// between the read and the append; the caller retries from a fresh
    /// read. Canonicalization and backend errors propagate.
    pub fn append_event(
        &self,
        record: &Record,
        event_kind: LedgerEventKind,
    ) -> Result<LedgerEvent, LedgerError> {
        let tip = self.store.tip(record.kind, record.id)?;
        let (prev_hash, sequence) = match &tip {
            Some(tip) => (tip.event_hash.clone(), tip.sequence + 1),
            None => (genesis_hash(&record.tenant, record.id), 0),
        };
        let payload = CanonicalBytes::new(record)?;
        let event_hash = compute_event_hash(&payload, &prev_hash);
        let event = LedgerEvent {
            event_id: EventId::new(),
            sequence,
            kind: record.kind,
            record_id: record.id,
            tenant: record.tenant.clone(),
            event_kind,
            canonical_payload: payload.as_str().to_string(),
            prev_hash,
            event_hash,
            actor: self.identity.current_actor(),
            recorded_at: self.clock.now(),
        };
        self.store.compare_and_append(event.clone())?;
        tracing::debug!(
            kind = %record.kind,
            record = %record.id,
            event = %event.event_id,
            sequence = event.sequence,
            event_kind = %event_kind,
            "ledger event appended"
        );
        Ok(event)
    }

    /// Verify one record's chain end to end.
    ///
    /// Two independent checks per event: the stored payload and prev-hash
    /// must reproduce the stored event hash (payload tampering), and the
    /// prev-hash must link to the predecessor's event hash, or to genesis
    /// for the first event (reordering, chain breaks). Findings never
    /// abort verification; the report covers the whole chain.
    ///
    /// # Errors
    ///
    /// Only backend failures reading the chain. Tampering is report data.
    pub fn verify_chain(
        &self,
        kind: RecordKind,
        id: RecordId,
    ) -> Result<ChainReport, LedgerError> {
        let events = self.store.events_for(kind, id)?;
        let mut issues = Vec::new();

        for (i, event) in events.iter().enumerate() {
            let recomputed = recompute_event_hash(&event.canonical_payload, &event.prev_hash);
            if recomputed != event.event_hash {
                issues.push(ChainIssue::PayloadTampered {
                    event_id: event.event_id,
                    sequence: event.sequence,
                    stored: event.event_hash.clone(),
                    computed: recomputed,
                });
            }
            if i == 0 {
                let genesis = genesis_hash(&event.tenant, event.record_id);
                if event.prev_hash != genesis {
                    issues.push(ChainIssue::GenesisMismatch {
                        event_id: event.event_id,
                        expected: genesis,
                        found: event.prev_hash.clone(),
                    });
                }
            } else {
                let predecessor = &events[i - 1];
                if event.prev_hash != predecessor.event_hash {
                    issues.push(ChainIssue::ChainBreak {
                        event_id: event.event_id,
                        sequence: event.sequence,
                        expected: predecessor.event_hash.clone(),
                        found: event.prev_hash.clone(),
                    });
                }
            }
        }

        Ok(ChainReport {
            valid: issues.is_empty(),
            issues,
            events_checked: events.len(),
        })
    }
}
