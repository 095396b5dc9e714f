//! # Ledger Events and Chain Hashing
//!
//! An event commits to a record snapshot and to its predecessor. The
//! snapshot is stored as canonical JSON text, so verification can
//! recompute the hash over exactly the bytes that were written.
//!
//! ## Hash Construction
//!
//! - Genesis: `SHA256("GENESIS:" + tenant + ":" + record_uuid)`.
//! - Event: `SHA256(canonical_payload_bytes || prev_hash_hex)`.
//!
//! Both render as lowercase hex. The genesis value ties a chain to its
//! tenant and record: an event block copied between records cannot
//! produce a verifying chain.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use mdr_core::{Actor, CanonicalBytes, EventId, RecordId, RecordKind, TenantId, Timestamp};

/// What a ledger event records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerEventKind {
    /// A committed lifecycle transition.
    StatusChange,
    /// A committed field update.
    Update,
}

impl std::fmt::Display for LedgerEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::StatusChange => "STATUS_CHANGE",
            Self::Update => "UPDATE",
        };
        f.write_str(s)
    }
}

/// One entry in a record's hash chain.
///
/// Append-only. Every field participates in tamper evidence: the payload
/// and prev-hash are covered by `event_hash`, and `prev_hash` links the
/// event to its predecessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEvent {
    /// Unique event identifier.
    pub event_id: EventId,
    /// Position in the chain, starting at 0.
    pub sequence: u64,
    /// The record's kind.
    pub kind: RecordKind,
    /// The record this event belongs to.
    pub record_id: RecordId,
    /// The tenant owning the record; part of the genesis derivation.
    pub tenant: TenantId,
    /// What happened.
    pub event_kind: LedgerEventKind,
    /// Canonical JSON text of the record snapshot at event time.
    pub canonical_payload: String,
    /// The predecessor's event hash, or the genesis hash for sequence 0.
    pub prev_hash: String,
    /// `SHA256(canonical_payload || prev_hash)`, lowercase hex.
    pub event_hash: String,
    /// Actor on whose behalf the change was committed.
    pub actor: Actor,
    /// When the event was recorded.
    pub recorded_at: Timestamp,
}

/// SHA-256 of raw bytes, rendered lowercase hex.
fn sha256_hex_raw(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// The genesis hash anchoring a record's chain:
/// `SHA256("GENESIS:" + tenant + ":" + record_uuid)`.
pub fn genesis_hash(tenant: &TenantId, record_id: RecordId) -> String {
    let input = format!("GENESIS:{}:{}", tenant.as_str(), record_id.as_uuid());
    sha256_hex_raw(input.as_bytes())
}

/// The event hash for a fresh append: canonical payload bytes followed by
/// the previous hash's hex text.
///
/// Accepts `&CanonicalBytes` so that every appended payload went through
/// the canonicalization pipeline.
pub fn compute_event_hash(payload: &CanonicalBytes, prev_hash: &str) -> String {
    let mut input = Vec::with_capacity(payload.len() + prev_hash.len());
    input.extend_from_slice(payload.as_bytes());
    input.extend_from_slice(prev_hash.as_bytes());
    sha256_hex_raw(&input)
}

/// The event hash recomputed from a *stored* payload during verification.
///
/// Hashes the stored text exactly as written; re-canonicalizing here
/// would launder a payload edited in place.
pub fn recompute_event_hash(stored_payload: &str, prev_hash: &str) -> String {
    let mut input = Vec::with_capacity(stored_payload.len() + prev_hash.len());
    input.extend_from_slice(stored_payload.as_bytes());
    input.extend_from_slice(prev_hash.as_bytes());
    sha256_hex_raw(&input)
}
