//! # The Generic Regulatory Record
//!
//! Records are owned by the hosted entity store; this core reads them and
//! requests updates. The lifecycle metadata (`status`, `last_validated_at`,
//! `exported_at`) is typed, while kind-specific content lives in `fields`
//! as a JSON object so the same machinery serves all record kinds.
//!
//! Updates travel as a [`RecordPatch`]: explicit set/clear operations for
//! the typed metadata and a shallow merge map for fields. A patch is a
//! request; only the store applies it.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use mdr_core::{RecordId, RecordKind, RecordStatus, TenantId, Timestamp};

/// A regulatory record under validation.
///
/// Serializes with stable key names; the ledger canonicalizes the full
/// serialized form as the event payload, so every field here is part of
/// the tamper-evident snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// The kind of record.
    pub kind: RecordKind,
    /// Unique identifier.
    pub id: RecordId,
    /// Owning tenant.
    pub tenant: TenantId,
    /// Lifecycle status.
    pub status: RecordStatus,
    /// Actor that created the record.
    pub created_by: String,
    /// Creation time.
    pub created_at: Timestamp,
    /// When the record last passed validation; cleared when a Ready record
    /// is mutated.
    pub last_validated_at: Option<Timestamp>,
    /// When the record was exported.
    pub exported_at: Option<Timestamp>,
    /// Kind-specific content.
    pub fields: Map<String, Value>,
}

impl Record {
    /// Create a draft record with the given content fields.
    pub fn new(
        kind: RecordKind,
        tenant: TenantId,
        created_by: impl Into<String>,
        created_at: Timestamp,
        fields: Map<String, Value>,
    ) -> Self {
        Self {
            kind,
            id: RecordId::new(),
            tenant,
            status: RecordStatus::Draft,
            created_by: created_by.into(),
            created_at,
            last_validated_at: None,
            exported_at: None,
            fields,
        }
    }

    /// Look up a content field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Look up a content field as a string, treating `null` as absent.
    pub fn field_str(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Whether a content field is present and non-empty.
    ///
    /// `null` and the empty string both count as absent: hosted stores
    /// routinely round-trip cleared form inputs as either.
    pub fn has_field(&self, name: &str) -> bool {
        match self.fields.get(name) {
            None | Some(Value::Null) => false,
            Some(Value::String(s)) => !s.trim().is_empty(),
            Some(_) => true,
        }
    }

    /// Apply a patch, producing the merged record.
    pub fn apply_patch(&self, patch: &RecordPatch) -> Record {
        let mut next = self.clone();
        if let Some(status) = patch.status {
            next.status = status;
        }
        if let Some(value) = patch.last_validated_at {
            next.last_validated_at = value;
        }
        if let Some(value) = patch.exported_at {
            next.exported_at = value;
        }
        for (k, v) in &patch.fields {
            next.fields.insert(k.clone(), v.clone());
        }
        next
    }
}

/// A requested update to a record.
///
/// Typed metadata uses `Option<Option<_>>` so that "leave unchanged",
/// "set", and "clear" are three distinct states.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordPatch {
    /// New status, when the lifecycle layer commits a transition.
    pub status: Option<RecordStatus>,
    /// `Some(Some(t))` sets, `Some(None)` clears, `None` leaves unchanged.
    pub last_validated_at: Option<Option<Timestamp>>,
    /// `Some(Some(t))` sets, `Some(None)` clears, `None` leaves unchanged.
    pub exported_at: Option<Option<Timestamp>>,
    /// Shallow merge into the record's content fields.
    pub fields: Map<String, Value>,
}

impl RecordPatch {
    /// A patch that only merges content fields.
    pub fn fields(fields: Map<String, Value>) -> Self {
        Self { fields, ..Self::default() }
    }

    /// A patch that only changes status.
    pub fn status(status: RecordStatus) -> Self {
        Self { status: Some(status), ..Self::default() }
    }

    /// Set the status on this patch.
    pub fn with_status(mut self, status: RecordStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Set `last_validated_at` on this patch.
    pub fn with_last_validated_at(mut self, at: Timestamp) -> Self {
        self.last_validated_at = Some(Some(at));
        self
    }

    /// Clear `last_validated_at` on this patch.
    pub fn clearing_last_validated_at(mut self) -> Self {
        self.last_validated_at = Some(None);
        self
    }

    /// Set `exported_at` on this patch.
    pub fn with_exported_at(mut self, at: Timestamp) -> Self {
        self.exported_at = Some(Some(at));
        self
    }

    /// Whether the patch requests no changes at all.
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.last_validated_at.is_none()
            && self.exported_at.is_none()
            && self.fields.is_empty()
    }
}
