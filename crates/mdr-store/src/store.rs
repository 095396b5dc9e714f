//! # Record Store Capability Trait
//!
//! The narrow interface through which this subsystem reaches the hosted
//! entity store: `get`, `list`, `update`, `insert`. Record kinds are
//! selected by the [`mdr_core::RecordKind`] enum, not by string-keyed
//! lookup; an unknown kind cannot be expressed.

use thiserror::Error;

use mdr_core::{RecordId, RecordKind, TenantId};
use serde_json::Value;

use crate::record::{Record, RecordPatch};

/// Error from the record store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No record with the given kind and id.
    #[error("record not found: {kind} {id}")]
    NotFound {
        /// The requested kind.
        kind: RecordKind,
        /// The requested id.
        id: RecordId,
    },

    /// A record with the given id already exists.
    #[error("record already exists: {kind} {id}")]
    AlreadyExists {
        /// The conflicting kind.
        kind: RecordKind,
        /// The conflicting id.
        id: RecordId,
    },

    /// Unexpected backend failure; propagates unmodified to the caller.
    #[error("store backend error: {0}")]
    Backend(String),
}

/// Filter for [`RecordStore::list`].
///
/// Supports the two scopes the rule sets need: tenant scoping and
/// equality on content fields (e.g. all identifiers issued by one agency).
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    tenant: Option<TenantId>,
    field_eq: Vec<(String, Value)>,
}

impl ListFilter {
    /// Match every record of the kind.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict to a tenant.
    pub fn tenant(mut self, tenant: TenantId) -> Self {
        self.tenant = Some(tenant);
        self
    }

    /// Restrict to records whose content field equals the given value.
    pub fn field_eq(mut self, name: impl Into<String>, value: Value) -> Self {
        self.field_eq.push((name.into(), value));
        self
    }

    /// Whether a record satisfies this filter.
    pub fn matches(&self, record: &Record) -> bool {
        if let Some(tenant) = &self.tenant {
            if &record.tenant != tenant {
                return false;
            }
        }
        self.field_eq
            .iter()
            .all(|(name, value)| record.field(name) == Some(value))
    }
}

/// The capability interface of the hosted entity store.
///
/// One implementation serves all record kinds; dispatch is by the
/// `RecordKind` enum. Implementations must be safe to share across
/// threads, since validation runs for distinct records may execute in
/// parallel.
pub trait RecordStore: Send + Sync {
    /// Fetch a record by kind and id.
    fn get(&self, kind: RecordKind, id: RecordId) -> Result<Record, StoreError>;

    /// List records of a kind matching the filter.
    fn list(&self, kind: RecordKind, filter: &ListFilter) -> Result<Vec<Record>, StoreError>;

    /// Apply a patch to a record, returning the merged record.
    fn update(
        &self,
        kind: RecordKind,
        id: RecordId,
        patch: &RecordPatch,
    ) -> Result<Record, StoreError>;

    /// Insert a new record.
    fn insert(&self, record: Record) -> Result<(), StoreError>;
}
