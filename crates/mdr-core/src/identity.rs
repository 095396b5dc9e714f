//! # Domain Identity Newtypes
//!
//! Newtype wrappers for the identifier namespaces of the MDR Stack. You
//! cannot pass a `RunId` where an `EventId` is expected; cross-namespace
//! confusion is a compile error.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a regulatory record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RecordId(pub Uuid);

/// Unique identifier for a validation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(pub Uuid);

/// Unique identifier for a ledger event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

/// The tenant that owns a set of records. Scopes uniqueness checks and the
/// genesis hash of every ledger chain.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TenantId(pub String);

/// The actor stamped into validation runs and ledger events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Stable actor identifier.
    pub id: String,
    /// Contact email, when the identity source provides one.
    pub email: Option<String>,
}

impl RecordId {
    /// Generate a new random record identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl RunId {
    /// Generate a new random run identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl EventId {
    /// Generate a new random event identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl TenantId {
    /// Wrap a tenant slug.
    pub fn new(slug: impl Into<String>) -> Self {
        Self(slug.into())
    }

    /// The tenant slug as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Actor {
    /// An actor with an id and no email.
    pub fn from_id(id: impl Into<String>) -> Self {
        Self { id: id.into(), email: None }
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "record:{}", self.0)
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "run:{}", self.0)
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "event:{}", self.0)
    }
}

impl std::fmt::Display for TenantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_ids_are_unique() {
        assert_ne!(RecordId::new(), RecordId::new());
    }

    #[test]
    fn test_display_prefixes() {
        let id = RecordId::new();
        assert!(id.to_string().starts_with("record:"));
        assert!(RunId::new().to_string().starts_with("run:"));
        assert!(EventId::new().to_string().starts_with("event:"));
    }

    #[test]
    fn test_tenant_id_display_is_bare_slug() {
        let t = TenantId::new("acme-med");
        assert_eq!(t.to_string(), "acme-med");
        assert_eq!(t.as_str(), "acme-med");
    }

    #[test]
    fn test_serde_roundtrip() {
        let id = RecordId::new();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: RecordId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }
}
