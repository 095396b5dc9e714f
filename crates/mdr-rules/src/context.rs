//! # Rule Context
//!
//! Rules are pure functions of (record, context). The context builder is
//! the one component allowed to reach across records: it resolves declared
//! references, assembles the sibling sets uniqueness checks need, and
//! pins the evaluation time. Rules themselves never touch the store.
//!
//! ## Absence Is Data
//!
//! A dangling reference or a missing collaborator record is a condition
//! for rules to judge, not an error: lookups that find nothing produce
//! [`ReferenceState::Dangling`], and only unexpected backend failures
//! propagate. The builder never mutates the record or its collaborators.

use std::sync::Arc;
use uuid::Uuid;

use mdr_core::{RecordId, RecordKind, Timestamp};
use mdr_store::{Clock, ListFilter, Record, RecordStore, StoreError};

/// The resolution state of a declared cross-record reference.
#[derive(Debug, Clone, Default)]
pub enum ReferenceState {
    /// The record declares no reference.
    #[default]
    NotDeclared,
    /// The record declares a reference that resolves to nothing.
    Dangling {
        /// The raw reference value as stored on the record.
        reference: String,
    },
    /// The reference resolves to a live record.
    Resolved(Box<Record>),
}

impl ReferenceState {
    /// Whether the reference resolved.
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

/// Read-only cross-record data handed to rule predicates.
///
/// Every field is populated only when the record kind needs it; the
/// defaults are the empty states.
#[derive(Debug, Clone)]
pub struct RuleContext {
    /// Evaluation time, pinned once per run so date rules are pure.
    pub now: Timestamp,
    /// DeviceIdentifier → parent DeviceModel.
    pub parent_device: ReferenceState,
    /// DeviceModel → manufacturer EconomicOperator.
    pub manufacturer: ReferenceState,
    /// Certificate → issuing authority EconomicOperator.
    pub issuing_authority: ReferenceState,
    /// SurveillanceCase → affected DeviceModel.
    pub device: ReferenceState,
    /// Identifier values of sibling DeviceIdentifiers in the same
    /// (tenant, issuing agency) scope, excluding the record itself.
    pub sibling_identifier_values: Vec<String>,
    /// Count of DeviceIdentifier records referencing this DeviceModel.
    pub registered_identifier_count: usize,
}

impl RuleContext {
    /// An empty context at the given instant.
    pub fn empty(now: Timestamp) -> Self {
        Self {
            now,
            parent_device: ReferenceState::NotDeclared,
            manufacturer: ReferenceState::NotDeclared,
            issuing_authority: ReferenceState::NotDeclared,
            device: ReferenceState::NotDeclared,
            sibling_identifier_values: Vec::new(),
            registered_identifier_count: 0,
        }
    }
}

/// Assembles the minimum relational data a rule set needs.
pub struct ContextBuilder {
    store: Arc<dyn RecordStore>,
    clock: Arc<dyn Clock>,
}

impl ContextBuilder {
    /// A builder over the given store and clock.
    pub fn new(store: Arc<dyn RecordStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Build the context for one record.
    ///
    /// # Errors
    ///
    /// Only unexpected backend failures. Missing collaborators surface as
    /// `ReferenceState::Dangling` inside the context.
    pub fn build(&self, record: &Record) -> Result<RuleContext, StoreError> {
        let mut ctx = RuleContext::empty(self.clock.now());
        match record.kind {
            RecordKind::EconomicOperator => {}
            RecordKind::DeviceModel => {
                ctx.manufacturer =
                    self.resolve(record, "manufacturer_ref", RecordKind::EconomicOperator)?;
                ctx.registered_identifier_count =
                    self.identifiers_referencing(record)?;
            }
            RecordKind::DeviceIdentifier => {
                ctx.parent_device =
                    self.resolve(record, "device_ref", RecordKind::DeviceModel)?;
                ctx.sibling_identifier_values = self.sibling_values(record)?;
            }
            RecordKind::Certificate => {
                ctx.issuing_authority =
                    self.resolve(record, "issuing_authority_ref", RecordKind::EconomicOperator)?;
            }
            RecordKind::SurveillanceCase => {
                ctx.device = self.resolve(record, "device_ref", RecordKind::DeviceModel)?;
            }
        }
        Ok(ctx)
    }

    /// Resolve a reference field against the store.
    fn resolve(
        &self,
        record: &Record,
        field: &str,
        target: RecordKind,
    ) -> Result<ReferenceState, StoreError> {
        let Some(raw) = record.field_str(field).filter(|s| !s.trim().is_empty()) else {
            return Ok(ReferenceState::NotDeclared);
        };
        // An unparseable reference cannot resolve; that is a data
        // condition on the record, not a failure of the builder.
        let Ok(uuid) = Uuid::parse_str(raw.trim()) else {
            return Ok(ReferenceState::Dangling { reference: raw.to_string() });
        };
        match self.store.get(target, RecordId(uuid)) {
            Ok(found) => Ok(ReferenceState::Resolved(Box::new(found))),
            Err(StoreError::NotFound { .. }) => {
                Ok(ReferenceState::Dangling { reference: raw.to_string() })
            }
            Err(other) => Err(other),
        }
    }

    /// Identifier values of siblings in the same (tenant, issuing agency)
    /// scope, excluding the record itself.
    fn sibling_values(&self, record: &Record) -> Result<Vec<String>, StoreError> {
        let Some(agency) = record.field_str("issuing_agency") else {
            return Ok(Vec::new());
        };
        let filter = ListFilter::all()
            .tenant(record.tenant.clone())
            .field_eq("issuing_agency", serde_json::Value::String(agency.to_string()));
        let siblings = self.store.list(RecordKind::DeviceIdentifier, &filter)?;
        Ok(siblings
            .into_iter()
            .filter(|s| s.id != record.id)
            .filter_map(|s| s.field_str("identifier_value").map(str::to_string))
            .collect())
    }

    /// Count the DeviceIdentifier records that reference this DeviceModel.
    fn identifiers_referencing(&self, record: &Record) -> Result<usize, StoreError> {
        let filter = ListFilter::all().tenant(record.tenant.clone()).field_eq(
            "device_ref",
            serde_json::Value::String(record.id.as_uuid().to_string()),
        );
        Ok(self.store.list(RecordKind::DeviceIdentifier, &filter)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdr_core::TenantId;
    use mdr_store::{FixedClock, InMemoryRecordStore};
    use serde_json::{Map, Value};

    fn ts() -> Timestamp {
        Timestamp::parse("2026-03-01T09:00:00Z").unwrap()
    }

    fn record(kind: RecordKind, fields: &[(&str, &str)]) -> Record {
        let mut map = Map::new();
        for (k, v) in fields {
            map.insert((*k).into(), Value::String((*v).into()));
        }
        Record::new(kind, TenantId::new("acme"), "tester", ts(), map)
    }

    fn builder(store: Arc<InMemoryRecordStore>) -> ContextBuilder {
        ContextBuilder::new(store, Arc::new(FixedClock(ts())))
    }

    #[test]
    fn test_operator_context_is_empty() {
        let store = Arc::new(InMemoryRecordStore::new());
        let op = record(RecordKind::EconomicOperator, &[("legal_name", "Acme")]);
        let ctx = builder(store).build(&op).unwrap();
        assert!(matches!(ctx.manufacturer, ReferenceState::NotDeclared));
        assert_eq!(ctx.now, ts());
    }

    #[test]
    fn test_manufacturer_resolves() {
        let store = Arc::new(InMemoryRecordStore::new());
        let op = record(RecordKind::EconomicOperator, &[("legal_name", "Acme")]);
        let op_id = op.id;
        store.insert(op).unwrap();
        let device = record(
            RecordKind::DeviceModel,
            &[("manufacturer_ref", &op_id.as_uuid().to_string())],
        );
        let ctx = builder(store).build(&device).unwrap();
        assert!(ctx.manufacturer.is_resolved());
    }

    #[test]
    fn test_missing_manufacturer_is_dangling_not_error() {
        let store = Arc::new(InMemoryRecordStore::new());
        let device = record(
            RecordKind::DeviceModel,
            &[("manufacturer_ref", "7a3c2f9e-0000-4000-8000-000000000001")],
        );
        let ctx = builder(store).build(&device).unwrap();
        assert!(matches!(ctx.manufacturer, ReferenceState::Dangling { .. }));
    }

    #[test]
    fn test_unparseable_reference_is_dangling() {
        let store = Arc::new(InMemoryRecordStore::new());
        let device = record(RecordKind::DeviceModel, &[("manufacturer_ref", "not-a-uuid")]);
        let ctx = builder(store).build(&device).unwrap();
        match ctx.manufacturer {
            ReferenceState::Dangling { reference } => assert_eq!(reference, "not-a-uuid"),
            other => panic!("expected Dangling, got {other:?}"),
        }
    }

    #[test]
    fn test_sibling_values_exclude_self_and_other_agencies() {
        let store = Arc::new(InMemoryRecordStore::new());
        let a = record(
            RecordKind::DeviceIdentifier,
            &[("issuing_agency", "GS1"), ("identifier_value", "04012345")],
        );
        let b = record(
            RecordKind::DeviceIdentifier,
            &[("issuing_agency", "GS1"), ("identifier_value", "04099999")],
        );
        let c = record(
            RecordKind::DeviceIdentifier,
            &[("issuing_agency", "HIBCC"), ("identifier_value", "H777")],
        );
        store.insert(a.clone()).unwrap();
        store.insert(b).unwrap();
        store.insert(c).unwrap();

        let ctx = builder(store).build(&a).unwrap();
        assert_eq!(ctx.sibling_identifier_values, vec!["04099999".to_string()]);
    }

    #[test]
    fn test_identifier_count_for_device_model() {
        let store = Arc::new(InMemoryRecordStore::new());
        let device = record(RecordKind::DeviceModel, &[("risk_class", "IIa")]);
        let device_ref = device.id.as_uuid().to_string();
        store.insert(device.clone()).unwrap();
        for value in ["04010001", "04010002"] {
            store
                .insert(record(
                    RecordKind::DeviceIdentifier,
                    &[
                        ("issuing_agency", "GS1"),
                        ("identifier_value", value),
                        ("device_ref", &device_ref),
                    ],
                ))
                .unwrap();
        }
        let ctx = builder(store).build(&device).unwrap();
        assert_eq!(ctx.registered_identifier_count, 2);
    }
}
