//! End-to-end lifecycle flows over the in-memory collaborators: drafts
//! promoted through the gate, mutated while Ready, and audited against
//! the ledger afterwards.

use std::sync::Arc;

use serde_json::{Map, Value};

use mdr_core::{Outcome, RecordId, RecordKind, RecordStatus, TenantId, Timestamp};
use mdr_ledger::{InMemoryLedgerStore, Ledger, LedgerEventKind, LedgerStore};
use mdr_lifecycle::{PromotionError, PromotionService};
use mdr_rules::{InMemoryRunStore, RunStore, Validator};
use mdr_store::{FixedClock, InMemoryRecordStore, Record, RecordStore, StaticIdentity};

struct Harness {
    records: Arc<InMemoryRecordStore>,
    runs: Arc<InMemoryRunStore>,
    events: Arc<InMemoryLedgerStore>,
    service: PromotionService,
}

fn ts() -> Timestamp {
    Timestamp::parse("2026-03-01T09:00:00Z").unwrap()
}

fn harness() -> Harness {
    let records = Arc::new(InMemoryRecordStore::new());
    let runs = Arc::new(InMemoryRunStore::new());
    let events = Arc::new(InMemoryLedgerStore::new());
    let identity: Arc<StaticIdentity> =
        Arc::new(StaticIdentity::named("auditor@acme.example"));
    let clock: Arc<FixedClock> = Arc::new(FixedClock(ts()));

    let validator = Validator::new(
        records.clone(),
        runs.clone(),
        identity.clone(),
        clock.clone(),
    );
    let ledger = Ledger::new(events.clone(), identity, clock.clone());
    let service = PromotionService::new(records.clone(), validator, ledger, clock);

    Harness { records, runs, events, service }
}

fn record(kind: RecordKind, fields: &[(&str, &str)]) -> Record {
    let mut map = Map::new();
    for (k, v) in fields {
        map.insert((*k).into(), Value::String((*v).into()));
    }
    Record::new(kind, TenantId::new("acme"), "tester", ts(), map)
}

fn seed_complete_operator(h: &Harness) -> RecordId {
    let op = record(
        RecordKind::EconomicOperator,
        &[
            ("legal_name", "Acme Medical GmbH"),
            ("country", "DE"),
            ("srn", "DE-MF-000012345"),
            ("contact_email", "compliance@acme.example"),
        ],
    );
    let id = op.id;
    h.records.insert(op).unwrap();
    id
}

#[test]
fn full_promotion_run_leaves_a_verifiable_ledger_trail() {
    let h = harness();
    let id = seed_complete_operator(&h);
    let kind = RecordKind::EconomicOperator;

    h.service.promote(kind, id, RecordStatus::Validated).unwrap();
    h.service.promote(kind, id, RecordStatus::Ready).unwrap();
    h.service.promote(kind, id, RecordStatus::Exported).unwrap();

    let events = h.events.events_for(kind, id).unwrap();
    assert_eq!(events.len(), 3);
    assert!(events
        .iter()
        .all(|e| e.event_kind == LedgerEventKind::StatusChange));
    assert!(events[2].canonical_payload.contains("\"EXPORTED\""));

    // Independent audit pass over the chain the service produced.
    let identity: Arc<StaticIdentity> = Arc::new(StaticIdentity::named("verifier"));
    let auditor = Ledger::new(h.events.clone(), identity, Arc::new(FixedClock(ts())));
    let report = auditor.verify_chain(kind, id).unwrap();
    assert!(report.valid);
    assert_eq!(report.events_checked, 3);
}

#[test]
fn device_model_with_two_missing_links_fails_with_two_criticals() {
    let h = harness();
    // Valid risk class, no manufacturer reference, no identifier records.
    let device = record(
        RecordKind::DeviceModel,
        &[("risk_class", "III"), ("description", "implantable pulse generator")],
    );
    let id = device.id;
    h.records.insert(device).unwrap();

    h.service
        .promote(RecordKind::DeviceModel, id, RecordStatus::Validated)
        .unwrap();
    let err = h
        .service
        .promote(RecordKind::DeviceModel, id, RecordStatus::Ready)
        .unwrap_err();
    match err {
        PromotionError::ValidationBlocked { critical_issues, total_issues } => {
            assert_eq!(critical_issues, 2);
            assert_eq!(total_issues, 2);
        }
        other => panic!("expected ValidationBlocked, got {other:?}"),
    }

    // The denied gate still leaves an audit trail: a persisted Fail run,
    // no status change, no ledger event.
    let latest = h.runs.latest_for(RecordKind::DeviceModel, id).unwrap().unwrap();
    assert_eq!(latest.outcome, Outcome::Fail);
    assert_eq!(latest.critical_issues, 2);
    let refetched = h.records.get(RecordKind::DeviceModel, id).unwrap();
    assert_eq!(refetched.status, RecordStatus::Validated);
    // Only the draft->validated transition reached the ledger.
    assert_eq!(h.events.events_for(RecordKind::DeviceModel, id).unwrap().len(), 1);
}

#[test]
fn fixing_the_record_unblocks_the_gate() {
    let h = harness();
    let manufacturer_id = seed_complete_operator(&h);

    let device = record(RecordKind::DeviceModel, &[("risk_class", "IIa")]);
    let device_id = device.id;
    h.records.insert(device).unwrap();
    h.service
        .promote(RecordKind::DeviceModel, device_id, RecordStatus::Validated)
        .unwrap();
    assert!(h
        .service
        .promote(RecordKind::DeviceModel, device_id, RecordStatus::Ready)
        .is_err());

    // Link the manufacturer and register an identifier for the model.
    let mut patch = Map::new();
    patch.insert(
        "manufacturer_ref".into(),
        Value::String(manufacturer_id.as_uuid().to_string()),
    );
    h.service
        .apply_update(RecordKind::DeviceModel, device_id, patch)
        .unwrap();
    let identifier = record(
        RecordKind::DeviceIdentifier,
        &[
            ("issuing_agency", "GS1"),
            ("identifier_value", "04012345000017"),
            ("device_ref", &device_id.as_uuid().to_string()),
        ],
    );
    h.records.insert(identifier).unwrap();

    let promotion = h
        .service
        .promote(RecordKind::DeviceModel, device_id, RecordStatus::Ready)
        .unwrap();
    assert_eq!(promotion.to, RecordStatus::Ready);
}

#[test]
fn mutating_a_ready_record_forces_revalidation() {
    let h = harness();
    let id = seed_complete_operator(&h);
    let kind = RecordKind::EconomicOperator;

    h.service.promote(kind, id, RecordStatus::Validated).unwrap();
    h.service.promote(kind, id, RecordStatus::Ready).unwrap();
    let ready = h.records.get(kind, id).unwrap();
    assert_eq!(ready.last_validated_at, Some(ts()));

    let mut patch = Map::new();
    patch.insert("country".into(), Value::String("FR".into()));
    h.service.apply_update(kind, id, patch).unwrap();

    let downgraded = h.records.get(kind, id).unwrap();
    assert_eq!(downgraded.status, RecordStatus::Validated);
    assert_eq!(downgraded.last_validated_at, None);

    // Export now requires going through the gate again.
    let err = h.service.promote(kind, id, RecordStatus::Exported).unwrap_err();
    assert!(matches!(err, PromotionError::InvalidTransition { .. }));
    h.service.promote(kind, id, RecordStatus::Ready).unwrap();
    h.service.promote(kind, id, RecordStatus::Exported).unwrap();
}

#[test]
fn update_events_carry_the_merged_snapshot() {
    let h = harness();
    let id = seed_complete_operator(&h);
    let kind = RecordKind::EconomicOperator;

    let mut patch = Map::new();
    patch.insert("legal_name".into(), Value::String("Acme Medical SE".into()));
    h.service.apply_update(kind, id, patch).unwrap();

    let events = h.events.events_for(kind, id).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event_kind, LedgerEventKind::Update);
    assert!(events[0].canonical_payload.contains("Acme Medical SE"));
    assert_eq!(events[0].actor.id, "auditor@acme.example");
}

#[test]
fn validation_runs_accumulate_per_promotion_attempt() {
    let h = harness();
    let id = seed_complete_operator(&h);
    let kind = RecordKind::EconomicOperator;

    h.service.promote(kind, id, RecordStatus::Validated).unwrap();
    h.service.promote(kind, id, RecordStatus::Ready).unwrap();
    h.service.promote(kind, id, RecordStatus::Validated).unwrap();
    h.service.promote(kind, id, RecordStatus::Ready).unwrap();

    // Each promotion to Ready re-ran validation.
    assert_eq!(h.runs.all_for(kind, id).unwrap().len(), 2);
}
