//! # The Promotion Service
//!
//! Orchestrates store, validator, and ledger for the two mutating
//! operations exposed to callers: `promote` and `apply_update`. The
//! service owns the flow; the collaborators stay narrow.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use mdr_core::{RecordId, RecordKind, RecordStatus, RunId, Severity};
use mdr_ledger::{Ledger, LedgerError, LedgerEventKind};
use mdr_rules::{ValidationError, Validator};
use mdr_store::{Clock, Record, RecordPatch, RecordStore, StoreError};

/// Error from a promotion or update request.
#[derive(Error, Debug)]
pub enum PromotionError {
    /// The requested transition is not in the legal table.
    #[error("invalid transition: {from} -> {to}")]
    InvalidTransition {
        /// The record's current status.
        from: RecordStatus,
        /// The requested status.
        to: RecordStatus,
    },

    /// Promotion to Ready was denied by the validation gate. Carries the
    /// issue counts so the caller can render remediation guidance.
    #[error("promotion blocked by validation: {critical_issues} critical of {total_issues} issues")]
    ValidationBlocked {
        /// Number of critical issues found.
        critical_issues: usize,
        /// Total number of issues found.
        total_issues: usize,
    },

    /// The validation run itself failed (missing record, unknown rule
    /// set, faulting predicate).
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The ledger append failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The record store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A committed promotion.
#[derive(Debug, Clone, Serialize)]
pub struct Promotion {
    /// Status before the transition.
    pub from: RecordStatus,
    /// Status after the transition.
    pub to: RecordStatus,
    /// The gating validation run, when the target was Ready.
    pub run_id: Option<RunId>,
    /// Hash of the ledger event recording the transition.
    pub event_hash: String,
}

/// Validation-gated lifecycle operations over one record store.
pub struct PromotionService {
    store: Arc<dyn RecordStore>,
    validator: Validator,
    ledger: Ledger,
    clock: Arc<dyn Clock>,
}

impl PromotionService {
    /// A service over the given collaborators.
    pub fn new(
        store: Arc<dyn RecordStore>,
        validator: Validator,
        ledger: Ledger,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { store, validator, ledger, clock }
    }

    /// Promote a record to a new lifecycle status.
    ///
    /// Promotion to Ready re-runs validation and is denied with
    /// [`PromotionError::ValidationBlocked`] on a Fail outcome, leaving
    /// the status untouched. On success the status change is committed to
    /// the store and appended to the ledger as a STATUS_CHANGE event.
    pub fn promote(
        &self,
        kind: RecordKind,
        id: RecordId,
        target: RecordStatus,
    ) -> Result<Promotion, PromotionError> {
        let record = self.store.get(kind, id)?;
        let from = record.status;
        if !from.may_transition_to(target) {
            return Err(PromotionError::InvalidTransition { from, to: target });
        }

        let mut run_id = None;
        if target == RecordStatus::Ready {
            let report = self.validator.validate(kind, id, kind.module())?;
            if !report.can_promote {
                let critical = report
                    .issues
                    .iter()
                    .filter(|i| i.severity == Severity::Critical)
                    .count();
                tracing::info!(
                    kind = %kind,
                    record = %id,
                    critical,
                    total = report.issues.len(),
                    "promotion to READY blocked by validation"
                );
                return Err(PromotionError::ValidationBlocked {
                    critical_issues: critical,
                    total_issues: report.issues.len(),
                });
            }
            run_id = Some(report.run_id);
        }

        let now = self.clock.now();
        let mut patch = RecordPatch::status(target);
        if matches!(target, RecordStatus::Validated | RecordStatus::Ready) {
            patch = patch.with_last_validated_at(now);
        }
        if target == RecordStatus::Exported {
            patch = patch.with_exported_at(now);
        }

        let updated = self.store.update(kind, id, &patch)?;
        let event = self.ledger.append_event(&updated, LedgerEventKind::StatusChange)?;

        tracing::info!(
            kind = %kind,
            record = %id,
            from = %from,
            to = %target,
            event_hash = %event.event_hash,
            "record promoted"
        );
        Ok(Promotion { from, to: target, run_id, event_hash: event.event_hash })
    }

    /// Apply a field update to a record.
    ///
    /// A record mutated while Ready is first downgraded to Validated with
    /// `last_validated_at` cleared, so the next promotion must re-validate.
    /// The merged snapshot is appended to the ledger as an UPDATE event.
    pub fn apply_update(
        &self,
        kind: RecordKind,
        id: RecordId,
        fields: Map<String, Value>,
    ) -> Result<Record, PromotionError> {
        let record = self.store.get(kind, id)?;

        if record.status == RecordStatus::Ready {
            let downgrade = RecordPatch::status(RecordStatus::Validated)
                .clearing_last_validated_at();
            self.store.update(kind, id, &downgrade)?;
            tracing::info!(
                kind = %kind,
                record = %id,
                "READY record mutated; downgraded to VALIDATED pending re-validation"
            );
        }

        let merged = self.store.update(kind, id, &RecordPatch::fields(fields))?;
        self.ledger.append_event(&merged, LedgerEventKind::Update)?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdr_core::{TenantId, Timestamp};
    use mdr_ledger::InMemoryLedgerStore;
    use mdr_rules::InMemoryRunStore;
    use mdr_store::{FixedClock, InMemoryRecordStore, StaticIdentity};

    fn ts() -> Timestamp {
        Timestamp::parse("2026-03-01T09:00:00Z").unwrap()
    }

    fn service(store: Arc<InMemoryRecordStore>) -> PromotionService {
        let identity: Arc<StaticIdentity> = Arc::new(StaticIdentity::named("auditor@acme.example"));
        let clock: Arc<FixedClock> = Arc::new(FixedClock(ts()));
        let validator = Validator::new(
            store.clone(),
            Arc::new(InMemoryRunStore::new()),
            identity.clone(),
            clock.clone(),
        );
        let ledger = Ledger::new(
            Arc::new(InMemoryLedgerStore::new()),
            identity,
            clock.clone(),
        );
        PromotionService::new(store, validator, ledger, clock)
    }

    fn operator(fields: &[(&str, &str)]) -> Record {
        let mut map = Map::new();
        for (k, v) in fields {
            map.insert((*k).into(), Value::String((*v).into()));
        }
        Record::new(
            RecordKind::EconomicOperator,
            TenantId::new("acme"),
            "tester",
            ts(),
            map,
        )
    }

    #[test]
    fn test_illegal_transition_rejected_before_any_side_effect() {
        let store = Arc::new(InMemoryRecordStore::new());
        let r = operator(&[("legal_name", "Acme")]);
        let id = r.id;
        store.insert(r).unwrap();

        let err = service(store.clone())
            .promote(RecordKind::EconomicOperator, id, RecordStatus::Exported)
            .unwrap_err();
        match err {
            PromotionError::InvalidTransition { from, to } => {
                assert_eq!(from, RecordStatus::Draft);
                assert_eq!(to, RecordStatus::Exported);
            }
            other => panic!("expected InvalidTransition, got {other:?}"),
        }
        let unchanged = store.get(RecordKind::EconomicOperator, id).unwrap();
        assert_eq!(unchanged.status, RecordStatus::Draft);
    }

    #[test]
    fn test_promote_to_validated_needs_no_gate() {
        let store = Arc::new(InMemoryRecordStore::new());
        // An empty draft promotes to Validated; the gate only guards Ready.
        let r = operator(&[]);
        let id = r.id;
        store.insert(r).unwrap();

        let promotion = service(store.clone())
            .promote(RecordKind::EconomicOperator, id, RecordStatus::Validated)
            .unwrap();
        assert_eq!(promotion.to, RecordStatus::Validated);
        assert!(promotion.run_id.is_none());

        let updated = store.get(RecordKind::EconomicOperator, id).unwrap();
        assert_eq!(updated.status, RecordStatus::Validated);
        assert_eq!(updated.last_validated_at, Some(ts()));
    }

    #[test]
    fn test_promote_to_ready_blocked_by_critical_issues() {
        let store = Arc::new(InMemoryRecordStore::new());
        // Missing legal name and country: two critical rules fail.
        let r = operator(&[("srn", "DE-MF-000012345")]);
        let id = r.id;
        store.insert(r).unwrap();
        let svc = service(store.clone());

        svc.promote(RecordKind::EconomicOperator, id, RecordStatus::Validated)
            .unwrap();
        let err = svc
            .promote(RecordKind::EconomicOperator, id, RecordStatus::Ready)
            .unwrap_err();
        match err {
            PromotionError::ValidationBlocked { critical_issues, total_issues } => {
                assert_eq!(critical_issues, 2);
                assert!(total_issues >= critical_issues);
            }
            other => panic!("expected ValidationBlocked, got {other:?}"),
        }
        // Status untouched by the denied promotion.
        let record = store.get(RecordKind::EconomicOperator, id).unwrap();
        assert_eq!(record.status, RecordStatus::Validated);
    }

    #[test]
    fn test_promote_to_ready_succeeds_with_warnings() {
        let store = Arc::new(InMemoryRecordStore::new());
        // Criticals satisfied; the malformed SRN is only a major issue.
        let r = operator(&[("legal_name", "Acme"), ("country", "DE"), ("srn", "oops")]);
        let id = r.id;
        store.insert(r).unwrap();
        let svc = service(store.clone());

        svc.promote(RecordKind::EconomicOperator, id, RecordStatus::Validated)
            .unwrap();
        let promotion = svc
            .promote(RecordKind::EconomicOperator, id, RecordStatus::Ready)
            .unwrap();
        assert_eq!(promotion.to, RecordStatus::Ready);
        assert!(promotion.run_id.is_some());
    }

    #[test]
    fn test_update_while_ready_downgrades_and_clears_timestamp() {
        let store = Arc::new(InMemoryRecordStore::new());
        let r = operator(&[("legal_name", "Acme"), ("country", "DE"),
                           ("srn", "DE-MF-000012345"), ("contact_email", "c@acme.example")]);
        let id = r.id;
        store.insert(r).unwrap();
        let svc = service(store.clone());

        svc.promote(RecordKind::EconomicOperator, id, RecordStatus::Validated)
            .unwrap();
        svc.promote(RecordKind::EconomicOperator, id, RecordStatus::Ready)
            .unwrap();

        let mut patch = Map::new();
        patch.insert("legal_name".into(), Value::String("Acme Medical GmbH".into()));
        let merged = svc
            .apply_update(RecordKind::EconomicOperator, id, patch)
            .unwrap();

        assert_eq!(merged.status, RecordStatus::Validated);
        assert_eq!(merged.last_validated_at, None);
        assert_eq!(merged.field_str("legal_name"), Some("Acme Medical GmbH"));

        let refetched = store.get(RecordKind::EconomicOperator, id).unwrap();
        assert_eq!(refetched.status, RecordStatus::Validated);
        assert_eq!(refetched.last_validated_at, None);
    }

    #[test]
    fn test_update_below_ready_does_not_touch_status() {
        let store = Arc::new(InMemoryRecordStore::new());
        let r = operator(&[("legal_name", "Acme")]);
        let id = r.id;
        store.insert(r).unwrap();

        let mut patch = Map::new();
        patch.insert("country".into(), Value::String("DE".into()));
        let merged = service(store.clone())
            .apply_update(RecordKind::EconomicOperator, id, patch)
            .unwrap();
        assert_eq!(merged.status, RecordStatus::Draft);
    }

    #[test]
    fn test_export_stamps_exported_at() {
        let store = Arc::new(InMemoryRecordStore::new());
        let r = operator(&[("legal_name", "Acme"), ("country", "DE"),
                           ("srn", "DE-MF-000012345"), ("contact_email", "c@acme.example")]);
        let id = r.id;
        store.insert(r).unwrap();
        let svc = service(store.clone());

        for target in [RecordStatus::Validated, RecordStatus::Ready, RecordStatus::Exported] {
            svc.promote(RecordKind::EconomicOperator, id, target).unwrap();
        }
        let exported = store.get(RecordKind::EconomicOperator, id).unwrap();
        assert_eq!(exported.status, RecordStatus::Exported);
        assert_eq!(exported.exported_at, Some(ts()));

        svc.promote(RecordKind::EconomicOperator, id, RecordStatus::Archived)
            .unwrap();
        let archived = store.get(RecordKind::EconomicOperator, id).unwrap();
        assert_eq!(archived.status, RecordStatus::Archived);
    }

    #[test]
    fn test_missing_record_is_not_found() {
        let store = Arc::new(InMemoryRecordStore::new());
        let err = service(store)
            .promote(RecordKind::Certificate, RecordId::new(), RecordStatus::Validated)
            .unwrap_err();
        assert!(matches!(err, PromotionError::Store(StoreError::NotFound { .. })));
    }
}
