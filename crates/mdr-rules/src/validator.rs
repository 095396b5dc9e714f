//! # The Validator
//!
//! Runs every applicable rule for a record, aggregates issues, computes
//! the outcome, and persists one validation run. No hidden state: the
//! issue list is a pure function of the record, its context, and the
//! registry, evaluated in registry order.

use std::sync::Arc;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use mdr_core::{
    Actor, ComplianceModule, Outcome, RecordId, RecordKind, RunId, Severity, Timestamp,
};
use mdr_store::{Clock, IdentitySource, Record, RecordStore, StoreError};

use crate::context::ContextBuilder;
use crate::registry;
use crate::rule::Rule;
use crate::runs::RunStore;

/// Error from a validation request.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// The record or a required collaborator lookup failed at the store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// No rule set is registered for the requested pairing. A request for
    /// a module that does not cover the record kind is a caller bug, not
    /// a passing validation.
    #[error("no rule set registered for module {module} and kind {kind}")]
    UnknownRuleSet {
        /// The requested module.
        module: ComplianceModule,
        /// The requested kind.
        kind: RecordKind,
    },

    /// A rule predicate reported a defect in itself. Surfaced, never
    /// conflated with an ordinary rule failure.
    #[error("rule {rule_id} faulted during evaluation: {detail}")]
    PredicateFailure {
        /// The faulting rule.
        rule_id: String,
        /// Fault detail from the predicate.
        detail: String,
    },
}

/// One failed rule, rendered for the operator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    /// The rule that failed.
    pub rule_id: String,
    /// Issue severity.
    pub severity: Severity,
    /// The record field the rule checks.
    pub field: String,
    /// Operator-facing message.
    pub message: String,
    /// Optional remediation hint.
    pub suggested_fix: Option<String>,
    /// References to the evidence behind the issue: the record itself and,
    /// when present, the offending field value.
    pub evidence: Vec<String>,
}

/// A persisted validation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRun {
    /// Unique run identifier.
    pub run_id: RunId,
    /// The validated record's kind.
    pub kind: RecordKind,
    /// The validated record's id.
    pub record_id: RecordId,
    /// The module whose rule set ran.
    pub module: ComplianceModule,
    /// The computed outcome.
    pub outcome: Outcome,
    /// Number of critical issues.
    pub critical_issues: usize,
    /// Total number of issues.
    pub total_issues: usize,
    /// The issues themselves, in registry order.
    pub issues: Vec<ValidationIssue>,
    /// Actor on whose behalf the run executed.
    pub executed_by: Actor,
    /// When the run executed.
    pub executed_at: Timestamp,
    /// Wall-clock duration of the run in milliseconds.
    pub duration_ms: u64,
}

/// What `validate` returns to its caller.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// The computed outcome.
    pub outcome: Outcome,
    /// The issues, in registry order.
    pub issues: Vec<ValidationIssue>,
    /// The persisted run's id.
    pub run_id: RunId,
    /// Whether the outcome permits promotion to Ready.
    pub can_promote: bool,
}

/// The validation engine.
pub struct Validator {
    store: Arc<dyn RecordStore>,
    runs: Arc<dyn RunStore>,
    identity: Arc<dyn IdentitySource>,
    clock: Arc<dyn Clock>,
}

impl Validator {
    /// A validator over the given collaborators.
    pub fn new(
        store: Arc<dyn RecordStore>,
        runs: Arc<dyn RunStore>,
        identity: Arc<dyn IdentitySource>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { store, runs, identity, clock }
    }

    /// Run all applicable rules for a record and persist the run.
    ///
    /// # Errors
    ///
    /// - `Store(NotFound)` when the record is absent.
    /// - `UnknownRuleSet` when (module, kind) has no registered rules.
    /// - `PredicateFailure` when a rule faults.
    /// - Other store errors propagate unmodified.
    pub fn validate(
        &self,
        kind: RecordKind,
        id: RecordId,
        module: ComplianceModule,
    ) -> Result<ValidationReport, ValidationError> {
        let started = Instant::now();
        let record = self.store.get(kind, id)?;
        let rules = registry::rules_for(module, kind)
            .ok_or(ValidationError::UnknownRuleSet { module, kind })?;
        let ctx = ContextBuilder::new(self.store.clone(), self.clock.clone())
            .build(&record)?;

        let issues = evaluate_rules(&rules, &record, &ctx)?;

        let critical = issues
            .iter()
            .filter(|i| i.severity == Severity::Critical)
            .count();
        let outcome = Outcome::from_issue_counts(critical, issues.len());

        let run = ValidationRun {
            run_id: RunId::new(),
            kind,
            record_id: id,
            module,
            outcome,
            critical_issues: critical,
            total_issues: issues.len(),
            issues: issues.clone(),
            executed_by: self.identity.current_actor(),
            executed_at: self.clock.now(),
            duration_ms: started.elapsed().as_millis() as u64,
        };
        let run_id = run.run_id;
        self.runs.append(run)?;

        tracing::debug!(
            kind = %kind,
            record = %id,
            module = %module,
            outcome = %outcome,
            issues = issues.len(),
            critical,
            "validation run complete"
        );

        Ok(ValidationReport {
            outcome,
            issues,
            run_id,
            can_promote: outcome.permits_promotion(),
        })
    }
}

/// Evaluate rules in order, collecting one issue per failed rule.
///
/// A faulting predicate aborts evaluation: a defective rule must not
/// masquerade as a clean or partially-clean run.
fn evaluate_rules(
    rules: &[&Rule],
    record: &Record,
    ctx: &crate::RuleContext,
) -> Result<Vec<ValidationIssue>, ValidationError> {
    let mut issues = Vec::new();
    for &rule in rules {
        match (rule.predicate)(record, ctx) {
            Ok(true) => {}
            Ok(false) => issues.push(issue_for(rule, record)),
            Err(fault) => {
                return Err(ValidationError::PredicateFailure {
                    rule_id: rule.id.to_string(),
                    detail: fault.to_string(),
                });
            }
        }
    }
    Ok(issues)
}

/// Render a failed rule as an issue.
fn issue_for(rule: &Rule, record: &Record) -> ValidationIssue {
    let mut evidence = vec![record.id.to_string()];
    if let Some(value) = record.field_str(rule.field) {
        evidence.push(format!("{}={}", rule.field, value));
    }
    ValidationIssue {
        rule_id: rule.id.to_string(),
        severity: rule.severity,
        field: rule.field.to_string(),
        message: rule.message.to_string(),
        suggested_fix: rule.suggested_fix.map(str::to_string),
        evidence,
    }
}
