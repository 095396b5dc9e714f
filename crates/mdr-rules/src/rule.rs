//! # Rule Descriptors
//!
//! A rule is data plus a function pointer. The descriptor carries
//! everything the validator needs to turn a failed check into an
//! actionable issue; the predicate carries the check itself.

use thiserror::Error;

use mdr_core::{ComplianceModule, RecordKind, Severity};
use mdr_store::Record;

use crate::context::RuleContext;

/// A defect inside a rule predicate.
///
/// Returned when the predicate cannot produce a verdict at all (malformed
/// rule configuration, an impossible field access). Distinct from
/// `Ok(false)`, which is an ordinary business failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct PredicateFault(pub String);

impl PredicateFault {
    /// Construct a fault with the given detail.
    pub fn new(detail: impl Into<String>) -> Self {
        Self(detail.into())
    }
}

/// A validation predicate: `Ok(true)` passes, `Ok(false)` fails the rule,
/// `Err` reports a defect in the rule itself.
pub type RulePredicate = fn(&Record, &RuleContext) -> Result<bool, PredicateFault>;

/// A registered validation rule.
#[derive(Clone)]
pub struct Rule {
    /// Stable rule identifier, e.g. `DEV-002`.
    pub id: &'static str,
    /// The compliance module this rule belongs to.
    pub module: ComplianceModule,
    /// The record kind this rule applies to.
    pub kind: RecordKind,
    /// Issue severity when the rule fails.
    pub severity: Severity,
    /// The record field the rule checks.
    pub field: &'static str,
    /// Message rendered to the operator when the rule fails.
    pub message: &'static str,
    /// Optional remediation hint.
    pub suggested_fix: Option<&'static str>,
    /// The check itself.
    pub predicate: RulePredicate,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("module", &self.module)
            .field("kind", &self.kind)
            .field("severity", &self.severity)
            .field("field", &self.field)
            .finish_non_exhaustive()
    }
}
