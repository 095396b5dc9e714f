//! # mdr-rules — Rule Registry & Validation Engine
//!
//! Validation in the MDR Stack is a static table of named, pure rules.
//! Each rule is a descriptor (id, module, record kind, severity, field,
//! message, optional suggested fix) paired with an ordinary function; no
//! inheritance hierarchy, no string-keyed dispatch.
//!
//! ## Determinism
//!
//! Rules are pure: the same record and context always yield the same
//! verdict, and rules are evaluated in registry order, so two validation
//! runs over an unchanged record produce identical issue lists. This is
//! what makes validation outcomes auditable and the promotion gate
//! reproducible.
//!
//! ## Fault vs Failure
//!
//! A predicate returning `Ok(false)` is a business failure and becomes a
//! [`ValidationIssue`]. A predicate returning `Err` is a defect in the
//! rule itself and aborts the run with a configuration error; the two are
//! never conflated.

pub mod context;
pub mod registry;
pub mod rule;
pub mod runs;
pub mod validator;

pub use context::{ContextBuilder, ReferenceState, RuleContext};
pub use registry::rules_for;
pub use rule::{PredicateFault, Rule, RulePredicate};
pub use runs::{InMemoryRunStore, RunStore};
pub use validator::{
    ValidationError, ValidationIssue, ValidationReport, ValidationRun, Validator,
};
