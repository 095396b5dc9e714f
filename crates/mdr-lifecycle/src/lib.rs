//! # mdr-lifecycle — Validation-Gated Promotion
//!
//! The promotion state machine sits between the validator and the ledger:
//! it consumes the legal-transition table on [`mdr_core::RecordStatus`],
//! re-runs validation before any record enters Ready, and appends one
//! ledger event for every committed status change or field update.
//!
//! ## Invariants Enforced Here
//!
//! - A record reaches Ready only when its validation outcome is not Fail.
//! - A field update applied while Ready first downgrades the record to
//!   Validated and clears `last_validated_at`; the stale readiness
//!   guarantee dies before the mutation lands.
//! - Every committed change is on the ledger; a status the ledger does
//!   not know about does not exist.

pub mod service;

pub use service::{Promotion, PromotionError, PromotionService};
