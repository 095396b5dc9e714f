//! # mdr-core — Foundational Types for the MDR Stack
//!
//! This crate is the bedrock of the MDR Stack. It defines the type-system
//! primitives shared by every other crate in the workspace: canonical byte
//! production for digest computation, SHA-256 content digests, UTC-only
//! timestamps, lifecycle status, and identifier newtypes.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** `RecordId`, `RunId`,
//!    `EventId`, `TenantId` are all newtypes. No bare strings or UUIDs
//!    for identifiers.
//!
//! 2. **`CanonicalBytes` newtype.** ALL digest computation flows through
//!    `CanonicalBytes::new()`. No raw `serde_json::to_vec()` for digests.
//!    Two logically equal snapshots always hash identically.
//!
//! 3. **Single `RecordKind` enum with an exhaustive kind-to-module map.**
//!    Adding a record kind forces every consumer to handle it.
//!
//! 4. **UTC-only timestamps.** The `Timestamp` type enforces UTC with Z
//!    suffix and seconds precision, so recorded times canonicalize to a
//!    single byte sequence per instant.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `mdr-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement
//!   `Serialize`/`Deserialize` where they cross a storage boundary.

pub mod canonical;
pub mod digest;
pub mod domain;
pub mod error;
pub mod identity;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, sha256_hex, ContentDigest};
pub use domain::{ComplianceModule, Outcome, RecordKind, RecordStatus, Severity};
pub use error::{CanonicalizationError, TimestampError};
pub use identity::{Actor, EventId, RecordId, RunId, TenantId};
pub use temporal::Timestamp;
