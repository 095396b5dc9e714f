//! # mdr-store — Collaborator Interfaces
//!
//! The validation and ledger core treats its surroundings as narrow
//! collaborators: an entity store that can get, list, and update records;
//! an identity source that names the current actor; and a clock. This
//! crate defines those seams as capability traits, together with the
//! generic [`Record`] type they exchange and in-memory implementations
//! used by tests and the CLI.
//!
//! ## Crate Policy
//!
//! - The store surface stays narrow: `get`, `list`, `update`, `insert`.
//!   Anything richer belongs to the hosted entity store behind the trait,
//!   not to this subsystem.
//! - Implementations are `Send + Sync`; validation runs for distinct
//!   records may execute in parallel.
//! - Unexpected backend failures surface as `StoreError::Backend` and
//!   propagate unmodified.

pub mod collab;
pub mod memory;
pub mod record;
pub mod store;

pub use collab::{Clock, FixedClock, IdentitySource, StaticIdentity, SystemClock};
pub use memory::InMemoryRecordStore;
pub use record::{Record, RecordPatch};
pub use store::{ListFilter, RecordStore, StoreError};
