//! # mdr-ledger — Tamper-Evident Hash-Chain Ledger
//!
//! Every committed status change or field update appends one event to a
//! per-record, singly linked SHA-256 hash chain. Each event's hash covers
//! the canonicalized record snapshot and the previous event's hash, so
//! altering any past event (or reordering the chain) is detectable by
//! recomputation.
//!
//! ## The One Unconditional Rule
//!
//! Ledger events are never updated or deleted. The store trait exposes
//! read and append operations only; there is no update path to misuse.
//!
//! ## Concurrency
//!
//! `append_event` is a read-modify-write of the chain tip. The store
//! closes the race with a compare-and-append keyed on the expected tip
//! hash: a concurrent append that lost the race observes
//! [`LedgerError::Conflict`] and retries from a fresh read.

pub mod chain;
pub mod event;
pub mod store;

pub use chain::{ChainIssue, ChainReport, Ledger};
pub use event::{
    compute_event_hash, genesis_hash, recompute_event_hash, LedgerEvent, LedgerEventKind,
};
pub use store::{InMemoryLedgerStore, LedgerError, LedgerStore};
