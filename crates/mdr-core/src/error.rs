//! # Error Types
//!
//! Shared error types for the core crate. All errors use `thiserror` for
//! derive-based `Display` and `Error` implementations, with structured
//! fields so callers can render actionable messages.

use thiserror::Error;

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical payloads. Fractional
    /// quantities must be carried as strings so that hashes stay stable
    /// across implementations.
    #[error("float values are not permitted in canonical payloads; carry fractional values as strings: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}

/// Error constructing or parsing a [`crate::Timestamp`].
#[derive(Error, Debug)]
pub enum TimestampError {
    /// The input carried a non-UTC offset. Only the `Z` suffix is accepted
    /// on digest-relevant paths.
    #[error("timestamp must use Z suffix (UTC only), got: {0:?}")]
    NonUtc(String),

    /// The input was not a valid RFC 3339 timestamp.
    #[error("invalid RFC 3339 timestamp {input:?}: {reason}")]
    Invalid {
        /// The rejected input string.
        input: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// A Unix epoch value outside the representable range.
    #[error("unix timestamp out of range: {0}")]
    OutOfRange(i64),
}
