//! Typed errors for the interaction-network core.

use thiserror::Error;

/// Errors surfaced across the public API.
///
/// Ingest itself is non-fatal by policy: row- and resource-level
/// failures are counted in [`crate::ingest::IngestReport`] and logged
/// via `tracing`, not propagated. The variants below exist for the
/// operations that *are* allowed to fail outright (snapshot I/O) and
/// for callers who want to construct/inspect errors explicitly.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("schema error in resource `{resource}`: {message}")]
    SchemaError { resource: String, message: String },

    #[error("parse error in resource `{resource}` at line {line}: {message}")]
    ParseError {
        resource: String,
        line: usize,
        message: String,
    },

    #[error("identifier mapping failed for `{identifier}` in resource `{resource}`")]
    MappingFailure { resource: String, identifier: String },

    #[error("invariant violation: {message}")]
    InvariantViolation { message: String },

    #[error("snapshot format mismatch: {message}")]
    SnapshotMismatch { message: String },

    #[error("snapshot I/O error: {0}")]
    SnapshotIo(#[from] std::io::Error),

    #[error("snapshot decode error: {0}")]
    SnapshotDecode(#[from] bincode::Error),
}

pub type Result<T> = std::result::Result<T, NetworkError>;
