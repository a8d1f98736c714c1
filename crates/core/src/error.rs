//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Domain-level error.
///
/// Keep this focused on deterministic ledger failures. Persistence concerns
/// (stale tokens, transport) live in the store layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A scan string or intake field failed minimal parsing/validation.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Intake rejected: an active (Received) record with this tag exists.
    #[error("tag '{0}' already has an active record")]
    DuplicateActiveRecord(String),

    /// Lookup or consume against an unknown or already-consumed tag.
    #[error("not found")]
    NotFound,
}

impl LedgerError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput(msg.into())
    }

    pub fn duplicate_active(tag: impl Into<String>) -> Self {
        Self::DuplicateActiveRecord(tag.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }
}
