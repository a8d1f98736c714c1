use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Content-version token of a persisted snapshot.
///
/// Handed out on load, required unchanged on save. Monotonically increasing
/// per store; revision 0 denotes an absent snapshot.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VersionToken(u64);

impl VersionToken {
    /// The version of a not-yet-written snapshot.
    pub const INITIAL: VersionToken = VersionToken(0);

    pub fn new(revision: u64) -> Self {
        Self(revision)
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    pub fn revision(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for VersionToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Optimistic concurrency expectation for a save.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedVersion {
    /// Skip version checking. An explicit force-overwrite escape hatch, not
    /// a default.
    Any,
    /// Require the remote snapshot to be at an exact version.
    Exact(VersionToken),
}

impl ExpectedVersion {
    pub fn matches(self, actual: VersionToken) -> bool {
        match self {
            ExpectedVersion::Any => true,
            ExpectedVersion::Exact(v) => v == actual,
        }
    }

    pub fn check(self, actual: VersionToken) -> Result<(), StoreError> {
        match self {
            ExpectedVersion::Any => Ok(()),
            ExpectedVersion::Exact(expected) if expected == actual => Ok(()),
            ExpectedVersion::Exact(expected) => {
                Err(StoreError::ConcurrentModification { expected, actual })
            }
        }
    }
}

/// Store operation error.
///
/// Infrastructure failures only; domain failures never reach this layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The remote snapshot moved since the supplied token was read. The
    /// caller should reload and let the user re-apply their action.
    #[error("concurrent modification: expected {expected}, found {actual}")]
    ConcurrentModification {
        expected: VersionToken,
        actual: VersionToken,
    },

    /// Storage unreachable or failed. The caller's in-memory state is still
    /// valid; retrying the save alone is safe and sufficient.
    #[error("transport: {0}")]
    Transport(String),
}

/// A snapshot as returned by [`SnapshotStore::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedSnapshot {
    pub bytes: Vec<u8>,
    pub version: VersionToken,
}

/// Whole-snapshot blob store with optimistic versioning.
///
/// `load` distinguishes "no snapshot yet" (`Ok(None)`) from transport
/// failure; an absent snapshot is an expected first-run outcome, not an
/// error. `save` must fail with [`StoreError::ConcurrentModification`]
/// rather than silently overwrite when the expectation does not hold.
pub trait SnapshotStore: Send + Sync {
    fn load(&self) -> Result<Option<LoadedSnapshot>, StoreError>;

    fn save(
        &self,
        bytes: &[u8],
        expected: ExpectedVersion,
    ) -> Result<VersionToken, StoreError>;
}

impl<S> SnapshotStore for Arc<S>
where
    S: SnapshotStore + ?Sized,
{
    fn load(&self) -> Result<Option<LoadedSnapshot>, StoreError> {
        (**self).load()
    }

    fn save(
        &self,
        bytes: &[u8],
        expected: ExpectedVersion,
    ) -> Result<VersionToken, StoreError> {
        (**self).save(bytes, expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_expectation_matches_only_its_token() {
        let held = VersionToken::new(3);
        assert!(ExpectedVersion::Exact(held).matches(held));
        assert!(!ExpectedVersion::Exact(held).matches(held.next()));
        assert!(ExpectedVersion::Any.matches(VersionToken::INITIAL));
        assert!(ExpectedVersion::Any.matches(held));
    }

    #[test]
    fn check_reports_both_tokens() {
        let err = ExpectedVersion::Exact(VersionToken::new(1))
            .check(VersionToken::new(4))
            .unwrap_err();
        match err {
            StoreError::ConcurrentModification { expected, actual } => {
                assert_eq!(expected, VersionToken::new(1));
                assert_eq!(actual, VersionToken::new(4));
            }
            other => panic!("expected ConcurrentModification, got {other:?}"),
        }
    }
}
