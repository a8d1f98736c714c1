use std::sync::RwLock;

use crate::snapshot::{
    ExpectedVersion, LoadedSnapshot, SnapshotStore, StoreError, VersionToken,
};

/// In-memory snapshot store.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    state: RwLock<Option<(Vec<u8>, VersionToken)>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn current(state: &Option<(Vec<u8>, VersionToken)>) -> VersionToken {
        state
            .as_ref()
            .map(|(_, version)| *version)
            .unwrap_or(VersionToken::INITIAL)
    }
}

impl SnapshotStore for InMemorySnapshotStore {
    fn load(&self) -> Result<Option<LoadedSnapshot>, StoreError> {
        let state = self
            .state
            .read()
            .map_err(|_| StoreError::Transport("lock poisoned".to_string()))?;
        Ok(state.as_ref().map(|(bytes, version)| LoadedSnapshot {
            bytes: bytes.clone(),
            version: *version,
        }))
    }

    fn save(
        &self,
        bytes: &[u8],
        expected: ExpectedVersion,
    ) -> Result<VersionToken, StoreError> {
        let mut state = self
            .state
            .write()
            .map_err(|_| StoreError::Transport("lock poisoned".to_string()))?;

        let current = Self::current(&state);
        expected.check(current)?;

        let next = current.next();
        *state = Some((bytes.to_vec(), next));
        Ok(next)
    }
}
