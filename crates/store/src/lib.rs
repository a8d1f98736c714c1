//! Snapshot persistence boundary.
//!
//! Whole-snapshot blob stores with optimistic versioning: `load` hands out a
//! version token alongside the bytes, `save` requires it back unchanged. No
//! partial or row-level updates, file-at-a-time replace only.

pub mod fs;
pub mod in_memory;
pub mod snapshot;

pub use fs::FsSnapshotStore;
pub use in_memory::InMemorySnapshotStore;
pub use snapshot::{ExpectedVersion, LoadedSnapshot, SnapshotStore, StoreError, VersionToken};
