use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::snapshot::{
    ExpectedVersion, LoadedSnapshot, SnapshotStore, StoreError, VersionToken,
};

/// Filesystem-backed snapshot store.
///
/// The blob lives at `path`; the version token is a revision counter in a
/// `<path>.rev` sidecar. Replacement is write-temp-then-rename, so a failed
/// save never leaves a truncated snapshot behind. A snapshot placed by hand
/// (no sidecar) reads as revision 1.
#[derive(Debug, Clone)]
pub struct FsSnapshotStore {
    path: PathBuf,
    rev_path: PathBuf,
    tmp_path: PathBuf,
}

impl FsSnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            rev_path: with_suffix(&path, ".rev"),
            tmp_path: with_suffix(&path, ".tmp"),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn current_version(&self) -> Result<VersionToken, StoreError> {
        match fs::metadata(&self.path) {
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(VersionToken::INITIAL),
            Err(e) => return Err(transport(e)),
            Ok(_) => {}
        }

        match fs::read_to_string(&self.rev_path) {
            Ok(raw) => Ok(raw
                .trim()
                .parse::<u64>()
                .map(VersionToken::new)
                .unwrap_or(VersionToken::new(1))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(VersionToken::new(1)),
            Err(e) => Err(transport(e)),
        }
    }
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

fn transport(e: std::io::Error) -> StoreError {
    StoreError::Transport(e.to_string())
}

impl SnapshotStore for FsSnapshotStore {
    fn load(&self) -> Result<Option<LoadedSnapshot>, StoreError> {
        match fs::read(&self.path) {
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no snapshot yet");
                Ok(None)
            }
            Err(e) => Err(transport(e)),
            Ok(bytes) => {
                let version = self.current_version()?;
                debug!(path = %self.path.display(), %version, len = bytes.len(), "snapshot loaded");
                Ok(Some(LoadedSnapshot { bytes, version }))
            }
        }
    }

    fn save(
        &self,
        bytes: &[u8],
        expected: ExpectedVersion,
    ) -> Result<VersionToken, StoreError> {
        let current = self.current_version()?;
        expected.check(current)?;

        let next = current.next();
        fs::write(&self.tmp_path, bytes).map_err(transport)?;
        fs::rename(&self.tmp_path, &self.path).map_err(transport)?;
        fs::write(&self.rev_path, next.revision().to_string()).map_err(transport)?;
        debug!(path = %self.path.display(), %next, len = bytes.len(), "snapshot saved");
        Ok(next)
    }
}
