use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use lagerscan_codec::CodecError;
use lagerscan_core::{LedgerError, TagId};
use lagerscan_ledger::{Intake, InventoryRecord, Ledger, ReintakePolicy, ScanAction};
use lagerscan_store::{ExpectedVersion, SnapshotStore, StoreError, VersionToken};

/// Session-level error. Each boundary keeps its own taxonomy; nothing is
/// collapsed or swallowed on the way up.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The snapshot existed but was not a readable table. Distinguished
    /// from the absent-file case, which opens as an empty ledger.
    #[error("snapshot codec: {0}")]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// User-visible result of one scan round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    TakenIn(InventoryRecord),
    Consumed(InventoryRecord),
}

/// One editing session over a snapshot store.
///
/// The session owns its ledger; the store is reconciled explicitly on
/// `open`, `save` and `reload`, never continuously. Saves carry the version
/// token observed at load time, so a concurrent writer is detected instead
/// of overwritten.
pub struct Session {
    ledger: Ledger,
    store: Arc<dyn SnapshotStore>,
    version: VersionToken,
    dirty: bool,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("version", &self.version)
            .field("dirty", &self.dirty)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn open(store: Arc<dyn SnapshotStore>) -> Result<Self, SessionError> {
        Self::open_with_policy(store, ReintakePolicy::default())
    }

    pub fn open_with_policy(
        store: Arc<dyn SnapshotStore>,
        reintake: ReintakePolicy,
    ) -> Result<Self, SessionError> {
        let (ledger, version) = match store.load()? {
            None => {
                info!("no snapshot yet, starting with an empty ledger");
                (Ledger::with_policy(reintake), VersionToken::INITIAL)
            }
            Some(snapshot) => {
                let rows = lagerscan_codec::decode(&snapshot.bytes)?;
                let ledger = Ledger::initialize_with_policy(rows, reintake);
                info!(version = %snapshot.version, records = ledger.len(), "snapshot loaded");
                (ledger, snapshot.version)
            }
        };

        Ok(Self {
            ledger,
            store,
            version,
            dirty: false,
        })
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// The store version this session's state is based on.
    pub fn version(&self) -> VersionToken {
        self.version
    }

    /// Whether in-memory state has diverged from the persisted snapshot.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Apply one parsed scan round to the ledger.
    pub fn apply(
        &mut self,
        action: ScanAction,
        occurred_at: DateTime<Utc>,
    ) -> Result<ScanOutcome, SessionError> {
        match action {
            ScanAction::Intake {
                tag,
                material,
                supplier,
                price,
            } => {
                let record = self.intake(Intake {
                    tag,
                    material,
                    supplier,
                    price,
                    occurred_at,
                })?;
                Ok(ScanOutcome::TakenIn(record))
            }
            ScanAction::Consume { tag } => {
                let record = self.consume(&tag, occurred_at)?;
                Ok(ScanOutcome::Consumed(record))
            }
        }
    }

    pub fn intake(&mut self, intake: Intake) -> Result<InventoryRecord, SessionError> {
        let record = self.ledger.intake(intake)?.clone();
        self.dirty = true;
        debug!(tag = %record.tag(), material = record.material(), "intake applied");
        Ok(record)
    }

    pub fn consume(
        &mut self,
        tag: &TagId,
        occurred_at: DateTime<Utc>,
    ) -> Result<InventoryRecord, SessionError> {
        let record = self.ledger.consume(tag, occurred_at)?.clone();
        self.dirty = true;
        debug!(tag = %record.tag(), "consume applied");
        Ok(record)
    }

    pub fn reset(&mut self) {
        self.ledger.reset();
        self.dirty = true;
        info!("ledger reset");
    }

    /// Persist the full snapshot, expecting the remote to still be at the
    /// version observed at load time.
    pub fn save(&mut self) -> Result<VersionToken, SessionError> {
        let expected = ExpectedVersion::Exact(self.version);
        self.save_with(expected)
    }

    /// Persist regardless of the remote version. Explicit last-write-wins;
    /// only for a user who has seen the conflict and chosen to overwrite.
    pub fn save_forced(&mut self) -> Result<VersionToken, SessionError> {
        self.save_with(ExpectedVersion::Any)
    }

    fn save_with(&mut self, expected: ExpectedVersion) -> Result<VersionToken, SessionError> {
        let bytes = lagerscan_codec::encode(self.ledger.snapshot())?;
        match self.store.save(&bytes, expected) {
            Ok(version) => {
                info!(%version, records = self.ledger.len(), "snapshot saved");
                self.version = version;
                self.dirty = false;
                Ok(version)
            }
            Err(e) => {
                // The ledger is untouched either way; a retry (or a reload
                // followed by re-applying the action) is always safe.
                warn!(error = %e, "save failed, in-memory state retained");
                Err(e.into())
            }
        }
    }

    /// Discard in-memory state and re-open from the store. The re-apply
    /// path after a `ConcurrentModification`.
    pub fn reload(&mut self) -> Result<(), SessionError> {
        let policy = self.ledger.reintake_policy();
        let fresh = Self::open_with_policy(Arc::clone(&self.store), policy)?;
        self.ledger = fresh.ledger;
        self.version = fresh.version;
        self.dirty = false;
        Ok(())
    }
}
