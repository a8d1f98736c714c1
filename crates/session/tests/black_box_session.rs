//! Black-box flow over a filesystem-backed snapshot: the whole
//! scan → persist → rescan lifecycle as a front end would drive it.

use std::sync::Arc;

use chrono::Utc;

use lagerscan_core::TagId;
use lagerscan_ledger::{RecordStatus, ScanAction};
use lagerscan_session::{ScanOutcome, Session};
use lagerscan_store::{FsSnapshotStore, SnapshotStore};

fn scan(raw: &str) -> ScanAction {
    ScanAction::parse(raw).unwrap()
}

#[test]
fn full_lifecycle_over_a_snapshot_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Lagerbestand.csv");
    let store: Arc<dyn SnapshotStore> = Arc::new(FsSnapshotStore::new(&path));

    // First run: no file yet.
    let mut session = Session::open(Arc::clone(&store)).unwrap();
    assert!(session.ledger().is_empty());

    session.apply(scan("ID-1;Glue;Acme;12,50"), Utc::now()).unwrap();
    session.apply(scan("ID-2;Tape;X;1,00"), Utc::now()).unwrap();
    session.save().unwrap();
    assert!(path.exists());

    // Second run: consume one unit, re-take the tag in.
    let mut session = Session::open(Arc::clone(&store)).unwrap();
    assert_eq!(session.ledger().current_stock().len(), 2);

    match session.apply(scan("ID-1"), Utc::now()).unwrap() {
        ScanOutcome::Consumed(record) => {
            assert_eq!(record.status(), RecordStatus::Consumed);
            assert!(!record.consumed_at().is_empty());
        }
        other => panic!("expected Consumed, got {other:?}"),
    }
    session.apply(scan("ID-1;Glue2;Acme;9,00"), Utc::now()).unwrap();
    session.save().unwrap();

    // Third run: history is intact — two rows for the re-used tag.
    let session = Session::open(Arc::clone(&store)).unwrap();
    let tag = TagId::parse("ID-1").unwrap();
    let rows: Vec<_> = session
        .ledger()
        .snapshot()
        .iter()
        .filter(|r| r.tag() == &tag)
        .collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].status(), RecordStatus::Consumed);
    assert_eq!(rows[1].status(), RecordStatus::Received);
    assert_eq!(session.ledger().len(), 3);
}

#[test]
fn two_sessions_on_one_file_detect_each_other() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Lagerbestand.csv");
    let store: Arc<dyn SnapshotStore> = Arc::new(FsSnapshotStore::new(&path));

    let mut a = Session::open(Arc::clone(&store)).unwrap();
    let mut b = Session::open(Arc::clone(&store)).unwrap();

    a.apply(scan("ID-1;Glue;Acme;1,00"), Utc::now()).unwrap();
    a.save().unwrap();

    b.apply(scan("ID-2;Tape;X;2,00"), Utc::now()).unwrap();
    assert!(b.save().is_err());

    b.reload().unwrap();
    b.apply(scan("ID-2;Tape;X;2,00"), Utc::now()).unwrap();
    b.save().unwrap();

    let merged = Session::open(store).unwrap();
    assert_eq!(merged.ledger().len(), 2);
}
