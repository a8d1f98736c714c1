//! Session orchestration: one ledger, one snapshot store, explicit
//! load/save reconciliation in between.

pub mod session;

pub use session::{ScanOutcome, Session, SessionError};
