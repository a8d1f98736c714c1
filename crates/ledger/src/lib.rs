//! Inventory ledger domain module.
//!
//! This crate contains the business rules for scan-driven stock tracking,
//! implemented purely as deterministic domain logic (no IO, no storage).

pub mod ledger;
pub mod record;
pub mod scan;

pub use ledger::{Intake, Ledger, RawRow, ReintakePolicy};
pub use record::{InventoryRecord, RecordStatus};
pub use scan::ScanAction;
