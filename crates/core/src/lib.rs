//! `lagerscan-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod price;
pub mod time;

pub use error::{LedgerError, LedgerResult};
pub use id::{RowId, TagId};
pub use price::Price;
pub use time::{TIMESTAMP_FORMAT, display_timestamp};
