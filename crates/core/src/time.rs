//! Timestamp display formatting.
//!
//! Snapshot cells hold opaque display strings; only new stamps are formatted
//! here, from a caller-supplied business time.

use chrono::{DateTime, Utc};

/// Canonical format for freshly stamped `received_at`/`consumed_at` cells.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Render a business timestamp for storage in a snapshot cell.
pub fn display_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}
