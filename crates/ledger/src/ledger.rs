use chrono::{DateTime, Utc};

use lagerscan_core::{LedgerError, Price, TagId, display_timestamp};

use crate::record::{InventoryRecord, RecordStatus};

/// Re-use policy applied when a tag is scanned for intake again.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum ReintakePolicy {
    /// A tag whose records are all consumed may be taken in again; the old
    /// rows stay untouched and a fresh row is appended (default).
    #[default]
    Allowed,
    /// Any historical record with the tag blocks a new intake.
    Rejected,
}

/// A raw, untrusted row as handed over by the tabular codec.
///
/// Every field is optional; `Ledger::initialize` decides what survives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    pub tag: Option<String>,
    pub material: Option<String>,
    pub supplier: Option<String>,
    pub status: Option<String>,
    pub received_at: Option<String>,
    pub consumed_at: Option<String>,
    pub price: Option<String>,
}

/// Intake request: one new physical unit entering stock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intake {
    pub tag: TagId,
    pub material: String,
    pub supplier: Option<String>,
    pub price: Price,
    pub occurred_at: DateTime<Utc>,
}

/// The owning store of all inventory records for a session.
///
/// Insertion-ordered; order is display-relevant but carries no lookup
/// semantics. The ledger is the source of truth for the duration of a
/// session; the persisted snapshot is a derived, time-lagged copy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    records: Vec<InventoryRecord>,
    reintake: ReintakePolicy,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(reintake: ReintakePolicy) -> Self {
        Self {
            records: Vec::new(),
            reintake,
        }
    }

    /// Build a ledger from raw codec rows.
    ///
    /// Never fails outright: rows that cannot be minimally normalized
    /// (missing tag or material name) are dropped, everything else is
    /// coerced. An empty or absent file degrades to an empty ledger.
    pub fn initialize(rows: Vec<RawRow>) -> Self {
        Self::initialize_with_policy(rows, ReintakePolicy::default())
    }

    pub fn initialize_with_policy(rows: Vec<RawRow>, reintake: ReintakePolicy) -> Self {
        let records = rows.into_iter().filter_map(normalize_row).collect();
        Self { records, reintake }
    }

    pub fn reintake_policy(&self) -> ReintakePolicy {
        self.reintake
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records currently in stock (`Received`), in insertion order.
    pub fn current_stock(&self) -> Vec<&InventoryRecord> {
        self.records.iter().filter(|r| r.is_active()).collect()
    }

    /// The active record for a tag, if any.
    ///
    /// If buggy input ever produced more than one active record per tag,
    /// the first match in insertion order wins. Defensive tie-break only;
    /// intake never lets that state arise.
    pub fn find_active(&self, tag: &TagId) -> Option<&InventoryRecord> {
        self.records.iter().find(|r| r.is_active() && r.tag() == tag)
    }

    /// Whether any consumed record with this tag exists. Used by front ends
    /// to phrase a `NotFound` miss ("already consumed" vs "never seen").
    pub fn was_consumed(&self, tag: &TagId) -> bool {
        self.records
            .iter()
            .any(|r| r.status() == RecordStatus::Consumed && r.tag() == tag)
    }

    /// Take a new unit into stock.
    ///
    /// Rejected with `DuplicateActiveRecord` while an active record with the
    /// same tag exists; under `ReintakePolicy::Rejected` any historical
    /// record blocks too. On success the new record is appended, leaving
    /// older consumed rows for the tag untouched.
    pub fn intake(&mut self, intake: Intake) -> Result<&InventoryRecord, LedgerError> {
        let material = intake.material.trim();
        if material.is_empty() {
            return Err(LedgerError::malformed("material name cannot be empty"));
        }

        let blocked = match self.reintake {
            ReintakePolicy::Allowed => self.find_active(&intake.tag).is_some(),
            ReintakePolicy::Rejected => self.records.iter().any(|r| r.tag() == &intake.tag),
        };
        if blocked {
            return Err(LedgerError::duplicate_active(intake.tag.as_str()));
        }

        let supplier = match intake.supplier.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => "unknown".to_string(),
        };

        self.records.push(InventoryRecord::received(
            intake.tag,
            material.to_string(),
            supplier,
            intake.price,
            display_timestamp(intake.occurred_at),
        ));
        let idx = self.records.len() - 1;
        Ok(&self.records[idx])
    }

    /// Transition the active record for a tag to `Consumed`.
    ///
    /// `NotFound` covers both "never existed" and "already consumed"; the
    /// ledger does not need the distinction, callers wanting it can ask
    /// [`Ledger::was_consumed`].
    pub fn consume(
        &mut self,
        tag: &TagId,
        occurred_at: DateTime<Utc>,
    ) -> Result<&InventoryRecord, LedgerError> {
        let idx = self
            .records
            .iter()
            .position(|r| r.is_active() && r.tag() == tag)
            .ok_or(LedgerError::NotFound)?;
        self.records[idx].mark_consumed(display_timestamp(occurred_at));
        Ok(&self.records[idx])
    }

    /// Discard every record. Recovery, if any, is the snapshot store's
    /// concern (version history of the persisted blob).
    pub fn reset(&mut self) {
        self.records.clear();
    }

    /// The full record sequence, codec-ready.
    pub fn snapshot(&self) -> &[InventoryRecord] {
        &self.records
    }
}

fn normalize_row(row: RawRow) -> Option<InventoryRecord> {
    let tag = TagId::parse(row.tag.as_deref().unwrap_or("")).ok()?;
    let material = row.material.as_deref().unwrap_or("").trim().to_string();
    if material.is_empty() {
        return None;
    }

    let supplier = row.supplier.unwrap_or_default().trim().to_string();
    let received_at = row.received_at.unwrap_or_default().trim().to_string();
    let consumed_cell = row.consumed_at.unwrap_or_default().trim().to_string();
    let price = Price::parse_lenient(row.price.as_deref().unwrap_or(""));

    // The status cell wins when it parses; otherwise a non-empty consumption
    // stamp implies Consumed.
    let status = match RecordStatus::parse_lenient(row.status.as_deref().unwrap_or("")) {
        Some(status) => status,
        None if consumed_cell.is_empty() => RecordStatus::Received,
        None => RecordStatus::Consumed,
    };
    let consumed_at = match status {
        RecordStatus::Received => String::new(),
        RecordStatus::Consumed if consumed_cell.is_empty() => received_at.clone(),
        RecordStatus::Consumed => consumed_cell,
    };

    Some(InventoryRecord::from_normalized(
        tag,
        material,
        supplier,
        status,
        price,
        received_at,
        consumed_at,
    ))
}
