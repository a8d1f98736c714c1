use serde::{Deserialize, Serialize};

use lagerscan_core::{Price, RowId, TagId};

/// Lifecycle status of a tracked record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Received,
    Consumed,
}

impl RecordStatus {
    /// Canonical label written to snapshot cells.
    pub fn label(&self) -> &'static str {
        match self {
            RecordStatus::Received => "Eingang",
            RecordStatus::Consumed => "Verbraucht",
        }
    }

    /// Lenient parse of a status cell.
    ///
    /// Historical sheets label the consumed state either "Verbraucht" or
    /// "Ausgang"; both map to [`RecordStatus::Consumed`].
    pub fn parse_lenient(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "eingang" => Some(RecordStatus::Received),
            "verbraucht" | "ausgang" => Some(RecordStatus::Consumed),
            _ => None,
        }
    }
}

/// One physical unit of material tracked through its lifecycle.
///
/// Created in `Received` state by intake, mutated exactly once by
/// consumption, never edited otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    row_id: RowId,
    tag: TagId,
    material: String,
    supplier: String,
    status: RecordStatus,
    price: Price,
    received_at: String,
    consumed_at: String,
}

impl InventoryRecord {
    /// A fresh record entering stock.
    pub(crate) fn received(
        tag: TagId,
        material: String,
        supplier: String,
        price: Price,
        received_at: String,
    ) -> Self {
        Self {
            row_id: RowId::new(),
            tag,
            material,
            supplier,
            status: RecordStatus::Received,
            price,
            received_at,
            consumed_at: String::new(),
        }
    }

    /// A record rebuilt from a normalized snapshot row.
    pub(crate) fn from_normalized(
        tag: TagId,
        material: String,
        supplier: String,
        status: RecordStatus,
        price: Price,
        received_at: String,
        consumed_at: String,
    ) -> Self {
        Self {
            row_id: RowId::new(),
            tag,
            material,
            supplier,
            status,
            price,
            received_at,
            consumed_at,
        }
    }

    /// Transition to `Consumed`. No other field changes.
    pub(crate) fn mark_consumed(&mut self, consumed_at: String) {
        self.status = RecordStatus::Consumed;
        self.consumed_at = consumed_at;
    }

    pub fn row_id(&self) -> RowId {
        self.row_id
    }

    pub fn tag(&self) -> &TagId {
        &self.tag
    }

    pub fn material(&self) -> &str {
        &self.material
    }

    pub fn supplier(&self) -> &str {
        &self.supplier
    }

    pub fn status(&self) -> RecordStatus {
        self.status
    }

    pub fn price(&self) -> Price {
        self.price
    }

    pub fn received_at(&self) -> &str {
        &self.received_at
    }

    pub fn consumed_at(&self) -> &str {
        &self.consumed_at
    }

    /// Whether this record is the live one for its tag.
    pub fn is_active(&self) -> bool {
        self.status == RecordStatus::Received
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_are_canonical() {
        assert_eq!(RecordStatus::Received.label(), "Eingang");
        assert_eq!(RecordStatus::Consumed.label(), "Verbraucht");
    }

    #[test]
    fn status_parse_maps_consumed_synonyms() {
        assert_eq!(
            RecordStatus::parse_lenient("Verbraucht"),
            Some(RecordStatus::Consumed)
        );
        assert_eq!(
            RecordStatus::parse_lenient("Ausgang"),
            Some(RecordStatus::Consumed)
        );
        assert_eq!(
            RecordStatus::parse_lenient("  eingang "),
            Some(RecordStatus::Received)
        );
    }

    #[test]
    fn status_parse_rejects_unknown_labels() {
        assert_eq!(RecordStatus::parse_lenient("offen"), None);
        assert_eq!(RecordStatus::parse_lenient(""), None);
    }
}
