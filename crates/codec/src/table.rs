use thiserror::Error;

use lagerscan_ledger::{InventoryRecord, RawRow};

/// Sheet column names. Kept verbatim from the historical stock files so
/// snapshots stay interchangeable with them.
pub const HEADER_TAG: &str = "QR_ID";
pub const HEADER_MATERIAL: &str = "Material";
pub const HEADER_SUPPLIER: &str = "Lieferant";
pub const HEADER_STATUS: &str = "Status";
pub const HEADER_RECEIVED_AT: &str = "Datum_Eingang";
pub const HEADER_CONSUMED_AT: &str = "Datum_Ausgang";
pub const HEADER_PRICE: &str = "Preis";

const DELIMITER: u8 = b';';

/// Codec failure.
///
/// Structural failures only: a stream that is not a readable table. Content
/// junk inside an otherwise readable row is passed through as a [`RawRow`]
/// and left to `Ledger::initialize` to drop or default.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("snapshot decode failed: {0}")]
    Decode(String),

    #[error("snapshot encode failed: {0}")]
    Encode(String),
}

/// Column positions resolved from the header row.
#[derive(Debug, Default, Clone, Copy)]
struct Columns {
    tag: Option<usize>,
    material: Option<usize>,
    supplier: Option<usize>,
    status: Option<usize>,
    received_at: Option<usize>,
    consumed_at: Option<usize>,
    price: Option<usize>,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Self {
        let mut columns = Self::default();
        for (idx, name) in headers.iter().enumerate() {
            match name.trim() {
                HEADER_TAG => columns.tag = columns.tag.or(Some(idx)),
                HEADER_MATERIAL => columns.material = columns.material.or(Some(idx)),
                HEADER_SUPPLIER => columns.supplier = columns.supplier.or(Some(idx)),
                HEADER_STATUS => columns.status = columns.status.or(Some(idx)),
                HEADER_RECEIVED_AT => columns.received_at = columns.received_at.or(Some(idx)),
                HEADER_CONSUMED_AT => columns.consumed_at = columns.consumed_at.or(Some(idx)),
                HEADER_PRICE => columns.price = columns.price.or(Some(idx)),
                _ => {}
            }
        }
        columns
    }
}

fn cell(record: &csv::StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| record.get(i)).map(str::to_string)
}

/// Decode snapshot bytes into raw rows.
///
/// Missing and extra columns are tolerated; only a structurally unreadable
/// stream is an error. Empty input decodes to no rows.
pub fn decode(bytes: &[u8]) -> Result<Vec<RawRow>, CodecError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| CodecError::Decode(e.to_string()))?
        .clone();
    let columns = Columns::resolve(&headers);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| CodecError::Decode(e.to_string()))?;
        rows.push(RawRow {
            tag: cell(&record, columns.tag),
            material: cell(&record, columns.material),
            supplier: cell(&record, columns.supplier),
            status: cell(&record, columns.status),
            received_at: cell(&record, columns.received_at),
            consumed_at: cell(&record, columns.consumed_at),
            price: cell(&record, columns.price),
        });
    }
    Ok(rows)
}

/// Encode records into snapshot bytes, canonical header order and status
/// labels. Works for the full snapshot as well as a current-stock export.
pub fn encode<'a, I>(records: I) -> Result<Vec<u8>, CodecError>
where
    I: IntoIterator<Item = &'a InventoryRecord>,
{
    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_writer(Vec::new());

    writer
        .write_record([
            HEADER_TAG,
            HEADER_MATERIAL,
            HEADER_SUPPLIER,
            HEADER_STATUS,
            HEADER_RECEIVED_AT,
            HEADER_CONSUMED_AT,
            HEADER_PRICE,
        ])
        .map_err(|e| CodecError::Encode(e.to_string()))?;

    for record in records {
        let price = record.price().to_string();
        writer
            .write_record([
                record.tag().as_str(),
                record.material(),
                record.supplier(),
                record.status().label(),
                record.received_at(),
                record.consumed_at(),
                price.as_str(),
            ])
            .map_err(|e| CodecError::Encode(e.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| CodecError::Encode(e.to_string()))
}
