//! Decoded scan text → ledger action.
//!
//! A scan round delivers one text string. The delimited form
//! `tag;material[;supplier[;price]]` drives an intake, a bare tag drives a
//! consume. Image decoding itself is an external collaborator; this module
//! only sees its text output.

use lagerscan_core::{LedgerError, Price, TagId};

/// Action derived from one decoded scan string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanAction {
    /// Semicolon-delimited intake form.
    Intake {
        tag: TagId,
        material: String,
        supplier: Option<String>,
        price: Price,
    },
    /// Bare tag: consume the active record.
    Consume { tag: TagId },
}

impl ScanAction {
    /// Parse one decoded scan string. Fields are trimmed; trailing fields of
    /// the intake form are optional; anything past the price is ignored.
    pub fn parse(raw: &str) -> Result<Self, LedgerError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LedgerError::malformed("empty scan"));
        }

        if !trimmed.contains(';') {
            return Ok(ScanAction::Consume {
                tag: TagId::parse(trimmed)?,
            });
        }

        let mut fields = trimmed.split(';');
        let tag = TagId::parse(fields.next().unwrap_or(""))?;
        let material = fields.next().map(str::trim).unwrap_or("");
        if material.is_empty() {
            return Err(LedgerError::malformed(
                "intake scan requires a material name",
            ));
        }
        let supplier = fields
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from);
        let price = match fields.next().map(str::trim) {
            None | Some("") => Price::ZERO,
            Some(cell) => Price::parse(cell)?,
        };

        Ok(ScanAction::Intake {
            tag,
            material: material.to_string(),
            supplier,
            price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(raw: &str) -> TagId {
        TagId::parse(raw).unwrap()
    }

    #[test]
    fn bare_tag_is_a_consume() {
        assert_eq!(
            ScanAction::parse("  ID-1 ").unwrap(),
            ScanAction::Consume { tag: tag("ID-1") }
        );
    }

    #[test]
    fn full_delimited_form_is_an_intake() {
        assert_eq!(
            ScanAction::parse("ID-1;Glue;Acme;12,50").unwrap(),
            ScanAction::Intake {
                tag: tag("ID-1"),
                material: "Glue".to_string(),
                supplier: Some("Acme".to_string()),
                price: Price::parse("12.50").unwrap(),
            }
        );
    }

    #[test]
    fn trailing_fields_are_optional() {
        assert_eq!(
            ScanAction::parse("ID-1;Glue").unwrap(),
            ScanAction::Intake {
                tag: tag("ID-1"),
                material: "Glue".to_string(),
                supplier: None,
                price: Price::ZERO,
            }
        );
        assert_eq!(
            ScanAction::parse("ID-1;Glue;;").unwrap(),
            ScanAction::Intake {
                tag: tag("ID-1"),
                material: "Glue".to_string(),
                supplier: None,
                price: Price::ZERO,
            }
        );
    }

    #[test]
    fn rejects_empty_scan_and_missing_material() {
        assert!(matches!(
            ScanAction::parse("   "),
            Err(LedgerError::MalformedInput(_))
        ));
        assert!(matches!(
            ScanAction::parse("ID-1;"),
            Err(LedgerError::MalformedInput(_))
        ));
        assert!(matches!(
            ScanAction::parse(";Glue"),
            Err(LedgerError::MalformedInput(_))
        ));
    }

    #[test]
    fn rejects_unparseable_price() {
        assert!(matches!(
            ScanAction::parse("ID-1;Glue;Acme;zwölf"),
            Err(LedgerError::MalformedInput(_))
        ));
    }
}
