//! Unit price value object.

use core::str::FromStr;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Unit price of a tracked record. Non-negative by construction.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    pub const ZERO: Price = Price(Decimal::ZERO);

    /// Wrap a decimal, rejecting negative values.
    pub fn new(value: Decimal) -> Result<Self, LedgerError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(LedgerError::malformed(format!(
                "price cannot be negative: {value}"
            )));
        }
        Ok(Self(value))
    }

    /// Strict parse for user-entered text (scan fields, CLI flags).
    ///
    /// Accepts a comma as the decimal separator; German sheets write `12,50`.
    pub fn parse(raw: &str) -> Result<Self, LedgerError> {
        let value = Decimal::from_str(&normalize_separator(raw))
            .map_err(|e| LedgerError::malformed(format!("price '{raw}': {e}")))?;
        Self::new(value)
    }

    /// Lenient parse for snapshot normalization: unparseable or negative
    /// cells coerce to zero instead of failing the row.
    pub fn parse_lenient(raw: &str) -> Self {
        match Decimal::from_str(&normalize_separator(raw)) {
            Ok(value) if !value.is_sign_negative() || value.is_zero() => Self(value),
            _ => Self::ZERO,
        }
    }

    pub fn get(&self) -> Decimal {
        self.0
    }
}

fn normalize_separator(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.contains(',') && !trimmed.contains('.') {
        trimmed.replace(',', ".")
    } else {
        trimmed.to_string()
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Price {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn parse_accepts_dot_and_comma_separators() {
        assert_eq!(Price::parse("12.50").unwrap(), Price::parse("12,50").unwrap());
        assert_eq!(Price::parse(" 9 ").unwrap().get(), Decimal::from(9));
    }

    #[test]
    fn parse_rejects_negative_and_garbage() {
        assert!(matches!(
            Price::parse("-1.0"),
            Err(LedgerError::MalformedInput(_))
        ));
        assert!(matches!(
            Price::parse("abc"),
            Err(LedgerError::MalformedInput(_))
        ));
    }

    #[test]
    fn lenient_parse_coerces_to_zero() {
        assert_eq!(Price::parse_lenient("garbage"), Price::ZERO);
        assert_eq!(Price::parse_lenient("-4.2"), Price::ZERO);
        assert_eq!(Price::parse_lenient(""), Price::ZERO);
        assert_eq!(Price::parse_lenient("3,99"), Price::parse("3.99").unwrap());
    }
}
