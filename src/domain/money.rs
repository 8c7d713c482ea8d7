use crate::error::{PulseError, Result};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Currency used when none is configured.
pub const DEFAULT_CURRENCY: &str = "INR";

/// A positive amount of money in major currency units (rupees, dollars).
///
/// Gateways expect the smallest subunit instead; see [`Amount::to_subunits`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(PulseError::invalid("amount", "must be positive"))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Converts to hundredths (paise, cents), rounding half away from zero.
    pub fn to_subunits(&self) -> Result<i64> {
        self.0
            .checked_mul(Decimal::ONE_HUNDRED)
            .map(|v| v.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|v| v.to_i64())
            .ok_or_else(|| PulseError::invalid("amount", "is too large"))
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = PulseError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

/// Normalises a configured ISO 4217 code to upper case.
pub fn parse_currency(code: &str) -> Result<String> {
    let code = code.trim();
    if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code.to_ascii_uppercase())
    } else {
        Err(PulseError::ConfigError(format!(
            "currency must be a three-letter ISO code, got '{code}'"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_validation() {
        assert!(Amount::new(dec!(1.0)).is_ok());
        assert!(matches!(
            Amount::new(dec!(0.0)),
            Err(PulseError::ValidationError(_))
        ));
        assert!(matches!(
            Amount::new(dec!(-1.0)),
            Err(PulseError::ValidationError(_))
        ));
    }

    #[test]
    fn test_to_subunits() {
        assert_eq!(Amount::new(dec!(250)).unwrap().to_subunits().unwrap(), 25000);
        assert_eq!(Amount::new(dec!(19.99)).unwrap().to_subunits().unwrap(), 1999);
        assert_eq!(Amount::new(dec!(10.005)).unwrap().to_subunits().unwrap(), 1001);
        assert_eq!(Amount::new(dec!(10.004)).unwrap().to_subunits().unwrap(), 1000);
    }

    #[test]
    fn test_to_subunits_overflow() {
        let huge = Amount::new(Decimal::MAX).unwrap();
        assert!(matches!(
            huge.to_subunits(),
            Err(PulseError::ValidationError(_))
        ));
    }

    #[test]
    fn test_amount_deserialization_rejects_non_positive() {
        let ok: Amount = serde_json::from_str("250").unwrap();
        assert_eq!(ok.value(), dec!(250));
        assert!(serde_json::from_str::<Amount>("0").is_err());
    }

    #[test]
    fn test_parse_currency() {
        assert_eq!(parse_currency(" inr ").unwrap(), "INR");
        assert!(parse_currency("RUPEE").is_err());
        assert!(parse_currency("12$").is_err());
    }
}
