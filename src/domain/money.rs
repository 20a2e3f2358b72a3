use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// An exact decimal currency amount, always carrying two fractional digits.
/// Every construction and derived computation rounds half-up to the cent, so
/// sub-cent precision never leaks into balances, fees or the wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    const SCALE: u32 = 2;

    /// Quantize an arbitrary decimal to a money amount (half-up, 2 digits).
    pub fn new(value: Decimal) -> Self {
        let mut quantized =
            value.round_dp_with_strategy(Self::SCALE, RoundingStrategy::MidpointAwayFromZero);
        quantized.rescale(Self::SCALE);
        Self(quantized)
    }

    pub fn zero() -> Self {
        Self::new(Decimal::ZERO)
    }

    /// Parse decimal text into a money amount. Extra fractional digits are
    /// quantized half-up rather than rejected, so "10.005" parses to 10.01.
    pub fn parse(input: &str) -> Result<Self, ParseMoneyError> {
        let value = Decimal::from_str(input.trim()).map_err(|_| ParseMoneyError::InvalidFormat)?;
        Ok(Self::new(value))
    }

    /// The underlying decimal value (scale is always 2).
    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money::new(self.0 + rhs.0)
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money::new(self.0 - rhs.0)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseMoneyError {
    InvalidFormat,
}

impl fmt::Display for ParseMoneyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseMoneyError::InvalidFormat => write!(f, "invalid money format"),
        }
    }
}

impl std::error::Error for ParseMoneyError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_and_format() {
        assert_eq!(Money::parse("50.00").unwrap().to_string(), "50.00");
        assert_eq!(Money::parse("50").unwrap().to_string(), "50.00");
        assert_eq!(Money::parse("12.5").unwrap().to_string(), "12.50");
        assert_eq!(Money::parse(" 1000.00 ").unwrap().to_string(), "1000.00");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_parse_quantizes_half_up() {
        assert_eq!(Money::parse("10.005").unwrap(), Money::new(dec!(10.01)));
        assert_eq!(Money::parse("10.004").unwrap(), Money::new(dec!(10.00)));
        assert_eq!(Money::parse("2.675").unwrap(), Money::new(dec!(2.68)));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(Money::parse("abc").is_err());
        assert!(Money::parse("12.34.56").is_err());
        assert!(Money::parse("").is_err());
    }

    #[test]
    fn test_arithmetic_keeps_scale() {
        let a = Money::parse("0.10").unwrap();
        let b = Money::parse("0.20").unwrap();
        assert_eq!((a + b).to_string(), "0.30");
        assert_eq!((b - a).to_string(), "0.10");
    }

    #[test]
    fn test_ordering() {
        let small = Money::parse("999.99").unwrap();
        let big = Money::parse("1000.00").unwrap();
        assert!(small < big);
        assert!(Money::parse("-0.01").unwrap() < Money::zero());
        assert!(!Money::zero().is_positive());
        assert!(big.is_positive());
    }

    #[test]
    fn test_serializes_as_decimal_text() {
        let json = serde_json::to_string(&Money::parse("900.00").unwrap()).unwrap();
        assert_eq!(json, "\"900.00\"");
    }
}
