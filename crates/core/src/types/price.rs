//! Type-safe price representation using decimal arithmetic.
//!
//! Catalog prices are Toman amounts as handed out by the backend. They are
//! stored exactly as provided, with no minor-unit conversion, and travel over
//! the wire as plain JSON numbers written with every digit of the decimal, so
//! nothing is lost to `f64` on the way through a saved cart.

use core::fmt;
use core::iter::Sum;
use core::ops::Add;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::Quantity;

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is below zero.
    #[error("price cannot be negative (got {0})")]
    Negative(Decimal),
}

/// A non-negative Toman amount.
///
/// Arithmetic saturates instead of overflowing, so cart totals stay total
/// functions over any input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    /// A price of zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if the amount is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from a whole number of Toman.
    #[must_use]
    pub fn from_toman(amount: u64) -> Self {
        Self(Decimal::from(amount))
    }

    /// The underlying amount in Toman.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units at this unit price.
    #[must_use]
    pub fn times(self, quantity: Quantity) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity.get())))
    }

    /// The same amount expressed in `currency`.
    #[must_use]
    pub fn in_currency(self, currency: Currency) -> Decimal {
        match currency {
            Currency::Toman => self.0,
            Currency::Rial => self.0.saturating_mul(Decimal::from(Currency::RIAL_PER_TOMAN)),
        }
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::arbitrary_precision::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::arbitrary_precision::deserialize(deserializer)?;
        Self::new(amount).map_err(serde::de::Error::custom)
    }
}

/// Display currency for Iranian prices.
///
/// The catalog is priced in Toman; Rial is the official unit and is ten
/// times larger numerically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Currency {
    #[default]
    Toman,
    Rial,
}

impl Currency {
    /// Number of Rial in one Toman.
    pub const RIAL_PER_TOMAN: u32 = 10;

    /// Persian label shown after an amount.
    #[must_use]
    pub const fn label_fa(&self) -> &'static str {
        match self {
            Self::Toman => "تومان",
            Self::Rial => "ریال",
        }
    }

    /// Code used by the backend's `currency` field.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Toman => "IRT",
            Self::Rial => "IRR",
        }
    }

    /// Parse a backend currency code. Unknown codes yield `None`.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "IRT" | "TOMAN" => Some(Self::Toman),
            "IRR" | "RIAL" => Some(Self::Rial),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_price_rejected() {
        assert!(matches!(
            Price::new(Decimal::from(-1)),
            Err(PriceError::Negative(_))
        ));
        assert!(Price::new(Decimal::ZERO).is_ok());
    }

    #[test]
    fn test_times_quantity() {
        let unit = Price::from_toman(1000);
        let qty = Quantity::try_from(3).unwrap();
        assert_eq!(unit.times(qty), Price::from_toman(3000));
    }

    #[test]
    fn test_sum() {
        let total: Price = [Price::from_toman(500), Price::from_toman(250)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_toman(750));
    }

    #[test]
    fn test_serializes_as_json_number() {
        let json = serde_json::to_value(Price::from_toman(1000)).unwrap();
        assert_eq!(json.as_f64(), Some(1000.0));
    }

    #[test]
    fn test_json_keeps_every_digit() {
        let exact: Decimal = "1234.123456789012345678".parse().unwrap();
        let price = Price::new(exact).unwrap();
        assert_eq!(
            serde_json::to_string(&price).unwrap(),
            "1234.123456789012345678"
        );

        for price in [
            price,
            Price::from_toman(9_007_199_254_740_993),
            Price::new(Decimal::MAX).unwrap(),
        ] {
            let json = serde_json::to_string(&price).unwrap();
            let back: Price = serde_json::from_str(&json).unwrap();
            assert_eq!(back.amount().to_string(), price.amount().to_string());
        }
    }

    #[test]
    fn test_deserializes_integer_and_float() {
        let a: Price = serde_json::from_str("1000").unwrap();
        let b: Price = serde_json::from_str("1000.0").unwrap();
        assert_eq!(a, b);
        assert!(serde_json::from_str::<Price>("-5").is_err());
    }

    #[test]
    fn test_rial_conversion() {
        let price = Price::from_toman(1500);
        assert_eq!(price.in_currency(Currency::Rial), Decimal::from(15000));
        assert_eq!(price.in_currency(Currency::Toman), Decimal::from(1500));
    }

    #[test]
    fn test_currency_codes() {
        assert_eq!(Currency::from_code("irt"), Some(Currency::Toman));
        assert_eq!(Currency::from_code("IRR"), Some(Currency::Rial));
        assert_eq!(Currency::from_code("USD"), None);
    }
}
