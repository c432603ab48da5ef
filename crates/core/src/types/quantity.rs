//! Line item quantity.

use core::fmt;
use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

/// Errors that can occur when constructing a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityError {
    /// Zero is not a valid line item quantity.
    #[error("quantity must be at least 1")]
    Zero,
}

/// A line item quantity, always at least one.
///
/// Removal of a line is a separate operation; a quantity can never be used to
/// express it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A quantity of one.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Clamp an arbitrary requested quantity into the valid range.
    ///
    /// Values below one become one; values above `u32::MAX` saturate.
    #[must_use]
    pub fn clamped(requested: i64) -> Self {
        let value = u32::try_from(requested.max(1)).unwrap_or(u32::MAX);
        NonZeroU32::new(value).map_or(Self::ONE, Self)
    }

    /// The quantity as a plain integer.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0.get()
    }

    /// One more unit, saturating at `u32::MAX`.
    #[must_use]
    pub const fn incremented(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<u32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        NonZeroU32::new(value).map(Self).ok_or(QuantityError::Zero)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.get()
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped() {
        assert_eq!(Quantity::clamped(0).get(), 1);
        assert_eq!(Quantity::clamped(-20).get(), 1);
        assert_eq!(Quantity::clamped(5).get(), 5);
        assert_eq!(Quantity::clamped(i64::MAX).get(), u32::MAX);
    }

    #[test]
    fn test_incremented_saturates() {
        let max = Quantity::try_from(u32::MAX).unwrap();
        assert_eq!(max.incremented(), max);
        assert_eq!(Quantity::ONE.incremented().get(), 2);
    }

    #[test]
    fn test_zero_rejected_on_parse() {
        assert!(serde_json::from_str::<Quantity>("0").is_err());
        assert!(serde_json::from_str::<Quantity>("-1").is_err());
        assert_eq!(serde_json::from_str::<Quantity>("3").unwrap().get(), 3);
    }
}
