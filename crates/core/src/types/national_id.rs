//! Iranian national ID (کد ملی).

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{all_same, ascii_digits};

/// Errors that can occur when parsing a [`NationalId`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NationalIdError {
    #[error("national ID must be exactly 10 digits")]
    InvalidLength,
    #[error("national ID cannot repeat a single digit")]
    RepeatedDigit,
    #[error("national ID check digit does not match")]
    ChecksumMismatch,
}

/// A ten-digit national ID with a valid check digit.
///
/// The check digit is the last digit. With `s = Σ dᵢ·(10 − i)` over the first
/// nine digits and `r = s mod 11`, it must equal `r` when `r < 2`, else
/// `11 − r`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NationalId(String);

impl NationalId {
    /// Parse a national ID, ignoring separators and accepting Persian digits.
    ///
    /// # Errors
    ///
    /// Returns [`NationalIdError`] for a wrong length, a repeated single
    /// digit or a failing check digit.
    pub fn parse(input: &str) -> Result<Self, NationalIdError> {
        let digits = ascii_digits(input);
        if digits.len() != 10 {
            return Err(NationalIdError::InvalidLength);
        }
        if all_same(&digits) {
            return Err(NationalIdError::RepeatedDigit);
        }

        let values: Vec<u32> = digits.chars().filter_map(|c| c.to_digit(10)).collect();
        let (body, check) = values.split_at(9);
        let sum: u32 = body
            .iter()
            .zip((2..=10).rev())
            .map(|(digit, weight)| digit * weight)
            .sum();
        let remainder = sum % 11;
        let expected = if remainder < 2 { remainder } else { 11 - remainder };

        if check.first() != Some(&expected) {
            return Err(NationalIdError::ChecksumMismatch);
        }
        Ok(Self(digits))
    }

    /// The ID as ten ASCII digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NationalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for NationalId {
    type Error = NationalIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<NationalId> for String {
    fn from(id: NationalId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_ids() {
        assert!(NationalId::parse("0013542419").is_ok());
        assert!(NationalId::parse("001-354241-9").is_ok());
        assert!(NationalId::parse("۰۰۱۳۵۴۲۴۱۹").is_ok());
    }

    #[test]
    fn test_checksum_mismatch() {
        assert_eq!(
            NationalId::parse("0013542418"),
            Err(NationalIdError::ChecksumMismatch)
        );
    }

    #[test]
    fn test_rejects_repeated_and_short() {
        assert_eq!(
            NationalId::parse("1111111111"),
            Err(NationalIdError::RepeatedDigit)
        );
        assert_eq!(NationalId::parse("12345"), Err(NationalIdError::InvalidLength));
    }
}
