//! Iranian IBAN (شبا).

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Sheba`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShebaError {
    #[error("Sheba number must be IR followed by 24 digits")]
    InvalidFormat,
    #[error("Sheba number check digits do not match")]
    ChecksumMismatch,
}

/// A Sheba number (`IR` + 24 digits) that passes the ISO 13616 mod-97 check.
///
/// ```
/// use ishop_core::Sheba;
///
/// assert!(Sheba::parse("IR06 2960 0000 0010 0324 2000 01").is_ok());
/// assert!(Sheba::parse("IR062960000000100324200002").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sheba(String);

impl Sheba {
    /// Parse a Sheba number. Whitespace is ignored and letters are
    /// upper-cased.
    ///
    /// # Errors
    ///
    /// Returns [`ShebaError`] on a malformed number or failing check digits.
    pub fn parse(input: &str) -> Result<Self, ShebaError> {
        let clean: String = input
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| c.to_ascii_uppercase())
            .collect();

        let digits = clean.strip_prefix("IR").ok_or(ShebaError::InvalidFormat)?;
        if digits.len() != 24 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(ShebaError::InvalidFormat);
        }

        // Move the country code and check digits to the end; I = 18, R = 27.
        let (check, bban) = digits.split_at(2);
        let rearranged = format!("{bban}1827{check}");
        let remainder = rearranged
            .chars()
            .filter_map(|c| c.to_digit(10))
            .fold(0_u32, |acc, digit| (acc * 10 + digit) % 97);

        if remainder != 1 {
            return Err(ShebaError::ChecksumMismatch);
        }
        Ok(Self(clean))
    }

    /// The number as `IR` followed by 24 digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sheba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Sheba {
    type Error = ShebaError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Sheba> for String {
    fn from(sheba: Sheba) -> Self {
        sheba.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid() {
        assert!(Sheba::parse("IR820540102680020817909002").is_ok());
        assert!(Sheba::parse("ir82 0540 1026 8002 0817 9090 02").is_ok());
    }

    #[test]
    fn test_invalid() {
        assert_eq!(
            Sheba::parse("DE82054010268002081790900"),
            Err(ShebaError::InvalidFormat)
        );
        assert_eq!(Sheba::parse("IR8205401026"), Err(ShebaError::InvalidFormat));
        assert_eq!(
            Sheba::parse("IR820540102680020817909003"),
            Err(ShebaError::ChecksumMismatch)
        );
    }
}
