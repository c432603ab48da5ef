//! Iranian postal code.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::{all_same, ascii_digits};

/// Errors that can occur when parsing a [`PostalCode`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostalCodeError {
    #[error("postal code must be exactly 10 digits")]
    InvalidLength,
    #[error("postal code cannot repeat a single digit")]
    RepeatedDigit,
}

/// A ten-digit postal code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PostalCode(String);

impl PostalCode {
    /// Parse a postal code, ignoring separators and accepting Persian digits.
    ///
    /// # Errors
    ///
    /// Returns [`PostalCodeError`] for a wrong length or a repeated digit.
    pub fn parse(input: &str) -> Result<Self, PostalCodeError> {
        let digits = ascii_digits(input);
        if digits.len() != 10 {
            return Err(PostalCodeError::InvalidLength);
        }
        if all_same(&digits) {
            return Err(PostalCodeError::RepeatedDigit);
        }
        Ok(Self(digits))
    }

    /// The code as ten ASCII digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Grouped as `XXXXX-XXXXX`.
    #[must_use]
    pub fn formatted(&self) -> String {
        let (head, tail) = self.0.split_at(5);
        format!("{head}-{tail}")
    }
}

impl fmt::Display for PostalCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for PostalCode {
    type Error = PostalCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PostalCode> for String {
    fn from(code: PostalCode) -> Self {
        code.0
    }
}
