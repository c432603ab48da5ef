//! Iranian mobile phone numbers.

use core::fmt;

use serde::{Deserialize, Serialize};

use super::ascii_digits;

/// Errors that can occur when parsing an [`IranianMobile`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MobileError {
    /// After normalization the number is not `09` followed by nine digits.
    #[error("mobile number must be 11 digits starting with 09")]
    InvalidFormat,
    /// The prefix does not belong to any known operator.
    #[error("unknown mobile operator prefix {0}")]
    UnknownOperator(String),
}

/// Iranian mobile network operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MobileOperator {
    HamrahAvval,
    Irancell,
    Rightel,
    Talia,
    ShatelMobile,
    Samantel,
}

impl MobileOperator {
    /// Four-digit prefixes assigned to each operator.
    const PREFIXES: &'static [(Self, &'static [&'static str])] = &[
        (
            Self::HamrahAvval,
            &[
                "0910", "0911", "0912", "0913", "0914", "0915", "0916", "0917", "0918", "0919",
                "0990", "0991", "0992", "0993", "0994",
            ],
        ),
        (
            Self::Irancell,
            &[
                "0900", "0901", "0902", "0903", "0904", "0905", "0930", "0933", "0935", "0936",
                "0937", "0938", "0939", "0941",
            ],
        ),
        (Self::Rightel, &["0920", "0921", "0922", "0923"]),
        (Self::Talia, &["0932"]),
        (Self::ShatelMobile, &["0998"]),
        (Self::Samantel, &["0999"]),
    ];

    fn from_prefix(prefix: &str) -> Option<Self> {
        Self::PREFIXES
            .iter()
            .find(|(_, prefixes)| prefixes.contains(&prefix))
            .map(|(operator, _)| *operator)
    }

    /// Persian display name.
    #[must_use]
    pub const fn name_fa(&self) -> &'static str {
        match self {
            Self::HamrahAvval => "همراه اول",
            Self::Irancell => "ایرانسل",
            Self::Rightel => "رایتل",
            Self::Talia => "تالیا",
            Self::ShatelMobile => "شاتل موبایل",
            Self::Samantel => "سامان تل",
        }
    }
}

/// A normalized Iranian mobile number in `09XXXXXXXXX` form.
///
/// Parsing accepts Persian digits, separators, a `+98`/`98` country prefix
/// and a missing leading zero.
///
/// ```
/// use ishop_core::IranianMobile;
///
/// let mobile = IranianMobile::parse("+98 912 345 6789").unwrap();
/// assert_eq!(mobile.as_str(), "09123456789");
/// assert_eq!(mobile.formatted(), "0912 345 6789");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IranianMobile {
    number: String,
    operator: MobileOperator,
}

impl IranianMobile {
    /// Parse and normalize a mobile number.
    ///
    /// # Errors
    ///
    /// Returns [`MobileError`] when the normalized number is malformed or its
    /// prefix is not assigned to a known operator.
    pub fn parse(input: &str) -> Result<Self, MobileError> {
        let mut digits = ascii_digits(input);

        if digits.len() == 12 && digits.starts_with("98") {
            digits.drain(..2);
        }
        if digits.len() == 10 && !digits.starts_with('0') {
            digits.insert(0, '0');
        }

        if digits.len() != 11 || !digits.starts_with("09") {
            return Err(MobileError::InvalidFormat);
        }

        let prefix = digits.get(..4).ok_or(MobileError::InvalidFormat)?;
        let operator = MobileOperator::from_prefix(prefix)
            .ok_or_else(|| MobileError::UnknownOperator(prefix.to_string()))?;

        Ok(Self {
            number: digits,
            operator,
        })
    }

    /// The number as eleven ASCII digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.number
    }

    /// The operator owning the prefix.
    #[must_use]
    pub const fn operator(&self) -> MobileOperator {
        self.operator
    }

    /// Grouped as `09XX XXX XXXX`.
    #[must_use]
    pub fn formatted(&self) -> String {
        let (head, rest) = self.number.split_at(4);
        let (mid, tail) = rest.split_at(3);
        format!("{head} {mid} {tail}")
    }
}

impl fmt::Display for IranianMobile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.number)
    }
}

impl TryFrom<String> for IranianMobile {
    type Error = MobileError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<IranianMobile> for String {
    fn from(mobile: IranianMobile) -> Self {
        mobile.number
    }
}
