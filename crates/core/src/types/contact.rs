//! Sign-up contact: either an email address or a mobile number.

use core::fmt;

use super::{Email, EmailError, IranianMobile, MobileError};

/// Errors that can occur when parsing a [`Contact`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    #[error("invalid email: {0}")]
    Email(#[from] EmailError),
    #[error("invalid mobile number: {0}")]
    Mobile(#[from] MobileError),
}

/// The `email_or_phone` field of a registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Contact {
    Email(Email),
    Mobile(IranianMobile),
}

impl Contact {
    /// Anything containing `@` is treated as an email, everything else as a
    /// mobile number.
    ///
    /// # Errors
    ///
    /// Returns the parse error of whichever form was attempted.
    pub fn parse(input: &str) -> Result<Self, ContactError> {
        if input.contains('@') {
            Ok(Self::Email(Email::parse(input)?))
        } else {
            Ok(Self::Mobile(IranianMobile::parse(input)?))
        }
    }

    /// The normalized value sent to the backend.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Email(email) => email.as_str(),
            Self::Mobile(mobile) => mobile.as_str(),
        }
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_or_mobile() {
        assert!(matches!(Contact::parse("ali@example.ir"), Ok(Contact::Email(_))));
        assert!(matches!(Contact::parse("0912 345 6789"), Ok(Contact::Mobile(_))));
        assert!(matches!(Contact::parse("ali@"), Err(ContactError::Email(_))));
        assert!(matches!(Contact::parse("12"), Err(ContactError::Mobile(_))));
    }

    #[test]
    fn test_normalized_value() {
        let contact = Contact::parse("+98 912 345 6789").unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(contact.as_str(), "09123456789");
    }
}
