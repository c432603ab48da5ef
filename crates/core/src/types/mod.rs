//! Core types for iShop.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod contact;
pub mod email;
pub mod id;
pub mod mobile;
pub mod national_id;
pub mod postal_code;
pub mod price;
pub mod quantity;
pub mod sheba;
pub mod status;

pub use contact::{Contact, ContactError};
pub use email::{Email, EmailError};
pub use id::*;
pub use mobile::{IranianMobile, MobileError, MobileOperator};
pub use national_id::{NationalId, NationalIdError};
pub use postal_code::{PostalCode, PostalCodeError};
pub use price::{Currency, Price, PriceError};
pub use quantity::{Quantity, QuantityError};
pub use sheba::{Sheba, ShebaError};
pub use status::*;

/// Strip everything but ASCII digits, after folding Persian and Arabic-Indic
/// digits to ASCII.
pub(crate) fn ascii_digits(input: &str) -> String {
    crate::locale::to_english_digits(input)
        .chars()
        .filter(char::is_ascii_digit)
        .collect()
}

/// True when every character of a non-empty string is the same.
pub(crate) fn all_same(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|first| chars.all(|c| c == first))
}
