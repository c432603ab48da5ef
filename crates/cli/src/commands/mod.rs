//! Command implementations.
//!
//! Output goes through `tracing` at INFO, like the rest of the binary.

pub mod account;
pub mod cart;
pub mod catalog;
pub mod checkout;

use ishop_core::Price;
use ishop_core::locale::{format_price_fa, to_persian_digits};

/// Price as `1250 IRT`, or `۱٬۲۵۰ تومان` in Persian mode.
fn price(amount: Price, fa: bool) -> String {
    if fa {
        format_price_fa(amount)
    } else {
        format!("{amount} IRT")
    }
}

/// A number with Persian digits in Persian mode.
fn number(value: impl ToString, fa: bool) -> String {
    let text = value.to_string();
    if fa { to_persian_digits(&text) } else { text }
}
