//! Persian (fa-IR) presentation helpers.
//!
//! - [`digits`] - Digit transliteration and number grouping
//! - [`jalali`] - Solar Hijri calendar conversion and date formatting
//! - [`relative`] - "five minutes ago" style timestamps

pub mod digits;
pub mod jalali;
pub mod relative;

pub use digits::{format_number_fa, to_english_digits, to_persian_digits};
pub use jalali::JalaliDate;
pub use relative::relative_time_fa;

use rust_decimal::Decimal;

use crate::types::{Currency, Price};

/// Format a Toman price for display, e.g. `۱۲۵٬۰۰۰ تومان`.
#[must_use]
pub fn format_price_fa(price: Price) -> String {
    format_price_in(price, Currency::Toman)
}

/// Format a Toman price converted to `currency`.
#[must_use]
pub fn format_price_in(price: Price, currency: Currency) -> String {
    format!(
        "{} {}",
        format_number_fa(price.in_currency(currency)),
        currency.label_fa()
    )
}

/// Format a price range; collapses to a single price when both ends match.
#[must_use]
pub fn format_price_range(min: Price, max: Price) -> String {
    if min == max {
        return format_price_fa(min);
    }
    format!("{} - {}", format_price_fa(min), format_price_fa(max))
}

/// Discount label such as `۲۵% تخفیف`, rounded to the nearest percent.
///
/// Returns `None` when the original price is zero.
#[must_use]
pub fn format_discount_fa(original: Price, discounted: Price) -> Option<String> {
    if original.amount().is_zero() {
        return None;
    }
    let percent = ((original.amount() - discounted.amount()) * Decimal::ONE_HUNDRED
        / original.amount())
    .round();
    Some(format!("{}% تخفیف", to_persian_digits(&percent.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_fa() {
        assert_eq!(format_price_fa(Price::from_toman(1000)), "۱٬۰۰۰ تومان");
        assert_eq!(format_price_fa(Price::ZERO), "۰ تومان");
    }

    #[test]
    fn test_format_price_in_rial() {
        assert_eq!(
            format_price_in(Price::from_toman(1500), Currency::Rial),
            "۱۵٬۰۰۰ ریال"
        );
    }

    #[test]
    fn test_format_price_range() {
        let a = Price::from_toman(100);
        let b = Price::from_toman(2500);
        assert_eq!(format_price_range(a, a), "۱۰۰ تومان");
        assert_eq!(format_price_range(a, b), "۱۰۰ تومان - ۲٬۵۰۰ تومان");
    }

    #[test]
    fn test_format_discount() {
        assert_eq!(
            format_discount_fa(Price::from_toman(200), Price::from_toman(150)).as_deref(),
            Some("۲۵% تخفیف")
        );
        assert_eq!(format_discount_fa(Price::ZERO, Price::ZERO), None);
    }
}
