//! Digit transliteration and fa-IR number formatting.

use rust_decimal::Decimal;

const PERSIAN_DIGITS: [char; 10] = ['۰', '۱', '۲', '۳', '۴', '۵', '۶', '۷', '۸', '۹'];
const ARABIC_DIGITS: [char; 10] = ['٠', '١', '٢', '٣', '٤', '٥', '٦', '٧', '٨', '٩'];

/// Arabic thousands separator used by fa-IR.
const GROUP_SEPARATOR: char = '٬';
/// Arabic decimal separator used by fa-IR.
const DECIMAL_SEPARATOR: char = '٫';

/// Fraction digits kept when formatting, matching `Intl.NumberFormat`.
const MAX_FRACTION_DIGITS: u32 = 3;

/// Replace ASCII digits with Persian digits; other characters pass through.
#[must_use]
pub fn to_persian_digits(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            c.to_digit(10)
                .and_then(|d| PERSIAN_DIGITS.get(d as usize).copied())
                .unwrap_or(c)
        })
        .collect()
}

/// Replace Persian and Arabic-Indic digits with ASCII digits.
#[must_use]
pub fn to_english_digits(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            PERSIAN_DIGITS
                .iter()
                .position(|&p| p == c)
                .or_else(|| ARABIC_DIGITS.iter().position(|&a| a == c))
                .and_then(|i| char::from_digit(u32::try_from(i).ok()?, 10))
                .unwrap_or(c)
        })
        .collect()
}

/// Format a number the way fa-IR does: Persian digits, `٬` between
/// thousands and `٫` before at most three fraction digits.
#[must_use]
pub fn format_number_fa(value: Decimal) -> String {
    let rounded = value.round_dp(MAX_FRACTION_DIGITS).normalize();
    let text = rounded.abs().to_string();
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut out = String::new();
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }

    let len = whole.len();
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(GROUP_SEPARATOR);
        }
        out.push(c);
    }

    if !fraction.is_empty() {
        out.push(DECIMAL_SEPARATOR);
        out.push_str(fraction);
    }

    to_persian_digits(&out)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn test_to_persian_digits() {
        assert_eq!(to_persian_digits("1403/01/01"), "۱۴۰۳/۰۱/۰۱");
        assert_eq!(to_persian_digits("abc"), "abc");
    }

    #[test]
    fn test_to_english_digits() {
        assert_eq!(to_english_digits("۰۹۱۲"), "0912");
        assert_eq!(to_english_digits("٣٤ and ۵"), "34 and 5");
    }

    #[test]
    fn test_format_number_grouping() {
        assert_eq!(format_number_fa(Decimal::from(0)), "۰");
        assert_eq!(format_number_fa(Decimal::from(999)), "۹۹۹");
        assert_eq!(format_number_fa(Decimal::from(1000)), "۱٬۰۰۰");
        assert_eq!(format_number_fa(Decimal::from(1_234_567)), "۱٬۲۳۴٬۵۶۷");
    }

    #[test]
    fn test_format_number_fraction_and_sign() {
        let value = Decimal::from_str("1234.5").unwrap_or_default();
        assert_eq!(format_number_fa(value), "۱٬۲۳۴٫۵");
        let value = Decimal::from_str("2.00049").unwrap_or_default();
        assert_eq!(format_number_fa(value), "۲");
        assert_eq!(format_number_fa(Decimal::from(-1500)), "-۱٬۵۰۰");
    }
}
