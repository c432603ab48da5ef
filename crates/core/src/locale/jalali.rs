//! Solar Hijri (Jalali) calendar.
//!
//! Conversion uses the 33-year arithmetic cycle, which agrees with the
//! astronomical calendar for every year from 1178 to 1633 AP.

use core::cmp::Ordering;
use core::fmt;

use chrono::{Datelike, NaiveDate, Weekday};

use super::to_persian_digits;

const MONTH_NAMES: [&str; 12] = [
    "فروردین",
    "اردیبهشت",
    "خرداد",
    "تیر",
    "مرداد",
    "شهریور",
    "مهر",
    "آبان",
    "آذر",
    "دی",
    "بهمن",
    "اسفند",
];

/// Days before each Gregorian month in a non-leap year.
const GREGORIAN_DAYS_BEFORE_MONTH: [i64; 12] =
    [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];

/// A date in the Jalali calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JalaliDate {
    year: i32,
    month: u32,
    day: u32,
    weekday: Weekday,
}

impl JalaliDate {
    /// Convert a Gregorian date.
    #[must_use]
    pub fn from_gregorian(date: NaiveDate) -> Self {
        let gy = i64::from(date.year());
        let gm = date.month0() as usize;
        let gd = i64::from(date.day());

        let gy2 = if gm > 1 { gy + 1 } else { gy };
        let before_month = GREGORIAN_DAYS_BEFORE_MONTH.get(gm).copied().unwrap_or(0);
        let mut days = 355_666 + 365 * gy + (gy2 + 3) / 4 - (gy2 + 99) / 100 + (gy2 + 399) / 400
            + gd
            + before_month;

        let mut jy = -1595 + 33 * (days / 12_053);
        days %= 12_053;
        jy += 4 * (days / 1461);
        days %= 1461;
        if days > 365 {
            jy += (days - 1) / 365;
            days = (days - 1) % 365;
        }

        let (jm, jd) = if days < 186 {
            (1 + days / 31, 1 + days % 31)
        } else {
            (7 + (days - 186) / 30, 1 + (days - 186) % 30)
        };

        Self {
            year: i32::try_from(jy).unwrap_or(i32::MAX),
            month: u32::try_from(jm).unwrap_or(1),
            day: u32::try_from(jd).unwrap_or(1),
            weekday: date.weekday(),
        }
    }

    /// Jalali year.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Month, 1 (Farvardin) to 12 (Esfand).
    #[must_use]
    pub const fn month(&self) -> u32 {
        self.month
    }

    /// Day of month, starting at 1.
    #[must_use]
    pub const fn day(&self) -> u32 {
        self.day
    }

    /// Persian month name.
    #[must_use]
    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES
            .get(self.month.saturating_sub(1) as usize)
            .copied()
            .unwrap_or_default()
    }

    /// Persian weekday name.
    #[must_use]
    pub const fn weekday_name(&self) -> &'static str {
        weekday_fa(self.weekday)
    }

    /// Long form, e.g. `چهارشنبه ۱ فروردین ۱۴۰۳`.
    #[must_use]
    pub fn format_fa(&self) -> String {
        format!(
            "{} {} {} {}",
            self.weekday_name(),
            to_persian_digits(&self.day.to_string()),
            self.month_name(),
            to_persian_digits(&self.year.to_string())
        )
    }
}

impl fmt::Display for JalaliDate {
    /// Numeric form, `YYYY/MM/DD` in ASCII digits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:02}/{:02}", self.year, self.month, self.day)
    }
}

// The weekday follows from the date, so ordering by (year, month, day) is
// consistent with `Eq`.
impl Ord for JalaliDate {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.year, self.month, self.day).cmp(&(other.year, other.month, other.day))
    }
}

impl PartialOrd for JalaliDate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<NaiveDate> for JalaliDate {
    fn from(date: NaiveDate) -> Self {
        Self::from_gregorian(date)
    }
}

/// Persian name of a weekday.
#[must_use]
pub const fn weekday_fa(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sat => "شنبه",
        Weekday::Sun => "یکشنبه",
        Weekday::Mon => "دوشنبه",
        Weekday::Tue => "سه‌شنبه",
        Weekday::Wed => "چهارشنبه",
        Weekday::Thu => "پنج‌شنبه",
        Weekday::Fri => "جمعه",
    }
}
