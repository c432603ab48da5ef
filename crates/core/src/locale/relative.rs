//! Relative timestamps in Persian.

use chrono::{DateTime, Utc};

use super::{JalaliDate, to_persian_digits};

/// Describe `then` relative to `now`: "همین الان", "۵ دقیقه پیش", "دیروز",
/// falling back to the Jalali date once it is a week or more in the past.
///
/// Timestamps in the future read as "همین الان".
#[must_use]
pub fn relative_time_fa(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let minutes = (now - then).num_minutes();

    match minutes {
        i64::MIN..=0 => "همین الان".to_string(),
        1..=59 => format!("{} دقیقه پیش", to_persian_digits(&minutes.to_string())),
        60..=1439 => format!("{} ساعت پیش", to_persian_digits(&(minutes / 60).to_string())),
        _ => match minutes / 1440 {
            1 => "دیروز".to_string(),
            days @ 2..=6 => format!("{} روز پیش", to_persian_digits(&days.to_string())),
            _ => JalaliDate::from_gregorian(then.date_naive()).format_fa(),
        },
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 1, 12, 0, 0).single().unwrap_or_default()
    }

    #[test]
    fn test_recent() {
        assert_eq!(relative_time_fa(now(), now()), "همین الان");
        assert_eq!(relative_time_fa(now() + Duration::minutes(3), now()), "همین الان");
        assert_eq!(relative_time_fa(now() - Duration::minutes(5), now()), "۵ دقیقه پیش");
        assert_eq!(relative_time_fa(now() - Duration::hours(3), now()), "۳ ساعت پیش");
    }

    #[test]
    fn test_days() {
        assert_eq!(relative_time_fa(now() - Duration::days(1), now()), "دیروز");
        assert_eq!(relative_time_fa(now() - Duration::days(4), now()), "۴ روز پیش");
    }

    #[test]
    fn test_old_dates_use_jalali() {
        let then = Utc.with_ymd_and_hms(2024, 3, 20, 8, 0, 0).single().unwrap_or_default();
        assert_eq!(relative_time_fa(then, now()), "چهارشنبه ۱ فروردین ۱۴۰۳");
    }
}
