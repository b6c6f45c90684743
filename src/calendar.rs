//! Calendar helpers and the `YYYYMMDD` date codec.
use crate::{RecurError, Result};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone};

/// Length of the external date representation.
pub const DATE_LEN: usize = 8;

/// Latest year which still fits into the `YYYYMMDD` representation.
pub const MAX_YEAR: i32 = 9999;

/// Anything which can act as the reference point of the recurrence calculation.
///
/// Only the calendar date matters: time of day (and timezone) is dropped,
/// so a date-time is reduced to the date it has in its own timezone.
pub trait CalendarDate {
    /// Returns calendar date of the value.
    fn calendar_date(&self) -> NaiveDate;
}

impl CalendarDate for NaiveDate {
    #[inline]
    fn calendar_date(&self) -> NaiveDate {
        *self
    }
}

impl CalendarDate for NaiveDateTime {
    #[inline]
    fn calendar_date(&self) -> NaiveDate {
        self.date()
    }
}

impl<Tz: TimeZone> CalendarDate for DateTime<Tz> {
    #[inline]
    fn calendar_date(&self) -> NaiveDate {
        self.date_naive()
    }
}

impl<T: CalendarDate + ?Sized> CalendarDate for &T {
    #[inline]
    fn calendar_date(&self) -> NaiveDate {
        (**self).calendar_date()
    }
}

/// Parses fixed width `YYYYMMDD` string into a calendar date.
///
/// Returns [`RecurError::InvalidDate`] if the input has wrong length, contains anything
/// but ASCII digits or doesn't name a real date (like `20230229`).
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    if input.len() != DATE_LEN || !input.bytes().all(|b| b.is_ascii_digit()) {
        return Err(RecurError::InvalidDate(input.to_owned()));
    }

    let invalid = || RecurError::InvalidDate(input.to_owned());
    let year = input[0..4].parse::<i32>().map_err(|_| invalid())?;
    let month = input[4..6].parse::<u32>().map_err(|_| invalid())?;
    let day = input[6..8].parse::<u32>().map_err(|_| invalid())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)
}

/// Formats date as `YYYYMMDD`.
pub fn format_date(date: NaiveDate) -> String {
    format!("{:04}{:02}{:02}", date.year(), date.month(), date.day())
}

/// Returns `true` if provided year is leap.
#[inline]
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Returns number of days in specified month.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => panic!("Invalid month: {month}"),
    }
}

/// Longest possible length of the month across all years.
pub(crate) fn max_days_in_month(month: u32) -> u32 {
    if month == 2 {
        29
    } else {
        days_in_month(1, month)
    }
}

/// Returns `true` if the date is the last day of its month.
#[inline]
pub fn is_last_day_of_month(date: NaiveDate) -> bool {
    date.day() == days_in_month(date.year(), date.month())
}

/// Returns `true` if the date is the day before the last day of its month.
#[inline]
pub fn is_penultimate_day_of_month(date: NaiveDate) -> bool {
    date.day() + 1 == days_in_month(date.year(), date.month())
}

/// ISO number of the weekday: Monday is `1`, Sunday is `7`.
#[inline]
pub(crate) fn iso_weekday(date: NaiveDate) -> u8 {
    date.weekday().number_from_monday() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, NaiveTime, Utc};
    use rstest::rstest;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case("20240101", ymd(2024, 1, 1))]
    #[case("20240229", ymd(2024, 2, 29))]
    #[case("19991231", ymd(1999, 12, 31))]
    #[case("00010101", ymd(1, 1, 1))]
    #[case("99991231", ymd(9999, 12, 31))]
    fn test_parse_date_valid(#[case] input: &str, #[case] expected: NaiveDate) {
        assert_eq!(parse_date(input), Ok(expected));
    }

    #[rstest]
    #[case("")]
    #[case("2024-01-01")]
    #[case("2024011")]
    #[case("202401011")]
    #[case("2024O101")]
    #[case("+2024101")]
    #[case(" 20240101")]
    #[case("20240132")]
    #[case("20241301")]
    #[case("20240001")]
    #[case("20240100")]
    #[case("20230229")]
    #[case("20240431")]
    #[case("２０２４0101")]
    fn test_parse_date_invalid(#[case] input: &str) {
        assert_eq!(parse_date(input), Err(RecurError::InvalidDate(input.to_owned())));
    }

    #[rstest]
    #[case(ymd(2024, 1, 6), "20240106")]
    #[case(ymd(999, 3, 9), "09990309")]
    #[case(ymd(9999, 12, 31), "99991231")]
    fn test_format_date(#[case] date: NaiveDate, #[case] expected: &str) {
        let formatted = format_date(date);
        assert_eq!(formatted, expected);
        assert_eq!(parse_date(&formatted), Ok(date));
    }

    #[rstest]
    // Test leap years divisible by 4 but not 100
    #[case(2024, true)]
    #[case(1996, true)]
    // Test leap years divisible by 400
    #[case(2000, true)]
    #[case(1600, true)]
    // Test non-leap years not divisible by 4
    #[case(2023, false)]
    #[case(2021, false)]
    // Test non-leap years divisible by 100 but not 400
    #[case(1900, false)]
    #[case(2100, false)]
    fn test_is_leap_year(#[case] year: i32, #[case] expected: bool) {
        assert_eq!(
            is_leap_year(year),
            expected,
            "{year:} is {}",
            if expected { "leap" } else { "not-leap" }
        );
    }

    #[rstest]
    #[case(2023, 1, 31)]
    #[case(2023, 4, 30)]
    #[case(2023, 2, 28)]
    #[case(2024, 2, 29)]
    #[case(1900, 2, 28)]
    #[case(2000, 2, 29)]
    #[case(2023, 12, 31)]
    fn test_days_in_month(#[case] y: i32, #[case] m: u32, #[case] expected: u32) {
        assert_eq!(days_in_month(y, m), expected, "{y:04}-{m:02} has {expected} days");
    }

    #[rstest]
    #[case(2023, 0)]
    #[case(2023, 13)]
    #[should_panic(expected = "Invalid month")]
    fn test_days_in_month_invalid(#[case] y: i32, #[case] m: u32) {
        days_in_month(y, m);
    }

    #[test]
    fn test_max_days_in_month() {
        let expected = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
        for (month, days) in (1..=12).zip(expected) {
            assert_eq!(max_days_in_month(month), days, "month = {month}");
        }
    }

    #[rstest]
    #[case(ymd(2024, 1, 31), true, false)]
    #[case(ymd(2024, 1, 30), false, true)]
    #[case(ymd(2024, 2, 29), true, false)]
    #[case(ymd(2024, 2, 28), false, true)]
    #[case(ymd(2023, 2, 28), true, false)]
    #[case(ymd(2023, 2, 27), false, true)]
    #[case(ymd(2024, 4, 30), true, false)]
    #[case(ymd(2024, 4, 29), false, true)]
    #[case(ymd(2024, 4, 1), false, false)]
    fn test_last_and_penultimate_day(#[case] date: NaiveDate, #[case] last: bool, #[case] penultimate: bool) {
        assert_eq!(is_last_day_of_month(date), last, "date = {date}");
        assert_eq!(is_penultimate_day_of_month(date), penultimate, "date = {date}");
    }

    #[rstest]
    #[case(ymd(2024, 1, 1), 1)] // Monday
    #[case(ymd(2024, 1, 3), 3)] // Wednesday
    #[case(ymd(2024, 1, 6), 6)] // Saturday
    #[case(ymd(2024, 1, 7), 7)] // Sunday
    #[case(ymd(2024, 2, 29), 4)] // Thursday
    fn test_iso_weekday(#[case] date: NaiveDate, #[case] expected: u8) {
        assert_eq!(iso_weekday(date), expected, "date = {date}");
    }

    #[test]
    fn test_calendar_date_drops_time() {
        let date = ymd(2024, 1, 10);
        let naive = date.and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap());

        assert_eq!(date.calendar_date(), date);
        assert_eq!(naive.calendar_date(), date);
        assert_eq!(Utc.from_utc_datetime(&naive).calendar_date(), date);
        assert_eq!((&date).calendar_date(), date);
    }

    #[test]
    fn test_calendar_date_uses_own_timezone() {
        let dt = DateTime::parse_from_rfc3339("2024-01-10T23:30:00-05:00").unwrap();
        assert_eq!(dt.calendar_date(), ymd(2024, 1, 10));
        assert_eq!(dt.with_timezone(&Utc).calendar_date(), ymd(2024, 1, 11));

        let offset = FixedOffset::east_opt(3600).unwrap();
        assert_eq!(dt.with_timezone(&offset).calendar_date(), ymd(2024, 1, 11));
    }
}
