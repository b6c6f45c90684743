use crate::{
    calendar::{self, CalendarDate},
    rule::{DaySpec, Recurrence, RuleValueType},
    RecurError, Result,
};
use chrono::{Datelike, Days, Months, NaiveDate};
use std::collections::BTreeSet;

/// Days to look ahead for a weekly match.
const WEEK_LEN: u32 = 7;

/// Days to look ahead for a monthly match.
///
/// The sparsest valid monthly rule is `m 29 2`, which may wait up to eight years
/// (there is no leap day between 2096 and 2104).
const MONTHLY_SEARCH_DAYS: u32 = 9 * 366;

/// Task recurrence: anchor date plus the rule to advance it with.
///
/// For rule grammar and usage examples, please refer to the [crate documentation](crate).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Schedule {
    anchor: NaiveDate,
    rule: Recurrence,
}

impl Schedule {
    /// Parses `anchor` date (`YYYYMMDD`) and `rule`, and constructs [`Schedule`] instance.
    ///
    /// Empty rule is reported before the anchor is looked at, anchor errors take precedence over rule errors.
    pub fn new(anchor: impl AsRef<str>, rule: impl Into<String>) -> Result<Self> {
        let rule = rule.into();
        if rule.is_empty() {
            return Err(RecurError::EmptyRule);
        }

        let anchor = calendar::parse_date(anchor.as_ref())?;
        let rule = Recurrence::new(rule)?;

        Ok(Self { anchor, rule })
    }

    /// Constructs [`Schedule`] from already parsed parts.
    #[inline]
    pub fn from_parts(anchor: NaiveDate, rule: Recurrence) -> Self {
        Self { anchor, rule }
    }

    /// Date the recurrence starts from.
    #[inline]
    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    /// Recurrence rule.
    #[inline]
    pub fn rule(&self) -> &Recurrence {
        &self.rule
    }

    /// Returns the first date of the schedule which is strictly after both the anchor and `reference` dates.
    ///
    /// Only calendar date of the `reference` is used, time of the day doesn't matter.
    ///
    /// Returns `None` if there is no such date within the supported date range,
    /// or if the rule was constructed by hand with values which never match.
    pub fn upcoming<R: CalendarDate + ?Sized>(&self, reference: &R) -> Option<NaiveDate> {
        let reference = reference.calendar_date();

        match &self.rule {
            Recurrence::Daily(interval) => next_daily(self.anchor, reference, *interval),
            Recurrence::Yearly => next_yearly(self.anchor, reference),
            Recurrence::Weekly(weekdays) => next_matching(self.anchor, reference, WEEK_LEN, |date| {
                weekdays.contains(&calendar::iso_weekday(date))
            }),
            Recurrence::Monthly { days, months } => {
                next_matching(self.anchor, reference, MONTHLY_SEARCH_DAYS, |date| {
                    is_monthly_match(date, days, months.as_ref())
                })
            }
        }
    }

    /// Returns iterator of dates strictly after `reference`.
    #[inline]
    pub fn iter<R: CalendarDate + ?Sized>(&self, reference: &R) -> impl Iterator<Item = NaiveDate> {
        ScheduleIterator {
            schedule: self.clone(),
            next: self.upcoming(reference),
        }
    }

    /// Consumes [`Schedule`] and returns iterator of dates strictly after `reference`.
    #[inline]
    pub fn into_iter<R: CalendarDate + ?Sized>(self, reference: &R) -> impl Iterator<Item = NaiveDate> {
        let next = self.upcoming(reference);
        ScheduleIterator { schedule: self, next }
    }
}

/// Contains iterator state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ScheduleIterator {
    schedule: Schedule,
    next: Option<NaiveDate>,
}

impl Iterator for ScheduleIterator {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.take()?;
        self.next = self.schedule.upcoming(&current);
        Some(current)
    }
}

/// Calculates the next date of the task with `anchor` date and `rule` recurrence, strictly after `reference`.
///
/// Returns date in `YYYYMMDD` format or [`RecurError`] if anchor or rule are invalid.
///
/// ```rust
/// use chrono::NaiveDate;
/// use recur_lite::next_date;
///
/// let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
/// assert_eq!(next_date(&today, "20240101", "w 1,3").unwrap(), "20240115");
/// ```
pub fn next_date<R: CalendarDate + ?Sized>(reference: &R, anchor: &str, rule: &str) -> Result<String> {
    let schedule = Schedule::new(anchor, rule)?;

    schedule
        .upcoming(reference)
        .filter(|date| date.year() <= calendar::MAX_YEAR)
        .map(calendar::format_date)
        .ok_or_else(|| RecurError::InvalidDate(format!("{anchor}: next date is out of range")))
}

/// Same as [`next_date`] with current UTC date as the reference.
#[cfg(feature = "clock")]
pub fn next_date_from_today(anchor: &str, rule: &str) -> Result<String> {
    next_date(&chrono::Utc::now(), anchor, rule)
}

/// Smallest `anchor + k * interval` (k >= 1) after `reference`, without stepping.
fn next_daily(anchor: NaiveDate, reference: NaiveDate, interval: u16) -> Option<NaiveDate> {
    if interval == 0 {
        return None;
    }

    let interval = interval as i64;
    let elapsed = reference.signed_duration_since(anchor).num_days();
    let steps = if elapsed < 0 { 1 } else { elapsed / interval + 1 };

    anchor.checked_add_days(Days::new(u64::try_from(steps.checked_mul(interval)?).ok()?))
}

/// Smallest `anchor + k years` (k >= 1) after `reference`.
///
/// Years are always counted from the anchor, so February 29 turns into February 28
/// in common years and comes back in leap years.
fn next_yearly(anchor: NaiveDate, reference: NaiveDate) -> Option<NaiveDate> {
    let mut years = u32::try_from((reference.year() - anchor.year()).max(1)).ok()?;

    loop {
        let candidate = anchor.checked_add_months(Months::new(years.checked_mul(12)?))?;
        if candidate > reference {
            return Some(candidate);
        }
        years += 1;
    }
}

/// Steps one day at a time from the later of `anchor` and `reference` until `predicate` holds.
fn next_matching(
    anchor: NaiveDate,
    reference: NaiveDate,
    limit: u32,
    predicate: impl Fn(NaiveDate) -> bool,
) -> Option<NaiveDate> {
    let mut current = anchor.max(reference);

    for _ in 0..limit {
        current = current.succ_opt()?;
        if predicate(current) {
            return Some(current);
        }
    }

    None
}

/// Months filter constrains every kind of day, the last/penultimate day markers included.
fn is_monthly_match(date: NaiveDate, days: &BTreeSet<DaySpec>, months: Option<&BTreeSet<RuleValueType>>) -> bool {
    if let Some(months) = months {
        if !months.contains(&(date.month() as RuleValueType)) {
            return false;
        }
    }

    (days.contains(&DaySpec::Last) && calendar::is_last_day_of_month(date))
        || (days.contains(&DaySpec::Penultimate) && calendar::is_penultimate_day_of_month(date))
        || days.contains(&DaySpec::Day(date.day() as RuleValueType))
}
