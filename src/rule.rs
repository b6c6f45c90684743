use crate::{calendar, RecurError, Result};
use std::{collections::BTreeSet, fmt::Display, str::FromStr};

/// Largest allowed interval of the daily rule.
pub const MAX_DAILY_INTERVAL: u16 = 400;

/// Type of the numeric rule values: weekdays, days and months.
pub type RuleValueType = u8;

const DAILY: &str = "d";
const YEARLY: &str = "y";
const WEEKLY: &str = "w";
const MONTHLY: &str = "m";

const LAST_DAY: &str = "-1";
const PENULTIMATE_DAY: &str = "-2";

/// Parsed and validated recurrence rule.
///
/// Rule string grammar:
/// - `d <N>`: every `N` days, `N` is in `1..=400`;
/// - `y`: every year;
/// - `w <W>[,<W>...]`: on the listed ISO weekdays, `1` is Monday and `7` is Sunday;
/// - `m <D>[,<D>...] [<M>[,<M>...]]`: on the listed days of month (`1..=31`, `-1` for the last day,
///   `-2` for the day before the last one), optionally only in the listed months (`1..=12`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String"))]
#[cfg_attr(feature = "serde", serde(into = "String"))]
pub enum Recurrence {
    /// Every N days.
    Daily(u16),
    /// Every year on the anchor's day and month.
    Yearly,
    /// Set of ISO weekdays.
    Weekly(BTreeSet<RuleValueType>),
    /// Set of days of month with optional months filter.
    Monthly {
        /// Days to match.
        days: BTreeSet<DaySpec>,
        /// Months to match, `None` means each month.
        months: Option<BTreeSet<RuleValueType>>,
    },
}

/// Day of month specifier of the monthly rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DaySpec {
    /// Particular day, `1..=31`.
    Day(RuleValueType),
    /// The last day of the month.
    Last,
    /// The day before the last day of the month.
    Penultimate,
}

impl Recurrence {
    /// Parses and validates provided `rule` and constructs [`Recurrence`] instance.
    ///
    /// Returns [`RecurError`] in a case provided rule is unparsable or has invalid values.
    pub fn new(rule: impl Into<String>) -> Result<Self> {
        let rule = rule.into();
        if rule.is_empty() {
            return Err(RecurError::EmptyRule);
        }

        let elements: Vec<&str> = rule.split_whitespace().collect();
        let Some(family) = elements.first() else {
            return Err(RecurError::InvalidFormat(rule));
        };

        match *family {
            DAILY => {
                let [_, interval] = elements[..] else {
                    return Err(RecurError::InvalidFormat(rule));
                };
                let interval = interval
                    .parse::<i64>()
                    .map_err(|_| RecurError::InvalidFormat(rule.clone()))?;
                if interval <= 0 || interval > MAX_DAILY_INTERVAL as i64 {
                    return Err(RecurError::MaxDaysExceeded(interval.to_string()));
                }
                Ok(Self::Daily(interval as u16))
            }
            YEARLY => {
                if elements.len() != 1 {
                    return Err(RecurError::InvalidFormat(rule));
                }
                Ok(Self::Yearly)
            }
            WEEKLY => {
                let [_, weekdays] = elements[..] else {
                    return Err(RecurError::InvalidFormat(rule));
                };
                let weekdays = parse_list(weekdays, 1, 7, RecurError::InvalidWeekday)?;
                Ok(Self::Weekly(weekdays))
            }
            MONTHLY => {
                let (days, months) = match elements[..] {
                    [_, days] => (days, None),
                    [_, days, months] => (days, Some(months)),
                    _ => return Err(RecurError::InvalidFormat(rule)),
                };

                let days_input = days;
                let days = days
                    .split(',')
                    .map(DaySpec::parse)
                    .collect::<Result<BTreeSet<DaySpec>>>()?;
                let months = months
                    .map(|months| parse_list(months, 1, 12, RecurError::InvalidMonth))
                    .transpose()?;

                // Numeric days which never exist in any of the filtered months can't produce a date.
                if let Some(months) = &months {
                    let feasible = days.iter().any(|day| match day {
                        DaySpec::Day(day) => months
                            .iter()
                            .any(|month| *day as u32 <= calendar::max_days_in_month(*month as u32)),
                        DaySpec::Last | DaySpec::Penultimate => true,
                    });
                    if !feasible {
                        return Err(RecurError::InvalidDay(days_input.to_owned()));
                    }
                }

                Ok(Self::Monthly { days, months })
            }
            other => Err(RecurError::UnsupportedRule(other.to_owned())),
        }
    }
}

impl DaySpec {
    fn parse(input: &str) -> Result<Self> {
        match input {
            LAST_DAY => Ok(Self::Last),
            PENULTIMATE_DAY => Ok(Self::Penultimate),
            _ => parse_value(input, 1, 31)
                .map(Self::Day)
                .ok_or_else(|| RecurError::InvalidDay(input.to_owned())),
        }
    }
}

/// Converts string into unsigned number with bounds validation.
fn parse_value(input: &str, min: RuleValueType, max: RuleValueType) -> Option<RuleValueType> {
    let value = input.parse::<i64>().ok()?;
    if value < min as i64 || value > max as i64 {
        None
    } else {
        Some(value as RuleValueType)
    }
}

/// Parses comma separated list of bounded numbers, duplicates are merged.
fn parse_list(
    input: &str,
    min: RuleValueType,
    max: RuleValueType,
    error: fn(String) -> RecurError,
) -> Result<BTreeSet<RuleValueType>> {
    input
        .split(',')
        .map(|value| parse_value(value, min, max).ok_or_else(|| error(value.to_owned())))
        .collect()
}

fn join<T: Display>(values: impl IntoIterator<Item = T>) -> String {
    values.into_iter().map(|v| v.to_string()).collect::<Vec<_>>().join(",")
}

impl Display for DaySpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DaySpec::Day(day) => write!(f, "{day}"),
            DaySpec::Last => write!(f, "{LAST_DAY}"),
            DaySpec::Penultimate => write!(f, "{PENULTIMATE_DAY}"),
        }
    }
}

impl Display for Recurrence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Recurrence::Daily(interval) => write!(f, "{DAILY} {interval}"),
            Recurrence::Yearly => write!(f, "{YEARLY}"),
            Recurrence::Weekly(weekdays) => write!(f, "{WEEKLY} {}", join(weekdays)),
            Recurrence::Monthly { days, months: None } => write!(f, "{MONTHLY} {}", join(days)),
            Recurrence::Monthly {
                days,
                months: Some(months),
            } => write!(f, "{MONTHLY} {} {}", join(days), join(months)),
        }
    }
}

impl From<Recurrence> for String {
    fn from(value: Recurrence) -> Self {
        value.to_string()
    }
}

impl From<&Recurrence> for String {
    fn from(value: &Recurrence) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Recurrence {
    type Error = RecurError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&String> for Recurrence {
    type Error = RecurError;

    fn try_from(value: &String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Recurrence {
    type Error = RecurError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl FromStr for Recurrence {
    type Err = RecurError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}
