use thiserror::Error;

/// Crate specific Errors implementation.
#[derive(Debug, Error, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RecurError {
    /// Recurrence rule string is empty.
    #[error("empty repeat rule")]
    EmptyRule,
    /// Anchor date isn't a real calendar date in `YYYYMMDD` format.
    #[error("invalid date: {0}")]
    InvalidDate(String),
    /// Wrong number of rule tokens or non-integer argument.
    #[error("invalid repeat format: {0}")]
    InvalidFormat(String),
    /// Invalid day of month value specified.
    #[error("invalid day: {0}")]
    InvalidDay(String),
    /// Invalid month value specified.
    #[error("invalid month: {0}")]
    InvalidMonth(String),
    /// Invalid day of week value specified.
    #[error("invalid weekday: {0}")]
    InvalidWeekday(String),
    /// Daily interval is out of the `1..=400` range.
    #[error("max days exceeded: {0}")]
    MaxDaysExceeded(String),
    /// Unknown rule family.
    #[error("unsupported repeat rule: {0}")]
    UnsupportedRule(String),
}
