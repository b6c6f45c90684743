//! Lightweight task recurrence rules parser and next due date calculator.
#![deny(unsafe_code, missing_docs)]

//! This is a tiny crate, intended to:
//! - parse compact recurrence rules of personal scheduler tasks;
//! - calculate the next due date of a recurring task, strictly after the provided reference date.
//!
//! Dates are plain calendar dates (no time of the day, no timezone), and are exchanged as
//! fixed width `YYYYMMDD` strings, for example `20240229`.
//!
//! _This is not a task scheduler or runner._ Storage of tasks, HTTP API, authentication and so on
//! belong to the application.
//!
//! ## Recurrence rule format
//!
//! Rule is a whitespace separated list of tokens, the first token selects the rule kind:
//!
//! | Rule               | Example         | Meaning                                                    |
//! |--------------------|-----------------|------------------------------------------------------------|
//! | `d <N>`            | `d 7`           | every `N` days, `N` is in `1..=400`                        |
//! | `y`                | `y`             | every year on the anchor's day and month                   |
//! | `w <W,...>`        | `w 1,3`         | on the listed weekdays, `1` is Monday and `7` is Sunday    |
//! | `m <D,...>`        | `m 1,15,-1`     | on the listed days of month                                |
//! | `m <D,...> <M,...>`| `m -1 2,8`      | on the listed days of the listed months only               |
//!
//! Days of month are `1..=31`, `-1` means the last day of the month and `-2` the day before it.
//! Months are `1..=12`; the months filter restricts every listed day, `-1` and `-2` included.
//! A day which doesn't exist in some month (like `31` in April) is just skipped in that month.
//!
//! Yearly rule counts years from the anchor date: February 29 falls back to February 28 in common years.
//!
//! ## How to use
//!
//! The simplest entry point is [`next_date()`] function:
//! ```rust
//! use chrono::NaiveDate;
//! use recur_lite::{next_date, RecurError};
//!
//! let today = NaiveDate::from_ymd_opt(2024, 2, 27).unwrap();
//!
//! assert_eq!(next_date(&today, "20240201", "m -1").unwrap(), "20240229");
//! assert_eq!(next_date(&today, "20240201", "d 0"), Err(RecurError::MaxDaysExceeded("0".into())));
//! ```
//!
//! Reference date may be any of chrono's `NaiveDate`, `NaiveDateTime` or `DateTime<Tz>`,
//! only its calendar date matters.
//!
//! To reuse a parsed rule, or to get a series of dates, use [`Schedule`]:
//! ```rust
//! use chrono::NaiveDate;
//! use recur_lite::{Result, Schedule};
//!
//! fn series() -> Result<()> {
//!     let schedule = Schedule::new("20240101", "w 1,3")?;
//!     let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
//!
//!     // The next event strictly after today
//!     assert_eq!(schedule.upcoming(&today), NaiveDate::from_ymd_opt(2024, 1, 15));
//!
//!     // Next 10 events
//!     schedule.iter(&today).take(10).for_each(|d| println!("next: {d}"));
//!
//!     Ok(())
//! }
//! # series().unwrap();
//! ```
//!
//! [`Task`] wraps the due date bookkeeping of the scheduler: normalization of the date of a new task
//! and the decision what to do with a completed one. It reports its steps as `tracing` debug events.
//!
//! # Feature flags
//! * `serde`: adds [`Serialize`](https://docs.rs/serde/latest/serde/trait.Serialize.html) and [`Deserialize`](https://docs.rs/serde/latest/serde/trait.Deserialize.html) trait implementation for [`Recurrence`] and [`Task`].
//! * `clock`: adds `next_date_from_today()` which uses the current UTC date as the reference.

/// Calendar helpers and `YYYYMMDD` dates codec.
pub mod calendar;
/// Crate specific Error implementation.
pub mod error;
/// Recurrence rule parser.
pub mod rule;
/// Next date calculation.
pub mod schedule;
pub mod task;

// Re-export of public entities.
pub use calendar::CalendarDate;
pub use error::RecurError;
pub use rule::{DaySpec, Recurrence, MAX_DAILY_INTERVAL};
pub use schedule::{next_date, Schedule};
pub use task::{Completion, Task};

#[cfg(feature = "clock")]
pub use schedule::next_date_from_today;

/// Convenient alias for `Result`.
pub type Result<T, E = RecurError> = std::result::Result<T, E>;
