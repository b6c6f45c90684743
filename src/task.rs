//! Due date bookkeeping of scheduler tasks.
use crate::{
    calendar::{self, CalendarDate},
    next_date, Recurrence, Result,
};
use tracing::debug;

/// Due date alias meaning "the current date".
pub const TODAY: &str = "today";

/// Scheduler task as it is kept by the storage layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Task {
    /// Storage identifier, `0` for a task which isn't stored yet.
    pub id: i64,
    /// Due date, `YYYYMMDD`.
    pub date: String,
    /// Task title.
    pub title: String,
    /// Free form comment.
    pub comment: String,
    /// Recurrence rule, empty for one-off tasks.
    pub repeat: String,
}

/// What has to happen with a task once it's done.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Completion {
    /// One-off task, delete it.
    Remove,
    /// Recurring task, move it to the contained due date (`YYYYMMDD`).
    Reschedule(String),
}

impl Completion {
    /// New due date of a rescheduled task.
    pub fn next_date(&self) -> Option<&str> {
        match self {
            Completion::Remove => None,
            Completion::Reschedule(date) => Some(date),
        }
    }
}

impl Task {
    /// Returns `true` if the task has a recurrence rule.
    #[inline]
    pub fn is_recurring(&self) -> bool {
        !self.repeat.is_empty()
    }

    /// Brings due date of a new or edited task into canonical form relative to `now`:
    /// - empty date or `today` becomes today's date;
    /// - past date of a recurring task moves to its next occurrence after today;
    /// - past date of a one-off task becomes today's date;
    /// - today's and future dates are kept as is.
    ///
    /// The recurrence rule is validated even when the date doesn't need to move.
    pub fn normalize_date<R: CalendarDate + ?Sized>(&mut self, now: &R) -> Result<()> {
        let today = now.calendar_date();
        if self.is_recurring() {
            Recurrence::new(self.repeat.as_str())?;
        }

        if self.date.is_empty() || self.date.eq_ignore_ascii_case(TODAY) {
            self.date = calendar::format_date(today);
            debug!(task_id = self.id, date = %self.date, "due date set to today");
            return Ok(());
        }

        let date = calendar::parse_date(&self.date)?;
        if date < today {
            let date = if self.is_recurring() {
                next_date(&today, &self.date, &self.repeat)?
            } else {
                calendar::format_date(today)
            };
            debug!(task_id = self.id, from = %self.date, to = %date, repeat = %self.repeat, "past due date moved");
            self.date = date;
        }

        Ok(())
    }

    /// Decides what to do with the task when it's marked as done at `now`.
    pub fn complete<R: CalendarDate + ?Sized>(&self, now: &R) -> Result<Completion> {
        if !self.is_recurring() {
            debug!(task_id = self.id, "one-off task completed");
            return Ok(Completion::Remove);
        }

        let next = next_date(now, &self.date, &self.repeat)?;
        debug!(
            task_id = self.id,
            date = %self.date,
            repeat = %self.repeat,
            next = %next,
            "recurring task rescheduled"
        );

        Ok(Completion::Reschedule(next))
    }
}
