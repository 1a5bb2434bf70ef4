//! Recurring event/task expansion.
//!
//! # Responsibility
//! - Expand one recurring definition into one persisted instance per week.
//! - Apply week-relative description templates per instance.
//!
//! # Invariants
//! - Definitions are validated before the first insert.
//! - Weeks are processed in the order given; processing stops at the first
//!   failing week and earlier inserts are kept (no rollback, no retry).

use crate::calendar::template::apply_template;
use crate::model::calendar::Week;
use crate::model::schedule::{check_time_order, Event, HourSlot, Task};
use crate::model::{require_text, RecordId, UserId, ValidationError};
use crate::repo::calendar_repo::CalendarRepository;
use crate::repo::schedule_repo::ScheduleRepository;
use crate::repo::RepoError;
use chrono::Weekday;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors that stop a schedule operation before anything is written.
#[derive(Debug)]
pub enum ScheduleError {
    Validation(ValidationError),
    Repo(RepoError),
}

impl Display for ScheduleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ScheduleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ScheduleError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for ScheduleError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// Recurring event definition; `description` may hold week placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurringEvent {
    pub user_id: UserId,
    pub weekday: Weekday,
    pub module_id: RecordId,
    pub name: String,
    pub description: String,
    pub start_time: HourSlot,
    pub end_time: HourSlot,
}

/// Recurring task definition; `description` may hold week placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurringTask {
    pub user_id: UserId,
    pub module_id: RecordId,
    pub description: String,
}

/// Week whose instance could not be persisted.
#[derive(Debug)]
pub struct WeekFailure {
    pub week_number: u32,
    pub error: RepoError,
}

/// Result of expanding a recurring definition.
#[derive(Debug)]
pub struct RecurringOutcome<T> {
    /// Instances persisted before any failure, in week order.
    pub created: Vec<T>,
    pub failure: Option<WeekFailure>,
}

impl<T> RecurringOutcome<T> {
    fn new(capacity: usize) -> Self {
        Self {
            created: Vec::with_capacity(capacity),
            failure: None,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Scheduler over a calendar and a schedule repository.
pub struct SchedulerService<C: CalendarRepository, S: ScheduleRepository> {
    calendar: C,
    schedule: S,
}

impl<C: CalendarRepository, S: ScheduleRepository> SchedulerService<C, S> {
    pub fn new(calendar: C, schedule: S) -> Self {
        Self { calendar, schedule }
    }

    /// Weeks `start_week..=end_week` of a period, in order.
    ///
    /// # Errors
    /// - `ValidationError::InvalidWeekRange` unless `start_week < end_week`.
    /// - `ValidationError::WeekNotInPeriod` when either end is not a week of
    ///   the period.
    pub fn weeks_in_range(
        &self,
        period_id: RecordId,
        start_week: u32,
        end_week: u32,
    ) -> Result<Vec<Week>, ScheduleError> {
        if start_week >= end_week {
            return Err(ValidationError::InvalidWeekRange {
                start: start_week,
                end: end_week,
            }
            .into());
        }
        let weeks: Vec<Week> = self
            .calendar
            .list_weeks(period_id)?
            .into_iter()
            .filter(|week| (start_week..=end_week).contains(&week.week_number))
            .collect();
        for endpoint in [start_week, end_week] {
            if !weeks.iter().any(|week| week.week_number == endpoint) {
                return Err(ValidationError::WeekNotInPeriod(endpoint).into());
            }
        }
        Ok(weeks)
    }

    /// Persists one event on the given day.
    pub fn add_event(&self, event: &Event) -> Result<Event, ScheduleError> {
        let mut created = event.clone();
        created.id = self.schedule.insert_event(event)?;
        Ok(created)
    }

    /// Persists one task for the given week.
    pub fn add_task(&self, task: &Task) -> Result<Task, ScheduleError> {
        let mut created = task.clone();
        created.id = self.schedule.insert_task(task)?;
        Ok(created)
    }

    /// Creates one event per week on `definition.weekday`.
    pub fn add_recurring_event(
        &self,
        definition: &RecurringEvent,
        weeks: &[Week],
    ) -> Result<RecurringOutcome<Event>, ScheduleError> {
        require_text("event name", &definition.name)?;
        check_time_order(definition.start_time, definition.end_time)?;
        for week in weeks {
            week.date_for(definition.weekday)?;
        }

        let mut outcome = RecurringOutcome::new(weeks.len());
        for week in weeks {
            match self.insert_event_for_week(definition, week) {
                Ok(event) => outcome.created.push(event),
                Err(error) => {
                    outcome.failure = Some(WeekFailure {
                        week_number: week.week_number,
                        error,
                    });
                    break;
                }
            }
        }

        log_outcome("event", weeks.len(), &outcome);
        Ok(outcome)
    }

    /// Creates one task per week.
    pub fn add_recurring_task(
        &self,
        definition: &RecurringTask,
        weeks: &[Week],
    ) -> Result<RecurringOutcome<Task>, ScheduleError> {
        require_text("task description", &definition.description)?;

        let mut outcome = RecurringOutcome::new(weeks.len());
        for week in weeks {
            match self.insert_task_for_week(definition, week) {
                Ok(task) => outcome.created.push(task),
                Err(error) => {
                    outcome.failure = Some(WeekFailure {
                        week_number: week.week_number,
                        error,
                    });
                    break;
                }
            }
        }

        log_outcome("task", weeks.len(), &outcome);
        Ok(outcome)
    }

    fn insert_event_for_week(
        &self,
        definition: &RecurringEvent,
        week: &Week,
    ) -> Result<Event, RepoError> {
        let date = week.date_for(definition.weekday)?;
        let day = self.calendar.find_day(week.id, date)?.ok_or_else(|| {
            RepoError::InvalidData(format!("week {} has no day for {date}", week.id))
        })?;

        let mut event = Event::new(
            definition.user_id,
            day.id,
            definition.module_id,
            definition.name.as_str(),
            apply_template(week.week_number, &definition.description),
            definition.start_time,
            definition.end_time,
        )?;
        event.id = self.schedule.insert_event(&event)?;
        Ok(event)
    }

    fn insert_task_for_week(
        &self,
        definition: &RecurringTask,
        week: &Week,
    ) -> Result<Task, RepoError> {
        let mut task = Task::new(
            definition.user_id,
            definition.module_id,
            week.id,
            apply_template(week.week_number, &definition.description),
        )?;
        task.id = self.schedule.insert_task(&task)?;
        Ok(task)
    }
}

fn log_outcome<T>(kind: &str, requested: usize, outcome: &RecurringOutcome<T>) {
    match &outcome.failure {
        None => info!(
            "event=recurring_schedule module=schedule status=ok kind={kind} weeks={requested} created={}",
            outcome.created.len()
        ),
        Some(failure) => warn!(
            "event=recurring_schedule module=schedule status=partial kind={kind} weeks={requested} created={} failed_week={} error={}",
            outcome.created.len(),
            failure.week_number,
            failure.error
        ),
    }
}
