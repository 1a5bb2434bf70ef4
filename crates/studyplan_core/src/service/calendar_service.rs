//! Period creation and study-time logging.
//!
//! # Responsibility
//! - Generate a period layout and persist it in one step.
//! - Roll stopwatch minutes into day hours through the week's remainder.
//!
//! # Invariants
//! - A period is either fully persisted with all weeks/days or not at all.
//! - Study-time logging never leaves a week and its day out of step.

use crate::calendar::builder::{build_period, PeriodLayout};
use crate::model::calendar::{record_study_minutes, Day, Period, Week};
use crate::model::{RecordId, UserId, ValidationError};
use crate::repo::calendar_repo::CalendarRepository;
use crate::repo::RepoError;
use crate::timer::clock::Clock;
use crate::timer::stopwatch::Stopwatch;
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from calendar operations.
#[derive(Debug)]
pub enum CalendarServiceError {
    Validation(ValidationError),
    Repo(RepoError),
}

impl Display for CalendarServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CalendarServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<ValidationError> for CalendarServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for CalendarServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

pub type CalendarResult<T> = Result<T, CalendarServiceError>;

/// Hours and remainder after logging a study session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudyLog {
    pub hours_added: u32,
    pub hours_spent: u8,
    pub minutes_left: u32,
}

/// Calendar use-case service.
pub struct CalendarService<R: CalendarRepository> {
    repo: R,
}

impl<R: CalendarRepository> CalendarService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Builds and persists a period of `number_of_weeks` weeks.
    ///
    /// See `calendar::builder::build_period` for the validation rules.
    pub fn create_period(
        &self,
        user_id: UserId,
        year_number: u32,
        name: &str,
        number_of_weeks: u32,
        start_date: NaiveDate,
        start_week_number: u32,
    ) -> CalendarResult<PeriodLayout> {
        let layout = build_period(
            user_id,
            year_number,
            name,
            number_of_weeks,
            start_date,
            start_week_number,
        )
        .inspect_err(|err| {
            warn!("event=period_create module=calendar status=rejected error={err}");
        })?;

        let stored = self.repo.insert_layout(&layout)?;
        info!(
            "event=period_create module=calendar status=ok period_id={} weeks={}",
            stored.period.id,
            stored.weeks.len()
        );
        Ok(stored)
    }

    /// Deletes a period with everything generated or scheduled under it.
    pub fn delete_period(&self, period_id: RecordId) -> CalendarResult<()> {
        self.repo.delete_period(period_id)?;
        info!("event=period_delete module=calendar status=ok period_id={period_id}");
        Ok(())
    }

    pub fn periods(&self, user_id: UserId) -> CalendarResult<Vec<Period>> {
        Ok(self.repo.list_periods(user_id)?)
    }

    pub fn weeks(&self, period_id: RecordId) -> CalendarResult<Vec<Week>> {
        Ok(self.repo.list_weeks(period_id)?)
    }

    pub fn days(&self, week_id: RecordId) -> CalendarResult<Vec<Day>> {
        Ok(self.repo.list_days(week_id)?)
    }

    /// Adds one hour to a day, failing at the daily cap.
    pub fn add_hour(&self, day_id: RecordId) -> CalendarResult<Day> {
        let mut day = self.require_day(day_id)?;
        day.add_hour()?;
        self.repo.update_day(&day)?;
        Ok(day)
    }

    pub fn remove_hour(&self, day_id: RecordId) -> CalendarResult<Day> {
        let mut day = self.require_day(day_id)?;
        day.remove_hour()?;
        self.repo.update_day(&day)?;
        Ok(day)
    }

    /// Logs `minutes` of study against a day.
    ///
    /// Whole hours go to the day; the remainder is banked on its week.
    pub fn log_study_session(&self, day_id: RecordId, minutes: u32) -> CalendarResult<StudyLog> {
        let mut day = self.require_day(day_id)?;
        let mut week = self
            .repo
            .get_week(day.week_id)?
            .ok_or(RepoError::NotFound {
                entity: "week",
                id: day.week_id,
            })?;

        let hours_added = record_study_minutes(&mut week, &mut day, minutes)?;
        self.repo.save_study_time(&week, &day)?;
        info!(
            "event=study_log module=calendar status=ok day_id={} hours_added={} minutes_left={}",
            day.id, hours_added, week.minutes_left
        );

        Ok(StudyLog {
            hours_added,
            hours_spent: day.hours_spent,
            minutes_left: week.minutes_left,
        })
    }

    /// Logs the whole minutes a stopwatch has recorded.
    pub fn log_stopwatch<C: Clock>(
        &self,
        day_id: RecordId,
        stopwatch: &Stopwatch<C>,
    ) -> CalendarResult<StudyLog> {
        let minutes = u32::try_from(stopwatch.elapsed_minutes()).unwrap_or(u32::MAX);
        self.log_study_session(day_id, minutes)
    }

    fn require_day(&self, day_id: RecordId) -> CalendarResult<Day> {
        Ok(self.repo.get_day(day_id)?.ok_or(RepoError::NotFound {
            entity: "day",
            id: day_id,
        })?)
    }
}
