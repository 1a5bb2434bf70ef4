//! Periods, weeks and days.
//!
//! # Responsibility
//! - Hold the generated Mon..Fri lattice that time logging and scheduling
//!   hang off.
//! - Enforce the per-day work-hour cap.
//!
//! # Invariants
//! - `Week.start_date` is always a Monday; a week spans five study days.
//! - `Day.hours_spent` never exceeds `MAX_WORK_HOURS`; violating mutations
//!   fail and leave the day unchanged.
//! - `Week.minutes_left` holds minutes not yet rolled up into whole hours.

use crate::model::{require_text, RecordId, UserId, ValidationError, UNSAVED_ID};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Upper bound on hours logged against a single day.
pub const MAX_WORK_HOURS: u8 = 12;

/// Number of study days in every week.
pub const DAYS_PER_WEEK: u32 = 5;

/// Named block of weeks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub id: RecordId,
    pub user_id: UserId,
    /// `Year.year_number` this period belongs to.
    pub associated_year: u32,
    pub name: String,
}

impl Period {
    pub fn new(
        user_id: UserId,
        associated_year: u32,
        name: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let period = Self {
            id: UNSAVED_ID,
            user_id,
            associated_year,
            name: name.into().trim().to_string(),
        };
        period.validate()?;
        Ok(period)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("period name", &self.name)
    }
}

/// Monday..Friday span inside a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Week {
    pub id: RecordId,
    pub user_id: UserId,
    pub period_id: RecordId,
    /// Sequential, 1-based within the period.
    pub week_number: u32,
    pub start_date: NaiveDate,
    pub minutes_left: u32,
}

impl Week {
    /// Last study day (Friday) of the week.
    pub fn end_date(&self) -> NaiveDate {
        self.start_date + Days::new(u64::from(DAYS_PER_WEEK - 1))
    }

    /// Whether `date` falls on one of this week's study days.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date()
    }

    /// Date of `weekday` within this week.
    pub fn date_for(&self, weekday: Weekday) -> Result<NaiveDate, ValidationError> {
        let offset = study_day_offset(weekday)?;
        Ok(self.start_date + Days::new(u64::from(offset)))
    }

    /// Adds `minutes` to the banked remainder and returns the whole hours
    /// that rolled over. The sub-hour remainder stays in `minutes_left`.
    pub fn bank_minutes(&mut self, minutes: u32) -> u32 {
        let (hours, remainder) = split_minutes(self.minutes_left, minutes);
        self.minutes_left = remainder;
        hours
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.week_number < 1 {
            return Err(ValidationError::OutOfRange {
                field: "week number",
                value: f64::from(self.week_number),
                min: 1.0,
                max: f64::from(u32::MAX),
            });
        }
        if self.start_date.weekday() != Weekday::Mon {
            return Err(ValidationError::NotMonday(self.start_date));
        }
        Ok(())
    }
}

/// One calendar day within a week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Day {
    pub id: RecordId,
    pub user_id: UserId,
    pub week_id: RecordId,
    pub date: NaiveDate,
    pub hours_spent: u8,
}

impl Day {
    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    pub fn add_hour(&mut self) -> Result<(), ValidationError> {
        self.add_hours(1)
    }

    /// Adds `hours`, failing without change when the cap would be crossed.
    pub fn add_hours(&mut self, hours: u32) -> Result<(), ValidationError> {
        let requested = u32::from(self.hours_spent).saturating_add(hours);
        self.hours_spent = checked_hours(requested)?;
        Ok(())
    }

    pub fn remove_hour(&mut self) -> Result<(), ValidationError> {
        if self.hours_spent == 0 {
            return Err(ValidationError::NoHoursLogged);
        }
        self.hours_spent -= 1;
        Ok(())
    }

    pub fn set_hours_spent(&mut self, hours: u32) -> Result<(), ValidationError> {
        self.hours_spent = checked_hours(hours)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        checked_hours(u32::from(self.hours_spent))?;
        study_day_offset(self.weekday())?;
        Ok(())
    }
}

/// Total hours logged across `days`.
pub fn total_hours(days: &[Day]) -> u32 {
    days.iter().map(|day| u32::from(day.hours_spent)).sum()
}

/// Rolls `minutes` of study time into `day` through the week's remainder.
///
/// Returns the whole hours added to the day. Both records are left untouched
/// when the day is not part of the week or the hour cap would be crossed.
pub fn record_study_minutes(
    week: &mut Week,
    day: &mut Day,
    minutes: u32,
) -> Result<u32, ValidationError> {
    if !week.contains(day.date) {
        return Err(ValidationError::DayOutsideWeek {
            date: day.date,
            week_start: week.start_date,
        });
    }
    let (hours, _) = split_minutes(week.minutes_left, minutes);
    checked_hours(u32::from(day.hours_spent).saturating_add(hours))?;

    let banked = week.bank_minutes(minutes);
    day.add_hours(banked)?;
    Ok(banked)
}

fn split_minutes(banked: u32, minutes: u32) -> (u32, u32) {
    let total = banked.saturating_add(minutes);
    (total / 60, total % 60)
}

fn checked_hours(hours: u32) -> Result<u8, ValidationError> {
    if hours > u32::from(MAX_WORK_HOURS) {
        return Err(ValidationError::HoursCapExceeded {
            requested: hours,
            max: MAX_WORK_HOURS,
        });
    }
    // Bounded by MAX_WORK_HOURS above.
    Ok(hours as u8)
}

fn study_day_offset(weekday: Weekday) -> Result<u32, ValidationError> {
    match weekday {
        Weekday::Sat | Weekday::Sun => Err(ValidationError::NotStudyDay(weekday)),
        other => Ok(other.num_days_from_monday()),
    }
}

#[cfg(test)]
mod tests {
    use super::{record_study_minutes, total_hours, Day, Week, MAX_WORK_HOURS};
    use crate::model::ValidationError;
    use chrono::{NaiveDate, Weekday};

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 29).unwrap()
    }

    fn week() -> Week {
        Week {
            id: 3,
            user_id: 1,
            period_id: 2,
            week_number: 1,
            start_date: monday(),
            minutes_left: 0,
        }
    }

    fn day(date: NaiveDate) -> Day {
        Day {
            id: 4,
            user_id: 1,
            week_id: 3,
            date,
            hours_spent: 0,
        }
    }

    #[test]
    fn date_for_resolves_weekdays_and_rejects_weekend() {
        let week = week();
        assert_eq!(
            week.date_for(Weekday::Wed).unwrap(),
            NaiveDate::from_ymd_opt(2025, 10, 1).unwrap()
        );
        assert_eq!(week.end_date(), NaiveDate::from_ymd_opt(2025, 10, 3).unwrap());
        assert_eq!(
            week.date_for(Weekday::Sat).unwrap_err(),
            ValidationError::NotStudyDay(Weekday::Sat)
        );
    }

    #[test]
    fn add_hour_fails_on_crossing_call() {
        let mut day = day(monday());
        for _ in 0..MAX_WORK_HOURS {
            day.add_hour().unwrap();
        }
        let err = day.add_hour().unwrap_err();
        assert!(matches!(err, ValidationError::HoursCapExceeded { requested: 13, .. }));
        assert_eq!(day.hours_spent, MAX_WORK_HOURS);
    }

    #[test]
    fn remove_hour_rejects_empty_day() {
        let mut day = day(monday());
        assert_eq!(day.remove_hour().unwrap_err(), ValidationError::NoHoursLogged);
    }

    #[test]
    fn bank_minutes_keeps_remainder() {
        let mut week = week();
        assert_eq!(week.bank_minutes(50), 0);
        assert_eq!(week.minutes_left, 50);
        assert_eq!(week.bank_minutes(75), 2);
        assert_eq!(week.minutes_left, 5);
    }

    #[test]
    fn record_study_minutes_is_atomic_on_cap_violation() {
        let mut week = week();
        week.minutes_left = 30;
        let mut day = day(monday());
        day.hours_spent = 11;

        let err = record_study_minutes(&mut week, &mut day, 120).unwrap_err();
        assert!(matches!(err, ValidationError::HoursCapExceeded { .. }));
        assert_eq!(week.minutes_left, 30);
        assert_eq!(day.hours_spent, 11);

        assert_eq!(record_study_minutes(&mut week, &mut day, 40).unwrap(), 1);
        assert_eq!(week.minutes_left, 10);
        assert_eq!(day.hours_spent, 12);
        assert_eq!(total_hours(&[day]), 12);
    }

    #[test]
    fn huge_hour_request_is_rejected_without_change() {
        let mut day = day(monday());
        day.hours_spent = 1;

        let err = day.add_hours(u32::MAX).unwrap_err();
        assert_eq!(
            err,
            ValidationError::HoursCapExceeded {
                requested: u32::MAX,
                max: MAX_WORK_HOURS,
            }
        );
        assert_eq!(day.hours_spent, 1);
    }

    #[test]
    fn record_study_minutes_rejects_foreign_day() {
        let mut week = week();
        let mut day = day(NaiveDate::from_ymd_opt(2025, 10, 8).unwrap());
        let err = record_study_minutes(&mut week, &mut day, 60).unwrap_err();
        assert!(matches!(err, ValidationError::DayOutsideWeek { .. }));
    }
}
