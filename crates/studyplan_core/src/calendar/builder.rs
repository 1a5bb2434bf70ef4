//! Period → week → day lattice generation.

use crate::model::calendar::{Day, Period, Week, DAYS_PER_WEEK};
use crate::model::{UserId, ValidationError, UNSAVED_ID};
use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Largest number of weeks a single period may span.
pub const MAX_WEEKS_PER_PERIOD: u32 = 53;

/// Generated period with its ordered weeks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodLayout {
    pub period: Period,
    pub weeks: Vec<WeekLayout>,
}

/// One generated week with its Monday..Friday days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekLayout {
    pub week: Week,
    pub days: Vec<Day>,
}

impl PeriodLayout {
    /// Week with `week_number`, if generated.
    pub fn week(&self, week_number: u32) -> Option<&WeekLayout> {
        self.weeks
            .iter()
            .find(|layout| layout.week.week_number == week_number)
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.weeks.first().map(|layout| layout.week.start_date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.weeks.last().map(|layout| layout.week.end_date())
    }
}

impl WeekLayout {
    pub fn day(&self, weekday: Weekday) -> Option<&Day> {
        self.days.iter().find(|day| day.weekday() == weekday)
    }
}

/// Builds a period of `number_of_weeks` consecutive weeks.
///
/// Week `i` is numbered `start_week_number + i` and starts `7 * i` days
/// after `start_date`; each week carries five days with no hours logged.
/// All ids are unsaved.
///
/// # Errors
/// - `number_of_weeks` outside `[1, 53]`.
/// - `start_week_number < 1`, or a last week number past `u32::MAX`.
/// - blank `name`.
/// - `start_date` not a Monday.
pub fn build_period(
    user_id: UserId,
    year_number: u32,
    name: &str,
    number_of_weeks: u32,
    start_date: NaiveDate,
    start_week_number: u32,
) -> Result<PeriodLayout, ValidationError> {
    if !(1..=MAX_WEEKS_PER_PERIOD).contains(&number_of_weeks) {
        return Err(ValidationError::OutOfRange {
            field: "number of weeks",
            value: f64::from(number_of_weeks),
            min: 1.0,
            max: f64::from(MAX_WEEKS_PER_PERIOD),
        });
    }
    let last_start = u32::MAX - (number_of_weeks - 1);
    if start_week_number < 1 || start_week_number.checked_add(number_of_weeks - 1).is_none() {
        return Err(ValidationError::OutOfRange {
            field: "start week number",
            value: f64::from(start_week_number),
            min: 1.0,
            max: f64::from(last_start),
        });
    }
    if start_date.weekday() != Weekday::Mon {
        return Err(ValidationError::NotMonday(start_date));
    }
    let period = Period::new(user_id, year_number, name)?;

    let weeks = (0..number_of_weeks)
        .map(|index| {
            let week_start = start_date + Days::new(u64::from(index) * 7);
            build_week(user_id, start_week_number + index, week_start)
        })
        .collect();

    Ok(PeriodLayout { period, weeks })
}

fn build_week(user_id: UserId, week_number: u32, start_date: NaiveDate) -> WeekLayout {
    let days = (0..DAYS_PER_WEEK)
        .map(|offset| Day {
            id: UNSAVED_ID,
            user_id,
            week_id: UNSAVED_ID,
            date: start_date + Days::new(u64::from(offset)),
            hours_spent: 0,
        })
        .collect();

    WeekLayout {
        week: Week {
            id: UNSAVED_ID,
            user_id,
            period_id: UNSAVED_ID,
            week_number,
            start_date,
            minutes_left: 0,
        },
        days,
    }
}
