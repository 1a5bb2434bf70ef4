//! Validation errors raised by model constructors and setters.

use chrono::{NaiveDate, Weekday};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Input violation detected at construction or mutation time.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Required text field is blank after trim.
    EmptyField(&'static str),
    /// Numeric field outside its inclusive range.
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    /// Numeric field that must not be negative.
    Negative { field: &'static str, value: f64 },
    /// Maximum score of zero; grades would divide by zero.
    ZeroMaxScore,
    /// Recorded score is larger than the maximum score.
    ScoreExceedsMax { score: f64, max_score: f64 },
    /// Week anchors must start on a Monday.
    NotMonday(NaiveDate),
    /// Weekday outside the Monday..Friday study week.
    NotStudyDay(Weekday),
    /// Day does not belong to the week it is paired with.
    DayOutsideWeek { date: NaiveDate, week_start: NaiveDate },
    /// Hour slot outside the fixed 09:00..17:00 set.
    InvalidHourSlot(String),
    /// Event end slot is not later than its start slot.
    EndNotAfterStart { start: String, end: String },
    /// Mutation would push a day past its work-hour cap.
    HoursCapExceeded { requested: u32, max: u8 },
    /// Removing an hour from a day with none logged.
    NoHoursLogged,
    /// Week range where the first week does not precede the last.
    InvalidWeekRange { start: u32, end: u32 },
    /// Week number with no week in the requested period.
    WeekNotInPeriod(u32),
    /// Colour text that is not a recognised hex form.
    InvalidColour(String),
    /// Text that does not match any persisted label of `kind`.
    UnknownLabel { kind: &'static str, value: String },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{field} must not be empty"),
            Self::OutOfRange {
                field,
                value,
                min,
                max,
            } => write!(f, "{field} must be within [{min}, {max}], got {value}"),
            Self::Negative { field, value } => {
                write!(f, "{field} must not be negative, got {value}")
            }
            Self::ZeroMaxScore => write!(f, "max score must not be zero"),
            Self::ScoreExceedsMax { score, max_score } => {
                write!(f, "score {score} exceeds max score {max_score}")
            }
            Self::NotMonday(date) => {
                write!(f, "start date {date} is a {}, expected Monday", date.format("%A"))
            }
            Self::NotStudyDay(weekday) => {
                write!(f, "{weekday} is not a study day (Mon..Fri)")
            }
            Self::DayOutsideWeek { date, week_start } => {
                write!(f, "day {date} is outside the week starting {week_start}")
            }
            Self::InvalidHourSlot(value) => {
                write!(f, "invalid hour slot `{value}`; expected 09:00..17:00")
            }
            Self::EndNotAfterStart { start, end } => {
                write!(f, "end time {end} must be later than start time {start}")
            }
            Self::HoursCapExceeded { requested, max } => {
                write!(f, "{requested} hours exceeds the daily maximum of {max}")
            }
            Self::NoHoursLogged => write!(f, "no hours logged to remove"),
            Self::InvalidWeekRange { start, end } => {
                write!(f, "start week {start} must be before end week {end}")
            }
            Self::WeekNotInPeriod(week_number) => {
                write!(f, "week {week_number} is not part of the period")
            }
            Self::InvalidColour(value) => write!(f, "invalid colour `{value}`"),
            Self::UnknownLabel { kind, value } => write!(f, "unknown {kind} `{value}`"),
        }
    }
}

impl Error for ValidationError {}
