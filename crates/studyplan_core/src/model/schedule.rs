//! Timetabled events and weekly tasks.
//!
//! # Invariants
//! - Event times come from the hourly slots 09:00..17:00.
//! - `Event.end_time` is strictly later than `Event.start_time`.
//! - Task status labels are persisted as `"Yes"`, `"No"`, `"Dropped"`.

use crate::model::{require_text, RecordId, UserId, ValidationError, UNSAVED_ID};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

const FIRST_SLOT_HOUR: u8 = 9;
const LAST_SLOT_HOUR: u8 = 17;

/// Whole-hour timetable slot between 09:00 and 17:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HourSlot(u8);

impl HourSlot {
    pub const FIRST: HourSlot = HourSlot(FIRST_SLOT_HOUR);
    pub const LAST: HourSlot = HourSlot(LAST_SLOT_HOUR);

    pub fn new(hour: u8) -> Result<Self, ValidationError> {
        if !(FIRST_SLOT_HOUR..=LAST_SLOT_HOUR).contains(&hour) {
            return Err(ValidationError::InvalidHourSlot(format!("{hour:02}:00")));
        }
        Ok(Self(hour))
    }

    /// All slots in timetable order.
    pub fn all() -> impl Iterator<Item = HourSlot> {
        (FIRST_SLOT_HOUR..=LAST_SLOT_HOUR).map(HourSlot)
    }

    pub fn hour(self) -> u8 {
        self.0
    }

    pub fn to_time(self) -> NaiveTime {
        NaiveTime::from_hms_opt(u32::from(self.0), 0, 0).unwrap_or(NaiveTime::MIN)
    }
}

impl Display for HourSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

impl FromStr for HourSlot {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidHourSlot(value.to_string());
        let (hour, minute) = value.trim().split_once(':').ok_or_else(invalid)?;
        if minute != "00" || hour.len() != 2 {
            return Err(invalid());
        }
        let hour = hour.parse::<u8>().map_err(|_| invalid())?;
        Self::new(hour).map_err(|_| invalid())
    }
}

impl TryFrom<String> for HourSlot {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HourSlot> for String {
    fn from(value: HourSlot) -> Self {
        value.to_string()
    }
}

/// Timetabled session on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: RecordId,
    pub user_id: UserId,
    pub day_id: RecordId,
    pub module_id: RecordId,
    pub name: String,
    pub description: String,
    pub start_time: HourSlot,
    pub end_time: HourSlot,
}

impl Event {
    pub fn new(
        user_id: UserId,
        day_id: RecordId,
        module_id: RecordId,
        name: impl Into<String>,
        description: impl Into<String>,
        start_time: HourSlot,
        end_time: HourSlot,
    ) -> Result<Self, ValidationError> {
        let event = Self {
            id: UNSAVED_ID,
            user_id,
            day_id,
            module_id,
            name: name.into(),
            description: description.into(),
            start_time,
            end_time,
        };
        event.validate()?;
        Ok(event)
    }

    pub fn set_times(&mut self, start: HourSlot, end: HourSlot) -> Result<(), ValidationError> {
        check_time_order(start, end)?;
        self.start_time = start;
        self.end_time = end;
        Ok(())
    }

    /// Length of the event in whole hours.
    pub fn duration_hours(&self) -> u8 {
        self.end_time.hour() - self.start_time.hour()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("event name", &self.name)?;
        check_time_order(self.start_time, self.end_time)
    }
}

pub(crate) fn check_time_order(start: HourSlot, end: HourSlot) -> Result<(), ValidationError> {
    if end <= start {
        return Err(ValidationError::EndNotAfterStart {
            start: start.to_string(),
            end: end.to_string(),
        });
    }
    Ok(())
}

/// Completion state of a weekly task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TaskStatus {
    Yes,
    #[default]
    No,
    Dropped,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Yes, TaskStatus::No, TaskStatus::Dropped];

    pub fn as_label(self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
            Self::Dropped => "Dropped",
        }
    }
}

impl Display for TaskStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}

impl FromStr for TaskStatus {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_label() == value)
            .ok_or_else(|| ValidationError::UnknownLabel {
                kind: "task status",
                value: value.to_string(),
            })
    }
}

/// Piece of work due within one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: RecordId,
    pub user_id: UserId,
    pub module_id: RecordId,
    pub week_id: RecordId,
    pub description: String,
    pub status: TaskStatus,
}

impl Task {
    /// Creates an open task (`TaskStatus::No`).
    pub fn new(
        user_id: UserId,
        module_id: RecordId,
        week_id: RecordId,
        description: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let task = Self {
            id: UNSAVED_ID,
            user_id,
            module_id,
            week_id,
            description: description.into(),
            status: TaskStatus::default(),
        };
        task.validate()?;
        Ok(task)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("task description", &self.description)
    }
}
