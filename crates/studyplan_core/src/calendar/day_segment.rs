//! Time-of-day classification for greetings.

use chrono::{NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

const MORNING_START_HOUR: u32 = 5;
const AFTERNOON_START_HOUR: u32 = 12;
const EVENING_START_HOUR: u32 = 18;
const NIGHT_START_HOUR: u32 = 22;

/// Named segment of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DaySegment {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl DaySegment {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Afternoon => "Afternoon",
            Self::Evening => "Evening",
            Self::Night => "Night",
        }
    }

    pub fn greeting(self) -> &'static str {
        match self {
            Self::Morning => "Good morning",
            Self::Afternoon => "Good afternoon",
            Self::Evening => "Good evening",
            Self::Night => "Good night",
        }
    }
}

impl Display for DaySegment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Maps `now` to its day segment. Boundary instants belong to the segment
/// that starts there; `[22:00, 05:00)` wraps through midnight as night.
pub fn classify(now: NaiveTime) -> DaySegment {
    match now.hour() {
        h if h < MORNING_START_HOUR => DaySegment::Night,
        h if h < AFTERNOON_START_HOUR => DaySegment::Morning,
        h if h < EVENING_START_HOUR => DaySegment::Afternoon,
        h if h < NIGHT_START_HOUR => DaySegment::Evening,
        _ => DaySegment::Night,
    }
}
