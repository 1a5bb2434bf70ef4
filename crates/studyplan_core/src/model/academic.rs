//! Years, modules and assignments.
//!
//! # Responsibility
//! - Hold the records the grade aggregator walks (assignment → module → year).
//! - Validate numeric ranges and required text on every write.
//!
//! # Invariants
//! - `Module.code` is unique per user; the check is a storage query.
//! - Assignment numbers are stored rounded to one decimal place.
//! - `None` score/max score means "not yet attempted"; the `-1` sentinel only
//!   exists at the storage boundary (`from_sentinel` / `to_sentinel`).

use crate::model::colour::Colour;
use crate::model::{
    require_text, round_to_tenth, RecordId, UserId, ValidationError, UNSAVED_ID,
};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Persisted marker for a score that has not been recorded yet.
pub const NOT_ATTEMPTED_SENTINEL: f64 = -1.0;

/// Maps a stored score value to its tagged form.
pub fn from_sentinel(value: f64) -> Option<f64> {
    if value == NOT_ATTEMPTED_SENTINEL {
        None
    } else {
        Some(value)
    }
}

/// Maps a tagged score to its stored value.
pub fn to_sentinel(value: Option<f64>) -> f64 {
    value.unwrap_or(NOT_ATTEMPTED_SENTINEL)
}

/// One academic year of study.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Year {
    pub id: RecordId,
    pub user_id: UserId,
    pub year_number: u32,
    pub credits: u32,
    /// Share of the overall grade carried by this year.
    pub percent_weight: f64,
}

impl Year {
    pub fn new(
        user_id: UserId,
        year_number: u32,
        credits: u32,
        percent_weight: f64,
    ) -> Result<Self, ValidationError> {
        let year = Self {
            id: UNSAVED_ID,
            user_id,
            year_number,
            credits,
            percent_weight,
        };
        year.validate()?;
        Ok(year)
    }

    pub fn set_percent_weight(&mut self, percent_weight: f64) -> Result<(), ValidationError> {
        check_non_negative("percent weight", percent_weight)?;
        self.percent_weight = percent_weight;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_non_negative("percent weight", self.percent_weight)
    }
}

/// Teaching period a module runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Semester {
    Autumn,
    Spring,
    #[serde(rename = "All Year")]
    AllYear,
}

impl Semester {
    pub const ALL: [Semester; 3] = [Semester::Autumn, Semester::Spring, Semester::AllYear];

    pub fn as_label(self) -> &'static str {
        match self {
            Self::Autumn => "Autumn",
            Self::Spring => "Spring",
            Self::AllYear => "All Year",
        }
    }
}

impl Display for Semester {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}

impl FromStr for Semester {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|semester| semester.as_label() == value)
            .ok_or_else(|| ValidationError::UnknownLabel {
                kind: "semester",
                value: value.to_string(),
            })
    }
}

/// A taught module, linked to its year by `study_year`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Module {
    pub id: RecordId,
    pub user_id: UserId,
    pub code: String,
    pub full_name: String,
    pub credits: u32,
    pub semester: Semester,
    pub study_year: u32,
    pub colour: Colour,
}

impl Module {
    pub fn new(
        user_id: UserId,
        code: impl Into<String>,
        full_name: impl Into<String>,
        credits: u32,
        semester: Semester,
        study_year: u32,
        colour: Colour,
    ) -> Result<Self, ValidationError> {
        let module = Self {
            id: UNSAVED_ID,
            user_id,
            code: code.into().trim().to_string(),
            full_name: full_name.into(),
            credits,
            semester,
            study_year,
            colour,
        };
        module.validate()?;
        Ok(module)
    }

    pub fn set_code(&mut self, code: impl Into<String>) -> Result<(), ValidationError> {
        let code = code.into().trim().to_string();
        require_text("module code", &code)?;
        self.code = code;
        Ok(())
    }

    pub fn set_full_name(&mut self, full_name: impl Into<String>) -> Result<(), ValidationError> {
        let full_name = full_name.into();
        require_text("module name", &full_name)?;
        self.full_name = full_name;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("module code", &self.code)?;
        require_text("module name", &self.full_name)
    }
}

/// One assessed piece of work inside a module.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    pub id: RecordId,
    pub user_id: UserId,
    pub module_code: String,
    pub full_name: String,
    /// Percentage of the module grade this assignment carries, `[0, 100]`.
    pub percent_worth: f64,
    pub max_score: Option<f64>,
    pub score: Option<f64>,
}

impl Assignment {
    pub fn new(
        user_id: UserId,
        module_code: impl Into<String>,
        full_name: impl Into<String>,
        percent_worth: f64,
        max_score: Option<f64>,
        score: Option<f64>,
    ) -> Result<Self, ValidationError> {
        let assignment = Self {
            id: UNSAVED_ID,
            user_id,
            module_code: module_code.into().trim().to_string(),
            full_name: full_name.into(),
            percent_worth: round_to_tenth(percent_worth),
            max_score: max_score.map(round_to_tenth),
            score: score.map(round_to_tenth),
        };
        assignment.validate()?;
        Ok(assignment)
    }

    /// Whether both a score and a maximum score are recorded.
    pub fn is_attempted(&self) -> bool {
        self.score.is_some() && self.max_score.is_some()
    }

    pub fn set_percent_worth(&mut self, percent_worth: f64) -> Result<(), ValidationError> {
        let percent_worth = round_to_tenth(percent_worth);
        check_percent_worth(percent_worth)?;
        self.percent_worth = percent_worth;
        Ok(())
    }

    pub fn set_max_score(&mut self, max_score: Option<f64>) -> Result<(), ValidationError> {
        let max_score = max_score.map(round_to_tenth);
        check_scores(max_score, self.score)?;
        self.max_score = max_score;
        Ok(())
    }

    pub fn set_score(&mut self, score: Option<f64>) -> Result<(), ValidationError> {
        let score = score.map(round_to_tenth);
        check_scores(self.max_score, score)?;
        self.score = score;
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("module code", &self.module_code)?;
        require_text("assignment name", &self.full_name)?;
        check_percent_worth(self.percent_worth)?;
        check_scores(self.max_score, self.score)
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_nan() || value < 0.0 {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(())
}

fn check_percent_worth(value: f64) -> Result<(), ValidationError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(ValidationError::OutOfRange {
            field: "percent worth",
            value,
            min: 0.0,
            max: 100.0,
        });
    }
    Ok(())
}

fn check_scores(max_score: Option<f64>, score: Option<f64>) -> Result<(), ValidationError> {
    if let Some(max_score) = max_score {
        if max_score == 0.0 {
            return Err(ValidationError::ZeroMaxScore);
        }
        check_non_negative("max score", max_score)?;
    }
    if let Some(score) = score {
        check_non_negative("score", score)?;
        if let Some(max_score) = max_score {
            if score > max_score {
                return Err(ValidationError::ScoreExceedsMax { score, max_score });
            }
        }
    }
    Ok(())
}
