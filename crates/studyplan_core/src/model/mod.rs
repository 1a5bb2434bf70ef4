//! Academic planning domain model.
//!
//! # Responsibility
//! - Define the value records shared by calendar, schedule and grade logic.
//! - Own field-level validation so invalid records never reach storage.
//!
//! # Invariants
//! - `id == UNSAVED_ID` means "not yet persisted"; positive ids come from
//!   storage and are never reused.
//! - Every record is scoped to exactly one `user_id`.
//! - Persisted labels (`"All Year"`, `"Dropped"`, ...) are fixed strings.

pub mod academic;
pub mod calendar;
pub mod colour;
pub mod error;
pub mod schedule;

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub use error::ValidationError;

/// Storage identity of a persisted record.
pub type RecordId = i64;

/// Identity of the user that owns a record.
pub type UserId = i64;

/// Identity carried by records that have not been persisted yet.
pub const UNSAVED_ID: RecordId = 0;

/// Returns whether `id` refers to a persisted record.
pub fn is_saved(id: RecordId) -> bool {
    id != UNSAVED_ID
}

/// Rounds to one decimal place, half away from zero.
pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Editor mode used by record forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormMode {
    Edit,
    Add,
}

impl FormMode {
    pub const ALL: [FormMode; 2] = [FormMode::Edit, FormMode::Add];

    pub fn as_label(self) -> &'static str {
        match self {
            Self::Edit => "Edit",
            Self::Add => "Add",
        }
    }
}

impl Display for FormMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}

impl FromStr for FormMode {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_label() == value)
            .ok_or_else(|| ValidationError::UnknownLabel {
                kind: "form mode",
                value: value.to_string(),
            })
    }
}

pub(crate) fn require_text(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}
