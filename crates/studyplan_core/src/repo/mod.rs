//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define per-family data access contracts (academic, calendar, schedule).
//! - Isolate SQLite query details from service/business orchestration.
//!
//! # Invariants
//! - Repository writes call the record's `validate()` before SQL mutations.
//! - Inserts reject records that already carry a storage id.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Failures are surfaced as-is; nothing here retries.

pub mod academic_repo;
pub mod calendar_repo;
pub mod schedule_repo;

use crate::db::migrations::ensure_current;
use crate::db::DbError;
use crate::model::{is_saved, RecordId, ValidationError};
use rusqlite::{Connection, ErrorCode};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage failure for repository operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    NotFound {
        entity: &'static str,
        id: RecordId,
    },
    /// Insert of a record that already has a storage id.
    AlreadyPersisted {
        entity: &'static str,
        id: RecordId,
    },
    /// Uniqueness or reference constraint rejected the write.
    Conflict {
        entity: &'static str,
        message: String,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::AlreadyPersisted { entity, id } => {
                write!(f, "{entity} already persisted with id {id}")
            }
            Self::Conflict { entity, message } => write!(f, "{entity} conflict: {message}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::NotFound { .. }
            | Self::AlreadyPersisted { .. }
            | Self::Conflict { .. }
            | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    ensure_current(conn)?;
    Ok(())
}

/// Maps constraint violations on writes to `RepoError::Conflict`.
pub(crate) fn write_error(entity: &'static str, err: rusqlite::Error) -> RepoError {
    match &err {
        rusqlite::Error::SqliteFailure(failure, message)
            if failure.code == ErrorCode::ConstraintViolation =>
        {
            RepoError::Conflict {
                entity,
                message: message.clone().unwrap_or_else(|| failure.to_string()),
            }
        }
        _ => RepoError::from(err),
    }
}

pub(crate) fn ensure_unsaved(entity: &'static str, id: RecordId) -> RepoResult<()> {
    if is_saved(id) {
        return Err(RepoError::AlreadyPersisted { entity, id });
    }
    Ok(())
}

pub(crate) fn ensure_changed(entity: &'static str, id: RecordId, changed: usize) -> RepoResult<()> {
    if changed == 0 {
        return Err(RepoError::NotFound { entity, id });
    }
    Ok(())
}

pub(crate) fn parse_label<T>(column: &str, value: &str) -> RepoResult<T>
where
    T: std::str::FromStr<Err = ValidationError>,
{
    value.parse::<T>().map_err(|err| {
        RepoError::InvalidData(format!("invalid value `{value}` in {column}: {err}"))
    })
}
