//! Core domain logic for the study planner.
//! This crate is the single source of truth for academic, calendar and
//! scheduling invariants. Hosts (CLI, UI) only call into it.

pub mod calendar;
pub mod config;
pub mod db;
pub mod grade;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod timer;

pub use calendar::builder::{build_period, PeriodLayout, WeekLayout, MAX_WEEKS_PER_PERIOD};
pub use calendar::day_segment::{classify, DaySegment};
pub use calendar::template::{apply_template, has_placeholders};
pub use config::{ConfigError, CoreConfig, DatabaseConfig, LoggingConfig};
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use grade::{AggregationError, Grade, WeightedGrade};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::academic::{Assignment, Module, Semester, Year};
pub use model::calendar::{Day, Period, Week, MAX_WORK_HOURS};
pub use model::colour::Colour;
pub use model::schedule::{Event, HourSlot, Task, TaskStatus};
pub use model::{FormMode, RecordId, UserId, ValidationError};
pub use repo::academic_repo::{AcademicRepository, SqliteAcademicRepository};
pub use repo::calendar_repo::{CalendarRepository, SqliteCalendarRepository};
pub use repo::schedule_repo::{ScheduleRepository, SqliteScheduleRepository};
pub use repo::{RepoError, RepoResult};
pub use service::academic_service::{AcademicService, AcademicServiceError};
pub use service::calendar_service::{CalendarService, CalendarServiceError, StudyLog};
pub use service::grade_service::{GradeService, GradeServiceError, ModuleGrade};
pub use service::schedule_service::{
    RecurringEvent, RecurringOutcome, RecurringTask, ScheduleError, SchedulerService, WeekFailure,
};
pub use timer::clock::{Clock, ManualClock, MonotonicClock};
pub use timer::stopwatch::{format_hms, Stopwatch, StopwatchError, StopwatchState};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
