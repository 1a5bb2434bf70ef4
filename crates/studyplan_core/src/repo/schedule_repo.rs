//! Event/task repository contract and SQLite implementation.
//!
//! # Invariants
//! - Each insert is independent; batch callers own partial-failure policy.
//! - Hour slots and task statuses are stored as their display labels.

use crate::model::schedule::{Event, Task};
use crate::model::RecordId;
use crate::repo::{
    ensure_changed, ensure_connection_ready, ensure_unsaved, parse_label, write_error, RepoError,
    RepoResult,
};
use rusqlite::{params, Connection, Row};

const EVENT_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    day_id,
    module_id,
    name,
    description,
    start_time,
    end_time
FROM events";

const TASK_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    module_id,
    week_id,
    description,
    status
FROM tasks";

/// Repository interface for scheduled events and weekly tasks.
pub trait ScheduleRepository {
    fn insert_event(&self, event: &Event) -> RepoResult<RecordId>;
    fn update_event(&self, event: &Event) -> RepoResult<()>;
    fn delete_event(&self, id: RecordId) -> RepoResult<()>;
    fn get_event(&self, id: RecordId) -> RepoResult<Option<Event>>;
    /// Events of a day ordered by start time.
    fn list_events_for_day(&self, day_id: RecordId) -> RepoResult<Vec<Event>>;

    fn insert_task(&self, task: &Task) -> RepoResult<RecordId>;
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    fn delete_task(&self, id: RecordId) -> RepoResult<()>;
    fn get_task(&self, id: RecordId) -> RepoResult<Option<Task>>;
    /// Tasks of a week in insertion order.
    fn list_tasks_for_week(&self, week_id: RecordId) -> RepoResult<Vec<Task>>;
}

/// SQLite-backed schedule repository.
pub struct SqliteScheduleRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteScheduleRepository<'conn> {
    /// Wraps a connection opened through `db::open_db*`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn query_events(&self, sql: &str, params: impl rusqlite::Params) -> RepoResult<Vec<Event>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            events.push(parse_event_row(row)?);
        }
        Ok(events)
    }

    fn query_tasks(&self, sql: &str, params: impl rusqlite::Params) -> RepoResult<Vec<Task>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            tasks.push(parse_task_row(row)?);
        }
        Ok(tasks)
    }
}

impl ScheduleRepository for SqliteScheduleRepository<'_> {
    fn insert_event(&self, event: &Event) -> RepoResult<RecordId> {
        ensure_unsaved("event", event.id)?;
        event.validate()?;

        self.conn
            .execute(
                "INSERT INTO events (
                    user_id,
                    day_id,
                    module_id,
                    name,
                    description,
                    start_time,
                    end_time
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
                params![
                    event.user_id,
                    event.day_id,
                    event.module_id,
                    event.name.as_str(),
                    event.description.as_str(),
                    event.start_time.to_string(),
                    event.end_time.to_string(),
                ],
            )
            .map_err(|err| write_error("event", err))?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_event(&self, event: &Event) -> RepoResult<()> {
        event.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE events
                 SET
                    day_id = ?1,
                    module_id = ?2,
                    name = ?3,
                    description = ?4,
                    start_time = ?5,
                    end_time = ?6
                 WHERE id = ?7;",
                params![
                    event.day_id,
                    event.module_id,
                    event.name.as_str(),
                    event.description.as_str(),
                    event.start_time.to_string(),
                    event.end_time.to_string(),
                    event.id,
                ],
            )
            .map_err(|err| write_error("event", err))?;

        ensure_changed("event", event.id, changed)
    }

    fn delete_event(&self, id: RecordId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM events WHERE id = ?1;", [id])?;
        ensure_changed("event", id, changed)
    }

    fn get_event(&self, id: RecordId) -> RepoResult<Option<Event>> {
        let events = self.query_events(&format!("{EVENT_SELECT_SQL} WHERE id = ?1;"), [id])?;
        Ok(events.into_iter().next())
    }

    fn list_events_for_day(&self, day_id: RecordId) -> RepoResult<Vec<Event>> {
        self.query_events(
            &format!("{EVENT_SELECT_SQL} WHERE day_id = ?1 ORDER BY start_time ASC, id ASC;"),
            [day_id],
        )
    }

    fn insert_task(&self, task: &Task) -> RepoResult<RecordId> {
        ensure_unsaved("task", task.id)?;
        task.validate()?;

        self.conn
            .execute(
                "INSERT INTO tasks (user_id, module_id, week_id, description, status)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    task.user_id,
                    task.module_id,
                    task.week_id,
                    task.description.as_str(),
                    task.status.as_label(),
                ],
            )
            .map_err(|err| write_error("task", err))?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        task.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE tasks
                 SET module_id = ?1, week_id = ?2, description = ?3, status = ?4
                 WHERE id = ?5;",
                params![
                    task.module_id,
                    task.week_id,
                    task.description.as_str(),
                    task.status.as_label(),
                    task.id,
                ],
            )
            .map_err(|err| write_error("task", err))?;

        ensure_changed("task", task.id, changed)
    }

    fn delete_task(&self, id: RecordId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM tasks WHERE id = ?1;", [id])?;
        ensure_changed("task", id, changed)
    }

    fn get_task(&self, id: RecordId) -> RepoResult<Option<Task>> {
        let tasks = self.query_tasks(&format!("{TASK_SELECT_SQL} WHERE id = ?1;"), [id])?;
        Ok(tasks.into_iter().next())
    }

    fn list_tasks_for_week(&self, week_id: RecordId) -> RepoResult<Vec<Task>> {
        self.query_tasks(
            &format!("{TASK_SELECT_SQL} WHERE week_id = ?1 ORDER BY id ASC;"),
            [week_id],
        )
    }
}

fn parse_event_row(row: &Row<'_>) -> RepoResult<Event> {
    let start_text: String = row.get("start_time")?;
    let end_text: String = row.get("end_time")?;

    let event = Event {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        day_id: row.get("day_id")?,
        module_id: row.get("module_id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        start_time: parse_label("events.start_time", &start_text)?,
        end_time: parse_label("events.end_time", &end_text)?,
    };
    event.validate().map_err(|err| {
        RepoError::InvalidData(format!("event {} failed validation: {err}", event.id))
    })?;
    Ok(event)
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let status_text: String = row.get("status")?;

    Ok(Task {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        module_id: row.get("module_id")?,
        week_id: row.get("week_id")?,
        description: row.get("description")?,
        status: parse_label("tasks.status", &status_text)?,
    })
}
