//! Period/week/day repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist generated period layouts in one transaction.
//! - Resolve the concrete day of a week for schedulers and time logging.
//!
//! # Invariants
//! - `insert_layout` is all-or-nothing.
//! - Deleting a period cascades to weeks, days, and everything scheduled on
//!   them.

use crate::calendar::builder::{PeriodLayout, WeekLayout};
use crate::model::calendar::{Day, Period, Week};
use crate::model::{RecordId, UserId};
use crate::repo::{
    ensure_changed, ensure_connection_ready, ensure_unsaved, write_error, RepoError, RepoResult,
};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const PERIOD_SELECT_SQL: &str = "SELECT id, user_id, associated_year, name FROM periods";

const WEEK_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    period_id,
    week_number,
    start_date,
    minutes_left
FROM weeks";

const DAY_SELECT_SQL: &str = "SELECT id, user_id, week_id, date, hours_spent FROM days";

/// Repository interface for the period/week/day lattice.
pub trait CalendarRepository {
    /// Persists a generated layout and returns it with ids assigned.
    fn insert_layout(&self, layout: &PeriodLayout) -> RepoResult<PeriodLayout>;
    fn get_period(&self, id: RecordId) -> RepoResult<Option<Period>>;
    fn list_periods(&self, user_id: UserId) -> RepoResult<Vec<Period>>;
    /// Deletes the period with its weeks, days, events and tasks.
    fn delete_period(&self, id: RecordId) -> RepoResult<()>;

    fn update_week(&self, week: &Week) -> RepoResult<()>;
    fn get_week(&self, id: RecordId) -> RepoResult<Option<Week>>;
    /// Weeks of a period ordered by week number.
    fn list_weeks(&self, period_id: RecordId) -> RepoResult<Vec<Week>>;
    fn find_week(&self, period_id: RecordId, week_number: u32) -> RepoResult<Option<Week>>;

    fn update_day(&self, day: &Day) -> RepoResult<()>;
    fn get_day(&self, id: RecordId) -> RepoResult<Option<Day>>;
    /// Days of a week ordered by date.
    fn list_days(&self, week_id: RecordId) -> RepoResult<Vec<Day>>;
    fn find_day(&self, week_id: RecordId, date: NaiveDate) -> RepoResult<Option<Day>>;

    /// Writes a week's banked minutes and a day's hours together.
    fn save_study_time(&self, week: &Week, day: &Day) -> RepoResult<()>;
}

/// SQLite-backed calendar repository.
pub struct SqliteCalendarRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCalendarRepository<'conn> {
    /// Wraps a connection opened through `db::open_db*`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CalendarRepository for SqliteCalendarRepository<'_> {
    fn insert_layout(&self, layout: &PeriodLayout) -> RepoResult<PeriodLayout> {
        ensure_unsaved("period", layout.period.id)?;
        layout.period.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let mut period = layout.period.clone();
        period.id = insert_period(&tx, &period)?;

        let mut weeks = Vec::with_capacity(layout.weeks.len());
        for generated in &layout.weeks {
            let mut week = generated.week.clone();
            week.period_id = period.id;
            week.id = insert_week(&tx, &week)?;

            let mut days = Vec::with_capacity(generated.days.len());
            for generated_day in &generated.days {
                let mut day = generated_day.clone();
                day.week_id = week.id;
                day.id = insert_day(&tx, &day)?;
                days.push(day);
            }
            weeks.push(WeekLayout { week, days });
        }
        tx.commit()?;

        Ok(PeriodLayout { period, weeks })
    }

    fn get_period(&self, id: RecordId) -> RepoResult<Option<Period>> {
        let period = self
            .conn
            .query_row(
                &format!("{PERIOD_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_period_row,
            )
            .optional()?;
        Ok(period)
    }

    fn list_periods(&self, user_id: UserId) -> RepoResult<Vec<Period>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PERIOD_SELECT_SQL} WHERE user_id = ?1 ORDER BY associated_year ASC, id ASC;"
        ))?;
        let periods = stmt
            .query_map([user_id], parse_period_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(periods)
    }

    fn delete_period(&self, id: RecordId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM periods WHERE id = ?1;", [id])?;
        ensure_changed("period", id, changed)
    }

    fn update_week(&self, week: &Week) -> RepoResult<()> {
        week.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE weeks
                 SET week_number = ?1, start_date = ?2, minutes_left = ?3
                 WHERE id = ?4;",
                params![week.week_number, week.start_date, week.minutes_left, week.id],
            )
            .map_err(|err| write_error("week", err))?;

        ensure_changed("week", week.id, changed)
    }

    fn get_week(&self, id: RecordId) -> RepoResult<Option<Week>> {
        query_one_week(self.conn, &format!("{WEEK_SELECT_SQL} WHERE id = ?1;"), params![id])
    }

    fn list_weeks(&self, period_id: RecordId) -> RepoResult<Vec<Week>> {
        let mut stmt = self.conn.prepare(&format!(
            "{WEEK_SELECT_SQL} WHERE period_id = ?1 ORDER BY week_number ASC;"
        ))?;
        let mut rows = stmt.query([period_id])?;
        let mut weeks = Vec::new();
        while let Some(row) = rows.next()? {
            weeks.push(parse_week_row(row)?);
        }
        Ok(weeks)
    }

    fn find_week(&self, period_id: RecordId, week_number: u32) -> RepoResult<Option<Week>> {
        query_one_week(
            self.conn,
            &format!("{WEEK_SELECT_SQL} WHERE period_id = ?1 AND week_number = ?2;"),
            params![period_id, week_number],
        )
    }

    fn update_day(&self, day: &Day) -> RepoResult<()> {
        day.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE days SET hours_spent = ?1 WHERE id = ?2;",
                params![day.hours_spent, day.id],
            )
            .map_err(|err| write_error("day", err))?;

        ensure_changed("day", day.id, changed)
    }

    fn get_day(&self, id: RecordId) -> RepoResult<Option<Day>> {
        query_one_day(self.conn, &format!("{DAY_SELECT_SQL} WHERE id = ?1;"), params![id])
    }

    fn list_days(&self, week_id: RecordId) -> RepoResult<Vec<Day>> {
        let mut stmt = self.conn.prepare(&format!(
            "{DAY_SELECT_SQL} WHERE week_id = ?1 ORDER BY date ASC;"
        ))?;
        let mut rows = stmt.query([week_id])?;
        let mut days = Vec::new();
        while let Some(row) = rows.next()? {
            days.push(parse_day_row(row)?);
        }
        Ok(days)
    }

    fn find_day(&self, week_id: RecordId, date: NaiveDate) -> RepoResult<Option<Day>> {
        query_one_day(
            self.conn,
            &format!("{DAY_SELECT_SQL} WHERE week_id = ?1 AND date = ?2;"),
            params![week_id, date],
        )
    }

    fn save_study_time(&self, week: &Week, day: &Day) -> RepoResult<()> {
        week.validate()?;
        day.validate()?;

        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE weeks SET minutes_left = ?1 WHERE id = ?2;",
            params![week.minutes_left, week.id],
        )?;
        ensure_changed("week", week.id, changed)?;
        let changed = tx
            .execute(
                "UPDATE days SET hours_spent = ?1 WHERE id = ?2;",
                params![day.hours_spent, day.id],
            )
            .map_err(|err| write_error("day", err))?;
        ensure_changed("day", day.id, changed)?;
        tx.commit()?;
        Ok(())
    }
}

fn insert_period(conn: &Connection, period: &Period) -> RepoResult<RecordId> {
    conn.execute(
        "INSERT INTO periods (user_id, associated_year, name) VALUES (?1, ?2, ?3);",
        params![period.user_id, period.associated_year, period.name.as_str()],
    )
    .map_err(|err| write_error("period", err))?;
    Ok(conn.last_insert_rowid())
}

fn insert_week(conn: &Connection, week: &Week) -> RepoResult<RecordId> {
    week.validate()?;
    conn.execute(
        "INSERT INTO weeks (user_id, period_id, week_number, start_date, minutes_left)
         VALUES (?1, ?2, ?3, ?4, ?5);",
        params![
            week.user_id,
            week.period_id,
            week.week_number,
            week.start_date,
            week.minutes_left,
        ],
    )
    .map_err(|err| write_error("week", err))?;
    Ok(conn.last_insert_rowid())
}

fn insert_day(conn: &Connection, day: &Day) -> RepoResult<RecordId> {
    day.validate()?;
    conn.execute(
        "INSERT INTO days (user_id, week_id, date, hours_spent) VALUES (?1, ?2, ?3, ?4);",
        params![day.user_id, day.week_id, day.date, day.hours_spent],
    )
    .map_err(|err| write_error("day", err))?;
    Ok(conn.last_insert_rowid())
}

fn query_one_week(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> RepoResult<Option<Week>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_week_row(row)?));
    }
    Ok(None)
}

fn query_one_day(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> RepoResult<Option<Day>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query(params)?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_day_row(row)?));
    }
    Ok(None)
}

fn parse_period_row(row: &Row<'_>) -> rusqlite::Result<Period> {
    Ok(Period {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        associated_year: row.get("associated_year")?,
        name: row.get("name")?,
    })
}

fn parse_week_row(row: &Row<'_>) -> RepoResult<Week> {
    let week = Week {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        period_id: row.get("period_id")?,
        week_number: row.get("week_number")?,
        start_date: row.get("start_date")?,
        minutes_left: row.get("minutes_left")?,
    };
    week.validate().map_err(|err| {
        RepoError::InvalidData(format!("week {} failed validation: {err}", week.id))
    })?;
    Ok(week)
}

fn parse_day_row(row: &Row<'_>) -> RepoResult<Day> {
    let day = Day {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        week_id: row.get("week_id")?,
        date: row.get("date")?,
        hours_spent: row.get("hours_spent")?,
    };
    day.validate().map_err(|err| {
        RepoError::InvalidData(format!("day {} failed validation: {err}", day.id))
    })?;
    Ok(day)
}
