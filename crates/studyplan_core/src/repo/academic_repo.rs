//! Year/module/assignment repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist the records the grade aggregator reads.
//! - Answer the user-scoped availability checks for module codes and year
//!   numbers.
//!
//! # Invariants
//! - Availability means "no row matches" for the `(user_id, key)` pair.
//! - Unattempted scores are stored as the `-1` sentinel.
//! - Renaming a module code cascades to its assignments (`ON UPDATE CASCADE`).

use crate::model::academic::{from_sentinel, to_sentinel, Assignment, Module, Year};
use crate::model::colour::Colour;
use crate::model::{RecordId, UserId};
use crate::repo::{
    ensure_changed, ensure_connection_ready, ensure_unsaved, parse_label, write_error, RepoError,
    RepoResult,
};
use rusqlite::{params, Connection, OptionalExtension, Row};

const YEAR_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    year_number,
    credits,
    percent_weight
FROM years";

const MODULE_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    code,
    full_name,
    credits,
    semester,
    study_year,
    colour
FROM modules";

const ASSIGNMENT_SELECT_SQL: &str = "SELECT
    id,
    user_id,
    module_code,
    full_name,
    percent_worth,
    max_score,
    score
FROM assignments";

/// Repository interface for the grade hierarchy.
pub trait AcademicRepository {
    fn insert_year(&self, year: &Year) -> RepoResult<RecordId>;
    fn update_year(&self, year: &Year) -> RepoResult<()>;
    fn delete_year(&self, id: RecordId) -> RepoResult<()>;
    fn get_year(&self, id: RecordId) -> RepoResult<Option<Year>>;
    /// Years of `user_id` ordered by year number.
    fn list_years(&self, user_id: UserId) -> RepoResult<Vec<Year>>;
    fn year_number_available(&self, user_id: UserId, year_number: u32) -> RepoResult<bool>;

    fn insert_module(&self, module: &Module) -> RepoResult<RecordId>;
    fn update_module(&self, module: &Module) -> RepoResult<()>;
    fn delete_module(&self, id: RecordId) -> RepoResult<()>;
    fn get_module(&self, id: RecordId) -> RepoResult<Option<Module>>;
    /// Modules of `user_id` whose `study_year` equals `year_number`, by code.
    fn list_modules_for_year(&self, user_id: UserId, year_number: u32)
        -> RepoResult<Vec<Module>>;
    fn module_code_available(&self, user_id: UserId, code: &str) -> RepoResult<bool>;

    fn insert_assignment(&self, assignment: &Assignment) -> RepoResult<RecordId>;
    fn update_assignment(&self, assignment: &Assignment) -> RepoResult<()>;
    fn delete_assignment(&self, id: RecordId) -> RepoResult<()>;
    fn get_assignment(&self, id: RecordId) -> RepoResult<Option<Assignment>>;
    /// Assignments of `user_id` for `module_code`, in insertion order.
    fn list_assignments_for_module(
        &self,
        user_id: UserId,
        module_code: &str,
    ) -> RepoResult<Vec<Assignment>>;
}

/// SQLite-backed academic repository.
pub struct SqliteAcademicRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAcademicRepository<'conn> {
    /// Wraps a connection opened through `db::open_db*`.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl AcademicRepository for SqliteAcademicRepository<'_> {
    fn insert_year(&self, year: &Year) -> RepoResult<RecordId> {
        ensure_unsaved("year", year.id)?;
        year.validate()?;

        self.conn
            .execute(
                "INSERT INTO years (user_id, year_number, credits, percent_weight)
                 VALUES (?1, ?2, ?3, ?4);",
                params![
                    year.user_id,
                    year.year_number,
                    year.credits,
                    year.percent_weight
                ],
            )
            .map_err(|err| write_error("year", err))?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_year(&self, year: &Year) -> RepoResult<()> {
        year.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE years
                 SET year_number = ?1, credits = ?2, percent_weight = ?3
                 WHERE id = ?4;",
                params![year.year_number, year.credits, year.percent_weight, year.id],
            )
            .map_err(|err| write_error("year", err))?;

        ensure_changed("year", year.id, changed)
    }

    fn delete_year(&self, id: RecordId) -> RepoResult<()> {
        let changed = self.conn.execute("DELETE FROM years WHERE id = ?1;", [id])?;
        ensure_changed("year", id, changed)
    }

    fn get_year(&self, id: RecordId) -> RepoResult<Option<Year>> {
        let year = self
            .conn
            .query_row(
                &format!("{YEAR_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_year_row,
            )
            .optional()?;
        Ok(year)
    }

    fn list_years(&self, user_id: UserId) -> RepoResult<Vec<Year>> {
        let mut stmt = self.conn.prepare(&format!(
            "{YEAR_SELECT_SQL} WHERE user_id = ?1 ORDER BY year_number ASC;"
        ))?;
        let years = stmt
            .query_map([user_id], parse_year_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(years)
    }

    fn year_number_available(&self, user_id: UserId, year_number: u32) -> RepoResult<bool> {
        let taken: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM years WHERE user_id = ?1 AND year_number = ?2
            );",
            params![user_id, year_number],
            |row| row.get(0),
        )?;
        Ok(taken == 0)
    }

    fn insert_module(&self, module: &Module) -> RepoResult<RecordId> {
        ensure_unsaved("module", module.id)?;
        module.validate()?;

        self.conn
            .execute(
                "INSERT INTO modules (
                    user_id,
                    code,
                    full_name,
                    credits,
                    semester,
                    study_year,
                    colour
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
                params![
                    module.user_id,
                    module.code.as_str(),
                    module.full_name.as_str(),
                    module.credits,
                    module.semester.as_label(),
                    module.study_year,
                    module.colour.to_hex(),
                ],
            )
            .map_err(|err| write_error("module", err))?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_module(&self, module: &Module) -> RepoResult<()> {
        module.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE modules
                 SET
                    code = ?1,
                    full_name = ?2,
                    credits = ?3,
                    semester = ?4,
                    study_year = ?5,
                    colour = ?6
                 WHERE id = ?7;",
                params![
                    module.code.as_str(),
                    module.full_name.as_str(),
                    module.credits,
                    module.semester.as_label(),
                    module.study_year,
                    module.colour.to_hex(),
                    module.id,
                ],
            )
            .map_err(|err| write_error("module", err))?;

        ensure_changed("module", module.id, changed)
    }

    fn delete_module(&self, id: RecordId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM modules WHERE id = ?1;", [id])?;
        ensure_changed("module", id, changed)
    }

    fn get_module(&self, id: RecordId) -> RepoResult<Option<Module>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MODULE_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_module_row(row)?));
        }
        Ok(None)
    }

    fn list_modules_for_year(
        &self,
        user_id: UserId,
        year_number: u32,
    ) -> RepoResult<Vec<Module>> {
        let mut stmt = self.conn.prepare(&format!(
            "{MODULE_SELECT_SQL}
             WHERE user_id = ?1 AND study_year = ?2
             ORDER BY code ASC;"
        ))?;
        let mut rows = stmt.query(params![user_id, year_number])?;
        let mut modules = Vec::new();
        while let Some(row) = rows.next()? {
            modules.push(parse_module_row(row)?);
        }
        Ok(modules)
    }

    fn module_code_available(&self, user_id: UserId, code: &str) -> RepoResult<bool> {
        let taken: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM modules WHERE user_id = ?1 AND code = ?2
            );",
            params![user_id, code.trim()],
            |row| row.get(0),
        )?;
        Ok(taken == 0)
    }

    fn insert_assignment(&self, assignment: &Assignment) -> RepoResult<RecordId> {
        ensure_unsaved("assignment", assignment.id)?;
        assignment.validate()?;

        self.conn
            .execute(
                "INSERT INTO assignments (
                    user_id,
                    module_code,
                    full_name,
                    percent_worth,
                    max_score,
                    score
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
                params![
                    assignment.user_id,
                    assignment.module_code.as_str(),
                    assignment.full_name.as_str(),
                    assignment.percent_worth,
                    to_sentinel(assignment.max_score),
                    to_sentinel(assignment.score),
                ],
            )
            .map_err(|err| write_error("assignment", err))?;

        Ok(self.conn.last_insert_rowid())
    }

    fn update_assignment(&self, assignment: &Assignment) -> RepoResult<()> {
        assignment.validate()?;

        let changed = self
            .conn
            .execute(
                "UPDATE assignments
                 SET
                    module_code = ?1,
                    full_name = ?2,
                    percent_worth = ?3,
                    max_score = ?4,
                    score = ?5
                 WHERE id = ?6;",
                params![
                    assignment.module_code.as_str(),
                    assignment.full_name.as_str(),
                    assignment.percent_worth,
                    to_sentinel(assignment.max_score),
                    to_sentinel(assignment.score),
                    assignment.id,
                ],
            )
            .map_err(|err| write_error("assignment", err))?;

        ensure_changed("assignment", assignment.id, changed)
    }

    fn delete_assignment(&self, id: RecordId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM assignments WHERE id = ?1;", [id])?;
        ensure_changed("assignment", id, changed)
    }

    fn get_assignment(&self, id: RecordId) -> RepoResult<Option<Assignment>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{ASSIGNMENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_assignment_row(row)?));
        }
        Ok(None)
    }

    fn list_assignments_for_module(
        &self,
        user_id: UserId,
        module_code: &str,
    ) -> RepoResult<Vec<Assignment>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ASSIGNMENT_SELECT_SQL}
             WHERE user_id = ?1 AND module_code = ?2
             ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query(params![user_id, module_code])?;
        let mut assignments = Vec::new();
        while let Some(row) = rows.next()? {
            assignments.push(parse_assignment_row(row)?);
        }
        Ok(assignments)
    }
}

fn parse_year_row(row: &Row<'_>) -> rusqlite::Result<Year> {
    Ok(Year {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        year_number: row.get("year_number")?,
        credits: row.get("credits")?,
        percent_weight: row.get("percent_weight")?,
    })
}

fn parse_module_row(row: &Row<'_>) -> RepoResult<Module> {
    let semester_text: String = row.get("semester")?;
    let colour_text: String = row.get("colour")?;

    let module = Module {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        code: row.get("code")?,
        full_name: row.get("full_name")?,
        credits: row.get("credits")?,
        semester: parse_label("modules.semester", &semester_text)?,
        study_year: row.get("study_year")?,
        colour: parse_label::<Colour>("modules.colour", &colour_text)?,
    };
    module.validate().map_err(|err| {
        RepoError::InvalidData(format!("module {} failed validation: {err}", module.id))
    })?;
    Ok(module)
}

fn parse_assignment_row(row: &Row<'_>) -> RepoResult<Assignment> {
    let assignment = Assignment {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        module_code: row.get("module_code")?,
        full_name: row.get("full_name")?,
        percent_worth: row.get("percent_worth")?,
        max_score: from_sentinel(row.get("max_score")?),
        score: from_sentinel(row.get("score")?),
    };
    assignment.validate().map_err(|err| {
        RepoError::InvalidData(format!("assignment {} failed validation: {err}", assignment.id))
    })?;
    Ok(assignment)
}
