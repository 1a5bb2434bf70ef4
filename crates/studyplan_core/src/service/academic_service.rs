//! Year/module/assignment use-case service.
//!
//! # Invariants
//! - Year numbers and module codes are checked for availability before
//!   insertion; the storage constraint remains the final arbiter.
//! - Records are validated before any repository call.

use crate::model::academic::{Assignment, Module, Year};
use crate::model::{RecordId, UserId, ValidationError};
use crate::repo::academic_repo::AcademicRepository;
use crate::repo::RepoError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from academic record operations.
#[derive(Debug)]
pub enum AcademicServiceError {
    Validation(ValidationError),
    /// The user already has a year with this number.
    YearNumberTaken(u32),
    /// The user already has a module with this code.
    ModuleCodeTaken(String),
    Repo(RepoError),
}

impl Display for AcademicServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::YearNumberTaken(number) => write!(f, "year {number} already exists"),
            Self::ModuleCodeTaken(code) => write!(f, "module code `{code}` already exists"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AcademicServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::YearNumberTaken(_) | Self::ModuleCodeTaken(_) => None,
        }
    }
}

impl From<ValidationError> for AcademicServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for AcademicServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

pub type AcademicResult<T> = Result<T, AcademicServiceError>;

/// Validated CRUD over years, modules and assignments.
pub struct AcademicService<R: AcademicRepository> {
    repo: R,
}

impl<R: AcademicRepository> AcademicService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    /// Creates a year after checking its number is free for the user.
    pub fn create_year(&self, year: &Year) -> AcademicResult<Year> {
        year.validate()?;
        if !self
            .repo
            .year_number_available(year.user_id, year.year_number)?
        {
            warn!(
                "event=year_create module=academic status=rejected reason=number_taken year_number={}",
                year.year_number
            );
            return Err(AcademicServiceError::YearNumberTaken(year.year_number));
        }

        let mut created = year.clone();
        created.id = self.repo.insert_year(year)?;
        info!(
            "event=year_create module=academic status=ok year_id={}",
            created.id
        );
        Ok(created)
    }

    pub fn update_year(&self, year: &Year) -> AcademicResult<()> {
        let stored = self.require_year(year.id)?;
        if stored.year_number != year.year_number
            && !self
                .repo
                .year_number_available(year.user_id, year.year_number)?
        {
            return Err(AcademicServiceError::YearNumberTaken(year.year_number));
        }
        self.repo.update_year(year)?;
        Ok(())
    }

    pub fn delete_year(&self, id: RecordId) -> AcademicResult<()> {
        self.repo.delete_year(id)?;
        Ok(())
    }

    pub fn years(&self, user_id: UserId) -> AcademicResult<Vec<Year>> {
        Ok(self.repo.list_years(user_id)?)
    }

    /// Creates a module after checking its code is free for the user.
    pub fn create_module(&self, module: &Module) -> AcademicResult<Module> {
        module.validate()?;
        if !self.repo.module_code_available(module.user_id, &module.code)? {
            warn!("event=module_create module=academic status=rejected reason=code_taken");
            return Err(AcademicServiceError::ModuleCodeTaken(module.code.clone()));
        }

        let mut created = module.clone();
        created.id = self.repo.insert_module(module)?;
        info!(
            "event=module_create module=academic status=ok module_id={}",
            created.id
        );
        Ok(created)
    }

    /// Updates a module; a changed code must be free and carries its
    /// assignments along.
    pub fn update_module(&self, module: &Module) -> AcademicResult<()> {
        let stored = self.require_module(module.id)?;
        if stored.code != module.code
            && !self.repo.module_code_available(module.user_id, &module.code)?
        {
            return Err(AcademicServiceError::ModuleCodeTaken(module.code.clone()));
        }
        self.repo.update_module(module)?;
        Ok(())
    }

    /// Deletes a module together with its assignments, events and tasks.
    pub fn delete_module(&self, id: RecordId) -> AcademicResult<()> {
        self.repo.delete_module(id)?;
        Ok(())
    }

    /// Modules linked to `year` through their study year.
    pub fn modules_for_year(&self, year: &Year) -> AcademicResult<Vec<Module>> {
        Ok(self
            .repo
            .list_modules_for_year(year.user_id, year.year_number)?)
    }

    pub fn create_assignment(&self, assignment: &Assignment) -> AcademicResult<Assignment> {
        assignment.validate()?;
        let mut created = assignment.clone();
        created.id = self.repo.insert_assignment(assignment)?;
        Ok(created)
    }

    pub fn update_assignment(&self, assignment: &Assignment) -> AcademicResult<()> {
        self.repo.update_assignment(assignment)?;
        Ok(())
    }

    pub fn delete_assignment(&self, id: RecordId) -> AcademicResult<()> {
        self.repo.delete_assignment(id)?;
        Ok(())
    }

    pub fn assignments_for_module(&self, module: &Module) -> AcademicResult<Vec<Assignment>> {
        Ok(self
            .repo
            .list_assignments_for_module(module.user_id, &module.code)?)
    }

    fn require_year(&self, id: RecordId) -> AcademicResult<Year> {
        self.repo
            .get_year(id)?
            .ok_or(AcademicServiceError::Repo(RepoError::NotFound {
                entity: "year",
                id,
            }))
    }

    fn require_module(&self, id: RecordId) -> AcademicResult<Module> {
        self.repo
            .get_module(id)?
            .ok_or(AcademicServiceError::Repo(RepoError::NotFound {
                entity: "module",
                id,
            }))
    }
}
