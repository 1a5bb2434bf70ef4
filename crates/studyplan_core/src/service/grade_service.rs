//! Grade aggregation over stored records.
//!
//! Read-only: children are fetched on every call and nothing derived is
//! written back.

use crate::grade::{
    assignment_grade, module_grade, overall_grade, year_grade, AggregationError, Grade,
    WeightedGrade,
};
use crate::model::academic::{Assignment, Module, Year};
use crate::model::UserId;
use crate::repo::academic_repo::AcademicRepository;
use crate::repo::RepoError;
use log::debug;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from stored-grade aggregation.
#[derive(Debug)]
pub enum GradeServiceError {
    Undefined(AggregationError),
    Repo(RepoError),
}

impl Display for GradeServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Undefined(err) => write!(f, "grade undefined: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for GradeServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Undefined(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<AggregationError> for GradeServiceError {
    fn from(value: AggregationError) -> Self {
        Self::Undefined(value)
    }
}

impl From<RepoError> for GradeServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Module together with its aggregated grade.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleGrade {
    pub module: Module,
    pub grade: Result<f64, AggregationError>,
}

/// On-demand grade calculator backed by an academic repository.
pub struct GradeService<R: AcademicRepository> {
    repo: R,
}

impl<R: AcademicRepository> GradeService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn assignment_grade(&self, assignment: &Assignment) -> Grade {
        assignment_grade(assignment)
    }

    pub fn module_grade(&self, module: &Module) -> Result<f64, GradeServiceError> {
        let assignments = self
            .repo
            .list_assignments_for_module(module.user_id, &module.code)?;
        Ok(module_grade(&assignments)?)
    }

    /// Grades for every module of `year`; undefined grades are kept as errors.
    pub fn module_grades(&self, year: &Year) -> Result<Vec<ModuleGrade>, GradeServiceError> {
        let modules = self
            .repo
            .list_modules_for_year(year.user_id, year.year_number)?;
        let mut grades = Vec::with_capacity(modules.len());
        for module in modules {
            let assignments = self
                .repo
                .list_assignments_for_module(module.user_id, &module.code)?;
            grades.push(ModuleGrade {
                grade: module_grade(&assignments),
                module,
            });
        }
        Ok(grades)
    }

    pub fn year_grade(&self, year: &Year) -> Result<f64, GradeServiceError> {
        let weighted: Vec<WeightedGrade> = self
            .module_grades(year)?
            .into_iter()
            .map(|entry| WeightedGrade::for_module(&entry.module, entry.grade))
            .collect();
        let grade = year_grade(&weighted)?;
        debug!(
            "event=year_grade module=grade status=ok year_number={} modules={}",
            year.year_number,
            weighted.len()
        );
        Ok(grade)
    }

    /// Percent-weighted grade across every year of `user_id`.
    pub fn overall_grade(&self, user_id: UserId) -> Result<f64, GradeServiceError> {
        let years = self.repo.list_years(user_id)?;
        let mut weighted = Vec::with_capacity(years.len());
        for year in &years {
            let grade = match self.year_grade(year) {
                Ok(grade) => Ok(grade),
                Err(GradeServiceError::Undefined(err)) => Err(err),
                Err(other) => return Err(other),
            };
            weighted.push(WeightedGrade::for_year(year, grade));
        }
        Ok(overall_grade(&weighted)?)
    }
}
