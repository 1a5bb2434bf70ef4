//! Weighted grade aggregation: assignment → module → year → overall.
//!
//! # Responsibility
//! - Turn raw scores into percentages and roll them up by weight.
//! - Keep "not attempted" out of every sum instead of counting it as zero.
//!
//! # Invariants
//! - Nothing here stores derived state; every grade is recomputed on demand.
//! - Empty denominators surface as `AggregationError`, never NaN/Infinity.
//! - Year grades skip modules whose grade is exactly `0.0`. An earned 0% is
//!   therefore indistinguishable from "no data" at year level.

use crate::model::academic::{Assignment, Module, Year};
use crate::model::round_to_tenth;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Percentage grade of a single assignment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Grade {
    Percent(f64),
    NotAttempted,
}

impl Grade {
    pub fn percent(self) -> Option<f64> {
        match self {
            Self::Percent(value) => Some(value),
            Self::NotAttempted => None,
        }
    }

    pub fn is_attempted(self) -> bool {
        matches!(self, Self::Percent(_))
    }
}

impl Display for Grade {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Percent(value) => write!(f, "{value:.1}%"),
            Self::NotAttempted => f.write_str("not attempted"),
        }
    }
}

/// Aggregate grade has an empty denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregationError {
    /// Module has no attempted assignment carrying weight.
    NothingAttempted,
    /// Year has no module with a non-zero grade and credits.
    NoGradedModules,
    /// No year has a defined grade and non-zero weight.
    NoGradedYears,
}

impl Display for AggregationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NothingAttempted => write!(f, "no attempted assignments carry weight"),
            Self::NoGradedModules => write!(f, "no graded modules carry credits"),
            Self::NoGradedYears => write!(f, "no graded years carry weight"),
        }
    }
}

impl Error for AggregationError {}

/// A child grade with the weight it carries into its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedGrade {
    pub grade: Option<f64>,
    pub weight: f64,
}

impl WeightedGrade {
    /// Module grade weighted by module credits.
    pub fn for_module(module: &Module, grade: Result<f64, AggregationError>) -> Self {
        Self {
            grade: grade.ok(),
            weight: f64::from(module.credits),
        }
    }

    /// Year grade weighted by the year's percent weight.
    pub fn for_year(year: &Year, grade: Result<f64, AggregationError>) -> Self {
        Self {
            grade: grade.ok(),
            weight: year.percent_weight,
        }
    }
}

/// Grade of one assignment, rounded to one decimal place.
pub fn assignment_grade(assignment: &Assignment) -> Grade {
    match (assignment.score, assignment.max_score) {
        (Some(score), Some(max_score)) => Grade::Percent(round_to_tenth(score / max_score * 100.0)),
        _ => Grade::NotAttempted,
    }
}

/// Weighted module grade over its attempted assignments.
///
/// `achieved = Σ grade * worth / 100`, `available = Σ worth`; the result is
/// `achieved / available * 100`.
pub fn module_grade(assignments: &[Assignment]) -> Result<f64, AggregationError> {
    let (achieved, available) = assignments
        .iter()
        .filter_map(|assignment| {
            assignment_grade(assignment)
                .percent()
                .map(|grade| (grade, assignment.percent_worth))
        })
        .fold((0.0, 0.0), |(achieved, available), (grade, worth)| {
            (achieved + grade * worth / 100.0, available + worth)
        });

    if available == 0.0 {
        return Err(AggregationError::NothingAttempted);
    }
    Ok(achieved / available * 100.0)
}

/// Credit-weighted year grade over modules with a defined, non-zero grade.
pub fn year_grade(modules: &[WeightedGrade]) -> Result<f64, AggregationError> {
    weighted_mean(
        modules
            .iter()
            .filter(|module| module.grade.is_some_and(|grade| grade != 0.0)),
    )
    .ok_or(AggregationError::NoGradedModules)
}

/// Overall grade over years with a defined grade, weighted by percent weight.
pub fn overall_grade(years: &[WeightedGrade]) -> Result<f64, AggregationError> {
    weighted_mean(years.iter().filter(|year| year.grade.is_some()))
        .ok_or(AggregationError::NoGradedYears)
}

fn weighted_mean<'a>(grades: impl Iterator<Item = &'a WeightedGrade>) -> Option<f64> {
    let (achieved, available) = grades.fold((0.0, 0.0), |(achieved, available), item| {
        let grade = item.grade.unwrap_or(0.0);
        (achieved + grade * item.weight, available + item.weight)
    });
    if available == 0.0 {
        None
    } else {
        Some(achieved / available)
    }
}

#[cfg(test)]
mod tests {
    use super::{
        assignment_grade, module_grade, overall_grade, year_grade, AggregationError, Grade,
        WeightedGrade,
    };
    use crate::model::academic::Assignment;

    fn assignment(worth: f64, max_score: Option<f64>, score: Option<f64>) -> Assignment {
        Assignment::new(1, "CS101", "Work", worth, max_score, score).unwrap()
    }

    fn weighted(grade: Option<f64>, weight: f64) -> WeightedGrade {
        WeightedGrade { grade, weight }
    }

    #[test]
    fn assignment_grade_is_percentage_of_max() {
        assert_eq!(
            assignment_grade(&assignment(20.0, Some(100.0), Some(75.0))),
            Grade::Percent(75.0)
        );
        assert_eq!(
            assignment_grade(&assignment(20.0, Some(30.0), Some(20.0))),
            Grade::Percent(66.7)
        );
    }

    #[test]
    fn missing_score_is_not_attempted() {
        assert_eq!(
            assignment_grade(&assignment(20.0, Some(100.0), None)),
            Grade::NotAttempted
        );
        assert_eq!(
            assignment_grade(&assignment(20.0, None, Some(10.0))),
            Grade::NotAttempted
        );
    }

    #[test]
    fn module_grade_excludes_unattempted_work() {
        let assignments = vec![
            assignment(50.0, Some(100.0), None),
            assignment(50.0, Some(50.0), Some(40.0)),
        ];
        assert_eq!(module_grade(&assignments).unwrap(), 80.0);
    }

    #[test]
    fn module_grade_weights_by_worth() {
        let assignments = vec![
            assignment(25.0, Some(100.0), Some(40.0)),
            assignment(75.0, Some(100.0), Some(80.0)),
        ];
        assert!((module_grade(&assignments).unwrap() - 70.0).abs() < 1e-9);
    }

    #[test]
    fn module_grade_without_attempts_is_undefined() {
        assert_eq!(module_grade(&[]), Err(AggregationError::NothingAttempted));
        let zero_worth = vec![assignment(0.0, Some(10.0), Some(5.0))];
        assert_eq!(
            module_grade(&zero_worth),
            Err(AggregationError::NothingAttempted)
        );
    }

    #[test]
    fn year_grade_skips_zero_and_undefined_modules() {
        let modules = vec![
            weighted(Some(70.0), 20.0),
            weighted(Some(40.0), 10.0),
            weighted(Some(0.0), 40.0),
            weighted(None, 40.0),
        ];
        assert!((year_grade(&modules).unwrap() - 60.0).abs() < 1e-9);
    }

    #[test]
    fn year_grade_without_modules_is_undefined() {
        assert_eq!(
            year_grade(&[weighted(Some(0.0), 20.0)]),
            Err(AggregationError::NoGradedModules)
        );
    }

    #[test]
    fn overall_grade_uses_year_weights() {
        let years = vec![
            weighted(Some(60.0), 25.0),
            weighted(Some(70.0), 75.0),
            weighted(None, 100.0),
        ];
        assert!((overall_grade(&years).unwrap() - 67.5).abs() < 1e-9);
        assert_eq!(overall_grade(&[]), Err(AggregationError::NoGradedYears));
    }
}
