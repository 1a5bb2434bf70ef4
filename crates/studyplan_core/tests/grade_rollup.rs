use rusqlite::Connection;
use studyplan_core::db::open_db_in_memory;
use studyplan_core::{
    AcademicService, AggregationError, Assignment, Colour, Grade, GradeService,
    GradeServiceError, Module, Semester, SqliteAcademicRepository, Year,
};

const USER: i64 = 7;

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}

fn add_module(
    service: &AcademicService<SqliteAcademicRepository<'_>>,
    code: &str,
    credits: u32,
    study_year: u32,
) -> Module {
    service
        .create_module(
            &Module::new(
                USER,
                code,
                code,
                credits,
                Semester::AllYear,
                study_year,
                Colour::WHITE,
            )
            .unwrap(),
        )
        .unwrap()
}

fn add_assignment(
    service: &AcademicService<SqliteAcademicRepository<'_>>,
    code: &str,
    worth: f64,
    marks: Option<(f64, f64)>,
) {
    let (score, max_score) = match marks {
        Some((score, max_score)) => (Some(score), Some(max_score)),
        None => (None, None),
    };
    service
        .create_assignment(&Assignment::new(USER, code, "work", worth, max_score, score).unwrap())
        .unwrap();
}

/// Year 1 (40%): CS1 80% over 20 credits, CS2 60% over 10 credits, CS3 unattempted.
/// Year 2 (60%): CS4 90% over 20 credits.
fn seed(conn: &Connection) -> (Year, Year) {
    let academic = AcademicService::new(SqliteAcademicRepository::try_new(conn).unwrap());
    let first = academic.create_year(&Year::new(USER, 1, 120, 40.0).unwrap()).unwrap();
    let second = academic.create_year(&Year::new(USER, 2, 120, 60.0).unwrap()).unwrap();

    add_module(&academic, "CS1", 20, 1);
    add_assignment(&academic, "CS1", 50.0, None);
    add_assignment(&academic, "CS1", 50.0, Some((80.0, 100.0)));

    add_module(&academic, "CS2", 10, 1);
    add_assignment(&academic, "CS2", 100.0, Some((30.0, 50.0)));

    add_module(&academic, "CS3", 10, 1);
    add_assignment(&academic, "CS3", 100.0, None);

    add_module(&academic, "CS4", 20, 2);
    add_assignment(&academic, "CS4", 100.0, Some((90.0, 100.0)));

    (first, second)
}

#[test]
fn module_grade_ignores_unattempted_assignments() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let repo = SqliteAcademicRepository::try_new(&conn).unwrap();
    let grades = GradeService::new(SqliteAcademicRepository::try_new(&conn).unwrap());

    let cs1 = repo_module(&repo, "CS1");
    assert_close(grades.module_grade(&cs1).unwrap(), 80.0);

    let cs3 = repo_module(&repo, "CS3");
    let err = grades.module_grade(&cs3).unwrap_err();
    assert!(matches!(
        err,
        GradeServiceError::Undefined(AggregationError::NothingAttempted)
    ));
}

#[test]
fn year_grade_weights_modules_by_credits() {
    let conn = open_db_in_memory().unwrap();
    let (first, second) = seed(&conn);
    let grades = GradeService::new(SqliteAcademicRepository::try_new(&conn).unwrap());

    let module_grades = grades.module_grades(&first).unwrap();
    assert_eq!(module_grades.len(), 3);
    assert_eq!(
        module_grades[2].grade,
        Err(AggregationError::NothingAttempted)
    );

    assert_close(grades.year_grade(&first).unwrap(), 2200.0 / 30.0);
    assert_close(grades.year_grade(&second).unwrap(), 90.0);
}

#[test]
fn overall_grade_weights_years_by_percent() {
    let conn = open_db_in_memory().unwrap();
    seed(&conn);
    let grades = GradeService::new(SqliteAcademicRepository::try_new(&conn).unwrap());

    let expected = (2200.0 / 30.0 * 40.0 + 90.0 * 60.0) / 100.0;
    assert_close(grades.overall_grade(USER).unwrap(), expected);
}

#[test]
fn year_without_graded_modules_is_undefined() {
    let conn = open_db_in_memory().unwrap();
    let academic = AcademicService::new(SqliteAcademicRepository::try_new(&conn).unwrap());
    let year = academic.create_year(&Year::new(USER, 3, 120, 0.0).unwrap()).unwrap();
    add_module(&academic, "CS9", 20, 3);
    let grades = GradeService::new(SqliteAcademicRepository::try_new(&conn).unwrap());

    let err = grades.year_grade(&year).unwrap_err();
    assert!(matches!(
        err,
        GradeServiceError::Undefined(AggregationError::NoGradedModules)
    ));
    let err = grades.overall_grade(USER).unwrap_err();
    assert!(matches!(
        err,
        GradeServiceError::Undefined(AggregationError::NoGradedYears)
    ));
}

#[test]
fn assignment_grade_reports_percentages() {
    let conn = open_db_in_memory().unwrap();
    let grades = GradeService::new(SqliteAcademicRepository::try_new(&conn).unwrap());

    let marked = Assignment::new(USER, "CS1", "Exam", 50.0, Some(100.0), Some(75.0)).unwrap();
    let pending = Assignment::new(USER, "CS1", "Essay", 50.0, None, None).unwrap();
    assert_eq!(grades.assignment_grade(&marked), Grade::Percent(75.0));
    assert_eq!(grades.assignment_grade(&pending), Grade::NotAttempted);
}

fn repo_module(repo: &SqliteAcademicRepository<'_>, code: &str) -> Module {
    use studyplan_core::AcademicRepository;

    repo.list_modules_for_year(USER, 1)
        .unwrap()
        .into_iter()
        .chain(repo.list_modules_for_year(USER, 2).unwrap())
        .find(|module| module.code == code)
        .unwrap()
}
