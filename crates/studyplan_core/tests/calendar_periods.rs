use chrono::{NaiveDate, Weekday};
use std::time::Duration;
use studyplan_core::db::open_db_in_memory;
use studyplan_core::{
    CalendarRepository, CalendarService, CalendarServiceError, ManualClock, RepoError,
    SqliteCalendarRepository, Stopwatch, ValidationError, MAX_WORK_HOURS,
};

const USER: i64 = 1;

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, 29).unwrap()
}

fn count(conn: &rusqlite::Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

#[test]
fn create_period_persists_every_week_and_day() {
    let conn = open_db_in_memory().unwrap();
    let service = CalendarService::new(SqliteCalendarRepository::try_new(&conn).unwrap());

    let layout = service
        .create_period(USER, 2, "Semester 1", 12, monday(), 1)
        .unwrap();

    assert!(layout.period.id > 0);
    assert_eq!(layout.weeks.len(), 12);
    assert_eq!(count(&conn, "weeks"), 12);
    assert_eq!(count(&conn, "days"), 60);

    let stored_weeks = service.weeks(layout.period.id).unwrap();
    let numbers: Vec<u32> = stored_weeks.iter().map(|week| week.week_number).collect();
    assert_eq!(numbers, (1..=12).collect::<Vec<_>>());
    assert_eq!(
        stored_weeks[11].start_date,
        NaiveDate::from_ymd_opt(2025, 12, 15).unwrap()
    );

    let days = service.days(stored_weeks[0].id).unwrap();
    let weekdays: Vec<Weekday> = days.iter().map(|day| day.weekday()).collect();
    assert_eq!(
        weekdays,
        vec![
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri
        ]
    );
    assert!(days.iter().all(|day| day.hours_spent == 0));
}

#[test]
fn week_numbering_starts_at_requested_number() {
    let conn = open_db_in_memory().unwrap();
    let service = CalendarService::new(SqliteCalendarRepository::try_new(&conn).unwrap());

    let layout = service
        .create_period(USER, 2, "Semester 2", 3, monday(), 13)
        .unwrap();
    let repo = SqliteCalendarRepository::try_new(&conn).unwrap();

    let week = repo.find_week(layout.period.id, 14).unwrap().unwrap();
    assert_eq!(week.start_date, NaiveDate::from_ymd_opt(2025, 10, 6).unwrap());
    assert!(repo.find_week(layout.period.id, 16).unwrap().is_none());
}

#[test]
fn invalid_period_leaves_storage_untouched() {
    let conn = open_db_in_memory().unwrap();
    let service = CalendarService::new(SqliteCalendarRepository::try_new(&conn).unwrap());
    let tuesday = NaiveDate::from_ymd_opt(2025, 9, 30).unwrap();

    let err = service
        .create_period(USER, 2, "Semester 1", 4, tuesday, 1)
        .unwrap_err();
    assert!(matches!(
        err,
        CalendarServiceError::Validation(ValidationError::NotMonday(date)) if date == tuesday
    ));

    let err = service
        .create_period(USER, 2, "Semester 1", 54, monday(), 1)
        .unwrap_err();
    assert!(matches!(
        err,
        CalendarServiceError::Validation(ValidationError::OutOfRange { .. })
    ));

    assert_eq!(count(&conn, "periods"), 0);
    assert_eq!(count(&conn, "weeks"), 0);
}

#[test]
fn deleting_period_cascades_to_weeks_and_days() {
    let conn = open_db_in_memory().unwrap();
    let service = CalendarService::new(SqliteCalendarRepository::try_new(&conn).unwrap());
    let kept = service
        .create_period(USER, 1, "Kept", 2, monday(), 1)
        .unwrap();
    let removed = service
        .create_period(USER, 1, "Removed", 3, monday(), 1)
        .unwrap();

    service.delete_period(removed.period.id).unwrap();

    assert_eq!(count(&conn, "weeks"), 2);
    assert_eq!(count(&conn, "days"), 10);
    let periods = service.periods(USER).unwrap();
    assert_eq!(periods, vec![kept.period]);

    let err = service.delete_period(removed.period.id).unwrap_err();
    assert!(matches!(
        err,
        CalendarServiceError::Repo(RepoError::NotFound {
            entity: "period",
            ..
        })
    ));
}

#[test]
fn add_and_remove_hour_respect_bounds() {
    let conn = open_db_in_memory().unwrap();
    let service = CalendarService::new(SqliteCalendarRepository::try_new(&conn).unwrap());
    let layout = service
        .create_period(USER, 1, "Term", 1, monday(), 1)
        .unwrap();
    let day_id = layout.weeks[0].days[0].id;

    let err = service.remove_hour(day_id).unwrap_err();
    assert!(matches!(
        err,
        CalendarServiceError::Validation(ValidationError::NoHoursLogged)
    ));

    for _ in 0..MAX_WORK_HOURS {
        service.add_hour(day_id).unwrap();
    }
    let err = service.add_hour(day_id).unwrap_err();
    assert!(matches!(
        err,
        CalendarServiceError::Validation(ValidationError::HoursCapExceeded { .. })
    ));

    let day = service.remove_hour(day_id).unwrap();
    assert_eq!(day.hours_spent, MAX_WORK_HOURS - 1);
}

#[test]
fn study_sessions_bank_sub_hour_remainders_on_the_week() {
    let conn = open_db_in_memory().unwrap();
    let service = CalendarService::new(SqliteCalendarRepository::try_new(&conn).unwrap());
    let layout = service
        .create_period(USER, 1, "Term", 1, monday(), 1)
        .unwrap();
    let monday_id = layout.weeks[0].days[0].id;
    let tuesday_id = layout.weeks[0].days[1].id;

    let first = service.log_study_session(monday_id, 50).unwrap();
    assert_eq!(first.hours_added, 0);
    assert_eq!(first.minutes_left, 50);

    let second = service.log_study_session(tuesday_id, 95).unwrap();
    assert_eq!(second.hours_added, 2);
    assert_eq!(second.hours_spent, 2);
    assert_eq!(second.minutes_left, 25);

    let repo = SqliteCalendarRepository::try_new(&conn).unwrap();
    let week = repo.get_week(layout.weeks[0].week.id).unwrap().unwrap();
    assert_eq!(week.minutes_left, 25);
    assert_eq!(repo.get_day(tuesday_id).unwrap().unwrap().hours_spent, 2);
    assert_eq!(repo.get_day(monday_id).unwrap().unwrap().hours_spent, 0);
}

#[test]
fn study_session_over_cap_changes_nothing() {
    let conn = open_db_in_memory().unwrap();
    let service = CalendarService::new(SqliteCalendarRepository::try_new(&conn).unwrap());
    let layout = service
        .create_period(USER, 1, "Term", 1, monday(), 1)
        .unwrap();
    let day_id = layout.weeks[0].days[0].id;
    service.log_study_session(day_id, 30).unwrap();

    let err = service.log_study_session(day_id, 13 * 60).unwrap_err();
    assert!(matches!(
        err,
        CalendarServiceError::Validation(ValidationError::HoursCapExceeded { .. })
    ));

    let repo = SqliteCalendarRepository::try_new(&conn).unwrap();
    let week = repo.get_week(layout.weeks[0].week.id).unwrap().unwrap();
    assert_eq!(week.minutes_left, 30);
    assert_eq!(repo.get_day(day_id).unwrap().unwrap().hours_spent, 0);
}

#[test]
fn stopwatch_minutes_are_logged_against_a_day() {
    let conn = open_db_in_memory().unwrap();
    let service = CalendarService::new(SqliteCalendarRepository::try_new(&conn).unwrap());
    let layout = service
        .create_period(USER, 1, "Term", 1, monday(), 1)
        .unwrap();
    let day_id = layout.weeks[0].days[2].id;

    let clock = ManualClock::new();
    let mut stopwatch = Stopwatch::with_clock(&clock);
    stopwatch.start().unwrap();
    clock.advance(Duration::from_secs(75 * 60 + 40));
    stopwatch.stop().unwrap();

    let log = service.log_stopwatch(day_id, &stopwatch).unwrap();
    assert_eq!(log.hours_added, 1);
    assert_eq!(log.minutes_left, 15);
}

#[test]
fn logging_against_missing_day_reports_not_found() {
    let conn = open_db_in_memory().unwrap();
    let service = CalendarService::new(SqliteCalendarRepository::try_new(&conn).unwrap());

    let err = service.log_study_session(99, 30).unwrap_err();
    assert!(matches!(
        err,
        CalendarServiceError::Repo(RepoError::NotFound {
            entity: "day",
            id: 99
        })
    ));
}
