use chrono::{NaiveDate, Weekday};
use rusqlite::Connection;
use studyplan_core::db::open_db_in_memory;
use studyplan_core::{
    AcademicRepository, CalendarService, Colour, HourSlot, Module, PeriodLayout, RecurringEvent,
    RecurringTask, RepoError, ScheduleError, ScheduleRepository, SchedulerService, Semester,
    SqliteAcademicRepository, SqliteCalendarRepository, SqliteScheduleRepository, TaskStatus,
    ValidationError,
};

const USER: i64 = 4;

struct Fixture {
    conn: Connection,
}

impl Fixture {
    fn new() -> Self {
        Self {
            conn: open_db_in_memory().unwrap(),
        }
    }

    fn module(&self) -> i64 {
        let repo = SqliteAcademicRepository::try_new(&self.conn).unwrap();
        repo.insert_module(
            &Module::new(
                USER,
                "MA1001",
                "Calculus",
                20,
                Semester::Autumn,
                1,
                Colour::rgb(200, 40, 40),
            )
            .unwrap(),
        )
        .unwrap()
    }

    fn period(&self, weeks: u32) -> PeriodLayout {
        let service = CalendarService::new(SqliteCalendarRepository::try_new(&self.conn).unwrap());
        service
            .create_period(
                USER,
                1,
                "Semester 1",
                weeks,
                NaiveDate::from_ymd_opt(2025, 9, 29).unwrap(),
                1,
            )
            .unwrap()
    }

    fn scheduler(
        &self,
    ) -> SchedulerService<SqliteCalendarRepository<'_>, SqliteScheduleRepository<'_>> {
        SchedulerService::new(
            SqliteCalendarRepository::try_new(&self.conn).unwrap(),
            SqliteScheduleRepository::try_new(&self.conn).unwrap(),
        )
    }

    fn schedule_repo(&self) -> SqliteScheduleRepository<'_> {
        SqliteScheduleRepository::try_new(&self.conn).unwrap()
    }
}

fn slot(hour: u8) -> HourSlot {
    HourSlot::new(hour).unwrap()
}

fn lecture(module_id: i64, weekday: Weekday) -> RecurringEvent {
    RecurringEvent {
        user_id: USER,
        weekday,
        module_id,
        name: "Lecture".to_string(),
        description: "Lecture =".to_string(),
        start_time: slot(10),
        end_time: slot(12),
    }
}

#[test]
fn recurring_task_is_created_once_per_week_with_substituted_text() {
    let fixture = Fixture::new();
    let module_id = fixture.module();
    let period_id = fixture.period(6).period.id;
    let scheduler = fixture.scheduler();

    let weeks = scheduler.weeks_in_range(period_id, 2, 4).unwrap();
    assert_eq!(weeks.len(), 3);

    let outcome = scheduler
        .add_recurring_task(
            &RecurringTask {
                user_id: USER,
                module_id,
                description: "Homework =, prep for >".to_string(),
            },
            &weeks,
        )
        .unwrap();

    assert!(outcome.is_complete());
    let descriptions: Vec<&str> = outcome
        .created
        .iter()
        .map(|task| task.description.as_str())
        .collect();
    assert_eq!(
        descriptions,
        vec![
            "Homework 2, prep for 3",
            "Homework 3, prep for 4",
            "Homework 4, prep for 5"
        ]
    );

    let week_ids: Vec<i64> = outcome.created.iter().map(|task| task.week_id).collect();
    let expected: Vec<i64> = weeks.iter().map(|week| week.id).collect();
    assert_eq!(week_ids, expected);

    let stored = fixture
        .schedule_repo()
        .list_tasks_for_week(weeks[0].id)
        .unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].status, TaskStatus::No);
}

#[test]
fn recurring_event_lands_on_the_requested_weekday() {
    let fixture = Fixture::new();
    let module_id = fixture.module();
    let layout = fixture.period(3);
    let scheduler = fixture.scheduler();
    let weeks = scheduler
        .weeks_in_range(layout.period.id, 1, 3)
        .unwrap();

    let outcome = scheduler
        .add_recurring_event(&lecture(module_id, Weekday::Wed), &weeks)
        .unwrap();

    assert!(outcome.is_complete());
    assert_eq!(outcome.created.len(), 3);
    for (event, week) in outcome.created.iter().zip(&layout.weeks) {
        let wednesday = week.day(Weekday::Wed).unwrap();
        assert_eq!(event.day_id, wednesday.id);
        assert_eq!(event.description, format!("Lecture {}", week.week.week_number));
        assert_eq!(event.duration_hours(), 2);
    }

    let stored = fixture
        .schedule_repo()
        .list_events_for_day(layout.weeks[1].day(Weekday::Wed).unwrap().id)
        .unwrap();
    assert_eq!(stored, vec![outcome.created[1].clone()]);
}

#[test]
fn weekend_events_are_rejected_before_any_insert() {
    let fixture = Fixture::new();
    let module_id = fixture.module();
    let layout = fixture.period(2);
    let scheduler = fixture.scheduler();
    let weeks = scheduler
        .weeks_in_range(layout.period.id, 1, 2)
        .unwrap();

    let err = scheduler
        .add_recurring_event(&lecture(module_id, Weekday::Sat), &weeks)
        .unwrap_err();
    assert!(matches!(
        err,
        ScheduleError::Validation(ValidationError::NotStudyDay(Weekday::Sat))
    ));

    let mut reversed = lecture(module_id, Weekday::Mon);
    reversed.start_time = slot(15);
    reversed.end_time = slot(11);
    let err = scheduler.add_recurring_event(&reversed, &weeks).unwrap_err();
    assert!(matches!(
        err,
        ScheduleError::Validation(ValidationError::EndNotAfterStart { .. })
    ));

    let events: i64 = fixture
        .conn
        .query_row("SELECT COUNT(*) FROM events;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(events, 0);
}

#[test]
fn week_range_must_be_increasing() {
    let fixture = Fixture::new();
    let layout = fixture.period(4);
    let scheduler = fixture.scheduler();

    for (start, end) in [(3, 3), (4, 2)] {
        let err = scheduler
            .weeks_in_range(layout.period.id, start, end)
            .unwrap_err();
        assert!(matches!(
            err,
            ScheduleError::Validation(ValidationError::InvalidWeekRange { .. })
        ));
    }
}

#[test]
fn week_range_must_lie_within_the_period() {
    let fixture = Fixture::new();
    let layout = fixture.period(4);
    let scheduler = fixture.scheduler();

    for (start, end, missing) in [(2, 6, 6), (0, 2, 0), (5, 9, 5)] {
        let err = scheduler
            .weeks_in_range(layout.period.id, start, end)
            .unwrap_err();
        assert!(
            matches!(
                err,
                ScheduleError::Validation(ValidationError::WeekNotInPeriod(week)) if week == missing
            ),
            "range {start}..={end}"
        );
    }

    let weeks = scheduler.weeks_in_range(layout.period.id, 1, 4).unwrap();
    assert_eq!(weeks.len(), 4);
}

#[test]
fn failure_mid_sequence_keeps_earlier_weeks_and_reports_the_failing_one() {
    let fixture = Fixture::new();
    let module_id = fixture.module();
    let layout = fixture.period(3);
    let scheduler = fixture.scheduler();
    let weeks = scheduler
        .weeks_in_range(layout.period.id, 1, 3)
        .unwrap();

    fixture
        .conn
        .execute("DELETE FROM weeks WHERE id = ?1;", [weeks[1].id])
        .unwrap();

    let outcome = scheduler
        .add_recurring_task(
            &RecurringTask {
                user_id: USER,
                module_id,
                description: "Problem sheet =".to_string(),
            },
            &weeks,
        )
        .unwrap();

    assert!(!outcome.is_complete());
    assert_eq!(outcome.created.len(), 1);
    assert_eq!(outcome.created[0].description, "Problem sheet 1");
    let failure = outcome.failure.unwrap();
    assert_eq!(failure.week_number, 2);
    assert!(matches!(failure.error, RepoError::Conflict { entity: "task", .. }));

    let tasks: i64 = fixture
        .conn
        .query_row("SELECT COUNT(*) FROM tasks;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(tasks, 1);
}

#[test]
fn event_for_week_without_days_is_reported_as_failure() {
    let fixture = Fixture::new();
    let module_id = fixture.module();
    let layout = fixture.period(2);
    let scheduler = fixture.scheduler();
    let weeks = scheduler
        .weeks_in_range(layout.period.id, 1, 2)
        .unwrap();

    fixture
        .conn
        .execute("DELETE FROM days WHERE week_id = ?1;", [weeks[1].id])
        .unwrap();

    let outcome = scheduler
        .add_recurring_event(&lecture(module_id, Weekday::Fri), &weeks)
        .unwrap();
    assert_eq!(outcome.created.len(), 1);
    let failure = outcome.failure.unwrap();
    assert_eq!(failure.week_number, 2);
    assert!(matches!(failure.error, RepoError::InvalidData(_)));
}

#[test]
fn deleting_module_removes_its_scheduled_items() {
    let fixture = Fixture::new();
    let module_id = fixture.module();
    let layout = fixture.period(2);
    let scheduler = fixture.scheduler();
    let weeks = scheduler
        .weeks_in_range(layout.period.id, 1, 2)
        .unwrap();
    scheduler
        .add_recurring_event(&lecture(module_id, Weekday::Tue), &weeks)
        .unwrap();

    SqliteAcademicRepository::try_new(&fixture.conn)
        .unwrap()
        .delete_module(module_id)
        .unwrap();

    let events = fixture
        .schedule_repo()
        .list_events_for_day(layout.weeks[0].day(Weekday::Tue).unwrap().id)
        .unwrap();
    assert!(events.is_empty());
}
