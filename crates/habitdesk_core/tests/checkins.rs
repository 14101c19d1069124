use chrono::NaiveDateTime;
use habitdesk_core::db::open_db_in_memory;
use habitdesk_core::repo::checkin_repo::CheckinRepository;
use habitdesk_core::{
    CheckinId, CheckinInput, FieldErrorCode, Habit, HabitCheckin, HabitCheckinService, HabitId,
    HabitInput, HabitService, Owner, OwnerId, OwnerService, RepoResult, ServiceError,
    SqliteCheckinRepository, SqliteHabitRepository, SqliteOwnerRepository,
};
use rusqlite::Connection;

type CheckinService<'conn> =
    HabitCheckinService<SqliteHabitRepository<'conn>, SqliteCheckinRepository<'conn>>;

fn register(conn: &Connection, username: &str) -> Owner {
    OwnerService::new(SqliteOwnerRepository::try_new(conn).unwrap())
        .register(username)
        .unwrap()
}

fn create_habit(conn: &Connection, owner: &Owner, name: &str) -> Habit {
    HabitService::new(SqliteHabitRepository::try_new(conn).unwrap())
        .create_habit(
            owner.id,
            &HabitInput {
                name: name.to_string(),
                ..HabitInput::default()
            },
        )
        .unwrap()
}

fn checkin_service(conn: &Connection) -> CheckinService<'_> {
    HabitCheckinService::new(
        SqliteHabitRepository::try_new(conn).unwrap(),
        SqliteCheckinRepository::try_new(conn).unwrap(),
    )
}

fn at(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").unwrap()
}

fn performed(value: &str) -> CheckinInput {
    CheckinInput {
        performed_at: Some(at(value)),
        done: true,
    }
}

#[test]
fn checkins_in_the_same_minute_collide() {
    let conn = open_db_in_memory().unwrap();
    let owner = register(&conn, "alice");
    let habit = create_habit(&conn, &owner, "Read");
    let service = checkin_service(&conn);

    let first = service
        .create_checkin(owner.id, habit.id, &performed("2024-03-10T12:00:05"))
        .unwrap();
    assert_eq!(first.performed_at, at("2024-03-10T12:00:00"));

    let err = service
        .create_checkin(owner.id, habit.id, &performed("2024-03-10T12:00:45"))
        .unwrap_err();
    let errors = err.field_errors().expect("expected field errors");
    assert!(errors.has("performed_at", FieldErrorCode::DuplicateMinute));

    service
        .create_checkin(owner.id, habit.id, &performed("2024-03-10T12:01:00"))
        .expect("next minute is free");
    assert_eq!(service.list_checkins(owner.id, habit.id).unwrap().len(), 2);
}

/// Check-in storage whose minute lookup always answers "free", so writes
/// reach the `(habit_id, performed_at)` constraint as a lost race would.
struct NoMinuteLookup<'conn>(SqliteCheckinRepository<'conn>);

impl CheckinRepository for NoMinuteLookup<'_> {
    fn create_checkin(&self, checkin: &HabitCheckin) -> RepoResult<()> {
        self.0.create_checkin(checkin)
    }

    fn update_checkin(&self, checkin: &HabitCheckin) -> RepoResult<()> {
        self.0.update_checkin(checkin)
    }

    fn get_checkin(&self, owner_id: OwnerId, id: CheckinId) -> RepoResult<Option<HabitCheckin>> {
        self.0.get_checkin(owner_id, id)
    }

    fn list_checkins(
        &self,
        owner_id: OwnerId,
        habit_id: HabitId,
    ) -> RepoResult<Vec<HabitCheckin>> {
        self.0.list_checkins(owner_id, habit_id)
    }

    fn delete_checkin(&self, owner_id: OwnerId, id: CheckinId) -> RepoResult<()> {
        self.0.delete_checkin(owner_id, id)
    }

    fn checkin_exists_at(
        &self,
        _habit_id: HabitId,
        _performed_at: NaiveDateTime,
        _exclude: Option<CheckinId>,
    ) -> RepoResult<bool> {
        Ok(false)
    }
}

#[test]
fn storage_conflict_is_reported_as_duplicate_minute() {
    let conn = open_db_in_memory().unwrap();
    let owner = register(&conn, "alice");
    let habit = create_habit(&conn, &owner, "Read");
    let service = HabitCheckinService::new(
        SqliteHabitRepository::try_new(&conn).unwrap(),
        NoMinuteLookup(SqliteCheckinRepository::try_new(&conn).unwrap()),
    );

    let noon = service
        .create_checkin(owner.id, habit.id, &performed("2024-03-10T12:00:05"))
        .unwrap();
    let err = service
        .create_checkin(owner.id, habit.id, &performed("2024-03-10T12:00:45"))
        .unwrap_err();
    assert!(err
        .field_errors()
        .is_some_and(|errors| errors.has("performed_at", FieldErrorCode::DuplicateMinute)));

    let evening = service
        .create_checkin(owner.id, habit.id, &performed("2024-03-10T18:00:00"))
        .unwrap();
    let err = service
        .update_checkin(owner.id, evening.id, &performed("2024-03-10T12:00:30"))
        .unwrap_err();
    assert!(err
        .field_errors()
        .is_some_and(|errors| errors.has("performed_at", FieldErrorCode::DuplicateMinute)));

    let stored = service.list_checkins(owner.id, habit.id).unwrap();
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[1].id, noon.id);
}

#[test]
fn update_may_keep_its_own_minute_but_not_take_another() {
    let conn = open_db_in_memory().unwrap();
    let owner = register(&conn, "alice");
    let habit = create_habit(&conn, &owner, "Read");
    let service = checkin_service(&conn);

    let morning = service
        .create_checkin(owner.id, habit.id, &performed("2024-03-10T08:00:00"))
        .unwrap();
    service
        .create_checkin(owner.id, habit.id, &performed("2024-03-10T20:00:00"))
        .unwrap();

    let skipped = service
        .update_checkin(
            owner.id,
            morning.id,
            &CheckinInput {
                performed_at: Some(at("2024-03-10T08:00:30")),
                done: false,
            },
        )
        .unwrap();
    assert!(!skipped.done);
    assert_eq!(skipped.performed_at, at("2024-03-10T08:00:00"));

    let err = service
        .update_checkin(owner.id, morning.id, &performed("2024-03-10T20:00:59"))
        .unwrap_err();
    assert!(err
        .field_errors()
        .is_some_and(|errors| errors.has("performed_at", FieldErrorCode::DuplicateMinute)));
}

#[test]
fn list_is_newest_first() {
    let conn = open_db_in_memory().unwrap();
    let owner = register(&conn, "alice");
    let habit = create_habit(&conn, &owner, "Read");
    let service = checkin_service(&conn);

    for value in ["2024-03-09T07:00:00", "2024-03-11T07:00:00", "2024-03-10T07:00:00"] {
        service
            .create_checkin(owner.id, habit.id, &performed(value))
            .unwrap();
    }

    let times: Vec<NaiveDateTime> = service
        .list_checkins(owner.id, habit.id)
        .unwrap()
        .into_iter()
        .map(|checkin| checkin.performed_at)
        .collect();
    assert_eq!(
        times,
        vec![
            at("2024-03-11T07:00:00"),
            at("2024-03-10T07:00:00"),
            at("2024-03-09T07:00:00"),
        ]
    );
}

#[test]
fn deleting_a_habit_removes_its_checkins() {
    let conn = open_db_in_memory().unwrap();
    let owner = register(&conn, "alice");
    let habit = create_habit(&conn, &owner, "Read");
    let service = checkin_service(&conn);

    let checkin = service
        .create_checkin(owner.id, habit.id, &performed("2024-03-10T12:00:00"))
        .unwrap();

    HabitService::new(SqliteHabitRepository::try_new(&conn).unwrap())
        .delete_habit(owner.id, habit.id)
        .unwrap();

    let remaining: i64 = conn
        .query_row("SELECT COUNT(*) FROM habit_checkins;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(remaining, 0);
    let repo = SqliteCheckinRepository::try_new(&conn).unwrap();
    assert!(repo.get_checkin(owner.id, checkin.id).unwrap().is_none());
}

#[test]
fn other_owners_cannot_touch_checkins() {
    let conn = open_db_in_memory().unwrap();
    let alice = register(&conn, "alice");
    let bob = register(&conn, "bob");
    let habit = create_habit(&conn, &alice, "Read");
    let service = checkin_service(&conn);

    let checkin = service
        .create_checkin(alice.id, habit.id, &performed("2024-03-10T12:00:00"))
        .unwrap();

    assert!(matches!(
        service.create_checkin(bob.id, habit.id, &performed("2024-03-10T13:00:00")),
        Err(ServiceError::NotFound { entity: "habit", .. })
    ));
    assert!(matches!(
        service.update_checkin(bob.id, checkin.id, &performed("2024-03-10T14:00:00")),
        Err(ServiceError::NotFound { .. })
    ));
    assert!(matches!(
        service.delete_checkin(bob.id, checkin.id),
        Err(ServiceError::NotFound { .. })
    ));

    service.delete_checkin(alice.id, checkin.id).unwrap();
    assert!(service.list_checkins(alice.id, habit.id).unwrap().is_empty());
}

#[test]
fn missing_timestamp_defaults_to_now() {
    let conn = open_db_in_memory().unwrap();
    let owner = register(&conn, "alice");
    let habit = create_habit(&conn, &owner, "Read");
    let service = checkin_service(&conn);

    let checkin = service
        .create_checkin(owner.id, habit.id, &CheckinInput::default())
        .unwrap();
    assert!(checkin.done);
    assert_eq!(checkin.performed_at.format("%S").to_string(), "00");
}
