use chrono::{NaiveDate, NaiveDateTime};
use habitdesk_core::db::open_db_in_memory;
use habitdesk_core::{
    CategoryService, EventInput, EventService, FieldErrorCode, Owner, OwnerService,
    ServiceError, SqliteCategoryRepository, SqliteEventRepository, SqliteOwnerRepository,
    SqliteTaskRepository, TaskInput, TaskListQuery, TaskPriority, TaskService, TaskStatus,
};
use rusqlite::Connection;

type Tasks<'conn> = TaskService<SqliteTaskRepository<'conn>, SqliteCategoryRepository<'conn>>;
type Events<'conn> = EventService<SqliteEventRepository<'conn>, SqliteCategoryRepository<'conn>>;

fn register(conn: &Connection, username: &str) -> Owner {
    OwnerService::new(SqliteOwnerRepository::try_new(conn).unwrap())
        .register(username)
        .unwrap()
}

fn tasks(conn: &Connection) -> Tasks<'_> {
    TaskService::new(
        SqliteTaskRepository::try_new(conn).unwrap(),
        SqliteCategoryRepository::try_new(conn).unwrap(),
    )
}

fn events(conn: &Connection) -> Events<'_> {
    EventService::new(
        SqliteEventRepository::try_new(conn).unwrap(),
        SqliteCategoryRepository::try_new(conn).unwrap(),
    )
}

fn titled(title: &str) -> TaskInput {
    TaskInput {
        title: title.to_string(),
        ..TaskInput::default()
    }
}

fn at(value: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S").unwrap()
}

#[test]
fn task_without_category_lands_in_inbox() {
    let conn = open_db_in_memory().unwrap();
    let owner = register(&conn, "alice");
    let inbox = CategoryService::new(SqliteCategoryRepository::try_new(&conn).unwrap())
        .ensure_inbox(owner.id)
        .unwrap();
    let service = tasks(&conn);

    let task = service
        .create_task(
            owner.id,
            &TaskInput {
                title: "  Pay rent ".to_string(),
                priority: TaskPriority::High,
                due_date: NaiveDate::from_ymd_opt(2024, 4, 1),
                estimated_minutes: Some(15),
                ..TaskInput::default()
            },
        )
        .unwrap();

    let loaded = service.get_task(owner.id, task.id).unwrap().unwrap();
    assert_eq!(loaded.category_id, Some(inbox.id));
    assert_eq!(loaded.title, "Pay rent");
    assert_eq!(loaded.priority, TaskPriority::High);
    assert_eq!(loaded.status, TaskStatus::default());
    assert_eq!(loaded.estimated_minutes, Some(15));
    assert_eq!(loaded.due_date, NaiveDate::from_ymd_opt(2024, 4, 1));
}

#[test]
fn task_validation_reports_every_field() {
    let conn = open_db_in_memory().unwrap();
    let alice = register(&conn, "alice");
    let bob = register(&conn, "bob");
    let bobs_category = CategoryService::new(SqliteCategoryRepository::try_new(&conn).unwrap())
        .create_category(bob.id, "Private")
        .unwrap();

    let err = tasks(&conn)
        .create_task(
            alice.id,
            &TaskInput {
                category_id: Some(bobs_category.id),
                title: "   ".to_string(),
                estimated_minutes: Some(-5),
                ..TaskInput::default()
            },
        )
        .unwrap_err();
    let errors = err.field_errors().expect("expected field errors");
    assert!(errors.has("title", FieldErrorCode::Required));
    assert!(errors.has("category", FieldErrorCode::InvalidChoice));
    assert!(errors.has("estimated_minutes", FieldErrorCode::InvalidValue));
}

#[test]
fn task_list_filters_by_text_and_status() {
    let conn = open_db_in_memory().unwrap();
    let owner = register(&conn, "alice");
    let service = tasks(&conn);

    let report = service.create_task(owner.id, &titled("Quarterly REPORT")).unwrap();
    service.create_task(owner.id, &titled("Groceries")).unwrap();
    service
        .update_task(
            owner.id,
            report.id,
            &TaskInput {
                status: TaskStatus::Done,
                ..titled("Quarterly REPORT")
            },
        )
        .unwrap();

    let by_text = service
        .list_tasks(
            owner.id,
            &TaskListQuery {
                q: Some("report".to_string()),
                status: None,
            },
        )
        .unwrap();
    assert_eq!(by_text.len(), 1);
    assert_eq!(by_text[0].id, report.id);

    let done = service
        .list_tasks(
            owner.id,
            &TaskListQuery {
                q: None,
                status: Some(TaskStatus::Done),
            },
        )
        .unwrap();
    assert_eq!(done.len(), 1);
    assert_eq!(done[0].status, TaskStatus::Done);

    assert_eq!(
        service
            .list_tasks(owner.id, &TaskListQuery::default())
            .unwrap()
            .len(),
        2
    );
}

#[test]
fn tasks_are_scoped_to_their_owner() {
    let conn = open_db_in_memory().unwrap();
    let alice = register(&conn, "alice");
    let bob = register(&conn, "bob");
    let service = tasks(&conn);

    let task = service.create_task(alice.id, &titled("Secret")).unwrap();
    assert!(service.get_task(bob.id, task.id).unwrap().is_none());
    assert!(service
        .list_tasks(bob.id, &TaskListQuery::default())
        .unwrap()
        .is_empty());
    assert!(matches!(
        service.update_task(bob.id, task.id, &titled("Mine")),
        Err(ServiceError::NotFound { entity: "task", .. })
    ));
    assert!(matches!(
        service.delete_task(bob.id, task.id),
        Err(ServiceError::NotFound { .. })
    ));

    service.delete_task(alice.id, task.id).unwrap();
    assert!(service.get_task(alice.id, task.id).unwrap().is_none());
}

#[test]
fn event_end_must_follow_start() {
    let conn = open_db_in_memory().unwrap();
    let owner = register(&conn, "alice");
    let service = events(&conn);

    let same_time = EventInput {
        title: "Review".to_string(),
        start_at: Some(at("2024-03-10T09:00:00")),
        end_at: Some(at("2024-03-10T09:00:00")),
        ..EventInput::default()
    };
    let err = service.create_event(owner.id, &same_time).unwrap_err();
    assert!(err
        .field_errors()
        .is_some_and(|errors| errors.has("end_at", FieldErrorCode::EndNotAfterStart)));

    let valid = EventInput {
        end_at: Some(at("2024-03-10T10:00:00")),
        ..same_time
    };
    let event = service.create_event(owner.id, &valid).unwrap();
    let loaded = service.get_event(owner.id, event.id).unwrap().unwrap();
    assert_eq!(loaded, event);
}

#[test]
fn events_list_by_start_and_search_location() {
    let conn = open_db_in_memory().unwrap();
    let owner = register(&conn, "alice");
    let service = events(&conn);

    let later = service
        .create_event(
            owner.id,
            &EventInput {
                title: "Dentist".to_string(),
                location: "Main Street Clinic".to_string(),
                start_at: Some(at("2024-03-12T15:00:00")),
                ..EventInput::default()
            },
        )
        .unwrap();
    let earlier = service
        .create_event(
            owner.id,
            &EventInput {
                title: "Standup".to_string(),
                start_at: Some(at("2024-03-11T09:00:00")),
                ..EventInput::default()
            },
        )
        .unwrap();

    let ids: Vec<_> = service
        .list_events(owner.id, None)
        .unwrap()
        .into_iter()
        .map(|event| event.id)
        .collect();
    assert_eq!(ids, vec![earlier.id, later.id]);

    let found = service.list_events(owner.id, Some("clinic")).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, later.id);
}

#[test]
fn event_update_replaces_fields() {
    let conn = open_db_in_memory().unwrap();
    let owner = register(&conn, "alice");
    let service = events(&conn);

    let event = service
        .create_event(
            owner.id,
            &EventInput {
                title: "Gym".to_string(),
                start_at: Some(at("2024-03-11T18:00:00")),
                ..EventInput::default()
            },
        )
        .unwrap();

    let updated = service
        .update_event(
            owner.id,
            event.id,
            &EventInput {
                title: "Gym class".to_string(),
                location: "Studio B".to_string(),
                start_at: Some(at("2024-03-11T19:00:00")),
                end_at: Some(at("2024-03-11T20:00:00")),
                ..EventInput::default()
            },
        )
        .unwrap();
    assert_eq!(updated.category_id, event.category_id);
    assert_eq!(
        service.get_event(owner.id, event.id).unwrap().unwrap(),
        updated
    );

    service.delete_event(owner.id, event.id).unwrap();
    assert!(service.list_events(owner.id, None).unwrap().is_empty());
}

#[test]
fn text_search_folds_non_ascii_case() {
    let conn = open_db_in_memory().unwrap();
    let owner = register(&conn, "ana");
    let task = tasks(&conn)
        .create_task(owner.id, &titled("Platiti RAČUNE"))
        .unwrap();
    let found = tasks(&conn)
        .list_tasks(
            owner.id,
            &TaskListQuery {
                q: Some("račune".to_string()),
                status: None,
            },
        )
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, task.id);

    let event = events(&conn)
        .create_event(
            owner.id,
            &EventInput {
                title: "Sastanak".to_string(),
                location: "Ured ŠIBENIK".to_string(),
                start_at: Some(at("2024-03-12T10:00:00")),
                ..EventInput::default()
            },
        )
        .unwrap();
    let found = events(&conn).list_events(owner.id, Some("šibenik")).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, event.id);
}
