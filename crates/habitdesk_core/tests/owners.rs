use habitdesk_core::db::open_db_in_memory;
use habitdesk_core::{
    CategoryService, FieldErrorCode, FieldErrors, OwnerService, ServiceError,
    SqliteCategoryRepository, SqliteOwnerRepository, INBOX_NAME,
};
use rusqlite::Connection;
use serde_json::json;

fn owners(conn: &Connection) -> OwnerService<SqliteOwnerRepository<'_>> {
    OwnerService::new(SqliteOwnerRepository::try_new(conn).unwrap())
}

#[test]
fn register_creates_owner_with_inbox() {
    let conn = open_db_in_memory().unwrap();
    let owner = owners(&conn).register("  alice ").unwrap();
    assert_eq!(owner.username, "alice");

    let loaded = owners(&conn).get_owner(owner.id).unwrap().unwrap();
    assert_eq!(loaded, owner);

    let categories = CategoryService::new(SqliteCategoryRepository::try_new(&conn).unwrap())
        .list_categories(owner.id)
        .unwrap();
    assert_eq!(categories.len(), 1);
    assert!(categories[0].is_inbox);
    assert_eq!(categories[0].name, INBOX_NAME);
}

#[test]
fn usernames_are_unique_ignoring_case() {
    let conn = open_db_in_memory().unwrap();
    let service = owners(&conn);
    let alice = service.register("Alice").unwrap();

    let err = service.register("alice").unwrap_err();
    assert!(err
        .field_errors()
        .is_some_and(|errors| errors.has("username", FieldErrorCode::Duplicate)));

    let found = service.find_by_username(" ALICE ").unwrap().unwrap();
    assert_eq!(found.id, alice.id);
    assert!(service.find_by_username("bob").unwrap().is_none());
}

#[test]
fn non_ascii_usernames_are_unique_ignoring_case() {
    let conn = open_db_in_memory().unwrap();
    let service = owners(&conn);
    let zeljka = service.register("Željka").unwrap();

    let err = service.register("ŽELJKA").unwrap_err();
    assert!(err
        .field_errors()
        .is_some_and(|errors| errors.has("username", FieldErrorCode::Duplicate)));
    assert_eq!(service.find_by_username("željka").unwrap().unwrap().id, zeljka.id);
}

#[test]
fn failed_inbox_leaves_no_owner_behind() {
    let conn = open_db_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TRIGGER reject_inbox BEFORE INSERT ON categories
         BEGIN SELECT RAISE(ABORT, 'inbox rejected'); END;",
    )
    .unwrap();
    let service = owners(&conn);

    assert!(matches!(service.register("alice"), Err(ServiceError::Repo(_))));
    assert!(service.find_by_username("alice").unwrap().is_none());

    conn.execute_batch("DROP TRIGGER reject_inbox;").unwrap();
    let owner = service.register("alice").expect("retry after a failed registration");
    let categories = CategoryService::new(SqliteCategoryRepository::try_new(&conn).unwrap())
        .list_categories(owner.id)
        .unwrap();
    assert_eq!(categories.len(), 1);
    assert!(categories[0].is_inbox);
}

#[test]
fn blank_username_is_required() {
    let conn = open_db_in_memory().unwrap();
    match owners(&conn).register("   ") {
        Err(ServiceError::Validation(errors)) => {
            assert!(errors.has("username", FieldErrorCode::Required));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn field_errors_serialize_as_field_to_list() {
    let mut errors = FieldErrors::new();
    errors.add("name", FieldErrorCode::Duplicate, "You already have a habit with this name.");
    errors.add("reminder_repeat", FieldErrorCode::RequiresEnabled, "Enable reminders first.");

    let value = serde_json::to_value(&errors).unwrap();
    assert_eq!(
        value,
        json!({
            "name": [
                {"code": "DUPLICATE", "message": "You already have a habit with this name."}
            ],
            "reminder_repeat": [
                {"code": "REQUIRES_ENABLED", "message": "Enable reminders first."}
            ]
        })
    );

    let parsed: FieldErrors = serde_json::from_value(value).unwrap();
    assert_eq!(parsed, errors);
}
