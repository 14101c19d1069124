//! Calendar event repository contract and SQLite implementation.
//!
//! # Invariants
//! - Event lists are ordered `start_at ASC, id ASC`.
//! - Text search matches title, description or location case-insensitively,
//!   folded with `fold_case`.

use super::{
    contains_folded, datetime_to_db, ensure_connection_ready, parse_datetime, parse_optional_datetime,
    parse_optional_uuid, parse_uuid, RepoError, RepoResult,
};
use crate::model::event::{Event, EventId};
use crate::model::fold_case;
use crate::model::owner::OwnerId;
use rusqlite::{params, Connection, OptionalExtension, Row};

const EVENT_SELECT_SQL: &str = "SELECT
    id,
    owner_id,
    category_id,
    title,
    description,
    location,
    start_at,
    end_at
FROM events";

pub trait EventRepository {
    fn create_event(&self, event: &Event) -> RepoResult<()>;
    fn update_event(&self, event: &Event) -> RepoResult<()>;
    fn get_event(&self, owner_id: OwnerId, id: EventId) -> RepoResult<Option<Event>>;
    fn list_events(&self, owner_id: OwnerId, q: Option<&str>) -> RepoResult<Vec<Event>>;
    fn delete_event(&self, owner_id: OwnerId, id: EventId) -> RepoResult<()>;
}

/// SQLite-backed event repository.
pub struct SqliteEventRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteEventRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn create_event(&self, event: &Event) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO events (
                id,
                owner_id,
                category_id,
                title,
                description,
                location,
                start_at,
                end_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                event.id.to_string(),
                event.owner_id.to_string(),
                event.category_id.map(|id| id.to_string()),
                event.title.as_str(),
                event.description.as_str(),
                event.location.as_str(),
                datetime_to_db(event.start_at),
                event.end_at.map(datetime_to_db),
            ],
        )?;
        Ok(())
    }

    fn update_event(&self, event: &Event) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE events
             SET
                category_id = ?3,
                title = ?4,
                description = ?5,
                location = ?6,
                start_at = ?7,
                end_at = ?8
             WHERE id = ?1
               AND owner_id = ?2;",
            params![
                event.id.to_string(),
                event.owner_id.to_string(),
                event.category_id.map(|id| id.to_string()),
                event.title.as_str(),
                event.description.as_str(),
                event.location.as_str(),
                datetime_to_db(event.start_at),
                event.end_at.map(datetime_to_db),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("event", event.id));
        }
        Ok(())
    }

    fn get_event(&self, owner_id: OwnerId, id: EventId) -> RepoResult<Option<Event>> {
        self.conn
            .query_row(
                &format!("{EVENT_SELECT_SQL} WHERE id = ?1 AND owner_id = ?2;"),
                params![id.to_string(), owner_id.to_string()],
                |row| Ok(parse_event_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn list_events(&self, owner_id: OwnerId, q: Option<&str>) -> RepoResult<Vec<Event>> {
        let needle = q.map(str::trim).filter(|q| !q.is_empty()).map(fold_case);
        let mut stmt = self.conn.prepare(&format!(
            "{EVENT_SELECT_SQL} WHERE owner_id = ?1 ORDER BY start_at ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([owner_id.to_string()])?;
        let mut events = Vec::new();
        while let Some(row) = rows.next()? {
            let event = parse_event_row(row)?;
            let matched = needle.as_deref().map_or(true, |needle| {
                contains_folded(
                    needle,
                    &[
                        event.title.as_str(),
                        event.description.as_str(),
                        event.location.as_str(),
                    ],
                )
            });
            if matched {
                events.push(event);
            }
        }
        Ok(events)
    }

    fn delete_event(&self, owner_id: OwnerId, id: EventId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM events WHERE id = ?1 AND owner_id = ?2;",
            params![id.to_string(), owner_id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("event", id));
        }
        Ok(())
    }
}

fn parse_event_row(row: &Row<'_>) -> RepoResult<Event> {
    let id_text: String = row.get("id")?;
    let owner_text: String = row.get("owner_id")?;
    let start_text: String = row.get("start_at")?;
    Ok(Event {
        id: parse_uuid(&id_text, "events.id")?,
        owner_id: parse_uuid(&owner_text, "events.owner_id")?,
        category_id: parse_optional_uuid(row.get("category_id")?, "events.category_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        location: row.get("location")?,
        start_at: parse_datetime(&start_text, "events.start_at")?,
        end_at: parse_optional_datetime(row.get("end_at")?, "events.end_at")?,
    })
}
