//! Habit check-in repository contract and SQLite implementation.
//!
//! # Invariants
//! - Every owner-scoped read or delete joins through `habits.owner_id`.
//! - The `(habit_id, performed_at)` unique constraint arbitrates concurrent
//!   writes at the same minute.
//! - Check-in lists are ordered `performed_at DESC`.

use super::{
    bool_to_int, datetime_to_db, ensure_connection_ready, parse_bool, parse_datetime, parse_uuid,
    RepoError, RepoResult,
};
use crate::model::checkin::{truncate_to_minute, CheckinId, HabitCheckin};
use crate::model::habit::HabitId;
use crate::model::owner::OwnerId;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension, Row};

const CHECKIN_SELECT_SQL: &str = "SELECT
    c.id,
    c.habit_id,
    c.performed_at,
    c.done
FROM habit_checkins c
INNER JOIN habits h ON h.id = c.habit_id";

pub trait CheckinRepository {
    /// Inserts one check-in; `performed_at` is truncated to the minute.
    fn create_checkin(&self, checkin: &HabitCheckin) -> RepoResult<()>;
    /// Rewrites timestamp and done flag; `performed_at` is truncated.
    fn update_checkin(&self, checkin: &HabitCheckin) -> RepoResult<()>;
    fn get_checkin(&self, owner_id: OwnerId, id: CheckinId) -> RepoResult<Option<HabitCheckin>>;
    fn list_checkins(&self, owner_id: OwnerId, habit_id: HabitId)
        -> RepoResult<Vec<HabitCheckin>>;
    fn delete_checkin(&self, owner_id: OwnerId, id: CheckinId) -> RepoResult<()>;
    /// Returns whether the habit already has a check-in at `performed_at`,
    /// optionally ignoring the check-in being edited.
    fn checkin_exists_at(
        &self,
        habit_id: HabitId,
        performed_at: NaiveDateTime,
        exclude: Option<CheckinId>,
    ) -> RepoResult<bool>;
}

/// SQLite-backed check-in repository.
pub struct SqliteCheckinRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCheckinRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CheckinRepository for SqliteCheckinRepository<'_> {
    fn create_checkin(&self, checkin: &HabitCheckin) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO habit_checkins (id, habit_id, performed_at, done)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                checkin.id.to_string(),
                checkin.habit_id.to_string(),
                datetime_to_db(truncate_to_minute(checkin.performed_at)),
                bool_to_int(checkin.done),
            ],
        )?;
        Ok(())
    }

    fn update_checkin(&self, checkin: &HabitCheckin) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE habit_checkins
             SET performed_at = ?3, done = ?4
             WHERE id = ?1
               AND habit_id = ?2;",
            params![
                checkin.id.to_string(),
                checkin.habit_id.to_string(),
                datetime_to_db(truncate_to_minute(checkin.performed_at)),
                bool_to_int(checkin.done),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("check-in", checkin.id));
        }
        Ok(())
    }

    fn get_checkin(&self, owner_id: OwnerId, id: CheckinId) -> RepoResult<Option<HabitCheckin>> {
        self.conn
            .query_row(
                &format!("{CHECKIN_SELECT_SQL} WHERE c.id = ?1 AND h.owner_id = ?2;"),
                params![id.to_string(), owner_id.to_string()],
                |row| Ok(parse_checkin_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn list_checkins(
        &self,
        owner_id: OwnerId,
        habit_id: HabitId,
    ) -> RepoResult<Vec<HabitCheckin>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CHECKIN_SELECT_SQL}
             WHERE c.habit_id = ?1
               AND h.owner_id = ?2
             ORDER BY c.performed_at DESC, c.id ASC;"
        ))?;
        let mut rows = stmt.query(params![habit_id.to_string(), owner_id.to_string()])?;
        let mut checkins = Vec::new();
        while let Some(row) = rows.next()? {
            checkins.push(parse_checkin_row(row)?);
        }
        Ok(checkins)
    }

    fn delete_checkin(&self, owner_id: OwnerId, id: CheckinId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM habit_checkins
             WHERE id = ?1
               AND habit_id IN (SELECT id FROM habits WHERE owner_id = ?2);",
            params![id.to_string(), owner_id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("check-in", id));
        }
        Ok(())
    }

    fn checkin_exists_at(
        &self,
        habit_id: HabitId,
        performed_at: NaiveDateTime,
        exclude: Option<CheckinId>,
    ) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM habit_checkins
                WHERE habit_id = ?1
                  AND performed_at = ?2
                  AND (?3 IS NULL OR id <> ?3)
            );",
            params![
                habit_id.to_string(),
                datetime_to_db(truncate_to_minute(performed_at)),
                exclude.map(|id| id.to_string()),
            ],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn parse_checkin_row(row: &Row<'_>) -> RepoResult<HabitCheckin> {
    let id_text: String = row.get("id")?;
    let habit_text: String = row.get("habit_id")?;
    let performed_text: String = row.get("performed_at")?;
    Ok(HabitCheckin {
        id: parse_uuid(&id_text, "habit_checkins.id")?,
        habit_id: parse_uuid(&habit_text, "habit_checkins.habit_id")?,
        performed_at: parse_datetime(&performed_text, "habit_checkins.performed_at")?,
        done: parse_bool(row.get("done")?, "habit_checkins.done")?,
    })
}
