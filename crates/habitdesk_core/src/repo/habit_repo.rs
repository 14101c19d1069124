//! Habit repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist habit records with their reminder preferences.
//! - Answer the case-insensitive per-owner name lookup used by validation.
//!
//! # Invariants
//! - `habits_owner_name_key` over the Unicode-folded `name_key` column is
//!   the final arbiter of name uniqueness; callers translate its violation
//!   into a `DUPLICATE` field error.
//! - `name_key` is always written from `fold_case(name)` in the same
//!   statement as `name`.
//! - Deleting a habit cascades to its check-ins through the foreign key.

use super::{
    bool_to_int, date_to_db, datetime_to_db, ensure_connection_ready, parse_bool,
    parse_optional_date, parse_optional_datetime, parse_uuid, RepoError, RepoResult,
};
use crate::model::habit::{Habit, HabitFrequency, HabitId, ReminderRepeat};
use crate::model::fold_case;
use crate::model::owner::OwnerId;
use rusqlite::{params, Connection, OptionalExtension, Row};

const HABIT_SELECT_SQL: &str = "SELECT
    id,
    owner_id,
    name,
    active,
    frequency,
    target_count,
    preferred_times,
    preferred_weekdays,
    preferred_months,
    reminder_enabled,
    reminder_start,
    reminder_repeat,
    reminder_until
FROM habits";

pub trait HabitRepository {
    fn create_habit(&self, habit: &Habit) -> RepoResult<()>;
    /// Replaces every mutable column of an existing habit in one statement.
    fn update_habit(&self, habit: &Habit) -> RepoResult<()>;
    fn get_habit(&self, owner_id: OwnerId, id: HabitId) -> RepoResult<Option<Habit>>;
    /// Lists the owner's habits sorted by name.
    fn list_habits(&self, owner_id: OwnerId) -> RepoResult<Vec<Habit>>;
    fn set_habit_active(&self, owner_id: OwnerId, id: HabitId, active: bool) -> RepoResult<()>;
    fn delete_habit(&self, owner_id: OwnerId, id: HabitId) -> RepoResult<()>;
    /// Case-insensitive name lookup within one owner, optionally ignoring
    /// the habit being edited.
    fn habit_name_exists(
        &self,
        owner_id: OwnerId,
        name: &str,
        exclude: Option<HabitId>,
    ) -> RepoResult<bool>;
}

/// SQLite-backed habit repository.
pub struct SqliteHabitRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteHabitRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl HabitRepository for SqliteHabitRepository<'_> {
    fn create_habit(&self, habit: &Habit) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO habits (
                id,
                owner_id,
                name,
                active,
                frequency,
                target_count,
                preferred_times,
                preferred_weekdays,
                preferred_months,
                reminder_enabled,
                reminder_start,
                reminder_repeat,
                reminder_until,
                name_key
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14);",
            params![
                habit.id.to_string(),
                habit.owner_id.to_string(),
                habit.name.as_str(),
                bool_to_int(habit.active),
                habit.frequency.as_str(),
                habit.target_count,
                habit.preferred_times.as_str(),
                habit.preferred_weekdays.as_str(),
                habit.preferred_months.as_str(),
                bool_to_int(habit.reminder_enabled),
                habit.reminder_start.map(datetime_to_db),
                habit.reminder_repeat.as_str(),
                habit.reminder_until.map(date_to_db),
                fold_case(&habit.name),
            ],
        )?;
        Ok(())
    }

    fn update_habit(&self, habit: &Habit) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE habits
             SET
                name = ?3,
                active = ?4,
                frequency = ?5,
                target_count = ?6,
                preferred_times = ?7,
                preferred_weekdays = ?8,
                preferred_months = ?9,
                reminder_enabled = ?10,
                reminder_start = ?11,
                reminder_repeat = ?12,
                reminder_until = ?13,
                name_key = ?14
             WHERE id = ?1
               AND owner_id = ?2;",
            params![
                habit.id.to_string(),
                habit.owner_id.to_string(),
                habit.name.as_str(),
                bool_to_int(habit.active),
                habit.frequency.as_str(),
                habit.target_count,
                habit.preferred_times.as_str(),
                habit.preferred_weekdays.as_str(),
                habit.preferred_months.as_str(),
                bool_to_int(habit.reminder_enabled),
                habit.reminder_start.map(datetime_to_db),
                habit.reminder_repeat.as_str(),
                habit.reminder_until.map(date_to_db),
                fold_case(&habit.name),
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("habit", habit.id));
        }
        Ok(())
    }

    fn get_habit(&self, owner_id: OwnerId, id: HabitId) -> RepoResult<Option<Habit>> {
        self.conn
            .query_row(
                &format!("{HABIT_SELECT_SQL} WHERE id = ?1 AND owner_id = ?2;"),
                params![id.to_string(), owner_id.to_string()],
                |row| Ok(parse_habit_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn list_habits(&self, owner_id: OwnerId) -> RepoResult<Vec<Habit>> {
        let mut stmt = self.conn.prepare(&format!(
            "{HABIT_SELECT_SQL} WHERE owner_id = ?1 ORDER BY name_key ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([owner_id.to_string()])?;
        let mut habits = Vec::new();
        while let Some(row) = rows.next()? {
            habits.push(parse_habit_row(row)?);
        }
        Ok(habits)
    }

    fn set_habit_active(&self, owner_id: OwnerId, id: HabitId, active: bool) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE habits SET active = ?3 WHERE id = ?1 AND owner_id = ?2;",
            params![id.to_string(), owner_id.to_string(), bool_to_int(active)],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("habit", id));
        }
        Ok(())
    }

    fn delete_habit(&self, owner_id: OwnerId, id: HabitId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM habits WHERE id = ?1 AND owner_id = ?2;",
            params![id.to_string(), owner_id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("habit", id));
        }
        Ok(())
    }

    fn habit_name_exists(
        &self,
        owner_id: OwnerId,
        name: &str,
        exclude: Option<HabitId>,
    ) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM habits
                WHERE owner_id = ?1
                  AND name_key = ?2
                  AND (?3 IS NULL OR id <> ?3)
            );",
            params![
                owner_id.to_string(),
                fold_case(name),
                exclude.map(|id| id.to_string())
            ],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn parse_habit_row(row: &Row<'_>) -> RepoResult<Habit> {
    let id_text: String = row.get("id")?;
    let owner_text: String = row.get("owner_id")?;

    let frequency_text: String = row.get("frequency")?;
    let frequency = HabitFrequency::parse(&frequency_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid frequency `{frequency_text}` in habits.frequency"
        ))
    })?;

    let repeat_text: String = row.get("reminder_repeat")?;
    let reminder_repeat = ReminderRepeat::parse(&repeat_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid reminder repeat `{repeat_text}` in habits.reminder_repeat"
        ))
    })?;

    Ok(Habit {
        id: parse_uuid(&id_text, "habits.id")?,
        owner_id: parse_uuid(&owner_text, "habits.owner_id")?,
        name: row.get("name")?,
        active: parse_bool(row.get("active")?, "habits.active")?,
        frequency,
        target_count: row.get("target_count")?,
        preferred_times: row.get("preferred_times")?,
        preferred_weekdays: row.get("preferred_weekdays")?,
        preferred_months: row.get("preferred_months")?,
        reminder_enabled: parse_bool(row.get("reminder_enabled")?, "habits.reminder_enabled")?,
        reminder_start: parse_optional_datetime(
            row.get("reminder_start")?,
            "habits.reminder_start",
        )?,
        reminder_repeat,
        reminder_until: parse_optional_date(row.get("reminder_until")?, "habits.reminder_until")?,
    })
}
