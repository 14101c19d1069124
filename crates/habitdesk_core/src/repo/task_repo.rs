//! Task repository contract and SQLite implementation.
//!
//! # Invariants
//! - Task lists are ordered `created_at DESC, id ASC`.
//! - Text search is a case-insensitive substring match on title or
//!   description, folded with `fold_case` after the SQL filters run.

use super::{
    contains_folded, date_to_db, datetime_to_db, ensure_connection_ready, parse_datetime, parse_optional_date,
    parse_optional_uuid, parse_uuid, RepoError, RepoResult,
};
use crate::model::fold_case;
use crate::model::owner::OwnerId;
use crate::model::task::{Task, TaskId, TaskPriority, TaskStatus};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

const TASK_SELECT_SQL: &str = "SELECT
    id,
    owner_id,
    category_id,
    title,
    description,
    priority,
    status,
    due_date,
    estimated_minutes,
    created_at
FROM tasks";

/// Filter options for task lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListQuery {
    /// Substring matched against title and description.
    pub q: Option<String>,
    pub status: Option<TaskStatus>,
}

pub trait TaskRepository {
    fn create_task(&self, task: &Task) -> RepoResult<()>;
    /// Replaces every mutable column of an existing task.
    fn update_task(&self, task: &Task) -> RepoResult<()>;
    fn get_task(&self, owner_id: OwnerId, id: TaskId) -> RepoResult<Option<Task>>;
    fn list_tasks(&self, owner_id: OwnerId, query: &TaskListQuery) -> RepoResult<Vec<Task>>;
    fn delete_task(&self, owner_id: OwnerId, id: TaskId) -> RepoResult<()>;
}

/// SQLite-backed task repository.
pub struct SqliteTaskRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteTaskRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl TaskRepository for SqliteTaskRepository<'_> {
    fn create_task(&self, task: &Task) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO tasks (
                id,
                owner_id,
                category_id,
                title,
                description,
                priority,
                status,
                due_date,
                estimated_minutes,
                created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10);",
            params![
                task.id.to_string(),
                task.owner_id.to_string(),
                task.category_id.map(|id| id.to_string()),
                task.title.as_str(),
                task.description.as_str(),
                task.priority.rank(),
                task.status.as_str(),
                task.due_date.map(date_to_db),
                task.estimated_minutes,
                datetime_to_db(task.created_at),
            ],
        )?;
        Ok(())
    }

    fn update_task(&self, task: &Task) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE tasks
             SET
                category_id = ?3,
                title = ?4,
                description = ?5,
                priority = ?6,
                status = ?7,
                due_date = ?8,
                estimated_minutes = ?9
             WHERE id = ?1
               AND owner_id = ?2;",
            params![
                task.id.to_string(),
                task.owner_id.to_string(),
                task.category_id.map(|id| id.to_string()),
                task.title.as_str(),
                task.description.as_str(),
                task.priority.rank(),
                task.status.as_str(),
                task.due_date.map(date_to_db),
                task.estimated_minutes,
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("task", task.id));
        }
        Ok(())
    }

    fn get_task(&self, owner_id: OwnerId, id: TaskId) -> RepoResult<Option<Task>> {
        self.conn
            .query_row(
                &format!("{TASK_SELECT_SQL} WHERE id = ?1 AND owner_id = ?2;"),
                params![id.to_string(), owner_id.to_string()],
                |row| Ok(parse_task_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn list_tasks(&self, owner_id: OwnerId, query: &TaskListQuery) -> RepoResult<Vec<Task>> {
        let mut sql = format!("{TASK_SELECT_SQL} WHERE owner_id = ?");
        let mut bind_values: Vec<Value> = vec![Value::Text(owner_id.to_string())];

        if let Some(status) = query.status {
            sql.push_str(" AND status = ?");
            bind_values.push(Value::Text(status.as_str().to_string()));
        }

        sql.push_str(" ORDER BY created_at DESC, id ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let needle = query
            .q
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(fold_case);
        let mut tasks = Vec::new();
        while let Some(row) = rows.next()? {
            let task = parse_task_row(row)?;
            let matched = needle.as_deref().map_or(true, |needle| {
                contains_folded(needle, &[task.title.as_str(), task.description.as_str()])
            });
            if matched {
                tasks.push(task);
            }
        }
        Ok(tasks)
    }

    fn delete_task(&self, owner_id: OwnerId, id: TaskId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM tasks WHERE id = ?1 AND owner_id = ?2;",
            params![id.to_string(), owner_id.to_string()],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("task", id));
        }
        Ok(())
    }
}

fn parse_task_row(row: &Row<'_>) -> RepoResult<Task> {
    let id_text: String = row.get("id")?;
    let owner_text: String = row.get("owner_id")?;

    let priority_rank: i64 = row.get("priority")?;
    let priority = TaskPriority::from_rank(priority_rank).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid priority `{priority_rank}` in tasks.priority"))
    })?;

    let status_text: String = row.get("status")?;
    let status = TaskStatus::parse(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid status `{status_text}` in tasks.status"))
    })?;

    let created_text: String = row.get("created_at")?;

    Ok(Task {
        id: parse_uuid(&id_text, "tasks.id")?,
        owner_id: parse_uuid(&owner_text, "tasks.owner_id")?,
        category_id: parse_optional_uuid(row.get("category_id")?, "tasks.category_id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        priority,
        status,
        due_date: parse_optional_date(row.get("due_date")?, "tasks.due_date")?,
        estimated_minutes: row.get("estimated_minutes")?,
        created_at: parse_datetime(&created_text, "tasks.created_at")?,
    })
}
