//! Category repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist per-owner categories, including the single inbox.
//! - Own the atomic "reassign or delete contents, then drop category" write.
//!
//! # Invariants
//! - `ensure_inbox` is a single insert-or-ignore against the partial unique
//!   index `categories_one_inbox_per_owner`, so concurrent callers converge on
//!   one row.
//! - The inbox row is never renamed or deleted through this repository.

use super::{
    bool_to_int, ensure_connection_ready, parse_bool, parse_uuid, RepoError, RepoResult,
};
use crate::model::category::{Category, CategoryId, INBOX_NAME};
use crate::model::owner::OwnerId;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const CATEGORY_SELECT_SQL: &str = "SELECT id, owner_id, name, is_inbox FROM categories";

/// What to do with a category's tasks and events before it is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryContentsAction {
    /// Point every task/event at another category of the same owner.
    ReassignTo(CategoryId),
    /// Delete every task/event in the category.
    Delete,
}

/// Row counts touched by one category deletion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategoryDeleteSummary {
    pub tasks: usize,
    pub events: usize,
}

/// Repository interface for category operations.
pub trait CategoryRepository {
    /// Returns the owner's inbox, creating it when missing.
    fn ensure_inbox(&self, owner_id: OwnerId) -> RepoResult<Category>;
    fn create_category(&self, category: &Category) -> RepoResult<()>;
    /// Renames one non-inbox category.
    fn rename_category(&self, owner_id: OwnerId, id: CategoryId, name: &str) -> RepoResult<()>;
    fn get_category(&self, owner_id: OwnerId, id: CategoryId) -> RepoResult<Option<Category>>;
    /// Lists the owner's categories sorted by name.
    fn list_categories(&self, owner_id: OwnerId) -> RepoResult<Vec<Category>>;
    /// Exact-match name lookup, optionally ignoring one category.
    fn category_name_exists(
        &self,
        owner_id: OwnerId,
        name: &str,
        exclude: Option<CategoryId>,
    ) -> RepoResult<bool>;
    /// Applies `action` to the category's contents and removes it, atomically.
    fn delete_category(
        &self,
        owner_id: OwnerId,
        id: CategoryId,
        action: CategoryContentsAction,
    ) -> RepoResult<CategoryDeleteSummary>;
}

/// SQLite-backed category repository.
pub struct SqliteCategoryRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCategoryRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl CategoryRepository for SqliteCategoryRepository<'_> {
    fn ensure_inbox(&self, owner_id: OwnerId) -> RepoResult<Category> {
        let candidate = Category::inbox(owner_id);
        self.conn.execute(
            "INSERT OR IGNORE INTO categories (id, owner_id, name, is_inbox)
             VALUES (?1, ?2, ?3, 1);",
            params![
                candidate.id.to_string(),
                owner_id.to_string(),
                INBOX_NAME
            ],
        )?;

        self.conn
            .query_row(
                &format!("{CATEGORY_SELECT_SQL} WHERE owner_id = ?1 AND is_inbox = 1;"),
                [owner_id.to_string()],
                |row| Ok(parse_category_row(row)),
            )
            .optional()?
            .transpose()?
            .ok_or_else(|| {
                RepoError::InvalidData(format!(
                    "inbox for owner {owner_id} could not be created; name `{INBOX_NAME}` is taken"
                ))
            })
    }

    fn create_category(&self, category: &Category) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO categories (id, owner_id, name, is_inbox) VALUES (?1, ?2, ?3, ?4);",
            params![
                category.id.to_string(),
                category.owner_id.to_string(),
                category.name.as_str(),
                bool_to_int(category.is_inbox),
            ],
        )?;
        Ok(())
    }

    fn rename_category(&self, owner_id: OwnerId, id: CategoryId, name: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "UPDATE categories
             SET name = ?3
             WHERE id = ?1
               AND owner_id = ?2
               AND is_inbox = 0;",
            params![id.to_string(), owner_id.to_string(), name],
        )?;
        if changed == 0 {
            return Err(RepoError::not_found("category", id));
        }
        Ok(())
    }

    fn get_category(&self, owner_id: OwnerId, id: CategoryId) -> RepoResult<Option<Category>> {
        self.conn
            .query_row(
                &format!("{CATEGORY_SELECT_SQL} WHERE id = ?1 AND owner_id = ?2;"),
                params![id.to_string(), owner_id.to_string()],
                |row| Ok(parse_category_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn list_categories(&self, owner_id: OwnerId) -> RepoResult<Vec<Category>> {
        let mut stmt = self.conn.prepare(&format!(
            "{CATEGORY_SELECT_SQL} WHERE owner_id = ?1 ORDER BY name ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([owner_id.to_string()])?;
        let mut categories = Vec::new();
        while let Some(row) = rows.next()? {
            categories.push(parse_category_row(row)?);
        }
        Ok(categories)
    }

    fn category_name_exists(
        &self,
        owner_id: OwnerId,
        name: &str,
        exclude: Option<CategoryId>,
    ) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM categories
                WHERE owner_id = ?1
                  AND name = ?2
                  AND (?3 IS NULL OR id <> ?3)
            );",
            params![
                owner_id.to_string(),
                name,
                exclude.map(|id| id.to_string())
            ],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn delete_category(
        &self,
        owner_id: OwnerId,
        id: CategoryId,
        action: CategoryContentsAction,
    ) -> RepoResult<CategoryDeleteSummary> {
        let owner_text = owner_id.to_string();
        let id_text = id.to_string();
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;

        if !deletable_category_exists(&tx, &owner_text, &id_text)? {
            return Err(RepoError::not_found("category", id));
        }

        let summary = match action {
            CategoryContentsAction::ReassignTo(target) => {
                if target == id || !category_exists_in_tx(&tx, &owner_text, &target.to_string())? {
                    return Err(RepoError::not_found("category", target));
                }
                let target_text = target.to_string();
                let tasks = tx.execute(
                    "UPDATE tasks SET category_id = ?3 WHERE owner_id = ?1 AND category_id = ?2;",
                    params![owner_text, id_text, target_text],
                )?;
                let events = tx.execute(
                    "UPDATE events SET category_id = ?3 WHERE owner_id = ?1 AND category_id = ?2;",
                    params![owner_text, id_text, target_text],
                )?;
                CategoryDeleteSummary { tasks, events }
            }
            CategoryContentsAction::Delete => {
                let tasks = tx.execute(
                    "DELETE FROM tasks WHERE owner_id = ?1 AND category_id = ?2;",
                    params![owner_text, id_text],
                )?;
                let events = tx.execute(
                    "DELETE FROM events WHERE owner_id = ?1 AND category_id = ?2;",
                    params![owner_text, id_text],
                )?;
                CategoryDeleteSummary { tasks, events }
            }
        };

        tx.execute(
            "DELETE FROM categories WHERE id = ?1 AND owner_id = ?2 AND is_inbox = 0;",
            params![id_text, owner_text],
        )?;
        tx.commit()?;
        Ok(summary)
    }
}

fn deletable_category_exists(tx: &Transaction<'_>, owner_id: &str, id: &str) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(
            SELECT 1 FROM categories WHERE id = ?1 AND owner_id = ?2 AND is_inbox = 0
        );",
        params![id, owner_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn category_exists_in_tx(tx: &Transaction<'_>, owner_id: &str, id: &str) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM categories WHERE id = ?1 AND owner_id = ?2);",
        params![id, owner_id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn parse_category_row(row: &Row<'_>) -> RepoResult<Category> {
    let id_text: String = row.get("id")?;
    let owner_text: String = row.get("owner_id")?;
    Ok(Category {
        id: parse_uuid(&id_text, "categories.id")?,
        owner_id: parse_uuid(&owner_text, "categories.owner_id")?,
        name: row.get("name")?,
        is_inbox: parse_bool(row.get("is_inbox")?, "categories.is_inbox")?,
    })
}
