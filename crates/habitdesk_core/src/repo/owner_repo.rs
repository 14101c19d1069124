//! Owner repository contract and SQLite implementation.
//!
//! # Invariants
//! - An owner row and its inbox category are written in one `IMMEDIATE`
//!   transaction; neither exists without the other.
//! - `username_key` is `fold_case(username)` and carries the unique index.

use super::{
    bool_to_int, datetime_to_db, ensure_connection_ready, parse_datetime, parse_uuid, RepoResult,
};
use crate::model::category::Category;
use crate::model::fold_case;
use crate::model::owner::{Owner, OwnerId};
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

const OWNER_SELECT_SQL: &str = "SELECT id, username, created_at FROM owners";

pub trait OwnerRepository {
    /// Inserts the owner together with their inbox category, atomically.
    fn create_owner_with_inbox(&self, owner: &Owner, inbox: &Category) -> RepoResult<()>;
    fn get_owner(&self, id: OwnerId) -> RepoResult<Option<Owner>>;
    /// Case-insensitive username lookup.
    fn find_by_username(&self, username: &str) -> RepoResult<Option<Owner>>;
}

/// SQLite-backed owner repository.
pub struct SqliteOwnerRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteOwnerRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl OwnerRepository for SqliteOwnerRepository<'_> {
    fn create_owner_with_inbox(&self, owner: &Owner, inbox: &Category) -> RepoResult<()> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO owners (id, username, username_key, created_at)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                owner.id.to_string(),
                owner.username.as_str(),
                fold_case(&owner.username),
                datetime_to_db(owner.created_at),
            ],
        )?;
        tx.execute(
            "INSERT INTO categories (id, owner_id, name, is_inbox) VALUES (?1, ?2, ?3, ?4);",
            params![
                inbox.id.to_string(),
                owner.id.to_string(),
                inbox.name.as_str(),
                bool_to_int(inbox.is_inbox),
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn get_owner(&self, id: OwnerId) -> RepoResult<Option<Owner>> {
        self.conn
            .query_row(
                &format!("{OWNER_SELECT_SQL} WHERE id = ?1;"),
                [id.to_string()],
                |row| Ok(parse_owner_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn find_by_username(&self, username: &str) -> RepoResult<Option<Owner>> {
        self.conn
            .query_row(
                &format!("{OWNER_SELECT_SQL} WHERE username_key = ?1;"),
                [fold_case(username)],
                |row| Ok(parse_owner_row(row)),
            )
            .optional()?
            .transpose()
    }
}

fn parse_owner_row(row: &Row<'_>) -> RepoResult<Owner> {
    let id_text: String = row.get("id")?;
    let created_text: String = row.get("created_at")?;
    Ok(Owner {
        id: parse_uuid(&id_text, "owners.id")?,
        username: row.get("username")?,
        created_at: parse_datetime(&created_text, "owners.created_at")?,
    })
}
