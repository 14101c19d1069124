//! Repository layer abstractions and SQLite implementations.
//!
//! # Responsibility
//! - Define use-case oriented data access contracts per entity.
//! - Isolate SQL details from validation and service orchestration.
//!
//! # Invariants
//! - Every owner-scoped query filters on `owner_id`; a record of another
//!   owner is indistinguishable from a missing one.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.
//! - Timestamps are stored as `%Y-%m-%dT%H:%M:%S` text so lexical and
//!   chronological order agree.

pub mod category_repo;
pub mod checkin_repo;
pub mod event_repo;
pub mod habit_repo;
pub mod owner_repo;
pub mod task_repo;

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::fold_case;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const DATE_FORMAT: &str = "%Y-%m-%d";

pub type RepoResult<T> = Result<T, RepoError>;

/// Generic repository error for persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Target record does not exist within the caller's owner scope.
    NotFound { entity: &'static str, id: Uuid },
    /// Persisted data cannot be converted into a valid record.
    InvalidData(String),
    /// Connection schema is not at the version this binary expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl RepoError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }

    /// Returns whether a `UNIQUE` constraint rejected the write.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::Db(err) => err.is_unique_violation(),
            Self::NotFound { .. } | Self::InvalidData(_) | Self::UninitializedConnection { .. } => {
                false
            }
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "repository requires schema version {expected_version}, got {actual_version}"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound { .. } | Self::InvalidData(_) | Self::UninitializedConnection { .. } => {
                None
            }
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Rejects connections that were not opened through `db::open_db*`.
fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let actual_version = current_user_version(conn)?;
    let expected_version = latest_version();
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}

fn datetime_to_db(value: NaiveDateTime) -> String {
    value.format(DATETIME_FORMAT).to_string()
}

fn date_to_db(value: NaiveDate) -> String {
    value.format(DATE_FORMAT).to_string()
}

fn parse_datetime(value: &str, column: &str) -> RepoResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, DATETIME_FORMAT)
        .map_err(|_| RepoError::InvalidData(format!("invalid datetime `{value}` in {column}")))
}

fn parse_optional_datetime(value: Option<String>, column: &str) -> RepoResult<Option<NaiveDateTime>> {
    value
        .map(|text| parse_datetime(&text, column))
        .transpose()
}

fn parse_optional_date(value: Option<String>, column: &str) -> RepoResult<Option<NaiveDate>> {
    value
        .map(|text| {
            NaiveDate::parse_from_str(&text, DATE_FORMAT)
                .map_err(|_| RepoError::InvalidData(format!("invalid date `{text}` in {column}")))
        })
        .transpose()
}

fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

fn parse_optional_uuid(value: Option<String>, column: &str) -> RepoResult<Option<Uuid>> {
    value.map(|text| parse_uuid(&text, column)).transpose()
}

fn parse_bool(value: i64, column: &str) -> RepoResult<bool> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(RepoError::InvalidData(format!(
            "invalid boolean value `{other}` in {column}"
        ))),
    }
}

/// Case-insensitive substring test over several text columns.
///
/// `folded_needle` must already be `fold_case`d.
fn contains_folded(folded_needle: &str, haystacks: &[&str]) -> bool {
    haystacks
        .iter()
        .any(|haystack| fold_case(haystack).contains(folded_needle))
}

fn bool_to_int(value: bool) -> i64 {
    if value {
        1
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::{datetime_to_db, parse_bool, parse_datetime};
    use chrono::NaiveDate;

    #[test]
    fn datetime_text_is_sortable_and_parses_back() {
        let value = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap();
        let text = datetime_to_db(value);
        assert_eq!(text, "2024-03-10T09:05:00");
        assert_eq!(parse_datetime(&text, "t.c").unwrap(), value);
    }

    #[test]
    fn parse_bool_rejects_out_of_range_values() {
        assert!(parse_bool(2, "t.c").is_err());
        assert!(parse_bool(1, "t.c").unwrap());
    }
}
