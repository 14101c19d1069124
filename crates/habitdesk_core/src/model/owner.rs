//! Owner (authenticated user) identity record.
//!
//! Credentials and sessions live outside core; this record only anchors
//! ownership scoping and the per-owner inbox.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type OwnerId = Uuid;

/// Column limit for usernames, in characters.
pub const USERNAME_MAX_CHARS: usize = 150;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: OwnerId,
    /// Unique case-insensitively.
    pub username: String,
    pub created_at: NaiveDateTime,
}

impl Owner {
    pub fn new(username: impl Into<String>, created_at: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            created_at,
        }
    }
}
