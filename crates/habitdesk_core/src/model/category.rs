//! Category domain model.
//!
//! # Invariants
//! - Names are unique per owner.
//! - Every owner has exactly one inbox once `ensure_inbox` ran; the inbox is
//!   never renamed or deleted.

use super::owner::OwnerId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type CategoryId = Uuid;

/// Name given to every owner's catch-all category.
pub const INBOX_NAME: &str = "Inbox";

/// Column limit for category names, in characters.
pub const CATEGORY_NAME_MAX_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub owner_id: OwnerId,
    pub name: String,
    pub is_inbox: bool,
}

impl Category {
    /// Creates a regular (non-inbox) category with a fresh id.
    pub fn new(owner_id: OwnerId, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: name.into(),
            is_inbox: false,
        }
    }

    /// Creates the inbox category for `owner_id`.
    pub fn inbox(owner_id: OwnerId) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: INBOX_NAME.to_string(),
            is_inbox: true,
        }
    }
}

/// What happens to a category's tasks and events when it is deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "action", content = "target")]
pub enum CategoryDeleteDisposition {
    /// Reassign everything to another category of the same owner.
    MoveTo(CategoryId),
    /// Reassign everything to the owner's inbox.
    #[default]
    MoveToInbox,
    /// Delete the tasks and events outright.
    DeleteAll,
}
