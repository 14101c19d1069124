//! Calendar event domain model.
//!
//! # Invariants
//! - `end_at`, when set, is strictly after `start_at`.

use super::category::CategoryId;
use super::owner::OwnerId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type EventId = Uuid;

/// Column limit for event locations, in characters.
pub const LOCATION_MAX_CHARS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub owner_id: OwnerId,
    pub category_id: Option<CategoryId>,
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_at: NaiveDateTime,
    pub end_at: Option<NaiveDateTime>,
}
