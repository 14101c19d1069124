//! Habit check-in submission validator.
//!
//! # Invariants
//! - The returned timestamp is minute-truncated.
//! - A taken minute always fails with `DUPLICATE_MINUTE` on `performed_at`.

use crate::model::checkin::truncate_to_minute;
use crate::model::errors::{FieldErrorCode, FieldErrors};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

pub const MSG_DUPLICATE_MINUTE: &str =
    "A check-in for this habit at the same minute already exists. Choose a different time.";

/// Raw check-in submission. A missing timestamp means "now".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CheckinInput {
    pub performed_at: Option<NaiveDateTime>,
    pub done: bool,
}

impl Default for CheckinInput {
    fn default() -> Self {
        Self {
            performed_at: None,
            done: true,
        }
    }
}

impl CheckinInput {
    /// Resolves the effective minute of this submission.
    pub fn performed_minute(&self, now: NaiveDateTime) -> NaiveDateTime {
        truncate_to_minute(self.performed_at.unwrap_or(now))
    }
}

/// Normalized check-in values ready to be persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedCheckin {
    pub performed_at: NaiveDateTime,
    pub done: bool,
}

/// Validates one check-in submission.
///
/// `minute_taken` must report whether another check-in of the same habit
/// (excluding the one being edited) exists at `input.performed_minute(now)`.
pub fn validate_checkin(
    input: &CheckinInput,
    now: NaiveDateTime,
    minute_taken: bool,
) -> Result<ValidatedCheckin, FieldErrors> {
    if minute_taken {
        return Err(duplicate_minute());
    }
    Ok(ValidatedCheckin {
        performed_at: input.performed_minute(now),
        done: input.done,
    })
}

/// The error reported when a check-in minute is already used.
pub fn duplicate_minute() -> FieldErrors {
    FieldErrors::single(
        "performed_at",
        FieldErrorCode::DuplicateMinute,
        MSG_DUPLICATE_MINUTE,
    )
}
