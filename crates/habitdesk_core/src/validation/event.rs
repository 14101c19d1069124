//! Calendar event submission validator.

use super::{required_text, within_limit};
use crate::model::category::CategoryId;
use crate::model::errors::{FieldErrorCode, FieldErrors};
use crate::model::event::LOCATION_MAX_CHARS;
use crate::model::task::TITLE_MAX_CHARS;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Raw event submission. A missing category means "the owner's inbox".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventInput {
    pub category_id: Option<CategoryId>,
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_at: Option<NaiveDateTime>,
    pub end_at: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEvent {
    pub title: String,
    pub description: String,
    pub location: String,
    pub start_at: NaiveDateTime,
    pub end_at: Option<NaiveDateTime>,
}

/// Validates one event submission.
///
/// `category_known` must be `false` when `input.category_id` names a
/// category the owner does not have.
pub fn validate_event(
    input: &EventInput,
    category_known: bool,
) -> Result<ValidatedEvent, FieldErrors> {
    let mut errors = FieldErrors::new();
    let title = required_text(
        &mut errors,
        "title",
        &input.title,
        TITLE_MAX_CHARS,
        "Title is required.",
    );

    let location = input.location.trim().to_string();
    within_limit(&mut errors, "location", &location, LOCATION_MAX_CHARS);

    if !category_known {
        errors.add(
            "category",
            FieldErrorCode::InvalidChoice,
            "Select a valid choice. That choice is not one of the available choices.",
        );
    }

    if input.start_at.is_none() {
        errors.add(
            "start_at",
            FieldErrorCode::Required,
            "Start time is required.",
        );
    }

    if let (Some(start), Some(end)) = (input.start_at, input.end_at) {
        if end <= start {
            errors.add(
                "end_at",
                FieldErrorCode::EndNotAfterStart,
                "End time must be after start time.",
            );
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }
    let (Some(title), Some(start_at)) = (title, input.start_at) else {
        return Err(errors);
    };
    Ok(ValidatedEvent {
        title,
        description: input.description.trim().to_string(),
        location,
        start_at,
        end_at: input.end_at,
    })
}
