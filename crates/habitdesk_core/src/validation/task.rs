//! Task submission validator.

use super::required_text;
use crate::model::category::CategoryId;
use crate::model::errors::{FieldErrorCode, FieldErrors};
use crate::model::task::{TaskPriority, TaskStatus, TITLE_MAX_CHARS};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Raw task submission. A missing category means "the owner's inbox".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskInput {
    pub category_id: Option<CategoryId>,
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub estimated_minutes: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTask {
    pub title: String,
    pub description: String,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub estimated_minutes: Option<u32>,
}

/// Validates one task submission.
///
/// `category_known` must be `false` when `input.category_id` names a
/// category the owner does not have.
pub fn validate_task(input: &TaskInput, category_known: bool) -> Result<ValidatedTask, FieldErrors> {
    let mut errors = FieldErrors::new();
    let title = required_text(
        &mut errors,
        "title",
        &input.title,
        TITLE_MAX_CHARS,
        "Title is required.",
    );

    if !category_known {
        errors.add(
            "category",
            FieldErrorCode::InvalidChoice,
            "Select a valid choice. That choice is not one of the available choices.",
        );
    }

    let estimated_minutes = match input.estimated_minutes {
        None => None,
        Some(value) => match u32::try_from(value) {
            Ok(minutes) => Some(minutes),
            Err(_) => {
                errors.add(
                    "estimated_minutes",
                    FieldErrorCode::InvalidValue,
                    "Ensure this value is greater than or equal to 0.",
                );
                None
            }
        },
    };

    let validated = ValidatedTask {
        title: title.unwrap_or_default(),
        description: input.description.trim().to_string(),
        priority: input.priority,
        status: input.status,
        due_date: input.due_date,
        estimated_minutes,
    };
    errors.into_result(validated)
}
