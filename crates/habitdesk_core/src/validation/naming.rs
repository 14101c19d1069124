//! Validators for single-name records: categories and owners.

use super::required_text;
use crate::model::category::CATEGORY_NAME_MAX_CHARS;
use crate::model::errors::{FieldErrorCode, FieldErrors};
use crate::model::owner::USERNAME_MAX_CHARS;

/// Validates a category name. `name_taken` is the per-owner uniqueness fact.
pub fn validate_category_name(raw: &str, name_taken: bool) -> Result<String, FieldErrors> {
    let mut errors = FieldErrors::new();
    let name = required_text(
        &mut errors,
        "name",
        raw,
        CATEGORY_NAME_MAX_CHARS,
        "Name is required.",
    );
    if name.is_some() && name_taken {
        errors.add(
            "name",
            FieldErrorCode::Duplicate,
            "You already have a category with this name.",
        );
    }
    errors.into_result(name.unwrap_or_default())
}

/// Validates a username. `username_taken` is the global uniqueness fact.
pub fn validate_username(raw: &str, username_taken: bool) -> Result<String, FieldErrors> {
    let mut errors = FieldErrors::new();
    let username = required_text(
        &mut errors,
        "username",
        raw,
        USERNAME_MAX_CHARS,
        "Username is required.",
    );
    if username.is_some() && username_taken {
        errors.add(
            "username",
            FieldErrorCode::Duplicate,
            "A user with that username already exists.",
        );
    }
    errors.into_result(username.unwrap_or_default())
}
