//! Pure, storage-free validators for submitted records.
//!
//! # Responsibility
//! - Normalize raw request DTOs into persist-ready values.
//! - Report every failing field at once as `FieldErrors`.
//!
//! # Invariants
//! - Validators never touch storage. Uniqueness facts (name taken, minute
//!   taken, category owned) are looked up by services and passed in.
//! - Validation is all-or-nothing: a value is returned only when no field
//!   failed.

pub mod checkin;
pub mod event;
pub mod habit;
pub mod naming;
pub mod task;

use crate::model::errors::{FieldErrorCode, FieldErrors};

/// Trims `raw` and returns it when non-empty.
///
/// Services call this before looking up name uniqueness so the lookup sees
/// the same value the validator will persist.
pub fn normalize_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Validates a required, length-limited text field.
///
/// Records `REQUIRED` or `TOO_LONG` on `field` and returns `None` on failure.
fn required_text(
    errors: &mut FieldErrors,
    field: &str,
    raw: &str,
    max_chars: usize,
    required_message: &str,
) -> Option<String> {
    let Some(value) = normalize_name(raw) else {
        errors.add(field, FieldErrorCode::Required, required_message);
        return None;
    };
    if !within_limit(errors, field, &value, max_chars) {
        return None;
    }
    Some(value)
}

/// Records `TOO_LONG` on `field` when `value` exceeds `max_chars`.
fn within_limit(errors: &mut FieldErrors, field: &str, value: &str, max_chars: usize) -> bool {
    if value.chars().count() > max_chars {
        errors.add(
            field,
            FieldErrorCode::TooLong,
            format!("Ensure this value has at most {max_chars} characters."),
        );
        return false;
    }
    true
}
