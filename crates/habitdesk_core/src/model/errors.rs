//! Field-scoped validation errors surfaced to presentation callers.
//!
//! # Responsibility
//! - Define the closed taxonomy of recoverable validation failures.
//! - Collect errors per submitted field without stopping at the first one.
//!
//! # Invariants
//! - Every entry carries a stable machine code and a human-readable message.
//! - Field order in serialized output is deterministic (sorted by field name).

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Machine-readable validation failure code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldErrorCode {
    /// Mandatory field is missing or blank.
    Required,
    /// Name collides with another record in the same owner scope.
    Duplicate,
    /// Structured text field cannot be parsed.
    BadFormat,
    /// Reminder start is missing while reminders are enabled.
    RequiredWhenEnabled,
    /// Reminder repeat is set while reminders are disabled.
    RequiresEnabled,
    /// Reminder end date precedes the reminder start date.
    BeforeStart,
    /// Another check-in of the same habit exists at the same minute.
    DuplicateMinute,
    /// Text exceeds its column limit.
    TooLong,
    /// Value is outside the closed set of accepted choices.
    InvalidChoice,
    /// Numeric value is outside its accepted range.
    InvalidValue,
    /// Event end is not strictly after its start.
    EndNotAfterStart,
}

impl FieldErrorCode {
    /// Returns the stable wire representation of this code.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Required => "REQUIRED",
            Self::Duplicate => "DUPLICATE",
            Self::BadFormat => "BAD_FORMAT",
            Self::RequiredWhenEnabled => "REQUIRED_WHEN_ENABLED",
            Self::RequiresEnabled => "REQUIRES_ENABLED",
            Self::BeforeStart => "BEFORE_START",
            Self::DuplicateMinute => "DUPLICATE_MINUTE",
            Self::TooLong => "TOO_LONG",
            Self::InvalidChoice => "INVALID_CHOICE",
            Self::InvalidValue => "INVALID_VALUE",
            Self::EndNotAfterStart => "END_NOT_AFTER_START",
        }
    }
}

/// One validation failure attached to a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub code: FieldErrorCode,
    pub message: String,
}

/// Mapping of field name to the failures recorded for it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors {
    fields: BTreeMap<String, Vec<FieldError>>,
}

impl FieldErrors {
    /// Creates an empty error collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a collection holding exactly one failure.
    pub fn single(field: &str, code: FieldErrorCode, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, code, message);
        errors
    }

    /// Appends one failure to `field`.
    pub fn add(&mut self, field: &str, code: FieldErrorCode, message: impl Into<String>) {
        self.fields
            .entry(field.to_string())
            .or_default()
            .push(FieldError {
                code,
                message: message.into(),
            });
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns failures recorded for `field` (empty slice when none).
    pub fn get(&self, field: &str) -> &[FieldError] {
        self.fields.get(field).map_or(&[], Vec::as_slice)
    }

    /// Returns whether `field` carries a failure with `code`.
    pub fn has(&self, field: &str, code: FieldErrorCode) -> bool {
        self.get(field).iter().any(|error| error.code == code)
    }

    /// Iterates fields with at least one failure, sorted by name.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Returns `Ok(value)` when no failure was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl Display for FieldErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, errors) in &self.fields {
            for error in errors {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {} ({})", error.message, error.code.as_str())?;
                first = false;
            }
        }
        Ok(())
    }
}

impl Error for FieldErrors {}

#[cfg(test)]
mod tests {
    use super::{FieldErrorCode, FieldErrors};

    #[test]
    fn errors_accumulate_per_field() {
        let mut errors = FieldErrors::new();
        errors.add("name", FieldErrorCode::Required, "Name is required.");
        errors.add("name", FieldErrorCode::TooLong, "too long");
        errors.add("reminder_until", FieldErrorCode::BeforeStart, "before");

        assert_eq!(errors.get("name").len(), 2);
        assert!(errors.has("reminder_until", FieldErrorCode::BeforeStart));
        assert!(!errors.has("reminder_until", FieldErrorCode::Required));
        assert!(errors.get("missing").is_empty());
        assert_eq!(
            errors.fields().collect::<Vec<_>>(),
            vec!["name", "reminder_until"]
        );
    }

    #[test]
    fn into_result_passes_value_only_when_empty() {
        assert_eq!(FieldErrors::new().into_result(7), Ok(7));
        let errors = FieldErrors::single("name", FieldErrorCode::Duplicate, "dup");
        assert!(errors.into_result(7).is_err());
    }
}
