//! Habit submission validator.
//!
//! # Responsibility
//! - Normalize the habit name and the preference strings.
//! - Enforce reminder cross-field dependencies.
//!
//! # Invariants
//! - Rules run in a fixed order and every independent field is checked, so
//!   one submission reports all of its failures together.
//! - `preferred_times` output is deduplicated, sorted and comma-joined.
//! - Weekday/month output keeps calendar order regardless of input order.

use super::{required_text, within_limit};
use crate::model::errors::{FieldErrorCode, FieldErrors};
use crate::model::habit::{
    Habit, HabitFrequency, HabitId, ReminderRepeat, HABIT_NAME_MAX_CHARS, MONTH_TOKENS,
    WEEKDAY_TOKENS,
};
use crate::model::owner::OwnerId;
use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

static TIME_TOKEN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([0-9]+):([0-9]+)$").expect("valid time token regex"));

const PREFERRED_TIMES_MAX_CHARS: usize = 200;

pub const MSG_NAME_REQUIRED: &str = "Name is required.";
pub const MSG_NAME_DUPLICATE: &str = "You already have a habit with this name.";
pub const MSG_TIMES_BAD_FORMAT: &str =
    "Preferred times must be comma-separated in HH:MM format (e.g. 08:00,20:00).";
pub const MSG_START_REQUIRED: &str = "Reminder start is required when reminders are enabled.";
pub const MSG_REPEAT_REQUIRES_ENABLED: &str = "Enable reminders before choosing a repeat option.";
pub const MSG_UNTIL_BEFORE_START: &str =
    "Reminder 'until' date cannot be before reminder start date.";

/// Raw habit submission as received from a presentation caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HabitInput {
    pub name: String,
    pub active: bool,
    pub frequency: HabitFrequency,
    pub target_count: i64,
    /// Free text such as `"08:00, 20:00"`.
    pub preferred_times: String,
    /// Multi-select weekday tokens (`mon`..`sun`).
    pub preferred_weekdays: Vec<String>,
    /// Multi-select month tokens (`1`..`12`).
    pub preferred_months: Vec<String>,
    pub reminder_enabled: bool,
    pub reminder_start: Option<NaiveDateTime>,
    pub reminder_repeat: ReminderRepeat,
    pub reminder_until: Option<NaiveDate>,
}

impl Default for HabitInput {
    fn default() -> Self {
        Self {
            name: String::new(),
            active: true,
            frequency: HabitFrequency::default(),
            target_count: 1,
            preferred_times: String::new(),
            preferred_weekdays: Vec::new(),
            preferred_months: Vec::new(),
            reminder_enabled: false,
            reminder_start: None,
            reminder_repeat: ReminderRepeat::default(),
            reminder_until: None,
        }
    }
}

impl HabitInput {
    /// Builds an edit form pre-filled from a stored habit.
    pub fn from_habit(habit: &Habit) -> Self {
        Self {
            name: habit.name.clone(),
            active: habit.active,
            frequency: habit.frequency,
            target_count: i64::from(habit.target_count),
            preferred_times: habit.preferred_times.clone(),
            preferred_weekdays: Habit::preference_tokens(&habit.preferred_weekdays)
                .into_iter()
                .map(str::to_string)
                .collect(),
            preferred_months: Habit::preference_tokens(&habit.preferred_months)
                .into_iter()
                .map(str::to_string)
                .collect(),
            reminder_enabled: habit.reminder_enabled,
            reminder_start: habit.reminder_start,
            reminder_repeat: habit.reminder_repeat,
            reminder_until: habit.reminder_until,
        }
    }
}

/// Normalized habit values ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedHabit {
    pub name: String,
    pub active: bool,
    pub frequency: HabitFrequency,
    pub target_count: u32,
    pub preferred_times: String,
    pub preferred_weekdays: String,
    pub preferred_months: String,
    pub reminder_enabled: bool,
    pub reminder_start: Option<NaiveDateTime>,
    pub reminder_repeat: ReminderRepeat,
    pub reminder_until: Option<NaiveDate>,
}

impl ValidatedHabit {
    /// Materializes the full record for `id` owned by `owner_id`.
    pub fn into_habit(self, id: HabitId, owner_id: OwnerId) -> Habit {
        Habit {
            id,
            owner_id,
            name: self.name,
            active: self.active,
            frequency: self.frequency,
            target_count: self.target_count,
            preferred_times: self.preferred_times,
            preferred_weekdays: self.preferred_weekdays,
            preferred_months: self.preferred_months,
            reminder_enabled: self.reminder_enabled,
            reminder_start: self.reminder_start,
            reminder_repeat: self.reminder_repeat,
            reminder_until: self.reminder_until,
        }
    }
}

/// Validates one habit submission.
///
/// `name_taken` must report whether another habit of the same owner
/// (excluding the one being edited) already uses the trimmed name,
/// compared case-insensitively.
pub fn validate_habit(input: &HabitInput, name_taken: bool) -> Result<ValidatedHabit, FieldErrors> {
    let mut errors = FieldErrors::new();

    let name = required_text(
        &mut errors,
        "name",
        &input.name,
        HABIT_NAME_MAX_CHARS,
        MSG_NAME_REQUIRED,
    );
    if name.is_some() && name_taken {
        errors.add("name", FieldErrorCode::Duplicate, MSG_NAME_DUPLICATE);
    }

    let preferred_times = match normalize_preferred_times(&input.preferred_times) {
        Some(value) => {
            within_limit(
                &mut errors,
                "preferred_times",
                &value,
                PREFERRED_TIMES_MAX_CHARS,
            );
            value
        }
        None => {
            errors.add(
                "preferred_times",
                FieldErrorCode::BadFormat,
                MSG_TIMES_BAD_FORMAT,
            );
            String::new()
        }
    };

    let preferred_weekdays = join_choices(
        &mut errors,
        "preferred_weekdays",
        &input.preferred_weekdays,
        &WEEKDAY_TOKENS,
    );
    let preferred_months = join_choices(
        &mut errors,
        "preferred_months",
        &input.preferred_months,
        &MONTH_TOKENS,
    );

    let target_count = match u32::try_from(input.target_count) {
        Ok(value) if value >= 1 => value,
        _ => {
            errors.add(
                "target_count",
                FieldErrorCode::InvalidValue,
                "Target count must be a positive number.",
            );
            1
        }
    };

    check_reminder(input, &mut errors);

    let validated = ValidatedHabit {
        name: name.unwrap_or_default(),
        active: input.active,
        frequency: input.frequency,
        target_count,
        preferred_times,
        preferred_weekdays,
        preferred_months,
        reminder_enabled: input.reminder_enabled,
        reminder_start: input.reminder_start,
        reminder_repeat: input.reminder_repeat,
        reminder_until: input.reminder_until,
    };
    errors.into_result(validated)
}

/// Normalizes a comma-separated `HH:MM` list.
///
/// Returns `None` when any non-blank token is malformed or out of range.
/// Tokens keep their submitted spelling; only blanks and duplicates are
/// dropped before sorting.
pub fn normalize_preferred_times(raw: &str) -> Option<String> {
    let mut unique = BTreeSet::new();
    for token in raw.split(',').map(str::trim).filter(|token| !token.is_empty()) {
        if !is_valid_time_token(token) {
            return None;
        }
        unique.insert(token);
    }
    Some(unique.into_iter().collect::<Vec<_>>().join(","))
}

fn is_valid_time_token(token: &str) -> bool {
    let Some(caps) = TIME_TOKEN_RE.captures(token) else {
        return false;
    };
    let hours = caps.get(1).and_then(|m| m.as_str().parse::<u32>().ok());
    let minutes = caps.get(2).and_then(|m| m.as_str().parse::<u32>().ok());
    matches!((hours, minutes), (Some(hh), Some(mm)) if hh <= 23 && mm <= 59)
}

/// Joins multi-select tokens in `allowed` order, dropping duplicates.
fn join_choices(
    errors: &mut FieldErrors,
    field: &str,
    submitted: &[String],
    allowed: &[&str],
) -> String {
    let mut selected = BTreeSet::new();
    for token in submitted {
        let token = token.trim();
        match allowed.iter().position(|candidate| *candidate == token) {
            Some(index) => {
                selected.insert(index);
            }
            None => errors.add(
                field,
                FieldErrorCode::InvalidChoice,
                format!("Select a valid choice. {token} is not one of the available choices."),
            ),
        }
    }
    selected
        .into_iter()
        .filter_map(|index| allowed.get(index).copied())
        .collect::<Vec<_>>()
        .join(",")
}

fn check_reminder(input: &HabitInput, errors: &mut FieldErrors) {
    if input.reminder_enabled && input.reminder_start.is_none() {
        errors.add(
            "reminder_start",
            FieldErrorCode::RequiredWhenEnabled,
            MSG_START_REQUIRED,
        );
    }

    if !input.reminder_enabled && !input.reminder_repeat.is_none() {
        errors.add(
            "reminder_repeat",
            FieldErrorCode::RequiresEnabled,
            MSG_REPEAT_REQUIRES_ENABLED,
        );
    }

    if let (Some(start), Some(until)) = (input.reminder_start, input.reminder_until) {
        if until < start.date() {
            errors.add(
                "reminder_until",
                FieldErrorCode::BeforeStart,
                MSG_UNTIL_BEFORE_START,
            );
        }
    }
}
