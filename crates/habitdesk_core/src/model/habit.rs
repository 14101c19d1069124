//! Habit domain model.
//!
//! # Responsibility
//! - Define the recurring-habit record and its reminder preferences.
//! - Provide the closed token sets used by weekday/month preferences.
//!
//! # Invariants
//! - `owner_id` is set once at creation and never changes.
//! - `reminder_enabled` implies `reminder_start.is_some()`.
//! - `reminder_repeat != ReminderRepeat::None` implies `reminder_enabled`.
//! - Preference strings are stored comma-joined without spaces.
//!
//! Frequency and preference fields are stored for display only; nothing in
//! core computes due dates or next occurrences from them.

use super::owner::OwnerId;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type HabitId = Uuid;

/// Column limit for habit names, in characters.
pub const HABIT_NAME_MAX_CHARS: usize = 200;

/// Weekday tokens accepted in `preferred_weekdays`, in calendar order.
pub const WEEKDAY_TOKENS: [&str; 7] = ["mon", "tue", "wed", "thu", "fri", "sat", "sun"];

/// Month tokens accepted in `preferred_months`, in calendar order.
pub const MONTH_TOKENS: [&str; 12] = [
    "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12",
];

/// How often a habit is meant to be performed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HabitFrequency {
    Hourly,
    #[default]
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl HabitFrequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            "yearly" => Some(Self::Yearly),
            _ => None,
        }
    }
}

/// Reminder repeat cadence. `None` means a single reminder.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderRepeat {
    #[default]
    None,
    Hourly,
    Daily,
    Weekly,
    Monthly,
}

impl ReminderRepeat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "none" => Some(Self::None),
            "hourly" => Some(Self::Hourly),
            "daily" => Some(Self::Daily),
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }

    pub fn is_none(self) -> bool {
        self == Self::None
    }
}

/// Persisted habit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: HabitId,
    pub owner_id: OwnerId,
    pub name: String,
    pub active: bool,
    pub frequency: HabitFrequency,
    pub target_count: u32,
    /// Sorted, deduplicated `HH:MM` tokens joined by commas.
    pub preferred_times: String,
    /// Weekday tokens joined by commas.
    pub preferred_weekdays: String,
    /// Month tokens (`1`..`12`) joined by commas.
    pub preferred_months: String,
    pub reminder_enabled: bool,
    pub reminder_start: Option<NaiveDateTime>,
    pub reminder_repeat: ReminderRepeat,
    /// Inclusive last day for reminders. `None` means no end.
    pub reminder_until: Option<NaiveDate>,
}

impl Habit {
    /// Creates an active habit with default preferences and a fresh id.
    pub fn new(owner_id: OwnerId, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id,
            name: name.into(),
            active: true,
            frequency: HabitFrequency::default(),
            target_count: 1,
            preferred_times: String::new(),
            preferred_weekdays: String::new(),
            preferred_months: String::new(),
            reminder_enabled: false,
            reminder_start: None,
            reminder_repeat: ReminderRepeat::default(),
            reminder_until: None,
        }
    }

    /// Splits a stored comma-joined preference value into its tokens.
    pub fn preference_tokens(value: &str) -> Vec<&str> {
        value
            .split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .collect()
    }
}
