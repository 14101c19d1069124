//! Habit check-in domain model.
//!
//! # Invariants
//! - `performed_at` is always minute-truncated before it is compared or
//!   persisted.
//! - At most one check-in exists per `(habit_id, performed_at)`.

use super::habit::HabitId;
use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type CheckinId = Uuid;

/// Completion (or skip) marker for one habit at one minute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitCheckin {
    pub id: CheckinId,
    pub habit_id: HabitId,
    pub performed_at: NaiveDateTime,
    /// `false` records an explicit skip.
    pub done: bool,
}

impl HabitCheckin {
    /// Creates a check-in with a fresh id and a minute-truncated timestamp.
    pub fn new(habit_id: HabitId, performed_at: NaiveDateTime, done: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            habit_id,
            performed_at: truncate_to_minute(performed_at),
            done,
        }
    }
}

/// Discards seconds and sub-second components.
pub fn truncate_to_minute(value: NaiveDateTime) -> NaiveDateTime {
    value
        .with_nanosecond(0)
        .and_then(|value| value.with_second(0))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::{truncate_to_minute, HabitCheckin};
    use chrono::NaiveDate;
    use uuid::Uuid;

    #[test]
    fn truncation_drops_seconds_and_nanos() {
        let raw = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_nano_opt(12, 0, 45, 999_000_000)
            .unwrap();
        let expected = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(truncate_to_minute(raw), expected);
    }

    #[test]
    fn new_checkin_is_truncated() {
        let raw = NaiveDate::from_ymd_opt(2024, 3, 10)
            .unwrap()
            .and_hms_opt(7, 30, 5)
            .unwrap();
        let checkin = HabitCheckin::new(Uuid::new_v4(), raw, true);
        assert_eq!(checkin.performed_at, truncate_to_minute(raw));
    }
}
