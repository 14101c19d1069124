//! Domain model for owners, categories, tasks, events and habits.
//!
//! # Responsibility
//! - Define canonical records used by validation, repositories and services.
//! - Define the field-error taxonomy returned to presentation callers.
//!
//! # Invariants
//! - Every record is identified by a UUID v4 assigned by core.
//! - Every record except `Owner` is scoped to exactly one owner, directly or
//!   through its habit.

pub mod category;
pub mod checkin;
pub mod errors;
pub mod event;
pub mod habit;
pub mod owner;
pub mod task;

use chrono::{NaiveDateTime, Timelike};

/// Current local wall-clock time at whole-second precision, the reference
/// for all stored timestamps.
pub fn local_now() -> NaiveDateTime {
    let now = chrono::Local::now().naive_local();
    now.with_nanosecond(0).unwrap_or(now)
}

/// Unicode lowercase form used for case-insensitive names and searches.
///
/// SQLite's `NOCASE` and `lower()` only fold ASCII, so uniqueness keys are
/// computed here and stored alongside the display value.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::fold_case;

    #[test]
    fn fold_case_covers_non_ascii_letters() {
        assert_eq!(fold_case("Čitanje"), fold_case("čitanje"));
        assert_eq!(fold_case("ŽELJKO"), "željko");
        assert_ne!(fold_case("Read"), fold_case("Reed"));
    }
}
