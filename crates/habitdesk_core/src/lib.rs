//! Core domain logic for HabitDesk.
//! This crate is the single source of truth for habit, check-in, category,
//! task and event invariants.

pub mod config;
pub mod db;
pub mod display;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod validation;

pub use config::CoreConfig;
pub use db::{open_db, open_db_in_memory, DbError, DbResult};
pub use logging::{default_log_level, init_from_config, init_logging, logging_status};
pub use model::category::{Category, CategoryDeleteDisposition, CategoryId, INBOX_NAME};
pub use model::checkin::{CheckinId, HabitCheckin};
pub use model::errors::{FieldError, FieldErrorCode, FieldErrors};
pub use model::event::{Event, EventId};
pub use model::habit::{Habit, HabitFrequency, HabitId, ReminderRepeat};
pub use model::owner::{Owner, OwnerId};
pub use model::task::{Task, TaskId, TaskPriority, TaskStatus};
pub use repo::category_repo::{CategoryDeleteSummary, SqliteCategoryRepository};
pub use repo::checkin_repo::SqliteCheckinRepository;
pub use repo::event_repo::SqliteEventRepository;
pub use repo::habit_repo::SqliteHabitRepository;
pub use repo::owner_repo::SqliteOwnerRepository;
pub use repo::task_repo::{SqliteTaskRepository, TaskListQuery};
pub use repo::{RepoError, RepoResult};
pub use service::category_service::{CategoryDeleteOutcome, CategoryService};
pub use service::checkin_service::HabitCheckinService;
pub use service::event_service::EventService;
pub use service::habit_service::HabitService;
pub use service::owner_service::OwnerService;
pub use service::task_service::TaskService;
pub use service::{ServiceError, ServiceResult};
pub use validation::checkin::CheckinInput;
pub use validation::event::EventInput;
pub use validation::habit::{validate_habit, HabitInput};
pub use validation::task::TaskInput;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
