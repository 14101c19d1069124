//! Habit use-case service.
//!
//! # Responsibility
//! - Run the habit validator with the owner-scoped name lookup.
//! - Persist validated habits as one insert or one update.
//!
//! # Invariants
//! - The pre-validation name lookup is advisory; a `UNIQUE` violation from
//!   storage is reported as the same `DUPLICATE` error on `name`.
//! - `owner_id` of an existing habit never changes on update.

use super::{ServiceError, ServiceResult};
use crate::model::errors::{FieldErrorCode, FieldErrors};
use crate::model::habit::{Habit, HabitId};
use crate::model::owner::OwnerId;
use crate::repo::habit_repo::HabitRepository;
use crate::repo::RepoError;
use crate::validation::habit::{validate_habit, HabitInput, MSG_NAME_DUPLICATE};
use crate::validation::normalize_name;
use log::{info, warn};
use uuid::Uuid;

/// Habit service facade over repository implementations.
pub struct HabitService<R: HabitRepository> {
    repo: R,
}

impl<R: HabitRepository> HabitService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and creates one habit for `owner_id`.
    pub fn create_habit(&self, owner_id: OwnerId, input: &HabitInput) -> ServiceResult<Habit> {
        let name_taken = self.name_taken(owner_id, &input.name, None)?;
        let habit = validate_habit(input, name_taken)?.into_habit(Uuid::new_v4(), owner_id);

        self.repo
            .create_habit(&habit)
            .map_err(|err| name_conflict_to_duplicate(err, "habit_create"))?;
        info!(
            "event=habit_create module=service status=ok habit_id={} reminder_enabled={}",
            habit.id, habit.reminder_enabled
        );
        Ok(habit)
    }

    /// Validates and replaces one existing habit.
    pub fn update_habit(
        &self,
        owner_id: OwnerId,
        id: HabitId,
        input: &HabitInput,
    ) -> ServiceResult<Habit> {
        self.require_habit(owner_id, id)?;
        let name_taken = self.name_taken(owner_id, &input.name, Some(id))?;
        let habit = validate_habit(input, name_taken)?.into_habit(id, owner_id);

        self.repo
            .update_habit(&habit)
            .map_err(|err| name_conflict_to_duplicate(err, "habit_update"))?;
        info!("event=habit_update module=service status=ok habit_id={id}");
        Ok(habit)
    }

    pub fn get_habit(&self, owner_id: OwnerId, id: HabitId) -> ServiceResult<Option<Habit>> {
        Ok(self.repo.get_habit(owner_id, id)?)
    }

    /// Lists the owner's habits sorted by name.
    pub fn list_habits(&self, owner_id: OwnerId) -> ServiceResult<Vec<Habit>> {
        Ok(self.repo.list_habits(owner_id)?)
    }

    /// Toggles the `active` flag without re-validating other fields.
    pub fn set_habit_active(
        &self,
        owner_id: OwnerId,
        id: HabitId,
        active: bool,
    ) -> ServiceResult<Habit> {
        self.repo.set_habit_active(owner_id, id, active)?;
        self.repo
            .get_habit(owner_id, id)?
            .ok_or(ServiceError::InconsistentState(
                "habit missing after active toggle",
            ))
    }

    /// Deletes one habit together with all of its check-ins.
    pub fn delete_habit(&self, owner_id: OwnerId, id: HabitId) -> ServiceResult<()> {
        self.repo.delete_habit(owner_id, id)?;
        info!("event=habit_delete module=service status=ok habit_id={id}");
        Ok(())
    }

    fn require_habit(&self, owner_id: OwnerId, id: HabitId) -> ServiceResult<Habit> {
        self.repo
            .get_habit(owner_id, id)?
            .ok_or(ServiceError::NotFound { entity: "habit", id })
    }

    fn name_taken(
        &self,
        owner_id: OwnerId,
        raw_name: &str,
        exclude: Option<HabitId>,
    ) -> ServiceResult<bool> {
        match normalize_name(raw_name) {
            Some(name) => Ok(self.repo.habit_name_exists(owner_id, &name, exclude)?),
            None => Ok(false),
        }
    }
}

fn name_conflict_to_duplicate(err: RepoError, event: &str) -> ServiceError {
    if err.is_unique_violation() {
        warn!("event={event} module=service status=error error_code=name_conflict_race");
        return ServiceError::Validation(FieldErrors::single(
            "name",
            FieldErrorCode::Duplicate,
            MSG_NAME_DUPLICATE,
        ));
    }
    ServiceError::from(err)
}
