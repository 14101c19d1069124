//! Habit check-in use-case service.
//!
//! # Responsibility
//! - Resolve the target habit inside the caller's owner scope.
//! - Run the minute-collision check and persist minute-truncated check-ins.
//!
//! # Invariants
//! - A habit of another owner is reported as not found.
//! - A `UNIQUE` violation on `(habit_id, performed_at)` is reported as
//!   `DUPLICATE_MINUTE`, same as the pre-check.

use super::{ServiceError, ServiceResult};
use crate::model::checkin::{CheckinId, HabitCheckin};
use crate::model::habit::HabitId;
use crate::model::local_now;
use crate::model::owner::OwnerId;
use crate::repo::checkin_repo::CheckinRepository;
use crate::repo::habit_repo::HabitRepository;
use crate::repo::RepoError;
use crate::validation::checkin::{duplicate_minute, validate_checkin, CheckinInput};
use log::{info, warn};

pub struct HabitCheckinService<H: HabitRepository, C: CheckinRepository> {
    habits: H,
    checkins: C,
}

impl<H: HabitRepository, C: CheckinRepository> HabitCheckinService<H, C> {
    pub fn new(habits: H, checkins: C) -> Self {
        Self { habits, checkins }
    }

    /// Records one check-in for the owner's habit.
    pub fn create_checkin(
        &self,
        owner_id: OwnerId,
        habit_id: HabitId,
        input: &CheckinInput,
    ) -> ServiceResult<HabitCheckin> {
        self.require_habit(owner_id, habit_id)?;

        let now = local_now();
        let minute = input.performed_minute(now);
        let minute_taken = self.checkins.checkin_exists_at(habit_id, minute, None)?;
        let validated = validate_checkin(input, now, minute_taken)?;

        let checkin = HabitCheckin::new(habit_id, validated.performed_at, validated.done);
        self.checkins
            .create_checkin(&checkin)
            .map_err(|err| minute_conflict_to_duplicate(err, "checkin_create"))?;
        info!(
            "event=checkin_create module=service status=ok habit_id={habit_id} checkin_id={}",
            checkin.id
        );
        Ok(checkin)
    }

    /// Moves or re-flags an existing check-in.
    pub fn update_checkin(
        &self,
        owner_id: OwnerId,
        id: CheckinId,
        input: &CheckinInput,
    ) -> ServiceResult<HabitCheckin> {
        let existing = self
            .checkins
            .get_checkin(owner_id, id)?
            .ok_or(ServiceError::NotFound {
                entity: "check-in",
                id,
            })?;

        let now = local_now();
        let minute = input.performed_minute(now);
        let minute_taken = self
            .checkins
            .checkin_exists_at(existing.habit_id, minute, Some(id))?;
        let validated = validate_checkin(input, now, minute_taken)?;

        let checkin = HabitCheckin {
            id,
            habit_id: existing.habit_id,
            performed_at: validated.performed_at,
            done: validated.done,
        };
        self.checkins
            .update_checkin(&checkin)
            .map_err(|err| minute_conflict_to_duplicate(err, "checkin_update"))?;
        info!("event=checkin_update module=service status=ok checkin_id={id}");
        Ok(checkin)
    }

    /// Lists a habit's check-ins, newest first.
    pub fn list_checkins(
        &self,
        owner_id: OwnerId,
        habit_id: HabitId,
    ) -> ServiceResult<Vec<HabitCheckin>> {
        self.require_habit(owner_id, habit_id)?;
        Ok(self.checkins.list_checkins(owner_id, habit_id)?)
    }

    pub fn delete_checkin(&self, owner_id: OwnerId, id: CheckinId) -> ServiceResult<()> {
        self.checkins.delete_checkin(owner_id, id)?;
        info!("event=checkin_delete module=service status=ok checkin_id={id}");
        Ok(())
    }

    fn require_habit(&self, owner_id: OwnerId, habit_id: HabitId) -> ServiceResult<()> {
        match self.habits.get_habit(owner_id, habit_id)? {
            Some(_) => Ok(()),
            None => Err(ServiceError::NotFound {
                entity: "habit",
                id: habit_id,
            }),
        }
    }
}

fn minute_conflict_to_duplicate(err: RepoError, event: &str) -> ServiceError {
    if err.is_unique_violation() {
        warn!("event={event} module=service status=error error_code=minute_conflict_race");
        return ServiceError::Validation(duplicate_minute());
    }
    ServiceError::from(err)
}

