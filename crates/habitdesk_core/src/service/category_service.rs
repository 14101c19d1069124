//! Category use-case service.
//!
//! # Responsibility
//! - Guarantee every owner has exactly one inbox (`ensure_inbox`).
//! - Create, rename and list categories with per-owner name uniqueness.
//! - Delete categories with an explicit disposition for their contents.
//!
//! # Invariants
//! - `ensure_inbox` is idempotent and safe to call redundantly.
//! - The inbox is never renamed or deleted; a delete request for it is a
//!   no-op reported as `CategoryDeleteOutcome::InboxKept`.

use super::{ServiceError, ServiceResult};
use crate::model::category::{Category, CategoryDeleteDisposition, CategoryId};
use crate::model::errors::{FieldErrorCode, FieldErrors};
use crate::model::owner::OwnerId;
use crate::repo::category_repo::{
    CategoryContentsAction, CategoryDeleteSummary, CategoryRepository,
};
use crate::repo::RepoError;
use crate::validation::naming::validate_category_name;
use crate::validation::normalize_name;
use log::{info, warn};

/// Result of a category delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryDeleteOutcome {
    /// Category removed; counts are the tasks/events moved or deleted.
    Deleted(CategoryDeleteSummary),
    /// Target was the inbox; nothing changed.
    InboxKept,
}

pub struct CategoryService<C: CategoryRepository> {
    repo: C,
}

impl<C: CategoryRepository> CategoryService<C> {
    pub fn new(repo: C) -> Self {
        Self { repo }
    }

    /// Returns the owner's inbox, creating it atomically when missing.
    pub fn ensure_inbox(&self, owner_id: OwnerId) -> ServiceResult<Category> {
        Ok(self.repo.ensure_inbox(owner_id)?)
    }

    pub fn create_category(&self, owner_id: OwnerId, raw_name: &str) -> ServiceResult<Category> {
        self.repo.ensure_inbox(owner_id)?;
        let name_taken = self.name_taken(owner_id, raw_name, None)?;
        let name = validate_category_name(raw_name, name_taken)?;

        let category = Category::new(owner_id, name);
        self.repo
            .create_category(&category)
            .map_err(|err| name_conflict_to_duplicate(err, "category_create"))?;
        info!(
            "event=category_create module=service status=ok category_id={}",
            category.id
        );
        Ok(category)
    }

    /// Renames one regular category. The inbox keeps its name.
    pub fn rename_category(
        &self,
        owner_id: OwnerId,
        id: CategoryId,
        raw_name: &str,
    ) -> ServiceResult<Category> {
        let existing = self
            .repo
            .get_category(owner_id, id)?
            .ok_or(ServiceError::NotFound {
                entity: "category",
                id,
            })?;
        if existing.is_inbox {
            return Err(ServiceError::InboxImmutable(id));
        }

        let name_taken = self.name_taken(owner_id, raw_name, Some(id))?;
        let name = validate_category_name(raw_name, name_taken)?;
        self.repo
            .rename_category(owner_id, id, &name)
            .map_err(|err| name_conflict_to_duplicate(err, "category_rename"))?;
        Ok(Category { name, ..existing })
    }

    pub fn get_category(&self, owner_id: OwnerId, id: CategoryId) -> ServiceResult<Option<Category>> {
        Ok(self.repo.get_category(owner_id, id)?)
    }

    /// Lists the owner's categories by name; the inbox is always present.
    pub fn list_categories(&self, owner_id: OwnerId) -> ServiceResult<Vec<Category>> {
        self.repo.ensure_inbox(owner_id)?;
        Ok(self.repo.list_categories(owner_id)?)
    }

    /// Deletes one category after moving or deleting its tasks and events.
    pub fn delete_category(
        &self,
        owner_id: OwnerId,
        id: CategoryId,
        disposition: CategoryDeleteDisposition,
    ) -> ServiceResult<CategoryDeleteOutcome> {
        let inbox = self.repo.ensure_inbox(owner_id)?;
        let category = self
            .repo
            .get_category(owner_id, id)?
            .ok_or(ServiceError::NotFound {
                entity: "category",
                id,
            })?;
        if category.is_inbox {
            info!("event=category_delete module=service status=skipped reason=inbox category_id={id}");
            return Ok(CategoryDeleteOutcome::InboxKept);
        }

        let action = match disposition {
            CategoryDeleteDisposition::MoveTo(target) => {
                let target_known =
                    target != id && self.repo.get_category(owner_id, target)?.is_some();
                if !target_known {
                    return Err(ServiceError::Validation(FieldErrors::single(
                        "target_category",
                        FieldErrorCode::InvalidChoice,
                        "Select a valid target category.",
                    )));
                }
                CategoryContentsAction::ReassignTo(target)
            }
            CategoryDeleteDisposition::MoveToInbox => CategoryContentsAction::ReassignTo(inbox.id),
            CategoryDeleteDisposition::DeleteAll => CategoryContentsAction::Delete,
        };

        let summary = self.repo.delete_category(owner_id, id, action)?;
        info!(
            "event=category_delete module=service status=ok category_id={id} tasks={} events={}",
            summary.tasks, summary.events
        );
        Ok(CategoryDeleteOutcome::Deleted(summary))
    }

    fn name_taken(
        &self,
        owner_id: OwnerId,
        raw_name: &str,
        exclude: Option<CategoryId>,
    ) -> ServiceResult<bool> {
        match normalize_name(raw_name) {
            Some(name) => Ok(self.repo.category_name_exists(owner_id, &name, exclude)?),
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
            "You already have a category with this name.",
        ));
    }
    ServiceError::from(err)
}
