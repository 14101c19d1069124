//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate "look up uniqueness facts → validate → persist" per entity.
//! - Keep presentation callers decoupled from storage details.
//! - Re-express storage constraint violations as field errors.
//!
//! # Invariants
//! - Every call takes the acting `OwnerId` explicitly; nothing reads an
//!   ambient current user.
//! - A record owned by someone else is reported as `NotFound`.

pub mod category_service;
pub mod checkin_service;
pub mod event_service;
pub mod habit_service;
pub mod owner_service;
pub mod task_service;

use crate::model::category::CategoryId;
use crate::model::errors::FieldErrors;
use crate::model::owner::OwnerId;
use crate::repo::category_repo::CategoryRepository;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error returned by every use-case service.
#[derive(Debug)]
pub enum ServiceError {
    /// Submission failed validation; nothing was written.
    Validation(FieldErrors),
    /// Target record does not exist within the caller's owner scope.
    NotFound { entity: &'static str, id: Uuid },
    /// The inbox category cannot be renamed.
    InboxImmutable(CategoryId),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl ServiceError {
    /// Returns the field errors when this is a validation failure.
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            Self::NotFound { .. }
            | Self::InboxImmutable(_)
            | Self::InconsistentState(_)
            | Self::Repo(_) => None,
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(errors) => write!(f, "validation failed: {errors}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::InboxImmutable(id) => write!(f, "inbox category cannot be changed: {id}"),
            Self::InconsistentState(details) => write!(f, "inconsistent state: {details}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(errors) => Some(errors),
            Self::Repo(err) => Some(err),
            Self::NotFound { .. } | Self::InboxImmutable(_) | Self::InconsistentState(_) => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { entity, id } => Self::NotFound { entity, id },
            other => Self::Repo(other),
        }
    }
}

impl From<FieldErrors> for ServiceError {
    fn from(value: FieldErrors) -> Self {
        Self::Validation(value)
    }
}

/// Resolves the category a task or event should be filed under.
///
/// Returns the category id to store and whether the requested category is
/// known to the owner. A missing request falls back to the owner's inbox.
fn resolve_category<C: CategoryRepository>(
    categories: &C,
    owner_id: OwnerId,
    requested: Option<CategoryId>,
) -> ServiceResult<(Option<CategoryId>, bool)> {
    match requested {
        Some(id) => {
            let known = categories.get_category(owner_id, id)?.is_some();
            Ok((known.then_some(id), known))
        }
        None => {
            let inbox = categories.ensure_inbox(owner_id)?;
            Ok((Some(inbox.id), true))
        }
    }
}
