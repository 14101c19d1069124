//! Owner registration service.
//!
//! Registration is the single place owners are created. The owner row and
//! the owner's inbox are committed together or not at all.

use super::{ServiceError, ServiceResult};
use crate::model::errors::{FieldErrorCode, FieldErrors};
use crate::model::category::Category;
use crate::model::local_now;
use crate::model::owner::{Owner, OwnerId};
use crate::repo::owner_repo::OwnerRepository;
use crate::validation::naming::validate_username;
use crate::validation::normalize_name;
use log::info;

pub struct OwnerService<O: OwnerRepository> {
    owners: O,
}

impl<O: OwnerRepository> OwnerService<O> {
    pub fn new(owners: O) -> Self {
        Self { owners }
    }

    /// Creates an owner and their inbox category.
    pub fn register(&self, raw_username: &str) -> ServiceResult<Owner> {
        let username_taken = match normalize_name(raw_username) {
            Some(username) => self.owners.find_by_username(&username)?.is_some(),
            None => false,
        };
        let username = validate_username(raw_username, username_taken)?;

        let owner = Owner::new(username, local_now());
        let inbox = Category::inbox(owner.id);
        self.owners
            .create_owner_with_inbox(&owner, &inbox)
            .map_err(|err| {
                if err.is_unique_violation() {
                    ServiceError::Validation(FieldErrors::single(
                        "username",
                        FieldErrorCode::Duplicate,
                        "A user with that username already exists.",
                    ))
                } else {
                    ServiceError::from(err)
                }
            })?;
        info!(
            "event=owner_register module=service status=ok owner_id={} inbox_id={}",
            owner.id, inbox.id
        );
        Ok(owner)
    }

    pub fn get_owner(&self, id: OwnerId) -> ServiceResult<Option<Owner>> {
        Ok(self.owners.get_owner(id)?)
    }

    /// Case-insensitive username lookup.
    pub fn find_by_username(&self, username: &str) -> ServiceResult<Option<Owner>> {
        Ok(self.owners.find_by_username(username.trim())?)
    }
}
