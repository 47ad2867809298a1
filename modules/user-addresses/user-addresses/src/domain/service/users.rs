use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::{debug, info, instrument};
use user_addresses_sdk::{UserForm, UserFormPatch, UserView};

use super::now;
use crate::domain::error::DomainError;
use crate::domain::repos::{AddressesRepository, UsersRepository};
use crate::domain::validation::{validate_user_form, validate_user_id, validate_user_patch};

/// User CRUD. Address counts are read through the addresses repository.
pub struct UsersService<UR, AR> {
    db: DatabaseConnection,
    repo: Arc<UR>,
    addresses: Arc<AR>,
}

impl<UR, AR> UsersService<UR, AR>
where
    UR: UsersRepository,
    AR: AddressesRepository,
{
    pub fn new(db: DatabaseConnection, repo: Arc<UR>, addresses: Arc<AR>) -> Self {
        Self {
            db,
            repo,
            addresses,
        }
    }

    async fn ensure_email_unique(
        &self,
        email: &str,
        excluding: Option<i32>,
    ) -> Result<(), DomainError> {
        let count = self.repo.count_by_email(&self.db, email, excluding).await?;
        if count > 0 {
            return Err(DomainError::email_already_exists(email));
        }
        Ok(())
    }

    /// All users, newest first, with their address counts.
    ///
    /// # Errors
    /// `DomainError::Persistence` on storage failure.
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<UserView>, DomainError> {
        debug!("Listing users");

        let mut users = self.repo.list(&self.db).await?;
        users.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        let counts = self.addresses.count_by_user(&self.db).await?;

        let views: Vec<UserView> = users
            .into_iter()
            .map(|u| {
                let count = counts.get(&u.id).copied().unwrap_or_default();
                UserView::new(u, count)
            })
            .collect();

        debug!("Successfully listed {} users", views.len());
        Ok(views)
    }

    /// # Errors
    /// Validation, Conflict when the email is taken, or Persistence.
    #[instrument(skip(self, form), fields(email = %form.email))]
    pub async fn create_user(&self, form: UserForm) -> Result<UserView, DomainError> {
        info!("Creating new user");

        let new_user = validate_user_form(&form)?;
        self.ensure_email_unique(&new_user.email, None).await?;

        let user = self.repo.create(&self.db, new_user, now()).await?;

        info!(user.id = user.id, "Successfully created user");
        Ok(UserView::new(user, 0))
    }

    /// Apply the fields present in `patch`.
    ///
    /// # Errors
    /// Validation, `NotFound`, Conflict when the new email is taken, or Persistence.
    #[instrument(skip(self, patch), fields(user.id = id))]
    pub async fn update_user(
        &self,
        id: i32,
        patch: UserFormPatch,
    ) -> Result<UserView, DomainError> {
        info!("Updating user");

        let id = validate_user_id(id)?;
        let patch = validate_user_patch(&patch)?;

        let mut user = self
            .repo
            .get(&self.db, id)
            .await?
            .ok_or_else(|| DomainError::user_not_found(id))?;

        if let Some(email) = patch.email {
            if email != user.email {
                self.ensure_email_unique(&email, Some(id)).await?;
            }
            user.email = email;
        }
        if let Some(first_name) = patch.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = patch.last_name {
            user.last_name = last_name;
        }
        if let Some(initials) = patch.initials {
            user.initials = initials;
        }
        if let Some(status) = patch.status {
            user.status = status;
        }
        user.updated_at = now();

        let user = self.repo.update(&self.db, user).await?;
        let count = self.addresses.count_for_user(&self.db, id).await?;

        info!("Successfully updated user");
        Ok(UserView::new(user, count))
    }

    /// Delete a user. Storage cascades the delete to its addresses.
    ///
    /// # Errors
    /// Validation for a non-positive id, `NotFound`, or Persistence.
    #[instrument(skip(self), fields(user.id = id))]
    pub async fn delete_user(&self, id: i32) -> Result<(), DomainError> {
        info!("Deleting user");

        let id = validate_user_id(id)?;
        if !self.repo.delete(&self.db, id).await? {
            return Err(DomainError::user_not_found(id));
        }

        info!("Successfully deleted user");
        Ok(())
    }
}
