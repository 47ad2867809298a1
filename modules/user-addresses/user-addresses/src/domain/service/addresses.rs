use std::sync::Arc;

use sea_orm::{ConnectionTrait, DatabaseConnection};
use time::OffsetDateTime;
use tracing::{debug, info, instrument};
use user_addresses_sdk::{
    Address, AddressCreateRequest, AddressKey, AddressUpdate, AddressUpdateRequest, AddressView,
    NewAddress, enrich_address, normalize_valid_from,
};

use super::now;
use crate::domain::error::DomainError;
use crate::domain::key::KeyMatcher;
use crate::domain::repos::{AddressesRepository, UsersRepository};
use crate::domain::validation::{
    validate_address_create, validate_address_update, validate_user_id,
};
use crate::infra::storage::db::{begin, settle};

/// Address versions of a user.
pub struct AddressesService<AR, UR> {
    db: DatabaseConnection,
    repo: Arc<AR>,
    users: Arc<UR>,
    matcher: KeyMatcher,
}

impl<AR, UR> AddressesService<AR, UR>
where
    AR: AddressesRepository,
    UR: UsersRepository,
{
    pub fn new(
        db: DatabaseConnection,
        repo: Arc<AR>,
        users: Arc<UR>,
        matcher: KeyMatcher,
    ) -> Self {
        Self {
            db,
            repo,
            users,
            matcher,
        }
    }

    /// A user's addresses ordered by type, then newest `valid_from` first.
    ///
    /// # Errors
    /// Validation for a non-positive id, or Persistence.
    #[instrument(skip(self), fields(user.id = user_id))]
    pub async fn list_addresses(&self, user_id: i32) -> Result<Vec<AddressView>, DomainError> {
        debug!("Listing addresses");

        let user_id = validate_user_id(user_id)?;
        let mut rows = self.repo.list_for_user(&self.db, user_id).await?;
        rows.sort_by(|a, b| {
            a.key
                .address_type
                .cmp(&b.key.address_type)
                .then(b.key.valid_from.cmp(&a.key.valid_from))
        });

        let at = OffsetDateTime::now_utc();
        let views: Vec<AddressView> = rows.into_iter().map(|a| enrich_address(a, at)).collect();

        debug!("Successfully listed {} addresses", views.len());
        Ok(views)
    }

    /// # Errors
    /// Validation, `NotFound` when the user is missing, Conflict when the key
    /// is taken, or Persistence.
    #[instrument(
        skip(self, req),
        fields(user.id = req.user_id, address.type = %req.address_type)
    )]
    pub async fn create_address(
        &self,
        req: AddressCreateRequest,
    ) -> Result<AddressView, DomainError> {
        info!("Creating new address");

        let new_address = validate_address_create(&req)?;
        let user_id = new_address.key.user_id;
        if self.users.get(&self.db, user_id).await?.is_none() {
            return Err(DomainError::user_not_found(user_id));
        }

        let address = self.repo.create(&self.db, new_address, now()).await?;

        info!(address.id = %address.key.display_id(), "Successfully created address");
        Ok(enrich_address(address, OffsetDateTime::now_utc()))
    }

    /// Update an address, re-keying it when its type or `valid_from` moves.
    ///
    /// Locating the row, and the patch or delete-then-insert that follows,
    /// commit together or not at all.
    ///
    /// # Errors
    /// Validation, `NotFound` when no row matches the original key, Conflict
    /// when the new key collides with another row, or Persistence.
    #[instrument(skip(self, req), fields(user.id = req.user_id))]
    pub async fn update_address(
        &self,
        req: AddressUpdateRequest,
    ) -> Result<AddressView, DomainError> {
        info!("Updating address");

        let update = validate_address_update(&req)?;

        let txn = begin(&self.db).await?;
        let result = self.apply_update(&txn, update).await;
        let address = settle(txn, result).await?;

        info!(address.id = %address.key.display_id(), "Successfully updated address");
        Ok(enrich_address(address, OffsetDateTime::now_utc()))
    }

    async fn apply_update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        update: AddressUpdate,
    ) -> Result<Address, DomainError> {
        let AddressUpdate {
            original,
            key,
            fields,
        } = update;

        let candidates = self
            .repo
            .list_by_type(conn, original.user_id, original.address_type)
            .await?;
        let located = self
            .matcher
            .closest(&original, &candidates)
            .map(|a| a.key)
            .ok_or_else(|| DomainError::address_not_found(&original))?;

        let at = now();
        if self.matcher.matches(&key, &located) {
            debug!(address.id = %located.display_id(), "Key unchanged, patching in place");
            return self.repo.update_fields(conn, &located, fields, at).await;
        }

        info!(
            from = %located.display_id(),
            to = %key.display_id(),
            "Re-keying address"
        );
        if !self.repo.delete(conn, &located).await? {
            return Err(DomainError::address_not_found(&located));
        }
        self.repo.create(conn, NewAddress { key, fields }, at).await
    }

    /// Delete the address stored at exactly `key`.
    ///
    /// # Errors
    /// Validation for a non-positive user id, `NotFound`, or Persistence.
    #[instrument(skip(self), fields(address.id = %key.display_id()))]
    pub async fn delete_address(&self, key: AddressKey) -> Result<(), DomainError> {
        info!("Deleting address");

        validate_user_id(key.user_id)?;
        let key = AddressKey {
            valid_from: normalize_valid_from(key.valid_from),
            ..key
        };
        if !self.repo.delete(&self.db, &key).await? {
            return Err(DomainError::address_not_found(&key));
        }

        info!("Successfully deleted address");
        Ok(())
    }
}
