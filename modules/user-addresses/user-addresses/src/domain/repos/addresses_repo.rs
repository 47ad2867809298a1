use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::ConnectionTrait;
use time::OffsetDateTime;
use user_addresses_sdk::{Address, AddressFields, AddressKey, AddressType, NewAddress};

use crate::domain::error::DomainError;

/// Repository trait for Address persistence operations.
///
/// Keys are exact: tolerant lookup is done by the service on top of
/// `list_by_type`.
#[async_trait]
pub trait AddressesRepository: Send + Sync {
    /// All addresses of a user, unordered.
    async fn list_for_user<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i32,
    ) -> Result<Vec<Address>, DomainError>;

    /// All versions of one address type for a user.
    async fn list_by_type<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i32,
        address_type: AddressType,
    ) -> Result<Vec<Address>, DomainError>;

    /// Insert a new address version.
    async fn create<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        address: NewAddress,
        now: OffsetDateTime,
    ) -> Result<Address, DomainError>;

    /// Patch the non-key fields of the row stored at `key`.
    async fn update_fields<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        key: &AddressKey,
        fields: AddressFields,
        now: OffsetDateTime,
    ) -> Result<Address, DomainError>;

    /// Delete the row stored at exactly `key`. Returns `false` when nothing was deleted.
    async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        key: &AddressKey,
    ) -> Result<bool, DomainError>;

    /// Address count per user id. Users without addresses are absent.
    async fn count_by_user<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
    ) -> Result<HashMap<i32, u64>, DomainError>;

    async fn count_for_user<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        user_id: i32,
    ) -> Result<u64, DomainError>;
}
