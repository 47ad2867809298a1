//! Object-safe client boundary for the `user_addresses` module.
//!
//! Registered as `Arc<dyn UserAddressesClientV1>`; presentation-side stores
//! and other modules only ever talk to this trait.

use async_trait::async_trait;

use crate::errors::UserAddressesError;
use crate::models::{
    AddressCreateRequest, AddressKey, AddressUpdateRequest, AddressView, UserForm, UserFormPatch,
    UserView,
};

/// Client for user and address operations (Version 1).
#[async_trait]
pub trait UserAddressesClientV1: Send + Sync {
    // ==================== Users ====================

    /// List all users, newest first, with their address counts.
    async fn list_users(&self) -> Result<Vec<UserView>, UserAddressesError>;

    /// Create a new user.
    async fn create_user(&self, form: UserForm) -> Result<UserView, UserAddressesError>;

    /// Partially update an existing user.
    async fn update_user(
        &self,
        id: i32,
        patch: UserFormPatch,
    ) -> Result<UserView, UserAddressesError>;

    /// Delete a user and, through storage, all of its addresses.
    async fn delete_user(&self, id: i32) -> Result<(), UserAddressesError>;

    // ==================== Addresses ====================

    /// List a user's addresses by type, newest `valid_from` first within a type.
    async fn list_addresses(&self, user_id: i32) -> Result<Vec<AddressView>, UserAddressesError>;

    /// Create a new address version.
    async fn create_address(
        &self,
        req: AddressCreateRequest,
    ) -> Result<AddressView, UserAddressesError>;

    /// Update an address, re-keying it when its type or `valid_from` changes.
    async fn update_address(
        &self,
        req: AddressUpdateRequest,
    ) -> Result<AddressView, UserAddressesError>;

    /// Delete the address with exactly this key.
    async fn delete_address(&self, key: AddressKey) -> Result<(), UserAddressesError>;
}
