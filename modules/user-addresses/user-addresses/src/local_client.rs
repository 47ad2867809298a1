//! Local implementation of `UserAddressesClientV1`.
//!
//! Used for in-process consumers such as the list stores. It delegates to the
//! domain services and converts errors to SDK error types.

use std::sync::Arc;

use async_trait::async_trait;
use user_addresses_sdk::{
    AddressCreateRequest, AddressKey, AddressUpdateRequest, AddressView, UserAddressesClientV1,
    UserAddressesError, UserForm, UserFormPatch, UserView,
};

use crate::module::ConcreteAppServices;

/// Local implementation of the `UserAddressesClientV1` trait that delegates to the domain services.
pub struct UserAddressesLocalClient {
    services: Arc<ConcreteAppServices>,
}

impl UserAddressesLocalClient {
    /// Create a new local client wrapping the domain services.
    #[must_use]
    pub fn new(services: Arc<ConcreteAppServices>) -> Self {
        Self { services }
    }
}

#[async_trait]
impl UserAddressesClientV1 for UserAddressesLocalClient {
    // User operations
    async fn list_users(&self) -> Result<Vec<UserView>, UserAddressesError> {
        self.services.users.list_users().await.map_err(Into::into)
    }

    async fn create_user(&self, form: UserForm) -> Result<UserView, UserAddressesError> {
        self.services
            .users
            .create_user(form)
            .await
            .map_err(Into::into)
    }

    async fn update_user(
        &self,
        id: i32,
        patch: UserFormPatch,
    ) -> Result<UserView, UserAddressesError> {
        self.services
            .users
            .update_user(id, patch)
            .await
            .map_err(Into::into)
    }

    async fn delete_user(&self, id: i32) -> Result<(), UserAddressesError> {
        self.services
            .users
            .delete_user(id)
            .await
            .map_err(Into::into)
    }

    // Address operations
    async fn list_addresses(&self, user_id: i32) -> Result<Vec<AddressView>, UserAddressesError> {
        self.services
            .addresses
            .list_addresses(user_id)
            .await
            .map_err(Into::into)
    }

    async fn create_address(
        &self,
        req: AddressCreateRequest,
    ) -> Result<AddressView, UserAddressesError> {
        self.services
            .addresses
            .create_address(req)
            .await
            .map_err(Into::into)
    }

    async fn update_address(
        &self,
        req: AddressUpdateRequest,
    ) -> Result<AddressView, UserAddressesError> {
        self.services
            .addresses
            .update_address(req)
            .await
            .map_err(Into::into)
    }

    async fn delete_address(&self, key: AddressKey) -> Result<(), UserAddressesError> {
        self.services
            .addresses
            .delete_address(key)
            .await
            .map_err(Into::into)
    }
}
