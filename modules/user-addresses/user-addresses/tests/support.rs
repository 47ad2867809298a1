#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Test support utilities for `user_addresses` integration tests.
//!
//! Provides an in-memory database with migrations applied and builders for
//! common payloads.

#![allow(dead_code)] // Support module provides utilities that may not all be used

use std::sync::Arc;

use sea_orm::{Database, DatabaseConnection};
use user_addresses::UserAddresses;
use user_addresses::config::UserAddressesConfig;
use user_addresses::module::ConcreteAppServices;
use user_addresses_sdk::{AddressCreateRequest, AddressUpdateRequest, UserForm};

/// Create a fresh in-memory SQLite database with the schema applied.
pub async fn inmem_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to in-memory database");
    UserAddresses::migrate(&db)
        .await
        .expect("Failed to run migrations");
    db
}

pub struct TestContext {
    pub db: DatabaseConnection,
    pub module: UserAddresses,
    pub services: Arc<ConcreteAppServices>,
}

impl TestContext {
    pub async fn new() -> Self {
        Self::with_config(&UserAddressesConfig::default()).await
    }

    pub async fn with_config(cfg: &UserAddressesConfig) -> Self {
        let db = inmem_db().await;
        let module = UserAddresses::init(db.clone(), cfg);
        let services = module.services();
        Self {
            db,
            module,
            services,
        }
    }
}

pub fn user_form(first_name: &str, last_name: &str, email: &str) -> UserForm {
    UserForm {
        first_name: first_name.to_owned(),
        last_name: last_name.to_owned(),
        initials: None,
        email: email.to_owned(),
        status: None,
    }
}

pub fn john_doe() -> UserForm {
    user_form("John", "Doe", "john@x.com")
}

pub fn address_req(user_id: i32, address_type: &str, valid_from: &str) -> AddressCreateRequest {
    AddressCreateRequest {
        user_id,
        address_type: address_type.to_owned(),
        valid_from: valid_from.to_owned(),
        post_code: "12345".to_owned(),
        city: "NYC".to_owned(),
        country_code: "usa".to_owned(),
        street: "Main St".to_owned(),
        building_number: "1".to_owned(),
    }
}

/// Update request that moves the address at (`original_type`, `original_valid_from`)
/// to (`address_type`, `valid_from`) with the given city.
pub fn update_req(
    user_id: i32,
    original_type: &str,
    original_valid_from: &str,
    address_type: &str,
    valid_from: &str,
    city: &str,
) -> AddressUpdateRequest {
    AddressUpdateRequest {
        user_id,
        address_type: address_type.to_owned(),
        valid_from: valid_from.to_owned(),
        post_code: "54321".to_owned(),
        city: city.to_owned(),
        country_code: "pol".to_owned(),
        street: "Side St".to_owned(),
        building_number: "2".to_owned(),
        original_address_type: original_type.to_owned(),
        original_valid_from: original_valid_from.to_owned(),
    }
}
