//! Domain service layer - business logic and rules.
//!
//! Per-resource submodules:
//! - `users` - User CRUD, email uniqueness, address counts
//! - `addresses` - Address versions, including the transactional re-key
//!
//! The domain layer may import `user_addresses_sdk` contract types and the
//! storage helpers in `infra`; it never imports `api`.

use std::sync::Arc;
use std::time::Duration;

use sea_orm::DatabaseConnection;
use time::OffsetDateTime;
use user_addresses_sdk::normalize_valid_from;

use crate::domain::key::KeyMatcher;
use crate::domain::repos::{AddressesRepository, UsersRepository};

mod addresses;
mod users;

pub use addresses::AddressesService;
pub use users::UsersService;

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub key_match_tolerance: Duration,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            key_match_tolerance: Duration::from_millis(1000),
        }
    }
}

/// Current time at storage precision.
pub(crate) fn now() -> OffsetDateTime {
    normalize_valid_from(OffsetDateTime::now_utc())
}

// DI Container - aggregates all domain services
pub struct AppServices<UR, AR>
where
    UR: UsersRepository + 'static,
    AR: AddressesRepository + 'static,
{
    pub users: UsersService<UR, AR>,
    pub addresses: AddressesService<AR, UR>,
}

impl<UR, AR> AppServices<UR, AR>
where
    UR: UsersRepository + 'static,
    AR: AddressesRepository + 'static,
{
    pub fn new(
        users_repo: UR,
        addresses_repo: AR,
        db: DatabaseConnection,
        config: &ServiceConfig,
    ) -> Self {
        let users_repo = Arc::new(users_repo);
        let addresses_repo = Arc::new(addresses_repo);

        Self {
            users: UsersService::new(
                db.clone(),
                Arc::clone(&users_repo),
                Arc::clone(&addresses_repo),
            ),
            addresses: AddressesService::new(
                db,
                addresses_repo,
                users_repo,
                KeyMatcher::new(config.key_match_tolerance),
            ),
        }
    }
}
