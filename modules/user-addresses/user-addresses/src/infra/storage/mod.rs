//! Infrastructure storage layer - database persistence.
//!
//! This module contains the SeaORM-specific code:
//! - `entity/` - SeaORM entity definitions (`users`, `users_addresses`)
//! - `mapper.rs` - Conversions between SeaORM models and SDK contract types
//! - `db.rs` - Error classification and transaction settling
//! - `migrations/` - Database schema migrations

pub mod db;
pub mod entity;
pub mod mapper;
pub mod migrations;

mod addresses_sea_repo;
mod users_sea_repo;

pub use addresses_sea_repo::OrmAddressesRepository;
pub use users_sea_repo::OrmUsersRepository;
