//! User Addresses SDK
//!
//! This crate provides the public API for the `user_addresses` module:
//! - `UserAddressesClientV1` trait
//! - Model types for users and their time-versioned addresses
//! - Natural-key and formatting helpers for addresses
//! - In-memory pagination over fetched lists
//! - Error type (`UserAddressesError`)
//!
//! ## Usage
//!
//! ```ignore
//! use user_addresses_sdk::UserAddressesClientV1;
//!
//! let users = client.list_users().await?;
//! let addresses = client.list_addresses(users[0].id).await?;
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod address;
pub mod client;
pub mod errors;
pub mod models;
pub mod pagination;

// Re-export main types at crate root for convenience
pub use address::{
    AddressPreview, PartialAddress, enrich_address, format_address_preview,
    is_valid_country_code, normalize_country_code, normalize_valid_from, sort_by_priority,
};
pub use client::UserAddressesClientV1;
pub use errors::{FieldViolation, UserAddressesError};
pub use models::{
    Address, AddressCreateRequest, AddressFields, AddressKey, AddressType, AddressUpdate,
    AddressUpdateRequest, AddressView, NewAddress, NewUser, User, UserForm, UserFormPatch,
    UserPatch, UserStatus, UserView,
};
pub use pagination::Pager;
