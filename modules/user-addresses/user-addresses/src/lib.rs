//! User Addresses Module
//!
//! User management with time-versioned addresses: validation, `SeaORM`
//! storage, a REST API and a local client for in-process consumers.
//!
//! ## Public API
//!
//! The public API is defined in the `user-addresses-sdk` crate and re-exported here:
//! - `UserAddressesClientV1` - trait for in-process consumers
//! - `UserView`, `AddressView`, request types - data models
//! - `UserAddressesError` - error types
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
// === PUBLIC API (from SDK) ===
pub use user_addresses_sdk::{
    AddressCreateRequest, AddressKey, AddressUpdateRequest, AddressView, UserAddressesClientV1,
    UserAddressesError, UserForm, UserFormPatch, UserView,
};

// === MODULE DEFINITION ===
pub mod module;
pub use module::UserAddresses;

// === LOCAL CLIENT ===
pub mod local_client;

// === PRESENTATION-SIDE LIST STORES ===
pub mod cache;

// === INTERNAL MODULES ===
// Exposed for integration testing; external consumers should use SDK types.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
