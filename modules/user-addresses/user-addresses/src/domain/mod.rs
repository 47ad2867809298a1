//! Domain layer: validation, key matching, repository ports and services.
//!
//! The domain uses the SDK contract types (`User`, `Address`, ...) as its
//! models. Storage is reached only through the `repos` traits.

pub mod error;
pub mod key;
pub mod repos;
pub mod service;
pub mod validation;
