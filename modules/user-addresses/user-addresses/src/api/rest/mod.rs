//! REST adapter: DTOs, handlers, routes and problem responses.
//!
//! Depends on the domain layer only; the domain never imports from here.

pub mod dto;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod routes;
