//! REST API route definitions - OpenAPI and Axum routing.
//!
//! Routes orchestrate but don't contain business logic: handlers delegate to
//! the domain services and use `dto::*` types for serialization.

use std::sync::Arc;

use axum::routing::{delete, get, patch};
use axum::{Extension, Json, Router};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::api::rest::dto::{
    AddressDto, CreateAddressReq, CreateUserReq, UpdateAddressReq, UpdateUserReq, UserDto,
};
use crate::api::rest::error::{Problem, ValidationViolation};
use crate::api::rest::handlers::{addresses, users};
use crate::module::ConcreteAppServices;

#[derive(OpenApi)]
#[openapi(
    info(title = "User Addresses API", description = "Users and their time-versioned addresses"),
    paths(
        users::list_users,
        users::create_user,
        users::update_user,
        users::delete_user,
        addresses::list_addresses,
        addresses::create_address,
        addresses::update_address,
        addresses::delete_address,
    ),
    components(schemas(
        UserDto,
        CreateUserReq,
        UpdateUserReq,
        AddressDto,
        CreateAddressReq,
        UpdateAddressReq,
        Problem,
        ValidationViolation,
    )),
    tags(
        (name = "users", description = "User management"),
        (name = "addresses", description = "Address versions per user")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the module router.
pub fn router(services: Arc<ConcreteAppServices>) -> Router {
    Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            patch(users::update_user).delete(users::delete_user),
        )
        .route(
            "/users/{id}/addresses",
            get(addresses::list_addresses)
                .post(addresses::create_address)
                .put(addresses::update_address),
        )
        .route("/addresses/{display_id}", delete(addresses::delete_address))
        .route("/openapi.json", get(openapi_json))
        .layer(Extension(services))
        .layer(TraceLayer::new_for_http())
}
