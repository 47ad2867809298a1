use axum::http::{StatusCode, Uri, header};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use tracing::field::Empty;
use user_addresses_sdk::AddressKey;

use super::{Services, problem};
use crate::api::rest::dto::{AddressDto, CreateAddressReq, UpdateAddressReq};
use crate::api::rest::error::{ApiResult, Problem};
use crate::api::rest::extract::{ApiJson, ApiPath};
use crate::domain::error::DomainError;

/// List a user's addresses
#[utoipa::path(
    get,
    path = "/users/{id}/addresses",
    tag = "addresses",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 200, description = "Addresses by type, newest first", body = [AddressDto]),
        (status = 422, description = "Invalid user id", body = Problem, content_type = "application/problem+json")
    )
)]
#[tracing::instrument(skip(svc, uri), fields(user.id = %id, request_id = Empty))]
pub async fn list_addresses(
    Extension(svc): Extension<Services>,
    uri: Uri,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<Json<Vec<AddressDto>>> {
    let addresses = svc
        .addresses
        .list_addresses(id)
        .await
        .map_err(problem(&uri))?;
    Ok(Json(addresses.into_iter().map(AddressDto::from).collect()))
}

/// Create an address version for a user
#[utoipa::path(
    post,
    path = "/users/{id}/addresses",
    tag = "addresses",
    params(("id" = i32, Path, description = "User id")),
    request_body = CreateAddressReq,
    responses(
        (status = 201, description = "Created", body = AddressDto),
        (status = 404, description = "No such user", body = Problem, content_type = "application/problem+json"),
        (status = 409, description = "Key already taken", body = Problem, content_type = "application/problem+json"),
        (status = 422, description = "Validation failed", body = Problem, content_type = "application/problem+json")
    )
)]
#[tracing::instrument(skip(svc, uri, req), fields(user.id = %id, request_id = Empty))]
pub async fn create_address(
    Extension(svc): Extension<Services>,
    uri: Uri,
    ApiPath(id): ApiPath<i32>,
    ApiJson(req): ApiJson<CreateAddressReq>,
) -> ApiResult<impl IntoResponse> {
    let address = svc
        .addresses
        .create_address(req.into_request(id))
        .await
        .map_err(problem(&uri))?;
    let location = format!("/addresses/{}", address.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(AddressDto::from(address)),
    ))
}

/// Update an address located by its original type and `valid_from`
#[utoipa::path(
    put,
    path = "/users/{id}/addresses",
    tag = "addresses",
    params(("id" = i32, Path, description = "User id")),
    request_body = UpdateAddressReq,
    responses(
        (status = 200, description = "Updated", body = AddressDto),
        (status = 404, description = "No address matches the original key", body = Problem, content_type = "application/problem+json"),
        (status = 409, description = "New key already taken", body = Problem, content_type = "application/problem+json"),
        (status = 422, description = "Validation failed", body = Problem, content_type = "application/problem+json")
    )
)]
#[tracing::instrument(skip(svc, uri, req), fields(user.id = %id, request_id = Empty))]
pub async fn update_address(
    Extension(svc): Extension<Services>,
    uri: Uri,
    ApiPath(id): ApiPath<i32>,
    ApiJson(req): ApiJson<UpdateAddressReq>,
) -> ApiResult<Json<AddressDto>> {
    let address = svc
        .addresses
        .update_address(req.into_request(id))
        .await
        .map_err(problem(&uri))?;
    Ok(Json(AddressDto::from(address)))
}

/// Delete one address version by its display id
#[utoipa::path(
    delete,
    path = "/addresses/{display_id}",
    tag = "addresses",
    params(("display_id" = String, Path, description = "`{user_id}-{TYPE}-{epoch_millis}`")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No such address", body = Problem, content_type = "application/problem+json"),
        (status = 422, description = "Malformed id", body = Problem, content_type = "application/problem+json")
    )
)]
#[tracing::instrument(skip(svc, uri), fields(request_id = Empty))]
pub async fn delete_address(
    Extension(svc): Extension<Services>,
    uri: Uri,
    ApiPath(display_id): ApiPath<String>,
) -> ApiResult<StatusCode> {
    let key = AddressKey::parse_display_id(&display_id)
        .map_err(DomainError::from)
        .map_err(problem(&uri))?;
    svc.addresses
        .delete_address(key)
        .await
        .map_err(problem(&uri))?;
    Ok(StatusCode::NO_CONTENT)
}
