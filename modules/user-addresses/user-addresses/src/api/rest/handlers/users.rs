use axum::http::{StatusCode, Uri, header};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use tracing::field::Empty;

use super::{Services, problem};
use crate::api::rest::dto::{CreateUserReq, UpdateUserReq, UserDto};
use crate::api::rest::error::{ApiResult, Problem};
use crate::api::rest::extract::{ApiJson, ApiPath};

/// List all users, newest first
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "Users with address counts", body = [UserDto]),
        (status = 500, description = "Storage failure", body = Problem, content_type = "application/problem+json")
    )
)]
#[tracing::instrument(skip(svc, uri), fields(request_id = Empty))]
pub async fn list_users(
    Extension(svc): Extension<Services>,
    uri: Uri,
) -> ApiResult<Json<Vec<UserDto>>> {
    let users = svc.users.list_users().await.map_err(problem(&uri))?;
    Ok(Json(users.into_iter().map(UserDto::from).collect()))
}

/// Create a new user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = CreateUserReq,
    responses(
        (status = 201, description = "Created", body = UserDto),
        (status = 409, description = "Email already in use", body = Problem, content_type = "application/problem+json"),
        (status = 422, description = "Validation failed", body = Problem, content_type = "application/problem+json")
    )
)]
#[tracing::instrument(skip(svc, uri, req), fields(request_id = Empty))]
pub async fn create_user(
    Extension(svc): Extension<Services>,
    uri: Uri,
    ApiJson(req): ApiJson<CreateUserReq>,
) -> ApiResult<impl IntoResponse> {
    let user = svc
        .users
        .create_user(req.into())
        .await
        .map_err(problem(&uri))?;
    let location = format!("/users/{}", user.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(UserDto::from(user)),
    ))
}

/// Partially update a user
#[utoipa::path(
    patch,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i32, Path, description = "User id")),
    request_body = UpdateUserReq,
    responses(
        (status = 200, description = "Updated", body = UserDto),
        (status = 404, description = "No such user", body = Problem, content_type = "application/problem+json"),
        (status = 409, description = "Email already in use", body = Problem, content_type = "application/problem+json"),
        (status = 422, description = "Validation failed", body = Problem, content_type = "application/problem+json")
    )
)]
#[tracing::instrument(skip(svc, uri, req), fields(user.id = %id, request_id = Empty))]
pub async fn update_user(
    Extension(svc): Extension<Services>,
    uri: Uri,
    ApiPath(id): ApiPath<i32>,
    ApiJson(req): ApiJson<UpdateUserReq>,
) -> ApiResult<Json<UserDto>> {
    let user = svc
        .users
        .update_user(id, req.into())
        .await
        .map_err(problem(&uri))?;
    Ok(Json(UserDto::from(user)))
}

/// Delete a user together with its addresses
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = i32, Path, description = "User id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No such user", body = Problem, content_type = "application/problem+json")
    )
)]
#[tracing::instrument(skip(svc, uri), fields(user.id = %id, request_id = Empty))]
pub async fn delete_user(
    Extension(svc): Extension<Services>,
    uri: Uri,
    ApiPath(id): ApiPath<i32>,
) -> ApiResult<StatusCode> {
    svc.users.delete_user(id).await.map_err(problem(&uri))?;
    Ok(StatusCode::NO_CONTENT)
}
