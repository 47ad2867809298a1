#![allow(clippy::unwrap_used, clippy::expect_used)]

//! REST API tests through the module router, without a listening socket.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt; // for oneshot

mod support;
use support::TestContext;

async fn call(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Failed to parse JSON body")
    };
    (status, json)
}

fn john() -> Value {
    json!({
        "first_name": "John",
        "last_name": "Doe",
        "email": "john@x.com"
    })
}

fn home_address() -> Value {
    json!({
        "address_type": "HOME",
        "valid_from": "2024-01-01",
        "post_code": "12345",
        "city": "NYC",
        "country_code": "usa",
        "street": "Main St",
        "building_number": "1"
    })
}

async fn app() -> Router {
    TestContext::new().await.module.router()
}

#[tokio::test]
async fn user_lifecycle() {
    let app = app().await;

    let (status, created) = call(&app, "POST", "/users", Some(john())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "ACTIVE");
    assert_eq!(created["address_count"], 0);
    let id = created["id"].as_i64().unwrap();

    let (status, list) = call(&app, "GET", "/users", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let (status, patched) = call(
        &app,
        "PATCH",
        &format!("/users/{id}"),
        Some(json!({ "initials": "J.D." })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["initials"], "J.D.");
    assert_eq!(patched["first_name"], "John");

    let (status, _) = call(&app, "DELETE", &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, problem) = call(&app, "DELETE", &format!("/users/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(problem["code"], "NOT_FOUND");
}

#[tokio::test]
async fn create_user_rejections() {
    let app = app().await;

    let (status, problem) = call(
        &app,
        "POST",
        "/users",
        Some(json!({ "first_name": "J0hn", "last_name": "", "email": "x" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(problem["status"], 422);
    assert_eq!(problem["instance"], "/users");
    let fields: Vec<&str> = problem["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["first_name", "last_name", "email"]);

    call(&app, "POST", "/users", Some(john())).await;
    let (status, problem) = call(&app, "POST", "/users", Some(john())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(problem["code"], "CONFLICT");
}

#[tokio::test]
async fn problem_responses_use_problem_content_type() {
    let app = app().await;
    let request = Request::builder()
        .method("PATCH")
        .uri("/users/77")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "first_name": "Ghost" }).to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/problem+json"
    );
}

#[tokio::test]
async fn malformed_requests_are_problems() {
    let app = app().await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/users/abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/problem+json"
    );

    let (status, problem) = call(&app, "DELETE", "/users/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["status"], 400);
    assert_eq!(problem["code"], "BAD_REQUEST");
    assert_eq!(problem["instance"], "/users/abc");

    let (status, problem) = call(
        &app,
        "POST",
        "/users",
        Some(json!({ "first_name": "J" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(problem["status"], 422);
    assert_eq!(problem["code"], "VALIDATION_FAILED");
    assert_eq!(problem["instance"], "/users");

    let (status, problem) = call(&app, "GET", "/users/x/addresses", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(problem["status"], 400);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/users")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/problem+json"
    );
}

#[tokio::test]
async fn address_lifecycle() {
    let app = app().await;
    let (_, user) = call(&app, "POST", "/users", Some(john())).await;
    let id = user["id"].as_i64().unwrap();
    let base = format!("/users/{id}/addresses");

    let (status, created) = call(&app, "POST", &base, Some(home_address())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["country_code"], "USA");
    assert_eq!(created["formatted_address"], "Main St 1\n12345 NYC\nUSA");
    assert_eq!(created["is_active"], true);
    assert_eq!(created["valid_from"], "2024-01-01T00:00:00Z");
    assert_eq!(created["id"], format!("{id}-HOME-1704067200000"));

    let (status, _) = call(&app, "POST", &base, Some(home_address())).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, moved) = call(
        &app,
        "PUT",
        &base,
        Some(json!({
            "original_address_type": "HOME",
            "original_valid_from": "2024-01-01T00:00:00.300Z",
            "address_type": "WORK",
            "valid_from": "2024-02-01",
            "post_code": "12345",
            "city": "NYC",
            "country_code": "USA",
            "street": "Main St",
            "building_number": "1"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let moved_id = moved["id"].as_str().unwrap().to_owned();
    assert_eq!(moved_id, format!("{id}-WORK-1706745600000"));

    let (status, list) = call(&app, "GET", &base, None).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["address_type"], "WORK");

    let (_, users) = call(&app, "GET", "/users", None).await;
    assert_eq!(users[0]["address_count"], 1);

    let (status, _) = call(&app, "DELETE", &format!("/addresses/{moved_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&app, "DELETE", &format!("/addresses/{moved_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn address_errors() {
    let app = app().await;

    let (status, _) = call(&app, "POST", "/users/999/addresses", Some(home_address())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, problem) = call(&app, "DELETE", "/addresses/not-an-id", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(problem["errors"][0]["field"], "id");

    let (status, _) = call(&app, "GET", "/users/0/addresses", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = app().await;
    let (status, doc) = call(&app, "GET", "/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/users/{id}/addresses"]["put"].is_object());
    assert!(doc["paths"]["/addresses/{display_id}"]["delete"].is_object());
}
