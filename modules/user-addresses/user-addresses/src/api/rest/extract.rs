//! Request extractors whose rejections render as problem responses.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use http::StatusCode;
use http::request::Parts;
use serde::de::DeserializeOwned;

use crate::api::rest::error::{Problem, current_trace_id};

/// JSON body extractor, rejecting with a [`Problem`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiJson<T>(pub T);

/// Path parameter extractor, rejecting with a [`Problem`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ApiPath<T>(pub T);

fn rejection_problem(status: StatusCode, detail: String, instance: &str) -> Problem {
    let code = match status {
        StatusCode::UNPROCESSABLE_ENTITY => "VALIDATION_FAILED",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "UNSUPPORTED_MEDIA_TYPE",
        StatusCode::PAYLOAD_TOO_LARGE => "PAYLOAD_TOO_LARGE",
        s if s.is_server_error() => "INTERNAL",
        _ => "BAD_REQUEST",
    };
    Problem::new(
        status,
        status.canonical_reason().unwrap_or("Bad Request"),
        detail,
    )
    .with_code(code)
    .with_instance(instance)
    .with_trace_id(current_trace_id())
}

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let instance = req.uri().path().to_owned();
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection, "Rejected request body");
                Err(rejection_problem(
                    rejection.status(),
                    rejection.body_text(),
                    &instance,
                ))
            }
        }
    }
}

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection, "Rejected path parameters");
                Err(rejection_problem(
                    rejection.status(),
                    rejection.body_text(),
                    parts.uri.path(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use http::StatusCode;

    use super::rejection_problem;

    #[test]
    fn rejection_codes_follow_status() {
        let p = rejection_problem(
            StatusCode::UNPROCESSABLE_ENTITY,
            "missing field".into(),
            "/users",
        );
        assert_eq!(p.code, "VALIDATION_FAILED");
        assert_eq!(p.title, "Unprocessable Entity");
        assert_eq!(p.instance, "/users");

        let p = rejection_problem(StatusCode::BAD_REQUEST, "bad id".into(), "/users/abc");
        assert_eq!(p.code, "BAD_REQUEST");
        assert_eq!(p.detail, "bad id");

        let p = rejection_problem(StatusCode::INTERNAL_SERVER_ERROR, String::new(), "/");
        assert_eq!(p.code, "INTERNAL");
    }
}
