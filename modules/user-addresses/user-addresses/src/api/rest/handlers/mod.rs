use std::sync::Arc;

use axum::http::Uri;

use crate::api::rest::error::{Problem, domain_error_to_problem};
use crate::domain::error::DomainError;
use crate::module::ConcreteAppServices;

pub mod addresses;
pub mod users;

pub(crate) type Services = Arc<ConcreteAppServices>;

/// Map a domain error onto a problem for the request path.
pub(crate) fn problem(uri: &Uri) -> impl Fn(DomainError) -> Problem + '_ {
    move |e| domain_error_to_problem(&e, uri.path())
}
