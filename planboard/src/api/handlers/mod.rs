//! HTTP request handlers for all API endpoints.
//!
//! Handlers deserialize and validate the request, call into [`crate::services`], and map
//! the result into an API model. Failures are returned as [`crate::errors::Error`], which
//! renders the status code and a localized `{ "error": ... }` body.
//!
//! # Handler Modules
//!
//! - [`auth`]: Registration and login
//! - [`plans`]: Public plan catalog
//! - [`subscriptions`]: Purchase, inspect and cancel subscriptions
//! - [`projects`]: Quota-limited projects
//! - [`tasks`]: Task CRUD
//!
//! # Authentication
//!
//! Everything except the plan catalog and the auth routes takes a
//! [`CurrentUser`](crate::auth::current_user::CurrentUser) and so requires a bearer token.

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use serde::de::DeserializeOwned;

use crate::{errors::Error, i18n::Message, types::Resource};

pub mod auth;
pub mod plans;
pub mod projects;
pub mod subscriptions;
pub mod tasks;

/// Parse a numeric path id, rejecting anything else with "Invalid <resource> ID".
pub(crate) fn parse_id(raw: &str, resource: Resource) -> Result<i64, Error> {
    raw.parse::<i64>()
        .map_err(|_| Error::bad_request(Message::InvalidId(resource)))
}

/// JSON request body whose rejections become a 400 `{ "error": ... }` body instead of
/// axum's plain-text 415/422 responses.
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(invalid_body(rejection)),
        }
    }
}

fn invalid_body(rejection: JsonRejection) -> Error {
    Error::bad_request(Message::InvalidBody {
        detail: rejection.body_text(),
    })
}
