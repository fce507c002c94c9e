use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use tracing::{instrument, trace};

use crate::{
    AppState,
    auth::session,
    errors::{AuthFailure, Error, Result},
    types::UserId,
};

/// The authenticated caller, taken from an `Authorization: Bearer <jwt>` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: UserId,
}

/// Extract the bearer token. `None` when the header is absent, not UTF-8, or uses another scheme.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Error;

    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        let Some(token) = bearer_token(parts) else {
            trace!("No bearer token on request");
            return Err(Error::Unauthenticated {
                reason: AuthFailure::MissingToken,
            });
        };

        let id = session::verify_session_token(token, &state.config)?;
        trace!(user_id = id, "Authenticated bearer token");
        Ok(CurrentUser { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{bearer, create_test_state};
    use axum::{Json, Router, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use serde_json::Value;

    async fn whoami(user: CurrentUser) -> Json<Value> {
        Json(serde_json::json!({ "id": user.id }))
    }

    fn server() -> (TestServer, AppState) {
        let state = create_test_state();
        let app = Router::new().route("/whoami", get(whoami)).with_state(state.clone());
        (TestServer::new(app).unwrap(), state)
    }

    #[tokio::test]
    async fn test_valid_bearer_token() {
        let (server, state) = server();
        let token = session::create_session_token(5, &state.config).unwrap();

        let response = server.get("/whoami").add_header(AUTHORIZATION, bearer(&token)).await;
        response.assert_status_ok();
        response.assert_json(&serde_json::json!({ "id": 5 }));
    }

    #[tokio::test]
    async fn test_missing_or_wrong_scheme() {
        let (server, _) = server();

        let response = server.get("/whoami").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        response.assert_json(&serde_json::json!({ "error": "Unauthorized" }));

        let response = server.get("/whoami").add_header(AUTHORIZATION, "Basic dXNlcjpwYXNz").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        response.assert_json(&serde_json::json!({ "error": "Unauthorized" }));
    }

    #[tokio::test]
    async fn test_invalid_token() {
        let (server, _) = server();

        let response = server.get("/whoami").add_header(AUTHORIZATION, "Bearer not.a.jwt").await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        response.assert_json(&serde_json::json!({ "error": "Invalid token" }));
    }

    #[test]
    fn test_bearer_scheme_is_case_insensitive() {
        let (mut parts, _) = axum::http::Request::builder()
            .header(AUTHORIZATION, "bearer abc")
            .body(())
            .unwrap()
            .into_parts();
        assert_eq!(bearer_token(&parts), Some("abc"));

        parts.headers.insert(AUTHORIZATION, "Bearer ".parse().unwrap());
        assert_eq!(bearer_token(&parts), None);
    }
}
