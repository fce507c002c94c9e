use axum::{Json, extract::State};

use crate::{
    AppState,
    api::{
        handlers::JsonBody,
        models::{
            auth::{AuthResponse, LoginRequest, RegisterRequest, RegisterResponse},
            users::UserResponse,
        },
    },
    auth::{
        password::{self, Argon2Params},
        session,
    },
    db::models::users::{UserCreateDBRequest, UserDBResponse},
    errors::{AuthFailure, Error},
    i18n::Message,
};

/// Loose shape check: one `@`, something before it, a dotted domain after it.
fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain.split('.').count() >= 2
        && domain.split('.').all(|label| !label.is_empty())
}

fn auth_response(user: UserDBResponse, state: &AppState) -> Result<AuthResponse, Error> {
    let access_token = session::create_session_token(user.id, &state.config)?;
    Ok(AuthResponse {
        access_token,
        expires_in: humantime::format_duration(state.config.auth.jwt_expiry).to_string(),
        user: UserResponse::from(user),
    })
}

/// Register a new user account
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = RegisterRequest,
    tag = "authentication",
    summary = "Register",
    description = "Create an account and return an access token. Also served at `/auth/signup`.",
    responses(
        (status = 201, description = "User registered successfully", body = AuthResponse),
        (status = 400, description = "Invalid email or password length", body = crate::errors::ErrorBody),
        (status = 409, description = "Email already in use", body = crate::errors::ErrorBody),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn register(State(state): State<AppState>, JsonBody(request): JsonBody<RegisterRequest>) -> Result<RegisterResponse, Error> {
    if !is_valid_email(&request.email) {
        return Err(Error::bad_request(Message::InvalidEmail));
    }

    let password_config = &state.config.auth.password;
    let password_len = request.password.chars().count();
    if password_len < password_config.min_length || password_len > password_config.max_length {
        return Err(Error::bad_request(Message::PasswordLength {
            min: password_config.min_length,
            max: password_config.max_length,
        }));
    }

    if state.store.get_user_by_email(&request.email).await?.is_some() {
        return Err(Error::EmailInUse);
    }

    let password_hash = password::hash_password(request.password, Argon2Params::from(password_config)).await?;

    // Two concurrent registrations can both pass the check above
    let user = state
        .store
        .create_user(&UserCreateDBRequest {
            email: request.email,
            password_hash,
            name: request.name,
        })
        .await
        .map_err(|e| if e.is_email_conflict() { Error::EmailInUse } else { e.into() })?;

    tracing::info!(user_id = user.id, "User registered");
    Ok(RegisterResponse(auth_response(user, &state)?))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    tag = "authentication",
    summary = "Log in",
    description = "Exchange credentials for an access token. Also served at `/auth/signin`.",
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials", body = crate::errors::ErrorBody),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(State(state): State<AppState>, JsonBody(request): JsonBody<LoginRequest>) -> Result<Json<AuthResponse>, Error> {
    let invalid = || Error::Unauthenticated {
        reason: AuthFailure::InvalidCredentials,
    };

    let user = state.store.get_user_by_email(&request.email).await?.ok_or_else(invalid)?;

    if !password::verify_password_blocking(request.password, user.password_hash.clone()).await? {
        return Err(invalid());
    }

    tracing::debug!(user_id = user.id, "User logged in");
    Ok(Json(auth_response(user, &state)?))
}
