use crate::db::errors::DbError;
use crate::i18n::{Lang, Message};
use crate::payment_providers::PaymentError;
use crate::services::ServiceError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error as ThisError;
use utoipa::ToSchema;

/// Why a request could not be authenticated
#[derive(ThisError, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    /// No `Authorization: Bearer` header
    #[error("missing bearer token")]
    MissingToken,
    /// Bad signature, expired, or malformed
    #[error("invalid token")]
    InvalidToken,
    /// Token verified but its subject is not a user id
    #[error("invalid token subject")]
    InvalidSubject,
    /// Login with an unknown email or wrong password
    #[error("invalid credentials")]
    InvalidCredentials,
}

#[derive(ThisError, Debug)]
pub enum Error {
    /// Authentication required but missing or invalid
    #[error("Not authenticated: {reason}")]
    Unauthenticated { reason: AuthFailure },

    /// Invalid request data
    #[error("{}", .message.render(Lang::En))]
    BadRequest { message: Message },

    /// Registration with an email that already has an account
    #[error("Email already in use")]
    EmailInUse,

    /// Generic internal service error
    #[error("Failed to {operation}")]
    Internal { operation: String },

    /// Business rule failure from the service layer
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// Database operation error
    #[error(transparent)]
    Database(#[from] DbError),

    /// Unexpected error with full context chain
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// JSON body of every error response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable message in the request's language
    pub error: String,
    /// Project quota, present when the quota was exceeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

impl ErrorBody {
    pub fn new(message: &Message, lang: Lang) -> Self {
        Self {
            error: message.render(lang),
            limit: message.limit(),
        }
    }
}

fn db_status(err: &DbError) -> StatusCode {
    match err {
        DbError::NotFound => StatusCode::NOT_FOUND,
        DbError::UniqueViolation { .. } => StatusCode::CONFLICT,
        DbError::ForeignKeyViolation { .. } => StatusCode::BAD_REQUEST,
        DbError::CheckViolation { .. } => StatusCode::BAD_REQUEST,
        DbError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn db_message(err: &DbError) -> Message {
    match err {
        DbError::NotFound => Message::Untranslated("Resource not found".to_string()),
        DbError::UniqueViolation { .. } if err.is_email_conflict() => Message::EmailInUse,
        DbError::UniqueViolation { .. } => Message::Untranslated("Resource already exists".to_string()),
        DbError::ForeignKeyViolation { .. } => Message::Untranslated("Invalid reference to related resource".to_string()),
        DbError::CheckViolation { .. } => Message::Untranslated("Invalid data provided".to_string()),
        DbError::Other(_) => Message::Internal,
    }
}

impl Error {
    pub fn bad_request(message: Message) -> Self {
        Error::BadRequest { message }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::EmailInUse => StatusCode::CONFLICT,
            Error::Internal { .. } | Error::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Database(db_err) => db_status(db_err),
            Error::Service(service_err) => match service_err {
                ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
                ServiceError::Forbidden { .. } => StatusCode::FORBIDDEN,
                ServiceError::AlreadyActive => StatusCode::BAD_REQUEST,
                ServiceError::InvalidPlan { .. } => StatusCode::BAD_REQUEST,
                ServiceError::QuotaExceeded { .. } => StatusCode::FORBIDDEN,
                ServiceError::Store(db_err) => db_status(db_err),
                ServiceError::Payment(payment_err) => StatusCode::from(payment_err),
            },
        }
    }

    /// The user-safe message for this error, without internal details
    pub fn user_message(&self) -> Message {
        match self {
            Error::Unauthenticated { reason } => match reason {
                AuthFailure::MissingToken => Message::Unauthorized,
                AuthFailure::InvalidToken => Message::InvalidToken,
                AuthFailure::InvalidSubject => Message::InvalidTokenSubject,
                AuthFailure::InvalidCredentials => Message::InvalidCredentials,
            },
            Error::BadRequest { message } => message.clone(),
            Error::EmailInUse => Message::EmailInUse,
            Error::Internal { .. } | Error::Other(_) => Message::Internal,
            Error::Database(db_err) => db_message(db_err),
            Error::Service(service_err) => match service_err {
                ServiceError::NotFound { resource, .. } => Message::NotFound(*resource),
                ServiceError::Forbidden { resource, .. } => Message::Forbidden(*resource),
                ServiceError::AlreadyActive => Message::SubscriptionAlreadyActive,
                ServiceError::InvalidPlan { .. } => Message::InvalidPlan,
                ServiceError::QuotaExceeded { limit } => Message::QuotaExceeded { limit: *limit },
                ServiceError::Store(db_err) => db_message(db_err),
                ServiceError::Payment(PaymentError::PaymentNotCompleted) => Message::PaymentNotCompleted,
                ServiceError::Payment(PaymentError::InvalidData(_) | PaymentError::ProviderApi(_)) => Message::PaymentFailed,
            },
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        // Log full error details for debugging - different log levels based on severity
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Internal service error: {:#}", self);
        } else {
            match &self {
                Error::Database(_) | Error::Service(ServiceError::Store(_)) => {
                    tracing::warn!("Database constraint error: {}", self);
                }
                Error::Unauthenticated { .. } | Error::Service(ServiceError::Forbidden { .. }) => {
                    tracing::info!("Authorization error: {}", self);
                }
                _ => {
                    tracing::debug!("Client error: {}", self);
                }
            }
        }

        let message = self.user_message();
        let mut response = (status, Json(ErrorBody::new(&message, Lang::En))).into_response();
        // Picked up by `i18n::localize_errors` to re-render in the caller's language
        response.extensions_mut().insert(message);
        response
    }
}

/// Type alias for handler results
pub type Result<T> = std::result::Result<T, Error>;
