//! # Error Handling
//!
//! This module defines the application error type and how each variant is
//! turned into an HTTP response.
//!
//! Two kinds of failure matter to clients:
//! - **Validation** errors (bad credentials, duplicate registration, unknown
//!   reset email) are expected and are reported with per-field messages.
//! - Everything else (a user record vanishing mid-request, the database or
//!   the mailer being unavailable) is unrecoverable for the request: it is
//!   logged in full and the client only sees a generic 500.

use crate::forms::FormErrors;
use crate::mail::MailError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-wide error type
///
/// The `#[from]` attributes let `?` convert library errors (SQLx, sessions,
/// mail, templates) into `AppError` automatically.
#[derive(Error, Debug)]
pub enum AppError {
    /// Database errors (SQLx library errors)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Session store failures (load/save of the session record)
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Outgoing email could not be handed to the mailer
    #[error("Mail error: {0}")]
    Mail(#[from] MailError),

    /// An email template failed to render
    #[error("Template error: {0}")]
    Template(#[from] handlebars::RenderError),

    /// Password hashing or hash parsing failed
    #[error("Password hash error: {0}")]
    PasswordHash(String),

    /// Form validation failed
    ///
    /// Carries field-level messages; this is the only variant whose details
    /// are shown to the client.
    #[error("Validation failed: {0:?}")]
    Validation(FormErrors),

    /// A user referenced by the session no longer exists
    ///
    /// The session already proved identity, so this is treated as fatal
    /// rather than as an anonymous request.
    #[error("User lookup failed: {0}")]
    UserLookup(String),

    /// Request refused before reaching a handler (CSRF check)
    #[error("{0}")]
    Forbidden(String),
}

impl From<argon2::password_hash::Error> for AppError {
    fn from(err: argon2::password_hash::Error) -> Self {
        AppError::PasswordHash(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Validation(errors) => {
                tracing::debug!("Form validation failed: {:?}", errors);
                let body = Json(json!({
                    "result": "error",
                    "errors": errors,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::Forbidden(message) => (StatusCode::FORBIDDEN, message),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Database error".to_string())
            }
            AppError::Session(e) => {
                tracing::error!("Session error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Session error".to_string())
            }
            AppError::Mail(e) => {
                tracing::error!("Mail error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Mail error".to_string())
            }
            AppError::Template(e) => {
                tracing::error!("Template error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::PasswordHash(e) => {
                tracing::error!("Password hash error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
            AppError::UserLookup(e) => {
                tracing::error!("User lookup failed: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        (status, Json(json!({ "error": error_message }))).into_response()
    }
}

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;
