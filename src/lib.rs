//! # Session Authentication Server
//!
//! A small JSON API for cookie-session authentication:
//!
//! | Method | Path                       | Purpose                               |
//! |--------|----------------------------|---------------------------------------|
//! | POST   | `/api/auth/login`          | Log in with username and password     |
//! | POST   | `/api/auth/logout`         | Clear the session (no CSRF check)     |
//! | POST   | `/api/auth/register`       | Create an account and log it in       |
//! | GET    | `/api/auth/user`           | Session status (writes an audit entry)|
//! | POST   | `/api/auth/password_reset` | Email a password reset link           |
//! | GET    | `/health`                  | Liveness probe                        |
//!
//! [`router`] builds the routes; the binary adds sessions, CORS, tracing
//! and static files on top.

pub mod auth;        // Credential checks and the per-request session context
pub mod config;      // Configuration management (environment variables, settings)
pub mod db;          // Database operations (users, audit entries, reset tokens)
pub mod error;       // Error handling and custom error types
pub mod forms;       // Input validation for each endpoint
pub mod handlers;    // HTTP request handlers (routes)
pub mod mail;        // Outgoing email and its templates
pub mod middleware;  // Request interceptors (CSRF check)
pub mod state;       // Shared application state

use crate::handlers::auth::{current_user, login, logout, password_reset, register};
use crate::handlers::health::health_check;
use crate::state::AppState;
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};

/// API routes with state attached
///
/// Handlers expect a `tower_sessions::SessionManagerLayer` to be layered on
/// the returned router.
pub fn router(state: AppState) -> Router {
    // State-changing form endpoints go through the CSRF check
    let form_routes = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/register", post(register))
        .route("/api/auth/password_reset", post(password_reset))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::csrf::require_csrf,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/user", get(current_user))
        .merge(form_routes)
        .with_state(state)
}
