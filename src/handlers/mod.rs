//! # HTTP Request Handlers
//!
//! This module contains all the HTTP route handlers (controllers).
//! Each handler processes a specific API endpoint.
//!
//! ## Submodules
//! - `health`: Health check endpoint (for monitoring)
//! - `auth`: Login, logout, registration, session status and password reset
//!
//! ## Handler Pattern
//! Handlers are async functions that:
//! 1. Extract data from the request (form body, session, shared state)
//! 2. Validate the form and call the stores/mailer
//! 3. Return a JSON response, or an `AppError` that renders itself
//!
//! ```rust,ignore
//! pub async fn my_handler(
//!     State(state): State<AppState>,      // Shared app state
//!     auth: AuthSession,                  // Login state of this request
//!     Form(form): Form<MyForm>,           // Form-encoded request body
//! ) -> AppResult<Json<MyResponse>> {
//!     let data = my_form::validate(&state.db, &form).await?;
//!     Ok(Json(response))
//! }
//! ```

pub mod auth;
pub mod health;
