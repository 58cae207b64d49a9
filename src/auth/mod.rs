//! # Authentication
//!
//! - `password`: Argon2 hashing and verification
//! - `session`: The `AuthSession` context object bound to each request
//!
//! This module also holds the credential check used by the login form.

pub mod password;
pub mod session;

pub use session::AuthSession;

use crate::db::{models::User, users};
use crate::error::AppResult;
use sqlx::SqlitePool;

/// Backend identifier stored in the session for password logins
///
/// Registration binds the new account with this same identifier.
pub const MODEL_BACKEND: &str = "auth::backends::ModelBackend";

/// Resolve a username/password pair to a user
///
/// Returns `None` for an unknown username or a wrong password. Whether the
/// account is active is left to the caller.
pub async fn authenticate(
    pool: &SqlitePool,
    username: &str,
    password: &str,
) -> AppResult<Option<User>> {
    let Some(user) = users::find_by_username(pool, username).await? else {
        // Keep the cost of a miss close to the cost of a wrong password.
        password::hash_password(password)?;
        return Ok(None);
    };

    if password::verify_password(password, &user.password_hash)? {
        Ok(Some(user))
    } else {
        Ok(None)
    }
}
