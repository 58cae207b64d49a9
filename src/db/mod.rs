//! # Database Module
//!
//! This module organizes all database-related code into submodules:
//! - `models`: Data structures (User, AuditEntry, PasswordResetToken)
//! - `users`: CRUD operations for users
//! - `audit`: Append-only audit entries written by the session-status endpoint
//! - `reset_tokens`: Password reset tokens and their periodic cleanup
//!
//! Every function takes the pool explicitly; there is no global connection.

pub mod audit;
pub mod models;
pub mod reset_tokens;
pub mod users;

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

/// Open an in-memory database with the schema applied
///
/// A single connection is kept alive for the life of the pool because each
/// SQLite in-memory connection is its own database.
pub async fn connect_in_memory() -> Result<SqlitePool, sqlx::Error> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}
