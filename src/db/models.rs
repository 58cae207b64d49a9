//! # Database Models
//!
//! This module defines the data structures that map to database tables.
//! These structs represent rows in the database and include serialization
//! for JSON and `sqlx::FromRow` for database mapping.
//!
//! ## Why Strings for dates?
//! SQLite stores timestamps as text (RFC3339 format), so the models keep them
//! as `String` and parse only where a comparison is needed.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User account
///
/// The password is only ever stored as an Argon2 PHC string and is never
/// serialized.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    /// Unique identifier (UUID v4)
    pub id: String,

    /// Unique username, used to log in
    pub username: String,

    /// Unique email address, used for password resets
    pub email: String,

    /// Argon2 hash of the password
    #[serde(skip_serializing)]
    pub password_hash: String,

    /// Inactive accounts cannot log in or reset their password
    pub is_active: bool,

    /// When the account was created (RFC3339 timestamp)
    pub created_at: String,

    /// When the account was last updated (RFC3339 timestamp)
    pub updated_at: String,
}

impl User {
    /// Create a new, active user with a generated ID and timestamps
    pub fn new(username: String, email: String, password_hash: String) -> Self {
        let now = Utc::now().to_rfc3339();

        Self {
            id: Uuid::new_v4().to_string(),
            username,
            email,
            password_hash,
            is_active: true,
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

/// Audit record of one session-status check
///
/// `user_id` is `None` for anonymous checks. Rows are only ever inserted.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AuditEntry {
    pub id: i64,
    pub user_id: Option<String>,
    pub created_at: String,
}

/// Password reset token issued to a user
///
/// Tokens expire after the configured timeout; expired rows are purged by a
/// background task.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PasswordResetToken {
    /// Unique row identifier (UUID)
    pub id: String,

    /// Owner of the token; foreign key to users
    pub user_id: String,

    /// Random value embedded in the reset link
    pub token: String,

    /// When the token was issued (RFC3339 timestamp)
    pub created_at: String,

    /// When the token stops being valid (RFC3339 timestamp)
    pub expires_at: String,
}

impl PasswordResetToken {
    /// Issue a fresh token for `user_id`, valid for `ttl_minutes`
    pub fn new(user_id: String, ttl_minutes: i64) -> Self {
        let now = Utc::now();
        let expires = now + Duration::minutes(ttl_minutes);

        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            token: Uuid::new_v4().simple().to_string(),
            created_at: now.to_rfc3339(),
            expires_at: expires.to_rfc3339(),
        }
    }
}
