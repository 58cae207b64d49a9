//! # Audit Entries
//!
//! Append-only log of session-status checks. Each entry optionally points at
//! the user who was logged in; the foreign key is `ON DELETE SET NULL`, so
//! an entry never refers to a user that no longer exists.

use crate::db::models::AuditEntry;
use crate::error::AppResult;
use chrono::Utc;
use sqlx::SqlitePool;

/// Record one status check, linked to `user_id` when the session was authenticated
pub async fn insert_entry(pool: &SqlitePool, user_id: Option<&str>) -> AppResult<i64> {
    let result = sqlx::query("INSERT INTO analysis_entries (user_id, created_at) VALUES (?, ?)")
        .bind(user_id)
        .bind(Utc::now().to_rfc3339())
        .execute(pool)
        .await?;

    Ok(result.last_insert_rowid())
}

/// All entries, oldest first
pub async fn list_entries(pool: &SqlitePool) -> AppResult<Vec<AuditEntry>> {
    let entries = sqlx::query_as::<_, AuditEntry>("SELECT * FROM analysis_entries ORDER BY id")
        .fetch_all(pool)
        .await?;

    Ok(entries)
}
