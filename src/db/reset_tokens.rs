use crate::db::models::PasswordResetToken;
use crate::error::AppResult;
use chrono::Utc;
use sqlx::SqlitePool;

pub async fn save_reset_token(
    pool: &SqlitePool,
    user_id: &str,
    ttl_minutes: i64,
) -> AppResult<PasswordResetToken> {
    let token = PasswordResetToken::new(user_id.to_string(), ttl_minutes);

    sqlx::query(
        "INSERT INTO password_reset_tokens (id, user_id, token, created_at, expires_at)
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(&token.id)
    .bind(&token.user_id)
    .bind(&token.token)
    .bind(&token.created_at)
    .bind(&token.expires_at)
    .execute(pool)
    .await?;

    Ok(token)
}

#[cfg(test)]
pub async fn find_by_user_id(pool: &SqlitePool, user_id: &str) -> AppResult<Vec<PasswordResetToken>> {
    let tokens = sqlx::query_as::<_, PasswordResetToken>(
        "SELECT * FROM password_reset_tokens WHERE user_id = ? ORDER BY created_at",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(tokens)
}

// Cleanup expired tokens (run periodically from main)
pub async fn cleanup_expired_tokens(pool: &SqlitePool) -> AppResult<u64> {
    let now = Utc::now().to_rfc3339();

    let result = sqlx::query("DELETE FROM password_reset_tokens WHERE expires_at < ?")
        .bind(&now)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}
