use crate::auth;
use crate::db::models::User;
use crate::error::AppResult;
use crate::forms::FormErrors;
use serde::Deserialize;
use sqlx::SqlitePool;

pub const INVALID_LOGIN: &str =
    "Please enter a correct username and password. Note that both fields may be case-sensitive.";
pub const INACTIVE: &str = "This account is inactive.";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthenticationForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Resolve the submitted credentials to an active user
pub async fn validate(pool: &SqlitePool, form: &AuthenticationForm) -> AppResult<User> {
    let mut errors = FormErrors::default();
    errors.require("username", &form.username);
    errors.require("password", &form.password);
    errors.check()?;

    match auth::authenticate(pool, form.username.trim(), &form.password).await? {
        None => Err(FormErrors::non_field(INVALID_LOGIN).into()),
        Some(user) if !user.is_active => Err(FormErrors::non_field(INACTIVE).into()),
        Some(user) => Ok(user),
    }
}
