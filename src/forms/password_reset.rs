use crate::db::{models::User, reset_tokens, users};
use crate::error::AppResult;
use crate::forms::FormErrors;
use crate::mail::EmailMessage;
use crate::state::AppState;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use validator::Validate;

pub const UNKNOWN_EMAIL: &str =
    "That email address doesn't have an associated user account. Are you sure you've registered?";

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PasswordResetForm {
    #[serde(default)]
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
}

/// A validated reset request: the address as submitted and its active accounts
#[derive(Debug, Clone)]
pub struct ResetRequest {
    pub email: String,
    pub users: Vec<User>,
}

#[derive(Debug, Serialize)]
struct ResetEmailContext<'a> {
    email: &'a str,
    domain: &'a str,
    site_name: &'a str,
    uid: &'a str,
    username: &'a str,
    token: &'a str,
    protocol: &'a str,
}

pub async fn validate(pool: &SqlitePool, form: &PasswordResetForm) -> AppResult<ResetRequest> {
    let form = PasswordResetForm {
        email: form.email.trim().to_string(),
    };

    let mut errors = FormErrors::default();
    errors.require("email", &form.email);
    if let Err(field_errors) = Validate::validate(&form) {
        errors.merge(field_errors);
    }
    errors.check()?;

    let users = users::find_active_by_email(pool, &form.email).await?;
    if users.is_empty() {
        let mut errors = FormErrors::default();
        errors.add("email", UNKNOWN_EMAIL);
        return Err(errors.into());
    }

    Ok(ResetRequest {
        email: form.email,
        users,
    })
}

/// Issue a reset token and send one email per matching account
///
/// Without a `domain_override` the configured site name and domain are used
/// in the link. Returns the number of emails sent.
pub async fn save(
    state: &AppState,
    request: &ResetRequest,
    domain_override: Option<&str>,
    subject_template: &str,
    email_template: &str,
) -> AppResult<usize> {
    let config = &state.config;
    let (site_name, domain) = match domain_override {
        Some(domain) => (domain, domain),
        None => (config.site_name.as_str(), config.site_domain.as_str()),
    };

    for user in &request.users {
        let token = reset_tokens::save_reset_token(
            &state.db,
            &user.id,
            config.password_reset_timeout_minutes,
        )
        .await?;

        let context = ResetEmailContext {
            email: &user.email,
            domain,
            site_name,
            uid: &user.id,
            username: &user.username,
            token: &token.token,
            protocol: config.protocol(),
        };

        let message = EmailMessage {
            from: config.default_from_email.clone(),
            to: user.email.clone(),
            subject: state.templates.render_subject(subject_template, &context)?,
            body: state.templates.render(email_template, &context)?,
        };
        state.mailer.send(message).await?;

        tracing::info!(user_id = %user.id, "password reset email dispatched");
    }

    Ok(request.users.len())
}
