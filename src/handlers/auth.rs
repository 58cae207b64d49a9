use crate::auth::{AuthSession, MODEL_BACKEND};
use crate::db::{audit, users};
use crate::error::AppResult;
use crate::forms::{
    authentication, password_reset, registration, AuthenticationForm, FormInput,
    PasswordResetForm, RegistrationForm,
};
use crate::mail::templates::{PASSWORD_RESET_EMAIL, PASSWORD_RESET_SUBJECT};
use crate::state::AppState;
use axum::{extract::State, Json};
use serde::Serialize;

// Response bodies. Field order here is the order on the wire.

#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub result: &'static str,
}

#[derive(Debug, Serialize)]
pub struct UsernameResponse {
    pub result: &'static str,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct EmailResponse {
    pub result: &'static str,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct SessionStatus {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

const SUCCESS: &str = "success";

pub async fn login(
    State(state): State<AppState>,
    auth: AuthSession,
    FormInput(form): FormInput<AuthenticationForm>,
) -> AppResult<Json<UsernameResponse>> {
    let user = authentication::validate(&state.db, &form).await?;
    auth.login(&user, MODEL_BACKEND).await?;

    tracing::info!(user_id = %user.id, username = %user.username, "user logged in");

    Ok(Json(UsernameResponse {
        result: SUCCESS,
        username: user.username,
    }))
}

// Mounted outside the CSRF check: a stale page must still be able to log out.
pub async fn logout(auth: AuthSession) -> AppResult<Json<SuccessResponse>> {
    if let Some(user_id) = auth.user_id().await? {
        tracing::info!(%user_id, "user logged out");
    }
    auth.logout().await?;

    Ok(Json(SuccessResponse { result: SUCCESS }))
}

pub async fn register(
    State(state): State<AppState>,
    auth: AuthSession,
    FormInput(form): FormInput<RegistrationForm>,
) -> AppResult<Json<UsernameResponse>> {
    let account = registration::validate(&state.db, &form).await?;
    let user = registration::save(&state.db, &account).await?;
    auth.login(&user, MODEL_BACKEND).await?;

    tracing::info!(user_id = %user.id, username = %user.username, "user registered");

    Ok(Json(UsernameResponse {
        result: SUCCESS,
        username: user.username,
    }))
}

/// Report whether the caller is logged in, recording one audit entry either way
///
/// The user is re-read from the database; if it has disappeared since the
/// session was bound the request fails.
pub async fn current_user(
    State(state): State<AppState>,
    auth: AuthSession,
) -> AppResult<Json<SessionStatus>> {
    match auth.user_id().await? {
        Some(user_id) => {
            let user = users::find_by_id(&state.db, &user_id).await?;
            audit::insert_entry(&state.db, Some(&user.id)).await?;

            Ok(Json(SessionStatus {
                authenticated: true,
                username: Some(user.username),
            }))
        }
        None => {
            audit::insert_entry(&state.db, None).await?;

            Ok(Json(SessionStatus {
                authenticated: false,
                username: None,
            }))
        }
    }
}

pub async fn password_reset(
    State(state): State<AppState>,
    FormInput(form): FormInput<PasswordResetForm>,
) -> AppResult<Json<EmailResponse>> {
    let request = password_reset::validate(&state.db, &form).await?;
    password_reset::save(
        &state,
        &request,
        None,
        PASSWORD_RESET_SUBJECT,
        PASSWORD_RESET_EMAIL,
    )
    .await?;

    Ok(Json(EmailResponse {
        result: SUCCESS,
        email: request.email,
    }))
}
