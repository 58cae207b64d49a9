//! # Authenticated Session Context
//!
//! `AuthSession` is the explicit per-request view of the login state. It wraps
//! the `tower_sessions::Session` attached by `SessionManagerLayer` and exposes
//! the only two states this service knows about:
//!
//! - **Anonymous**: no user id stored
//! - **Authenticated**: `_auth_user_id` (and the backend that produced it) stored
//!
//! Handlers take it as an extractor, so there is no ambient global state.

use crate::db::models::User;
use crate::error::AppResult;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tower_sessions::Session;

/// Session key holding the authenticated user's id
pub const SESSION_KEY_USER_ID: &str = "_auth_user_id";

/// Session key holding the backend identifier used for the login
pub const SESSION_KEY_BACKEND: &str = "_auth_user_backend";

#[derive(Debug, Clone)]
pub struct AuthSession {
    session: Session,
}

impl AuthSession {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Id of the bound user, `None` when anonymous
    pub async fn user_id(&self) -> AppResult<Option<String>> {
        Ok(self.session.get::<String>(SESSION_KEY_USER_ID).await?)
    }

    pub async fn is_authenticated(&self) -> AppResult<bool> {
        Ok(self.user_id().await?.is_some())
    }

    /// Backend identifier recorded at login
    pub async fn backend(&self) -> AppResult<Option<String>> {
        Ok(self.session.get::<String>(SESSION_KEY_BACKEND).await?)
    }

    /// Bind the session to `user` (Anonymous → Authenticated)
    ///
    /// The session id is always rotated. If the session belonged to a
    /// different user, its data is discarded first.
    pub async fn login(&self, user: &User, backend: &str) -> AppResult<()> {
        match self.user_id().await? {
            Some(current) if current != user.id => self.session.flush().await?,
            _ => self.session.cycle_id().await?,
        }

        self.session.insert(SESSION_KEY_USER_ID, &user.id).await?;
        self.session.insert(SESSION_KEY_BACKEND, backend).await?;

        tracing::debug!(user_id = %user.id, backend, "session bound to user");
        Ok(())
    }

    /// Clear the session (→ Anonymous); safe to call when already anonymous
    pub async fn logout(&self) -> AppResult<()> {
        self.session.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthSession
where
    S: Send + Sync,
{
    type Rejection = <Session as FromRequestParts<S>>::Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        Ok(Self::new(session))
    }
}
