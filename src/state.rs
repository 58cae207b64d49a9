//! # Application State
//!
//! This module defines the shared state that's accessible to all request handlers.
//! In Axum, state is how you share resources (database connections, configuration, etc.)
//! across different parts of your application.
//!
//! ## The State Pattern
//! Instead of creating new connections or template registries per request, we:
//! 1. Create them once at startup
//! 2. Store them in AppState
//! 3. Share them across all request handlers
//! 4. Axum clones the state for each request (cheap because everything is a pool or an Arc)

use crate::config::Config;
use crate::mail::{LogMailer, Mailer, Templates};
use anyhow::Result;
use sqlx::sqlite::SqlitePool;
use std::sync::Arc;

/// Shared application state
///
/// Holds the collaborators every handler may need:
/// - Database connection pool (users, audit entries, reset tokens)
/// - The mailer that outgoing email is handed to
/// - Compiled email templates
/// - Configuration (site name/domain for links, token lifetimes, ...)
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    ///
    /// `SqlitePool` is itself a cheap, clone-able handle to a pool of
    /// connections.
    pub db: SqlitePool,

    /// Where outgoing email goes
    ///
    /// A trait object so the binary can log mail while tests capture it.
    pub mailer: Arc<dyn Mailer>,

    /// Handlebars registry with the embedded email templates
    pub templates: Arc<Templates>,

    /// Immutable configuration loaded at startup
    pub config: Arc<Config>,
}

impl AppState {
    /// Initialize application state
    ///
    /// This function:
    /// 1. Connects to the SQLite database
    /// 2. Runs database migrations (creates tables if they don't exist)
    /// 3. Compiles the email templates
    /// 4. Uses the logging mailer for outgoing email
    ///
    /// # Errors
    /// Returns an error if the connection, a migration or a template fails.
    pub async fn new(config: &Config) -> Result<Self> {
        // Create database connection pool
        let db = SqlitePool::connect(&config.database_url).await?;

        // The `sqlx::migrate!` macro embeds migrations from ./migrations;
        // applied migrations are tracked so they never run twice
        sqlx::migrate!("./migrations").run(&db).await?;

        Self::with_parts(db, Arc::new(LogMailer), config.clone())
    }

    /// Assemble state from an existing pool and mailer
    pub fn with_parts(db: SqlitePool, mailer: Arc<dyn Mailer>, config: Config) -> Result<Self> {
        let templates = Arc::new(Templates::embedded()?);

        Ok(AppState {
            db,
            mailer,
            templates,
            config: Arc::new(config),
        })
    }
}
