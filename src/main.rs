//! # Session Authentication Server
//!
//! Entry point: wires configuration, the database, session storage and the
//! HTTP middleware stack around the routes from [`session_auth_server::router`].

use session_auth_server::{config::Config, db, router, state::AppState};
// CORS (Cross-Origin Resource Sharing) - allows frontend to call API from different origin
use tower_http::cors::{Any, CorsLayer};
// Serves static files (HTML, CSS, JavaScript)
use tower_http::services::ServeDir;
// HTTP request/response tracing for debugging and monitoring
use tower_http::trace::TraceLayer;
use time::Duration;
// Session management - keeps users logged in across requests
use tower_sessions::{Expiry, SessionManagerLayer};
// SQLite-backed session storage
use tower_sessions_sqlx_store::SqliteStore;
// Structured logging setup
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main application entry point
///
/// This function:
/// 1. Sets up logging
/// 2. Loads configuration from environment variables
/// 3. Connects the database and runs migrations
/// 4. Starts a background task to purge expired password reset tokens
/// 5. Configures HTTP sessions
/// 6. Sets up routes and middleware
/// 7. Starts the HTTP server
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Default: info level for most crates, debug level for our app
    // Can be overridden with RUST_LOG environment variable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,session_auth_server=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("Configuration loaded: {:?}", config);

    // Database pool, email templates and the mailer shared by all handlers
    let app_state = AppState::new(&config).await?;
    tracing::info!("Application state initialized");

    // Reset tokens outlive their usefulness after the configured timeout;
    // sweep them every 10 minutes
    let cleanup_pool = app_state.db.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(600));
        loop {
            interval.tick().await;
            match db::reset_tokens::cleanup_expired_tokens(&cleanup_pool).await {
                Ok(purged) => tracing::debug!("Purged {} expired reset tokens", purged),
                Err(e) => tracing::error!("Reset token cleanup failed: {:?}", e),
            }
        }
    });

    // Sessions keep users logged in by storing a session ID in a cookie;
    // the session data (user id, backend) is stored server-side in SQLite
    let session_store = SqliteStore::new(app_state.db.clone());
    session_store.migrate().await?;

    let session_layer = SessionManagerLayer::new(session_store)
        .with_expiry(Expiry::OnInactivity(Duration::hours(config.session_expiry_hours)));

    // In production, restrict this to specific origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router(app_state)
        // Serve the browser frontend for everything that isn't an API route
        .fallback_service(ServeDir::new(&config.static_dir))
        // Apply middleware layers (processed in reverse order)
        .layer(session_layer)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    let bind_addr = config.bind_address();
    tracing::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
