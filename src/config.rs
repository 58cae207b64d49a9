//! # Configuration Management
//!
//! This module handles loading configuration from environment variables.
//! It uses the "12-factor app" methodology where configuration comes from the environment.
//!
//! ## Environment Variables
//! - `HOST`: Server bind address (default: 127.0.0.1)
//! - `PORT`: Server port (default: 8080)
//! - `DATABASE_URL`: SQLite database connection string
//! - `STATIC_DIR`: Directory served for unmatched paths (the browser frontend)
//! - `SESSION_EXPIRY_HOURS`: Inactivity window before a session expires
//! - `SITE_NAME` / `SITE_DOMAIN` / `USE_HTTPS`: Used to build password reset links
//! - `DEFAULT_FROM_EMAIL`: Sender address for outgoing mail
//! - `PASSWORD_RESET_TIMEOUT_MINUTES`: Lifetime of a password reset token
//! - `CSRF_PROTECTION`: Set to `false` to disable the CSRF check

use anyhow::{Context, Result};
use std::env;

/// Application configuration
///
/// This struct holds all configuration values needed to run the server.
/// All fields are public for easy access from other modules (and so tests
/// can build one by hand).
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host/IP address to bind to
    /// Examples: "127.0.0.1" (localhost only), "0.0.0.0" (all interfaces)
    pub host: String,

    /// Server port number (1-65535)
    pub port: u16,

    /// SQLite database connection URL
    /// Format: "sqlite:filename.db?mode=rwc"
    /// The "mode=rwc" means: read, write, create if not exists
    pub database_url: String,

    /// Directory with the static frontend (index.html, scripts, styles)
    pub static_dir: String,

    /// Hours of inactivity after which a session is discarded
    pub session_expiry_hours: i64,

    /// Human-readable site name, rendered into password reset emails
    pub site_name: String,

    /// Public host (and port) of the site, used to build reset links
    pub site_domain: String,

    /// Whether reset links use https
    pub use_https: bool,

    /// "From" address of every outgoing email
    pub default_from_email: String,

    /// How long a password reset token stays valid
    pub password_reset_timeout_minutes: i64,

    /// Enables the double-submit CSRF check on state-changing routes
    pub csrf_protection: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            host: "127.0.0.1".to_string(),
            port: 8080,
            database_url: "sqlite:auth.db?mode=rwc".to_string(),
            static_dir: "static".to_string(),
            session_expiry_hours: 24,
            site_name: "localhost".to_string(),
            site_domain: "localhost:8080".to_string(),
            use_https: false,
            default_from_email: "webmaster@localhost".to_string(),
            // Three days
            password_reset_timeout_minutes: 3 * 24 * 60,
            csrf_protection: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads variables from .env file (if present) using dotenvy
    /// 2. Reads each configuration value from environment
    /// 3. Falls back to the defaults if variables aren't set
    /// 4. Returns an error if parsing fails (e.g., invalid port number)
    ///
    /// ## Example .env file
    /// ```text
    /// HOST=127.0.0.1
    /// PORT=8080
    /// DATABASE_URL=sqlite:auth.db?mode=rwc
    /// SITE_DOMAIN=example.com
    /// USE_HTTPS=true
    /// ```
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (dotenvy doesn't error if file missing)
        dotenvy::dotenv().ok();

        let defaults = Config::default();

        Ok(Config {
            host: env::var("HOST").unwrap_or(defaults.host),
            port: parse_var("PORT", defaults.port)?,
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            static_dir: env::var("STATIC_DIR").unwrap_or(defaults.static_dir),
            session_expiry_hours: parse_var("SESSION_EXPIRY_HOURS", defaults.session_expiry_hours)?,
            site_name: env::var("SITE_NAME").unwrap_or(defaults.site_name),
            site_domain: env::var("SITE_DOMAIN").unwrap_or(defaults.site_domain),
            use_https: parse_var("USE_HTTPS", defaults.use_https)?,
            default_from_email: env::var("DEFAULT_FROM_EMAIL")
                .unwrap_or(defaults.default_from_email),
            password_reset_timeout_minutes: parse_var(
                "PASSWORD_RESET_TIMEOUT_MINUTES",
                defaults.password_reset_timeout_minutes,
            )?,
            csrf_protection: parse_var("CSRF_PROTECTION", defaults.csrf_protection)?,
        })
    }

    /// Get the socket address to bind the server to
    ///
    /// Combines host and port into a format suitable for TCP binding.
    /// Example: "127.0.0.1:8080"
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// URL scheme used in links sent to users
    pub fn protocol(&self) -> &'static str {
        if self.use_https {
            "https"
        } else {
            "http"
        }
    }
}

/// Read and parse an optional variable, keeping `default` when it is unset.
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("invalid value for {name}: {raw:?}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_address_joins_host_and_port() {
        let config = Config {
            host: "0.0.0.0".to_string(),
            port: 9000,
            ..Config::default()
        };
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
    }

    #[test]
    fn protocol_follows_https_flag() {
        let mut config = Config::default();
        assert_eq!(config.protocol(), "http");
        config.use_https = true;
        assert_eq!(config.protocol(), "https");
    }

    #[test]
    fn parse_var_rejects_garbage() {
        env::set_var("SESSION_AUTH_TEST_BAD_PORT", "eighty");
        let parsed: Result<u16> = parse_var("SESSION_AUTH_TEST_BAD_PORT", 8080);
        assert!(parsed.is_err());
        env::remove_var("SESSION_AUTH_TEST_BAD_PORT");
    }

    #[test]
    fn parse_var_falls_back_to_default() {
        let parsed: u16 = parse_var("SESSION_AUTH_TEST_UNSET_VAR", 1234).unwrap();
        assert_eq!(parsed, 1234);
    }
}
