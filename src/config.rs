//! Application configuration loaded from environment variables.
//!
//! Loaded once in `main`, validated before the server starts.
//!
//! ## Required Variables
//!
//! - `SESSION_SIGNING_SECRET` - HMAC key for session token hashing
//! - Either `DATABASE_URL` or all of (`DB_HOST`, `DB_USER`, `DB_PASSWORD`, `DB_NAME`)
//!
//! ## Optional Variables
//!
//! - `BASE_URL` - Public origin used to compose short URLs (default: `http://localhost:3000`)
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `SESSION_TTL_SECONDS` - Session lifetime (default: 7 days)
//! - `DB_MAX_CONNECTIONS`, `DB_CONNECT_TIMEOUT`, `DB_IDLE_TIMEOUT` - Pool tuning

use anyhow::{Context, Result, bail};
use std::env;

const DEFAULT_BASE_URL: &str = "http://localhost:3000";
const DEFAULT_LISTEN: &str = "0.0.0.0:3000";
const DEFAULT_SESSION_TTL: i64 = 7 * 24 * 3600;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Public origin prepended to short codes in responses.
    pub base_url: String,
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    /// HMAC signing secret used to hash session tokens before storage.
    pub session_signing_secret: String,
    /// Session lifetime in seconds (`SESSION_TTL_SECONDS`).
    pub session_ttl_seconds: i64,
    /// Pool size (`DB_MAX_CONNECTIONS`, default: 10).
    pub db_max_connections: u32,
    /// Pool acquire timeout in seconds (`DB_CONNECT_TIMEOUT`, default: 30).
    pub db_connect_timeout: u64,
    /// Idle connection lifetime in seconds (`DB_IDLE_TIMEOUT`, default: 600).
    pub db_idle_timeout: u64,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

/// An unset variable takes the default; a set but unparseable one is a
/// configuration error, not a silent fallback.
fn parse_setting<T: std::str::FromStr>(name: &str, raw: Option<String>, default: T) -> Result<T> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| anyhow::anyhow!("{name} must be a number, got '{value}'")),
        None => Ok(default),
    }
}

fn parsed_var_or<T: std::str::FromStr>(name: &str, default: T) -> Result<T> {
    parse_setting(name, env::var(name).ok(), default)
}

impl Config {
    /// Loads and validates configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if required database configuration or the session
    /// signing secret is missing, or validation fails.
    pub fn from_env() -> Result<Self> {
        let database_url =
            Self::load_database_url().context("Failed to load database configuration")?;

        let session_signing_secret =
            env::var("SESSION_SIGNING_SECRET").context("SESSION_SIGNING_SECRET must be set")?;

        let config = Self {
            database_url,
            base_url: var_or("BASE_URL", DEFAULT_BASE_URL),
            listen_addr: var_or("LISTEN", DEFAULT_LISTEN),
            log_level: var_or("RUST_LOG", "info"),
            log_format: var_or("LOG_FORMAT", "text"),
            session_signing_secret,
            session_ttl_seconds: parsed_var_or("SESSION_TTL_SECONDS", DEFAULT_SESSION_TTL)?,
            db_max_connections: parsed_var_or("DB_MAX_CONNECTIONS", 10)?,
            db_connect_timeout: parsed_var_or("DB_CONNECT_TIMEOUT", 30)?,
            db_idle_timeout: parsed_var_or("DB_IDLE_TIMEOUT", 600)?,
        };

        config.validate()?;
        Ok(config)
    }

    /// `DATABASE_URL` wins; otherwise the URL is assembled from `DB_*`
    /// components.
    fn load_database_url() -> Result<String> {
        if let Ok(url) = env::var("DATABASE_URL") {
            return Ok(url);
        }

        let host = var_or("DB_HOST", "localhost");
        let port = var_or("DB_PORT", "5432");
        let user =
            env::var("DB_USER").context("DB_USER must be set when DATABASE_URL is not provided")?;
        let password = env::var("DB_PASSWORD")
            .context("DB_PASSWORD must be set when DATABASE_URL is not provided")?;
        let name =
            env::var("DB_NAME").context("DB_NAME must be set when DATABASE_URL is not provided")?;

        Ok(format!("postgres://{user}:{password}@{host}:{port}/{name}"))
    }

    fn validate(&self) -> Result<()> {
        if !self.database_url.starts_with("postgres://")
            && !self.database_url.starts_with("postgresql://")
        {
            bail!("DATABASE_URL must be a postgres:// or postgresql:// URL");
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            bail!("BASE_URL must be an http(s) origin, got '{}'", self.base_url);
        }

        if !self.listen_addr.contains(':') {
            bail!("LISTEN must be in 'host:port' form, got '{}'", self.listen_addr);
        }

        if self.log_format != "text" && self.log_format != "json" {
            bail!("LOG_FORMAT must be 'text' or 'json', got '{}'", self.log_format);
        }

        if self.session_signing_secret.is_empty() {
            bail!("SESSION_SIGNING_SECRET must not be empty");
        }

        if self.session_ttl_seconds <= 0 {
            bail!("SESSION_TTL_SECONDS must be positive");
        }

        if self.db_max_connections == 0 {
            bail!("DB_MAX_CONNECTIONS must be at least 1");
        }

        Ok(())
    }
}
