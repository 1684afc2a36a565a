//! Account registration and cookie-session authentication.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::password_hash::rand_core::OsRng;
use argon2::Argon2;
use chrono::{Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use std::sync::Arc;

use crate::domain::entities::{NewUser, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;
use serde_json::json;

type HmacSha256 = Hmac<Sha256>;

/// Service for registering users and managing login sessions.
///
/// Passwords are stored as argon2 PHC strings. Session tokens are opaque
/// random values handed to the client in a cookie; only their HMAC-SHA256
/// hash (keyed by `signing_secret`) is persisted, so a database leak does
/// not expose usable sessions.
pub struct AuthService<R: UserRepository> {
    repository: Arc<R>,
    signing_secret: String,
    session_ttl_seconds: i64,
}

impl<R: UserRepository> AuthService<R> {
    /// Creates a new authentication service.
    pub fn new(repository: Arc<R>, signing_secret: String, session_ttl_seconds: i64) -> Self {
        Self {
            repository,
            signing_secret,
            session_ttl_seconds,
        }
    }

    /// Session lifetime in seconds, for cookie `Max-Age`.
    pub fn session_ttl_seconds(&self) -> i64 {
        self.session_ttl_seconds
    }

    /// Registers a new user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] when the email is already registered,
    /// [`AppError::Internal`] if password hashing fails.
    pub async fn register(&self, email: String, password: &str) -> Result<User, AppError> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                AppError::internal("Failed to hash password", json!({ "reason": e.to_string() }))
            })?
            .to_string();

        self.repository
            .create_user(NewUser {
                email: email.clone(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                AppError::Conflict { .. } => {
                    AppError::conflict("Email already registered", json!({ "email": email }))
                }
                other => other,
            })
    }

    /// Verifies credentials and opens a session.
    ///
    /// Returns the user together with the raw session token to be placed in
    /// the cookie. The token is not recoverable afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for an unknown email or a wrong
    /// password; the two cases are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, String), AppError> {
        let user = self
            .repository
            .find_by_email(email)
            .await?
            .ok_or_else(Self::bad_credentials)?;

        let parsed = PasswordHash::new(&user.password_hash).map_err(|e| {
            AppError::internal("Stored password hash is invalid", json!({ "reason": e.to_string() }))
        })?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .map_err(|_| Self::bad_credentials())?;

        // Expired rows are invisible to lookups; login is the cleanup point.
        let purged = self.repository.purge_expired_sessions().await?;
        if purged > 0 {
            tracing::debug!(purged, "removed expired sessions");
        }

        let token = Self::generate_token()?;
        let expires_at = Utc::now() + Duration::seconds(self.session_ttl_seconds);

        self.repository
            .create_session(&self.hash_token(&token), user.id, expires_at)
            .await?;

        Ok((user, token))
    }

    /// Resolves a raw session token to its user.
    ///
    /// Missing, unknown, and expired sessions all yield `Ok(None)`; the
    /// attach-user middleware treats the request as anonymous rather than
    /// failing it.
    pub async fn current_user(&self, token: &str) -> Result<Option<User>, AppError> {
        self.repository
            .find_session_user(&self.hash_token(token))
            .await
    }

    /// Closes the session behind a raw token. Unknown tokens are a no-op.
    pub async fn logout(&self, token: &str) -> Result<(), AppError> {
        self.repository.delete_session(&self.hash_token(token)).await
    }

    /// Hashes a raw token with HMAC-SHA256 using the server signing secret.
    fn hash_token(&self, token: &str) -> String {
        let mut mac = HmacSha256::new_from_slice(self.signing_secret.as_bytes())
            .expect("HMAC accepts any key length");
        mac.update(token.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    /// Generates an opaque 64-character hex session token.
    fn generate_token() -> Result<String, AppError> {
        let mut buffer = [0u8; 32];
        getrandom::fill(&mut buffer).map_err(|e| {
            AppError::internal("System RNG failure", json!({ "reason": e.to_string() }))
        })?;
        Ok(hex::encode(buffer))
    }

    fn bad_credentials() -> AppError {
        AppError::unauthorized("Invalid email or password", json!({}))
    }
}
