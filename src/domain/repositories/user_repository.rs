//! Repository trait for users and login sessions.

use chrono::{DateTime, Utc};

use crate::domain::entities::{NewUser, User};
use crate::error::AppError;
use async_trait::async_trait;

/// Storage interface for accounts and their sessions.
///
/// Sessions are stored by token hash only; the raw token never reaches the
/// database.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates a new user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] when the email is already registered,
    /// [`AppError::Internal`] on database errors.
    async fn create_user(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Stores a session for a user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn create_session(
        &self,
        token_hash: &str,
        user_id: i64,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AppError>;

    /// Deletes all expired sessions, returning the number removed.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn purge_expired_sessions(&self) -> Result<u64, AppError>;

    /// Resolves a session token hash to its user, ignoring expired sessions.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_session_user(&self, token_hash: &str) -> Result<Option<User>, AppError>;

    /// Removes a session. Removing an unknown session is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete_session(&self, token_hash: &str) -> Result<(), AppError>;
}
