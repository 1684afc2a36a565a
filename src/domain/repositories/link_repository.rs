//! Repository trait for short link data access.

use crate::domain::entities::{Link, NewLink};
use crate::error::AppError;
use async_trait::async_trait;

/// Storage interface for short links, keyed by code.
///
/// The store enforces short-code uniqueness; callers handle the resulting
/// conflict (retry with a fresh generated code, or surface it for a custom
/// code).
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgLinkRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// Inserts a new link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] when the short code already exists,
    /// [`AppError::Internal`] on database errors.
    async fn insert(&self, new_link: NewLink) -> Result<Link, AppError>;

    /// Finds a link by its short code, without touching the click counter.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Atomically increments the click counter and returns the updated link.
    ///
    /// The increment happens in a single statement at the storage layer, so
    /// concurrent resolutions of the same code never lose updates. Returns
    /// `Ok(None)` when the code does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn increment_clicks(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Lists all links belonging to a user, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn find_all_by_owner(&self, owner_id: i64) -> Result<Vec<Link>, AppError>;

    /// Deletes a link if it belongs to the given user.
    ///
    /// Returns `Ok(true)` when a row was removed, `Ok(false)` when no link
    /// matched the code and owner.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete_owned(&self, code: &str, owner_id: i64) -> Result<bool, AppError>;

    /// Counts all stored links. Used by the health check.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn count(&self) -> Result<i64, AppError>;
}
