//! User account entity.

use chrono::{DateTime, Utc};

/// A registered account that can own links.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub email: String,
    /// Argon2 PHC string; never serialized to clients.
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Input data for registering a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
}

