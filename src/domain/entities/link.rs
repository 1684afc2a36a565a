//! Link entity representing a shortened URL mapping.

use chrono::{DateTime, Utc};

/// A shortened URL with its click counter.
///
/// `code` is unique across all links and immutable once created. `owner_id`
/// is present only for links created by an authenticated user.
#[derive(Debug, Clone)]
pub struct Link {
    pub id: i64,
    pub code: String,
    pub target_url: String,
    pub owner_id: Option<i64>,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

impl Link {
    /// Builds a link from its stored fields.
    pub fn new(
        id: i64,
        code: String,
        target_url: String,
        owner_id: Option<i64>,
        clicks: i64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            code,
            target_url,
            owner_id,
            clicks,
            created_at,
        }
    }

    /// Returns true when the link belongs to the given user.
    pub fn is_owned_by(&self, user_id: i64) -> bool {
        self.owner_id == Some(user_id)
    }
}

/// Input data for creating a new link.
#[derive(Debug, Clone)]
pub struct NewLink {
    pub code: String,
    pub target_url: String,
    pub owner_id: Option<i64>,
}
