//! DTOs for the link management endpoints.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// JSON representation of a link in owner-facing listings.
#[derive(Debug, Serialize)]
pub struct LinkResponse {
    pub code: String,
    pub target_url: String,
    pub short_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

/// Listing of a user's links, most recent first.
#[derive(Debug, Serialize)]
pub struct LinkListResponse {
    pub total: usize,
    pub links: Vec<LinkResponse>,
}
