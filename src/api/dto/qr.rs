//! DTOs for the QR code endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Query parameters accepted by the QR image endpoints.
#[derive(Debug, Deserialize, Default)]
pub struct QrQuery {
    /// Minimum image edge in pixels (150..=1000, default 300).
    pub size: Option<u32>,
    /// Quiet-zone width in modules (0..=20, default 4, 0 disables).
    pub margin: Option<u32>,
    /// Error correction level: L, M, Q, or H (default M).
    pub ec: Option<String>,
}

/// Metadata about a link's QR code without rendering it.
#[derive(Debug, Serialize)]
pub struct QrInfoResponse {
    pub code: String,
    pub short_url: String,
    pub target_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
    pub endpoints: QrEndpoints,
}

/// Where to fetch the rendered image.
#[derive(Debug, Serialize)]
pub struct QrEndpoints {
    pub image: String,
    pub download: String,
}
