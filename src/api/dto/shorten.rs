//! DTOs for the link creation endpoint.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use validator::Validate;

/// Compiled regex for custom code characters. Length and edge-hyphen rules
/// are enforced by the service layer.
static CUSTOM_CODE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]+$").unwrap());

/// Request to shorten a URL.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateLinkRequest {
    /// The original URL to shorten (must be valid HTTP/HTTPS).
    #[validate(url(message = "Invalid URL format"))]
    pub url: String,

    /// Optional caller-chosen short code; authenticated callers only.
    #[validate(length(min = 3, max = 32))]
    #[validate(regex(path = "*CUSTOM_CODE_REGEX"))]
    pub custom_code: Option<String>,
}

/// Response for a created link. `short_url` is the canonical field.
#[derive(Debug, Serialize)]
pub struct CreateLinkResponse {
    pub short_url: String,
    pub code: String,
}
