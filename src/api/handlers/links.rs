//! Handlers for owner-facing link management.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::api::dto::links::{LinkListResponse, LinkResponse};
use crate::api::middleware::auth::CurrentUser;
use crate::domain::entities::User;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the authenticated user's links, most recent first.
///
/// # Endpoint
///
/// `GET /api/links` (session required)
pub async fn list_links_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<LinkListResponse>, AppError> {
    let user = require(user)?;

    let links = state.link_service.links_for_owner(user.id).await?;

    let links: Vec<LinkResponse> = links
        .into_iter()
        .map(|link| LinkResponse {
            short_url: state.link_service.short_url(&link.code),
            code: link.code,
            target_url: link.target_url,
            clicks: link.clicks,
            created_at: link.created_at,
        })
        .collect();

    Ok(Json(LinkListResponse {
        total: links.len(),
        links,
    }))
}

/// Deletes one of the authenticated user's links.
///
/// # Endpoint
///
/// `DELETE /api/links/{code}` (session required)
///
/// # Errors
///
/// Returns 404 when the code is unknown or belongs to another user.
pub async fn delete_link_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(code): Path<String>,
) -> Result<StatusCode, AppError> {
    let user = require(user)?;

    state.link_service.delete_link(&code, user.id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// The require_user middleware guards these routes; this is the typed
/// unwrap behind it.
fn require(user: Option<User>) -> Result<User, AppError> {
    user.ok_or_else(|| AppError::unauthorized("Authentication required", serde_json::json!({})))
}
