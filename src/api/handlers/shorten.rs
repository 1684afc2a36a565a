//! Handler for the link creation endpoint.

use axum::{Extension, Json, extract::State};
use validator::Validate;

use crate::api::dto::shorten::{CreateLinkRequest, CreateLinkResponse};
use crate::api::middleware::auth::CurrentUser;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for a target URL.
///
/// # Endpoint
///
/// `POST /api/create`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/a/b/c", "custom_code": "promo" }
/// ```
///
/// `custom_code` is optional and requires an authenticated session; the
/// identity is taken from the session cookie resolved by the attach-user
/// middleware. Anonymous callers receive a generated code.
///
/// # Response
///
/// ```json
/// { "short_url": "http://host/xY3kAz7", "code": "xY3kAz7" }
/// ```
///
/// # Errors
///
/// - 400 - invalid URL, invalid custom code, or custom code already taken
/// - 401 - custom code requested without a session
/// - 500 - generation retry budget exhausted or storage failure
pub async fn create_link_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(payload): Json<CreateLinkRequest>,
) -> Result<Json<CreateLinkResponse>, AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_link(payload.url, payload.custom_code, user.map(|u| u.id))
        .await?;

    let short_url = state.link_service.short_url(&link.code);

    Ok(Json(CreateLinkResponse {
        short_url,
        code: link.code,
    }))
}
