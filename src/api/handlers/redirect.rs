//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its target URL, counting the click.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// The click counter is incremented before the redirect is served
/// (increment-then-redirect); the response is `302 Found` with the target
/// in `Location`. Unknown codes yield a plain `404` with no JSON body, so
/// browsers hitting a dead link see an ordinary not-found page.
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let link = match state.link_service.resolve_link(&code).await {
        Ok(link) => link,
        Err(AppError::NotFound { .. }) => {
            return Ok((StatusCode::NOT_FOUND, "Not Found").into_response());
        }
        Err(e) => return Err(e),
    };

    debug!(code = %link.code, clicks = link.clicks, "redirecting");

    let location = HeaderValue::from_str(&link.target_url).map_err(|_| {
        AppError::internal(
            "Stored target URL is not a valid header value",
            serde_json::json!({ "code": link.code }),
        )
    })?;

    Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response())
}
