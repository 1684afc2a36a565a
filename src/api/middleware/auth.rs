//! Session-cookie authentication middleware.
//!
//! Two layers cooperate:
//!
//! - [`attach_user`] runs on every `/api` request, resolving the `session`
//!   cookie to an optional current user and storing it as a request
//!   extension. Missing or invalid cookies attach nobody; the request
//!   proceeds anonymously.
//! - [`require_user`] guards owner-only routes and rejects anonymous
//!   requests with `401 Unauthorized`.

use axum::{
    Extension,
    extract::{Request, State},
    http::header::COOKIE,
    middleware::Next,
    response::Response,
};

use crate::domain::entities::User;
use crate::error::AppError;
use crate::state::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session";

/// The requester's identity, attached to every `/api` request.
#[derive(Clone)]
pub struct CurrentUser(pub Option<User>);

/// Extracts the session cookie value from a request, if present.
pub fn session_token(req: &Request) -> Option<String> {
    req.headers()
        .get(COOKIE)
        .and_then(|cookie_header| cookie_header.to_str().ok())
        .and_then(|cookie_str| {
            cookie_str.split(';').find_map(|cookie| {
                let mut parts = cookie.trim().splitn(2, '=');
                match (parts.next(), parts.next()) {
                    (Some(SESSION_COOKIE), Some(value)) => Some(value.to_string()),
                    _ => None,
                }
            })
        })
}

/// Resolves the session cookie to a [`CurrentUser`] extension.
///
/// A storage failure during lookup is the only error path; an invalid or
/// expired session is simply an anonymous request.
pub async fn attach_user(
    State(st): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = match session_token(&req) {
        Some(token) => st.auth_service.current_user(&token).await?,
        None => None,
    };

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

/// Rejects requests that [`attach_user`] left anonymous.
pub async fn require_user(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if user.is_none() {
        return Err(AppError::unauthorized(
            "Authentication required",
            serde_json::json!({}),
        ));
    }

    Ok(next.run(req).await)
}
