//! Handlers for registration, login, logout, and session introspection.

use axum::{
    Extension, Json,
    extract::{Request, State},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use validator::Validate;

use crate::api::dto::auth::{LoginRequest, RegisterRequest, UserResponse};
use crate::api::middleware::auth::{CurrentUser, SESSION_COOKIE, session_token};
use crate::error::AppError;
use crate::state::AppState;

/// Registers a new account.
///
/// # Endpoint
///
/// `POST /api/auth/register`
///
/// # Errors
///
/// - 400 - invalid email or password shorter than 8 characters
/// - 400 - email already registered
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    payload.validate()?;

    let user = state
        .auth_service
        .register(payload.email, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Verifies credentials and sets the session cookie.
///
/// # Endpoint
///
/// `POST /api/auth/login`
///
/// # Errors
///
/// Returns 401 for unknown email or wrong password.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Response, AppError> {
    let (user, token) = state
        .auth_service
        .login(&payload.email, &payload.password)
        .await?;

    let cookie = format!(
        "{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        state.auth_service.session_ttl_seconds()
    );
    let cookie = HeaderValue::from_str(&cookie)
        .map_err(|_| AppError::internal("Failed to build session cookie", serde_json::json!({})))?;

    let mut response = Json(UserResponse::from(user)).into_response();
    response.headers_mut().insert(header::SET_COOKIE, cookie);

    Ok(response)
}

/// Closes the current session and clears the cookie.
///
/// # Endpoint
///
/// `POST /api/auth/logout`
///
/// Always succeeds, even without a live session.
pub async fn logout_handler(State(state): State<AppState>, req: Request) -> Result<Response, AppError> {
    if let Some(token) = session_token(&req) {
        state.auth_service.logout(&token).await?;
    }

    let mut response = StatusCode::NO_CONTENT.into_response();
    response.headers_mut().insert(
        header::SET_COOKIE,
        HeaderValue::from_static(CLEAR_COOKIE),
    );

    Ok(response)
}

/// Returns the authenticated user behind the session cookie.
///
/// # Endpoint
///
/// `GET /api/auth/me` (session required)
pub async fn me_handler(
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<UserResponse>, AppError> {
    let user = user.ok_or_else(|| {
        AppError::unauthorized("Authentication required", serde_json::json!({}))
    })?;

    Ok(Json(UserResponse::from(user)))
}

/// Expires the session cookie immediately.
const CLEAR_COOKIE: &str = "session=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0";
