//! API route configuration.
//!
//! Every `/api` route runs behind the attach-user middleware, so handlers
//! always see a [`crate::api::middleware::auth::CurrentUser`] extension.
//! Owner-only routes additionally require a live session.

use crate::api::handlers::{
    create_link_handler, delete_link_handler, list_links_handler, login_handler, logout_handler,
    me_handler, qr_download_handler, qr_image_handler, qr_info_handler, register_handler,
};
use crate::api::middleware::auth;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

/// All `/api` routes.
///
/// # Endpoints
///
/// - `POST   /create`            - Shorten a URL (anonymous or owned)
/// - `POST   /auth/register`     - Create an account
/// - `POST   /auth/login`        - Open a session (sets cookie)
/// - `POST   /auth/logout`       - Close the session
/// - `GET    /auth/me`           - Current user (session required)
/// - `GET    /links`             - Own links with click counts (session required)
/// - `DELETE /links/{code}`      - Delete an own link (session required)
/// - `GET    /qr/{code}`         - QR PNG for a short link
/// - `GET    /qr/{code}/info`    - QR metadata
/// - `GET    /qr/{code}/download`- QR PNG as attachment
pub fn api_routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/auth/me", get(me_handler))
        .route("/links", get(list_links_handler))
        .route("/links/{code}", delete(delete_link_handler))
        .route_layer(middleware::from_fn(auth::require_user));

    let public = Router::new()
        .route("/create", post(create_link_handler))
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler))
        .route("/qr/{code}", get(qr_image_handler))
        .route("/qr/{code}/info", get(qr_info_handler))
        .route("/qr/{code}/download", get(qr_download_handler));

    protected
        .merge(public)
        .layer(middleware::from_fn_with_state(state, auth::attach_user))
}
