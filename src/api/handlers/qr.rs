//! Handlers for QR code endpoints.
//!
//! A QR render is an existence check, not a visit: these handlers read the
//! link without touching the click counter.

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};

use crate::api::dto::qr::{QrEndpoints, QrInfoResponse, QrQuery};
use crate::api::middleware::auth::CurrentUser;
use crate::application::services::qr_service::{self, QrOptions};
use crate::domain::entities::{Link, User};
use crate::error::AppError;
use crate::state::AppState;

/// Returns a QR code PNG for a short link.
///
/// # Endpoint
///
/// `GET /api/qr/{code}?size=300&margin=4&ec=M`
///
/// The image encodes the full short URL. Responses carry a one-day
/// `Cache-Control` since the encoded URL never changes.
///
/// # Errors
///
/// - 400 - size out of range or unknown error correction level
/// - 404 - unknown code, or a link owned by a different user
pub async fn qr_image_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(code): Path<String>,
    Query(params): Query<QrQuery>,
) -> Result<Response, AppError> {
    let link = visible_link(&state, &code, user.as_ref()).await?;
    let png = render(&state, &link, &params)?;

    let mut response = png_response(png);
    response.headers_mut().insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("public, max-age=86400"),
    );
    set_disposition(&mut response, &format!("inline; filename=\"qr-{code}.png\""))?;

    Ok(response)
}

/// Returns the QR code PNG as a file download.
///
/// # Endpoint
///
/// `GET /api/qr/{code}/download?size=300`
pub async fn qr_download_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(code): Path<String>,
    Query(params): Query<QrQuery>,
) -> Result<Response, AppError> {
    let link = visible_link(&state, &code, user.as_ref()).await?;
    let png = render(&state, &link, &params)?;

    let mut response = png_response(png);
    set_disposition(
        &mut response,
        &format!("attachment; filename=\"qr-code-{code}.png\""),
    )?;

    Ok(response)
}

/// Returns QR metadata for a short link without rendering an image.
///
/// # Endpoint
///
/// `GET /api/qr/{code}/info`
pub async fn qr_info_handler(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(code): Path<String>,
) -> Result<Json<QrInfoResponse>, AppError> {
    let link = visible_link(&state, &code, user.as_ref()).await?;

    let short_url = state.link_service.short_url(&link.code);

    Ok(Json(QrInfoResponse {
        endpoints: QrEndpoints {
            image: format!("/api/qr/{}", link.code),
            download: format!("/api/qr/{}/download", link.code),
        },
        code: link.code,
        short_url,
        target_url: link.target_url,
        clicks: link.clicks,
        created_at: link.created_at,
    }))
}

/// Fetches a link without counting a click, hiding other users' links.
///
/// An authenticated requester asking about a link owned by someone else
/// gets the same 404 as for an unknown code.
async fn visible_link(
    state: &AppState,
    code: &str,
    user: Option<&User>,
) -> Result<Link, AppError> {
    let link = state.link_service.peek_link(code).await?;

    if let Some(user) = user {
        if link.owner_id.is_some() && !link.is_owned_by(user.id) {
            return Err(AppError::not_found(
                "Short link not found",
                serde_json::json!({ "code": code }),
            ));
        }
    }

    Ok(link)
}

fn render(state: &AppState, link: &Link, params: &QrQuery) -> Result<Vec<u8>, AppError> {
    let options = QrOptions {
        size: params.size.unwrap_or(qr_service::DEFAULT_SIZE),
        margin: params.margin.unwrap_or(qr_service::DEFAULT_MARGIN),
        ec_level: params
            .ec
            .as_deref()
            .map(qr_service::parse_ec_level)
            .transpose()?
            .unwrap_or(qrcode::EcLevel::M),
    };

    qr_service::render_png(&state.link_service.short_url(&link.code), options)
}

fn png_response(png: Vec<u8>) -> Response {
    ([(header::CONTENT_TYPE, HeaderValue::from_static("image/png"))], png).into_response()
}

fn set_disposition(response: &mut Response, value: &str) -> Result<(), AppError> {
    let value = HeaderValue::from_str(value).map_err(|_| {
        AppError::internal("Invalid content disposition", serde_json::json!({}))
    })?;
    response
        .headers_mut()
        .insert(header::CONTENT_DISPOSITION, value);
    Ok(())
}
