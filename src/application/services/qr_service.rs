//! QR code rendering for short URLs.

use image::{DynamicImage, ImageBuffer, ImageFormat, Luma, imageops};
use qrcode::{EcLevel, QrCode};
use serde_json::json;
use std::io::Cursor;

use crate::error::AppError;

/// Smallest accepted image edge in pixels.
pub const MIN_SIZE: u32 = 150;
/// Largest accepted image edge in pixels.
pub const MAX_SIZE: u32 = 1000;
/// Default image edge in pixels.
pub const DEFAULT_SIZE: u32 = 300;
/// Default quiet-zone width in modules.
pub const DEFAULT_MARGIN: u32 = 4;
/// Widest accepted quiet zone in modules.
pub const MAX_MARGIN: u32 = 20;

/// Rendering options for a QR image.
#[derive(Debug, Clone, Copy)]
pub struct QrOptions {
    /// Minimum edge length of the output image in pixels.
    pub size: u32,
    /// Quiet-zone width in modules; 0 disables the border.
    pub margin: u32,
    pub ec_level: EcLevel,
}

impl Default for QrOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            margin: DEFAULT_MARGIN,
            ec_level: EcLevel::M,
        }
    }
}

/// Parses a single-letter error correction level (`L`, `M`, `Q`, `H`).
///
/// # Errors
///
/// Returns [`AppError::Validation`] for anything else.
pub fn parse_ec_level(value: &str) -> Result<EcLevel, AppError> {
    match value {
        "L" | "l" => Ok(EcLevel::L),
        "M" | "m" => Ok(EcLevel::M),
        "Q" | "q" => Ok(EcLevel::Q),
        "H" | "h" => Ok(EcLevel::H),
        other => Err(AppError::bad_request(
            "Error correction level must be one of L, M, Q, H",
            json!({ "provided": other }),
        )),
    }
}

/// Renders `data` as a PNG-encoded QR image.
///
/// The quiet zone is drawn here rather than by the QR renderer, so the
/// configured `margin` width in modules is honored exactly: the code is
/// rendered borderless and centered on a white canvas `margin` modules
/// wider on every side.
///
/// # Errors
///
/// Returns [`AppError::Validation`] when `size` is outside
/// [`MIN_SIZE`]..=[`MAX_SIZE`] or `margin` exceeds [`MAX_MARGIN`],
/// [`AppError::Internal`] when encoding fails.
pub fn render_png(data: &str, options: QrOptions) -> Result<Vec<u8>, AppError> {
    if options.size < MIN_SIZE || options.size > MAX_SIZE {
        return Err(AppError::bad_request(
            "QR size out of range",
            json!({ "min": MIN_SIZE, "max": MAX_SIZE, "provided": options.size }),
        ));
    }

    if options.margin > MAX_MARGIN {
        return Err(AppError::bad_request(
            "QR margin out of range",
            json!({ "max": MAX_MARGIN, "provided": options.margin }),
        ));
    }

    let code = QrCode::with_error_correction_level(data, options.ec_level).map_err(|e| {
        AppError::internal("Failed to build QR code", json!({ "reason": e.to_string() }))
    })?;

    // Module scale chosen so code plus quiet zone reaches the requested
    // minimum edge.
    let modules = code.width() as u32;
    let total_modules = modules + 2 * options.margin;
    let scale = options.size.div_ceil(total_modules).max(1);

    let rendered = code
        .render::<Luma<u8>>()
        .quiet_zone(false)
        .module_dimensions(scale, scale)
        .build();

    let edge = total_modules * scale;
    let offset = i64::from(options.margin * scale);
    let mut canvas = ImageBuffer::from_pixel(edge, edge, Luma([255u8]));
    imageops::overlay(&mut canvas, &rendered, offset, offset);

    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageLuma8(canvas)
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(|e| {
            AppError::internal("Failed to encode QR image", json!({ "reason": e.to_string() }))
        })?;

    Ok(buffer.into_inner())
}
