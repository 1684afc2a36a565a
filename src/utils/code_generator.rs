//! Short code generation and validation.
//!
//! Generated codes are short random tokens; they carry no uniqueness
//! guarantee of their own. The database's unique index on `links.code` is
//! the arbiter, and the service layer retries on collision.

use crate::error::AppError;
use rand::Rng;
use serde_json::json;

/// Alphabet for generated codes: URL-safe with no separators.
const CODE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of generated short codes.
const CODE_LENGTH: usize = 7;

/// Custom code length bounds.
const CUSTOM_CODE_MIN: usize = 3;
const CUSTOM_CODE_MAX: usize = 32;

/// Codes reserved for system endpoints to prevent routing conflicts.
const RESERVED_CODES: &[&str] = &["api", "health", "static", "create", "qr"];

/// Generates a random 7-character short code.
///
/// Drawn uniformly from letters and digits, 62^7 possible values. This
/// operation cannot fail.
pub fn generate_code() -> String {
    let mut rng = rand::rng();

    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.random_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// Validates a user-chosen custom short code.
///
/// # Rules
///
/// - Length: 3-32 characters
/// - Allowed characters: ASCII letters, digits, hyphens
/// - Cannot start or end with a hyphen
/// - Cannot shadow a reserved system path
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if code.len() < CUSTOM_CODE_MIN || code.len() > CUSTOM_CODE_MAX {
        return Err(AppError::bad_request(
            "Custom code must be 3-32 characters",
            json!({ "provided_length": code.len() }),
        ));
    }

    let charset_ok = code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
    if !charset_ok {
        return Err(AppError::bad_request(
            "Custom code can only contain letters, digits, and hyphens",
            json!({ "code": code }),
        ));
    }

    // Edge hyphens survive the charset check but read badly in URLs.
    if code.starts_with('-') || code.ends_with('-') {
        return Err(AppError::bad_request(
            "Custom code cannot start or end with a hyphen",
            json!({ "code": code }),
        ));
    }

    let lowered = code.to_ascii_lowercase();
    if RESERVED_CODES.contains(&lowered.as_str()) {
        return Err(AppError::bad_request(
            "This code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}
