//! Target-URL validation and canonicalization.

use url::Url;

/// Errors produced while validating a target URL.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,
}

/// Validates a target URL and normalizes it to a canonical form.
///
/// The URL must be absolute and use `http` or `https`; schemes like
/// `javascript:` or `data:` are rejected outright. Normalization lowercases
/// the hostname, strips fragments, and drops default ports. Path case and
/// query parameters are preserved.
///
/// # Errors
///
/// Returns [`UrlNormalizationError::InvalidFormat`] for unparseable input
/// and [`UrlNormalizationError::UnsupportedProtocol`] for non-HTTP(S)
/// schemes.
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let mut url =
        Url::parse(input).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UrlNormalizationError::UnsupportedProtocol);
    }

    if let Some(host) = url.host_str() {
        let lowered = host.to_ascii_lowercase();
        if lowered != host {
            url.set_host(Some(&lowered))
                .map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;
        }
    }

    url.set_fragment(None);

    let default_port = matches!(
        (url.scheme(), url.port()),
        ("http", Some(80)) | ("https", Some(443))
    );
    if default_port {
        // set_port only fails for schemes that cannot carry a port.
        let _ = url.set_port(None);
    }

    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert_eq!(normalize_url("http://example.com").unwrap(), "http://example.com/");
        assert_eq!(normalize_url("https://example.com").unwrap(), "https://example.com/");
    }

    #[test]
    fn test_rejects_relative_input() {
        assert!(matches!(
            normalize_url("not a url"),
            Err(UrlNormalizationError::InvalidFormat(_))
        ));
        assert!(normalize_url("/just/a/path").is_err());
    }

    #[test]
    fn test_rejects_dangerous_schemes() {
        for input in ["javascript:alert(1)", "data:text/html,hi", "file:///etc/passwd"] {
            assert!(matches!(
                normalize_url(input),
                Err(UrlNormalizationError::UnsupportedProtocol)
            ));
        }
    }

    #[test]
    fn test_lowercases_host_preserves_path_case() {
        assert_eq!(
            normalize_url("https://EXAMPLE.COM/Path").unwrap(),
            "https://example.com/Path"
        );
    }

    #[test]
    fn test_strips_fragment() {
        assert_eq!(
            normalize_url("https://example.com/page?k=v#section").unwrap(),
            "https://example.com/page?k=v"
        );
    }

    #[test]
    fn test_drops_default_ports_only() {
        assert_eq!(
            normalize_url("https://example.com:443/a").unwrap(),
            "https://example.com/a"
        );
        assert_eq!(
            normalize_url("http://example.com:8080/a").unwrap(),
            "http://example.com:8080/a"
        );
    }

    #[test]
    fn test_preserves_query_parameters() {
        assert_eq!(
            normalize_url("https://example.com/search?q=rust&lang=en").unwrap(),
            "https://example.com/search?q=rust&lang=en"
        );
    }
}
