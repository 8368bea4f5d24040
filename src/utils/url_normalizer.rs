//! Long URL normalization and validation.
//!
//! Submitted URLs are trimmed and then checked to be absolute `http`/`https`
//! URLs with a host. The trimmed text itself is what gets stored, so a URL
//! always redirects to exactly what the client submitted.

use url::Url;

/// Upper bound on accepted URL length, in bytes.
pub const MAX_URL_LENGTH: usize = 2048;

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("URL is empty")]
    Empty,

    #[error("URL exceeds {MAX_URL_LENGTH} bytes")]
    TooLong,

    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL has no host")]
    MissingHost,
}

/// Normalizes a submitted long URL to the form used as the deduplication key.
///
/// # Rules
///
/// 1. Surrounding whitespace is trimmed
/// 2. The result must parse as an absolute URL
/// 3. Only `http` and `https` schemes are allowed
/// 4. A non-empty host is required
///
/// # Errors
///
/// Returns an [`UrlNormalizationError`] describing the first rule violated.
///
/// # Examples
///
/// ```
/// use seqlink::utils::url_normalizer::normalize_url;
///
/// assert_eq!(
///     normalize_url("  https://example.com/a \n").unwrap(),
///     "https://example.com/a"
/// );
/// assert!(normalize_url("not a url").is_err());
/// ```
pub fn normalize_url(input: &str) -> Result<String, UrlNormalizationError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlNormalizationError::Empty);
    }
    if trimmed.len() > MAX_URL_LENGTH {
        return Err(UrlNormalizationError::TooLong);
    }

    let url =
        Url::parse(trimmed).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlNormalizationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlNormalizationError::MissingHost);
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_keeps_valid_url_verbatim() {
        assert_eq!(
            normalize_url("https://example.com/a").unwrap(),
            "https://example.com/a"
        );
        assert_eq!(
            normalize_url("http://example.com").unwrap(),
            "http://example.com"
        );
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(
            normalize_url("  \thttps://example.com/path?q=1\n").unwrap(),
            "https://example.com/path?q=1"
        );
    }

    #[test]
    fn test_normalize_preserves_query_and_fragment() {
        assert_eq!(
            normalize_url("https://example.com/page?key=VALUE#section").unwrap(),
            "https://example.com/page?key=VALUE#section"
        );
    }

    #[test]
    fn test_normalize_ip_and_port() {
        assert!(normalize_url("http://192.168.1.1:8080/api").is_ok());
        assert!(normalize_url("http://localhost:3000/test").is_ok());
    }

    #[test]
    fn test_normalize_invalid_url() {
        assert!(matches!(
            normalize_url("not a url").unwrap_err(),
            UrlNormalizationError::InvalidFormat(_)
        ));
    }

    #[test]
    fn test_normalize_no_protocol() {
        assert!(matches!(
            normalize_url("example.com").unwrap_err(),
            UrlNormalizationError::InvalidFormat(_)
        ));
    }

    #[test]
    fn test_normalize_empty_and_blank() {
        assert!(matches!(
            normalize_url("").unwrap_err(),
            UrlNormalizationError::Empty
        ));
        assert!(matches!(
            normalize_url("   ").unwrap_err(),
            UrlNormalizationError::Empty
        ));
    }

    #[test]
    fn test_normalize_rejects_other_schemes() {
        for input in [
            "ftp://example.com/file.txt",
            "file:///home/user/document.txt",
            "javascript:alert('xss')",
            "data:text/plain,Hello",
            "mailto:test@example.com",
        ] {
            assert!(
                matches!(
                    normalize_url(input).unwrap_err(),
                    UrlNormalizationError::UnsupportedProtocol
                ),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_normalize_too_long() {
        let url = format!("https://example.com/{}", "a".repeat(MAX_URL_LENGTH));
        assert!(matches!(
            normalize_url(&url).unwrap_err(),
            UrlNormalizationError::TooLong
        ));
    }

    #[test]
    fn test_normalize_unicode_domain() {
        assert!(normalize_url("https://münchen.de").is_ok());
    }
}
