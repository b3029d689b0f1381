//! Bearer token extraction from the `Authorization` header.

use axum::http::{HeaderMap, header};

const BEARER_PREFIX_LEN: usize = "Bearer ".len();

/// Return the token following `Bearer ` (scheme word matched case-insensitively,
/// exactly one space). The remainder is returned verbatim.
pub fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;

    let (scheme, rest) = value.split_at_checked(BEARER_PREFIX_LEN)?;
    if scheme.eq_ignore_ascii_case("Bearer ") {
        Some(rest)
    } else {
        None
    }
}

pub fn is_applicable(headers: &HeaderMap) -> bool {
    extract_bearer(headers).is_some()
}

/// Short, non-reversible token id for log correlation (base64url(SHA-256)).
/// The raw token must never reach the logs.
pub fn fingerprint(token: &str) -> String {
    use base64::Engine as _;
    use sha2::{Digest, Sha256};

    let digest = Sha256::digest(token.as_bytes());
    let mut encoded = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(digest);
    encoded.truncate(12);
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(authorization: &'static str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static(authorization));
        headers
    }

    #[test]
    fn missing_header_is_not_applicable() {
        let headers = HeaderMap::new();
        assert_eq!(extract_bearer(&headers), None);
        assert!(!is_applicable(&headers));
    }

    #[test]
    fn basic_scheme_is_ignored() {
        let headers = headers_with("Basic xyz");
        assert_eq!(extract_bearer(&headers), None);
        assert!(!is_applicable(&headers));
    }

    #[test]
    fn bearer_token_is_returned_exactly() {
        let headers = headers_with("Bearer abc123");
        assert_eq!(extract_bearer(&headers), Some("abc123"));
        assert!(is_applicable(&headers));
    }

    #[test]
    fn scheme_word_is_case_insensitive() {
        assert_eq!(extract_bearer(&headers_with("bearer abc")), Some("abc"));
        assert_eq!(extract_bearer(&headers_with("BEARER abc")), Some("abc"));
    }

    #[test]
    fn remainder_is_not_trimmed() {
        assert_eq!(extract_bearer(&headers_with("Bearer  abc ")), Some(" abc "));
    }

    #[test]
    fn scheme_without_separator_is_rejected() {
        assert_eq!(extract_bearer(&headers_with("Bearer")), None);
        assert_eq!(extract_bearer(&headers_with("Bearerabc123")), None);
    }

    #[test]
    fn fingerprint_is_stable_and_short() {
        let a = fingerprint("abc123");
        assert_eq!(a, fingerprint("abc123"));
        assert_ne!(a, fingerprint("abc124"));
        assert_eq!(a.len(), 12);
        assert!(!a.contains("abc123"));
    }
}
