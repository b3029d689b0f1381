//! Synthetic `oauth_*` headers written by the token validator.
//!
//! Clients must never be able to set these; `strip` removes every one of them
//! before a validated set is written.

use axum::http::{HeaderMap, HeaderName, HeaderValue};

pub const OAUTH_ACCESS_TOKEN_ID: HeaderName = HeaderName::from_static("oauth_access_token_id");
pub const OAUTH_CLIENT_ID: HeaderName = HeaderName::from_static("oauth_client_id");
pub const OAUTH_USER_ID: HeaderName = HeaderName::from_static("oauth_user_id");
pub const OAUTH_SCOPES: HeaderName = HeaderName::from_static("oauth_scopes");

pub const ALL: [HeaderName; 4] = [
    OAUTH_ACCESS_TOKEN_ID,
    OAUTH_CLIENT_ID,
    OAUTH_USER_ID,
    OAUTH_SCOPES,
];

/// Remove every synthetic header. Returns how many values were dropped.
pub fn strip(headers: &mut HeaderMap) -> usize {
    let mut removed = 0;
    for name in ALL {
        if let axum::http::header::Entry::Occupied(entry) = headers.entry(name) {
            removed += entry.remove_entry_mult().1.count();
        }
    }
    removed
}

/// First value of `name` as trimmed UTF-8, `None` when absent or empty.
pub fn get_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(as_utf8)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Claims are UTF-8; `HeaderValue::to_str` only admits visible ASCII.
pub fn as_utf8(value: &HeaderValue) -> Option<&str> {
    std::str::from_utf8(value.as_bytes()).ok()
}
