//! Per-request OAuth authorization context.

use axum::http::HeaderMap;
use serde::Serialize;

use crate::services::auth::error::AuthError;
use crate::services::auth::headers;

/// Client identity and granted scopes for one request.
///
/// Only `build` creates one, so `client_identifier` is never empty. No scopes
/// is always an empty `scopes`, never a missing value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthorizationContext {
    #[serde(rename = "oauthClientIdentifier")]
    client_identifier: String,
    #[serde(rename = "oauthScopes")]
    scopes: Vec<String>,
}

impl AuthorizationContext {
    pub fn client_identifier(&self) -> &str {
        &self.client_identifier
    }

    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }
}

/// Map the validated `oauth_client_id` / `oauth_scopes` headers into a context.
///
/// The headers must already have been written by the token validator; this
/// stage never contacts the authorization server.
pub fn build(request_headers: &HeaderMap) -> Result<AuthorizationContext, AuthError> {
    let client_identifier = headers::get_str(request_headers, &headers::OAUTH_CLIENT_ID)
        .ok_or(AuthError::MissingClient)?
        .to_string();

    let scopes = request_headers
        .get_all(headers::OAUTH_SCOPES)
        .iter()
        .filter_map(headers::as_utf8)
        .flat_map(split_scopes)
        .collect();

    Ok(AuthorizationContext {
        client_identifier,
        scopes,
    })
}

fn split_scopes(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
