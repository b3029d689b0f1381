//! Bearer token → directory member.

use std::sync::Arc;

use axum::http::HeaderMap;

use crate::repos::{Directory, Member};
use crate::services::auth::access_jwt::TokenValidator;
use crate::services::auth::error::AuthError;
use crate::services::auth::headers;

/// Validates the request's token and maps `oauth_user_id` to a member.
///
/// `Ok(None)` covers both "token has no resource owner" and "valid token,
/// unknown local user"; rejecting those is left to authorization.
/// Nothing is cached: every call re-validates and re-queries.
#[derive(Clone)]
pub struct PrincipalResolver {
    validator: Arc<dyn TokenValidator>,
    directory: Arc<dyn Directory>,
}

impl PrincipalResolver {
    pub fn new(validator: Arc<dyn TokenValidator>, directory: Arc<dyn Directory>) -> Self {
        Self {
            validator,
            directory,
        }
    }

    pub async fn resolve(&self, headers: &HeaderMap) -> Result<Option<Member>, AuthError> {
        let enriched = self.validator.validate(headers).await?;

        let Some(user_id) = headers::get_str(&enriched, &headers::OAUTH_USER_ID) else {
            return Ok(None);
        };

        let member = self.directory.find_member_by_email(user_id).await?;
        if member.is_none() {
            tracing::debug!("token subject has no local member");
        }

        Ok(member)
    }
}
