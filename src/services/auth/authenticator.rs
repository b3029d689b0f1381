//! Authenticator strategies, tried in registration order.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::HeaderMap;

use crate::repos::Member;
use crate::services::auth::error::AuthError;
use crate::services::auth::principal::PrincipalResolver;
use crate::services::auth::token;

#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    fn is_applicable(&self, headers: &HeaderMap) -> bool;

    async fn authenticate(&self, headers: &HeaderMap) -> Result<Option<Member>, AuthError>;
}

/// `Authorization: Bearer <token>` backed by the OAuth2 token validator.
#[derive(Clone)]
pub struct BearerAuthenticator {
    resolver: PrincipalResolver,
}

impl BearerAuthenticator {
    pub fn new(resolver: PrincipalResolver) -> Self {
        Self { resolver }
    }
}

#[async_trait]
impl Authenticator for BearerAuthenticator {
    fn name(&self) -> &'static str {
        "bearer"
    }

    fn is_applicable(&self, headers: &HeaderMap) -> bool {
        token::is_applicable(headers)
    }

    async fn authenticate(&self, headers: &HeaderMap) -> Result<Option<Member>, AuthError> {
        self.resolver.resolve(headers).await
    }
}

/// Ordered authenticator list.
///
/// The first applicable authenticator that succeeds wins. When every
/// applicable one fails, the last failure is returned. No applicable
/// authenticator means an anonymous request (`Ok(None)`).
#[derive(Clone, Default)]
pub struct AuthHandler {
    authenticators: Vec<Arc<dyn Authenticator>>,
}

impl AuthHandler {
    pub fn with(mut self, authenticator: Arc<dyn Authenticator>) -> Self {
        self.authenticators.push(authenticator);
        self
    }

    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<Option<Member>, AuthError> {
        let mut last_err = None;

        for authenticator in self.authenticators.iter().filter(|a| a.is_applicable(headers)) {
            match authenticator.authenticate(headers).await {
                Ok(member) => return Ok(member),
                Err(err) => {
                    tracing::debug!(
                        authenticator = authenticator.name(),
                        error = %err,
                        "authenticator failed"
                    );
                    last_err = Some(err);
                }
            }
        }

        match last_err {
            Some(err) => Err(err),
            None => Ok(None),
        }
    }
}
