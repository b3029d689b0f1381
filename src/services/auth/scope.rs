//! Read-only checks over an `AuthorizationContext`, for use inside resolvers.

use crate::repos::{Client, Directory, RepoResult};
use crate::services::auth::context::AuthorizationContext;

pub fn has_oauth_client(ctx: &AuthorizationContext) -> bool {
    !ctx.client_identifier().is_empty()
}

/// Directory record of the calling client. `Ok(None)` when the identifier
/// matches no record.
pub async fn get_oauth_client(
    ctx: &AuthorizationContext,
    directory: &dyn Directory,
) -> RepoResult<Option<Client>> {
    if !has_oauth_client(ctx) {
        return Ok(None);
    }

    directory
        .find_client_by_identifier(ctx.client_identifier())
        .await
}

pub fn has_scope(ctx: &AuthorizationContext, scope: &str) -> bool {
    ctx.scopes().iter().any(|granted| granted == scope)
}

/// Every scope in `scopes` granted; true for an empty list.
pub fn has_scopes<S: AsRef<str>>(ctx: &AuthorizationContext, scopes: &[S]) -> bool {
    scopes.iter().all(|scope| has_scope(ctx, scope.as_ref()))
}
