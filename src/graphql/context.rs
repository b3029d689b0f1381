use std::sync::Arc;

use axum::http::Method;

use crate::repos::{Directory, Member};
use crate::services::auth::AuthorizationContext;

/// GraphQL request context
///
/// Built once per request by the dispatcher after authentication; resolvers
/// only read it.
pub struct GraphQLContext {
    pub directory: Arc<dyn Directory>,
    /// Current user, when the token has a resource owner known locally.
    pub member: Option<Member>,
    pub oauth: AuthorizationContext,
    pub http_method: Method,
}

impl juniper::Context for GraphQLContext {}

impl GraphQLContext {
    pub fn new(
        directory: Arc<dyn Directory>,
        member: Option<Member>,
        oauth: AuthorizationContext,
        http_method: Method,
    ) -> Self {
        Self {
            directory,
            member,
            oauth,
            http_method,
        }
    }
}
