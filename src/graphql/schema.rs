//! GraphQL schema definition.
//!
//! Deliberately small: it exposes what the OAuth pipeline puts into the
//! context so clients (and tests) can observe it.

use juniper::{EmptyMutation, EmptySubscription, FieldError, FieldResult, GraphQLObject, ID, RootNode};
use tracing::error;

use super::context::GraphQLContext;
use crate::repos::{Client, Member};
use crate::services::auth::scope;

pub const MEMBERS_SCOPE: &str = "members";

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(name = "Member")]
pub struct MemberData {
    pub id: ID,
    pub email: String,
    pub first_name: Option<String>,
    pub surname: Option<String>,
}

impl From<&Member> for MemberData {
    fn from(m: &Member) -> Self {
        Self {
            id: ID::new(m.id.to_string()),
            email: m.email.clone(),
            first_name: m.first_name.clone(),
            surname: m.surname.clone(),
        }
    }
}

#[derive(Debug, Clone, GraphQLObject)]
#[graphql(name = "OauthClient")]
pub struct ClientData {
    pub id: ID,
    pub name: String,
    pub identifier: String,
}

impl From<Client> for ClientData {
    fn from(c: Client) -> Self {
        Self {
            id: ID::new(c.id.to_string()),
            name: c.name,
            identifier: c.identifier,
        }
    }
}

pub struct Query;

#[juniper::graphql_object(context = GraphQLContext)]
impl Query {
    /// The member the access token was issued to. Requires the `members` scope.
    fn viewer(ctx: &GraphQLContext) -> FieldResult<Option<MemberData>> {
        if !scope::has_scope(&ctx.oauth, MEMBERS_SCOPE) {
            return Err(FieldError::new(
                "The \"members\" scope is required",
                juniper::Value::null(),
            ));
        }

        Ok(ctx.member.as_ref().map(MemberData::from))
    }

    /// The OAuth client that requested the access token.
    async fn oauth_client(ctx: &GraphQLContext) -> FieldResult<Option<ClientData>> {
        let client = scope::get_oauth_client(&ctx.oauth, ctx.directory.as_ref())
            .await
            .map_err(|e| {
                error!(error = ?e, "failed to load oauth client");
                FieldError::new("Failed to load client", juniper::Value::null())
            })?;

        Ok(client.map(ClientData::from))
    }

    /// Scopes granted to the access token, in issue order.
    fn scopes(ctx: &GraphQLContext) -> Vec<String> {
        ctx.oauth.scopes().to_vec()
    }

    /// Whether every given scope was granted.
    fn has_scopes(ctx: &GraphQLContext, scopes: Vec<String>) -> bool {
        scope::has_scopes(&ctx.oauth, &scopes)
    }

    /// HTTP method the query arrived with.
    fn http_method(ctx: &GraphQLContext) -> String {
        ctx.http_method.to_string()
    }
}

pub type Schema = RootNode<
    'static,
    Query,
    EmptyMutation<GraphQLContext>,
    EmptySubscription<GraphQLContext>,
>;

pub fn schema() -> Schema {
    Schema::new(Query, EmptyMutation::new(), EmptySubscription::new())
}
