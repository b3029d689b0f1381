/*
 * Responsibility
 * - GET/POST /graphql
 * - 認証 (AuthHandler) → AuthorizationContext 構築 → juniper 実行
 * - パイプラインの失敗は AppError の JSON envelope に変換する
 */
use axum::{
    Json,
    extract::{
        Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
};
use juniper::{InputValue, http::GraphQLRequest};
use serde::Deserialize;

use crate::{
    error::AppError,
    graphql::GraphQLContext,
    services::auth::context,
    state::AppState,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQLGetParams {
    pub query: String,
    pub operation_name: Option<String>,
    /// JSON object, URL-encoded.
    pub variables: Option<String>,
}

impl GraphQLGetParams {
    fn into_request(self) -> Result<GraphQLRequest, AppError> {
        let variables = match self.variables.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => Some(
                serde_json::from_str::<InputValue>(raw)
                    .map_err(|e| AppError::bad_request(format!("invalid variables: {e}")))?,
            ),
            _ => None,
        };

        Ok(GraphQLRequest::new(
            self.query,
            self.operation_name,
            variables,
        ))
    }
}

pub async fn graphql_get(
    State(state): State<AppState>,
    headers: HeaderMap,
    params: Result<Query<GraphQLGetParams>, QueryRejection>,
) -> Response {
    let request = params
        .map_err(|e| AppError::bad_request(e.body_text()))
        .and_then(|Query(params)| params.into_request());

    match request {
        Ok(request) => dispatch(&state, Method::GET, &headers, request).await,
        Err(err) => err.into_response_for(state.app_env),
    }
}

pub async fn graphql_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Result<Json<GraphQLRequest>, JsonRejection>,
) -> Response {
    match request {
        Ok(Json(request)) => dispatch(&state, Method::POST, &headers, request).await,
        Err(e) => AppError::bad_request(e.body_text()).into_response_for(state.app_env),
    }
}

async fn dispatch(
    state: &AppState,
    method: Method,
    headers: &HeaderMap,
    request: GraphQLRequest,
) -> Response {
    match execute(state, method, headers, request).await {
        Ok(response) => response,
        Err(err) => err.into_response_for(state.app_env),
    }
}

async fn execute(
    state: &AppState,
    method: Method,
    headers: &HeaderMap,
    request: GraphQLRequest,
) -> Result<Response, AppError> {
    // No member is not an error here; resolvers decide whether one is required.
    let member = state.auth.authenticate(headers).await?;
    let oauth = context::build(headers)?;

    tracing::debug!(
        client = oauth.client_identifier(),
        scopes = ?oauth.scopes(),
        member_id = ?member.as_ref().map(|m| m.id),
        "graphql request authorized"
    );

    let ctx = GraphQLContext::new(state.directory.clone(), member, oauth, method);
    let response = request.execute(state.schema.as_ref(), &ctx).await;
    let status = if response.is_ok() {
        StatusCode::OK
    } else {
        StatusCode::BAD_REQUEST
    };

    Ok((status, Json(response)).into_response())
}
