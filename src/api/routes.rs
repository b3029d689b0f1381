/*
 * Responsibility
 * - URL 構造を定義
 * - /graphql は oauth middleware の内側、/health は外側
 */
use axum::{Router, routing::get};

use crate::api::handlers::{
    graphql::{graphql_get, graphql_post},
    health::health,
};
use crate::state::AppState;

pub fn public_routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}

pub fn graphql_routes() -> Router<AppState> {
    Router::new().route("/graphql", get(graphql_get).post(graphql_post))
}
