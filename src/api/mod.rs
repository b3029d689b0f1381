/*
 * Responsibility
 * - HTTP 公開面 (routes() の re-export など)
 */
pub mod handlers;
mod routes;

pub use routes::{graphql_routes, public_routes};
