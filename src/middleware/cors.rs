//! CORS policy for browser GraphQL clients.
//!
//! Policy:
//! - Disabled: no layer at all. `OPTIONS /graphql` then falls through to the
//!   router and is answered with 405 Method Not Allowed.
//! - Development: any origin. With credentials enabled the request origin is
//!   mirrored, since a wildcard origin cannot be combined with credentials.
//! - Production: allowlist origins from Config (exact match).

use std::time::Duration;

use axum::Router;
use axum::http::{HeaderName, HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::{AppEnv, CorsConfig};

pub fn apply(router: Router, cors: &CorsConfig, app_env: AppEnv) -> Router {
    match layer(cors, app_env) {
        Some(layer) => router.layer(layer),
        None => router,
    }
}

fn layer(cors: &CorsConfig, app_env: AppEnv) -> Option<CorsLayer> {
    if !cors.enabled {
        return None;
    }

    let allow_origin = if app_env.is_production() {
        // An empty allowlist allows none (no CORS headers).
        let allowed: Vec<HeaderValue> = cors
            .allowed_origins
            .iter()
            .filter_map(|s| HeaderValue::from_str(s).ok())
            .collect();

        AllowOrigin::predicate(move |origin: &HeaderValue, _req| {
            allowed.iter().any(|v| v == origin)
        })
    } else if cors.allow_credentials {
        AllowOrigin::mirror_request()
    } else {
        AllowOrigin::from(Any)
    };

    Some(
        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_credentials(cors.allow_credentials)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([
                header::AUTHORIZATION,
                header::CONTENT_TYPE,
                header::ACCEPT,
                HeaderName::from_static("x-request-id"),
            ])
            .max_age(Duration::from_secs(60 * 10)),
    )
}
