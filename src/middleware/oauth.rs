//! Upstream token-validation step: bearer token → synthetic `oauth_*` headers.
//!
//! - Client-supplied `oauth_*` headers are always dropped first.
//! - With a bearer token, the validator's enriched headers replace the request's.
//! - A rejected token is only logged here; the dispatcher's authenticator
//!   reports the failure to the client.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::services::auth::{headers, token};
use crate::state::AppState;

pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, oauth_headers_middleware))
}

async fn oauth_headers_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let spoofed = headers::strip(req.headers_mut());
    if spoofed > 0 {
        tracing::warn!(count = spoofed, "dropped client-supplied oauth headers");
    }

    if let Some(fingerprint) = token::extract_bearer(req.headers()).map(token::fingerprint) {
        match state.validator.validate(req.headers()).await {
            Ok(enriched) => *req.headers_mut() = enriched,
            // Logged once here; the authenticator re-validates and only reports.
            Err(err) => {
                tracing::warn!(token = %fingerprint, error = %err, "bearer token rejected");
            }
        }
    }

    next.run(req).await
}
