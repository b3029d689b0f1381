//! Fixtures shared by the unit tests: HS256 token minting, an in-memory
//! directory and a ready-to-route `AppState`.

use std::sync::Arc;

use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderValue, header};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header};
use serde_json::json;

use crate::config::AppEnv;
use crate::graphql;
use crate::repos::{Client, Directory, Member, RepoResult};
use crate::services::auth::{AuthHandler, BearerAuthenticator, JwtTokenValidator, PrincipalResolver};
use crate::state::AppState;

pub const SECRET: &[u8] = b"lxZFUEsBCJ2Yb14IF2ygAHI5N4+ZAUXXaSeeJm6+twsUmIen";
pub const ISSUER: &str = "https://auth.example.com";

pub struct TokenSpec {
    pub sub: Option<String>,
    pub client_id: String,
    pub scope: Option<String>,
    pub issuer: String,
    pub expires_in_seconds: i64,
}

impl TokenSpec {
    /// Password-grant style token: resource owner + `members` scope.
    pub fn member(email: &str) -> Self {
        Self {
            sub: Some(email.to_string()),
            client_id: "webapp-1".to_string(),
            scope: Some("members".to_string()),
            issuer: ISSUER.to_string(),
            expires_in_seconds: 3600,
        }
    }

    /// Client-credentials style token: no resource owner, no scopes.
    pub fn client_only() -> Self {
        Self {
            sub: Some(String::new()),
            scope: None,
            ..Self::member("")
        }
    }
}

pub fn validator() -> JwtTokenValidator {
    JwtTokenValidator::new(
        DecodingKey::from_secret(SECRET),
        Algorithm::HS256,
        Some(ISSUER),
        None,
        0,
    )
}

pub fn mint(spec: &TokenSpec) -> String {
    mint_with_secret(spec, SECRET)
}

pub fn mint_with_secret(spec: &TokenSpec, secret: &[u8]) -> String {
    let now = chrono::Utc::now().timestamp();
    let mut claims = json!({
        "iss": spec.issuer,
        "aud": spec.client_id,
        "client_id": spec.client_id,
        "iat": now,
        "exp": now + spec.expires_in_seconds,
        "jti": format!("token-{now}"),
    });
    if let Some(sub) = &spec.sub {
        claims["sub"] = json!(sub);
    }
    if let Some(scope) = &spec.scope {
        claims["scope"] = json!(scope);
    }

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .unwrap()
}

/// base64url JWT segment for hand-built payloads.
pub fn forge_payload(json: &str) -> String {
    use base64::Engine as _;
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(json.as_bytes())
}

pub fn bearer_headers(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
    );
    headers
}

#[derive(Clone, Default)]
pub struct InMemoryDirectory {
    pub members: Vec<Member>,
    pub clients: Vec<Client>,
}

#[async_trait]
impl Directory for InMemoryDirectory {
    async fn find_member_by_email(&self, email: &str) -> RepoResult<Option<Member>> {
        Ok(self.members.iter().find(|m| m.email == email).cloned())
    }

    async fn find_client_by_identifier(&self, identifier: &str) -> RepoResult<Option<Client>> {
        Ok(self
            .clients
            .iter()
            .find(|c| c.identifier == identifier)
            .cloned())
    }
}

pub fn member1() -> Member {
    Member {
        id: 1,
        email: "user@example.com".to_string(),
        first_name: Some("My".to_string()),
        surname: Some("Test".to_string()),
    }
}

pub fn member2() -> Member {
    Member {
        id: 2,
        email: "other@example.com".to_string(),
        first_name: None,
        surname: None,
    }
}

/// Non-ASCII email, as some directories hold.
pub fn member3() -> Member {
    Member {
        id: 3,
        email: "josé@example.com".to_string(),
        first_name: Some("José".to_string()),
        surname: None,
    }
}

pub fn directory() -> InMemoryDirectory {
    InMemoryDirectory {
        members: vec![member1(), member2(), member3()],
        clients: vec![Client {
            id: 10,
            name: "Web App".to_string(),
            identifier: "webapp-1".to_string(),
        }],
    }
}

pub fn bearer_authenticator() -> BearerAuthenticator {
    BearerAuthenticator::new(PrincipalResolver::new(
        Arc::new(validator()),
        Arc::new(directory()),
    ))
}

pub fn app_state(app_env: AppEnv) -> AppState {
    let validator = Arc::new(validator());
    let directory: Arc<dyn Directory> = Arc::new(directory());
    let auth = AuthHandler::default().with(Arc::new(BearerAuthenticator::new(
        PrincipalResolver::new(validator.clone(), directory.clone()),
    )));

    AppState::new(
        directory,
        validator,
        Arc::new(auth),
        Arc::new(graphql::schema()),
        app_env,
    )
}
