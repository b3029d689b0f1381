//! Access-token verification against the authorization server's public key.
//!
//! This is the resource-server side only: tokens are issued and signed by the
//! external OAuth2 authorization server. A verified token is turned into the
//! synthetic `oauth_*` headers the rest of the pipeline consumes.

use async_trait::async_trait;
use axum::http::{HeaderMap, HeaderValue};
use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::Deserialize;

use crate::services::auth::error::AuthenticationError;
use crate::services::auth::headers;
use crate::services::auth::token::{extract_bearer, fingerprint};

/// The token-validation service seam.
///
/// Implementations return an enriched copy of `headers`: client-supplied
/// `oauth_*` headers removed, validated ones written.
#[async_trait]
pub trait TokenValidator: Send + Sync {
    async fn validate(&self, headers: &HeaderMap) -> Result<HeaderMap, AuthenticationError>;
}

/// `scope` is a space separated string in the JWT access token profile; some
/// servers emit a `scopes` array instead.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScopeClaim {
    Delimited(String),
    List(Vec<String>),
}

impl ScopeClaim {
    fn into_vec(self) -> Vec<String> {
        match self {
            ScopeClaim::Delimited(s) => s.split_whitespace().map(str::to_string).collect(),
            ScopeClaim::List(v) => v
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }
}

/// Access token (JWT) claims.
///
/// NOTE:
/// - `aud` can be either string or array; jsonwebtoken validates it when an
///   audience is configured.
/// - `sub` is empty for client-credentials tokens (no resource owner).
#[derive(Debug, Clone, Deserialize)]
pub struct AccessTokenClaims {
    #[serde(default)]
    pub aud: serde_json::Value,
    #[serde(default)]
    pub sub: Option<String>,
    pub exp: i64,
    #[serde(default)]
    pub jti: Option<String>,
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub scope: Option<ScopeClaim>,
    #[serde(default)]
    pub scopes: Option<ScopeClaim>,
}

/// Verified claims in the shape the pipeline uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedToken {
    pub access_token_id: Option<String>,
    pub client_id: String,
    pub user_id: Option<String>,
    pub scopes: Vec<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl ValidatedToken {
    fn from_claims(claims: AccessTokenClaims) -> Result<Self, AuthenticationError> {
        // client_id claim first, then a single-valued aud (issued to exactly one client).
        let client_id = claims
            .client_id
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .or_else(|| match &claims.aud {
                serde_json::Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                _ => None,
            })
            .ok_or_else(|| AuthenticationError::new("Access token is missing a client id"))?;

        let user_id = claims
            .sub
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let scopes = claims
            .scope
            .or(claims.scopes)
            .map(ScopeClaim::into_vec)
            .unwrap_or_default();

        Ok(Self {
            access_token_id: claims.jti.filter(|s| !s.is_empty()),
            client_id,
            user_id,
            scopes,
            expires_at: DateTime::from_timestamp(claims.exp, 0),
        })
    }

    /// Write the synthetic headers onto `target`, replacing any existing ones.
    pub fn apply_to(&self, target: &mut HeaderMap) -> Result<(), AuthenticationError> {
        headers::strip(target);

        let value = |raw: &str| {
            HeaderValue::from_str(raw)
                .map_err(|_| AuthenticationError::new("Access token carries an invalid claim value"))
        };

        if let Some(jti) = &self.access_token_id {
            target.insert(headers::OAUTH_ACCESS_TOKEN_ID, value(jti)?);
        }
        target.insert(headers::OAUTH_CLIENT_ID, value(&self.client_id)?);
        if let Some(user_id) = &self.user_id {
            target.insert(headers::OAUTH_USER_ID, value(user_id)?);
        }
        if !self.scopes.is_empty() {
            target.insert(headers::OAUTH_SCOPES, value(&self.scopes.join(","))?);
        }

        Ok(())
    }
}

/// Signature + claim verifier for bearer access tokens.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct JwtTokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for JwtTokenValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("JwtTokenValidator")
            .field("validation", &self.validation)
            .finish()
    }
}

impl JwtTokenValidator {
    pub fn new(
        decoding_key: DecodingKey,
        algorithm: Algorithm,
        issuer: Option<&str>,
        audience: Option<&str>,
        leeway_seconds: u64,
    ) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.leeway = leeway_seconds;
        validation.validate_nbf = true;
        validation.set_required_spec_claims(&["exp"]);

        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }
        match audience {
            Some(audience) => validation.set_audience(&[audience]),
            // aud carries the client id for many servers; nothing to compare against.
            None => validation.validate_aud = false,
        }

        Self {
            decoding_key,
            validation,
        }
    }

    /// Build from a PEM public key (`EdDSA` → Ed25519, `RS256` → RSA).
    pub fn from_pem(
        public_key_pem: &str,
        algorithm: Algorithm,
        issuer: Option<&str>,
        audience: Option<&str>,
        leeway_seconds: u64,
    ) -> Result<Self, String> {
        let decoding_key = match algorithm {
            Algorithm::EdDSA => DecodingKey::from_ed_pem(public_key_pem.as_bytes())
                .map_err(|e| format!("invalid ed25519 public key pem: {}", e))?,
            Algorithm::RS256 => DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
                .map_err(|e| format!("invalid rsa public key pem: {}", e))?,
            other => return Err(format!("unsupported access token algorithm: {:?}", other)),
        };

        Ok(Self::new(
            decoding_key,
            algorithm,
            issuer,
            audience,
            leeway_seconds,
        ))
    }

    /// Verify and decode a JWT access token.
    pub fn verify(&self, token: &str) -> Result<ValidatedToken, AuthenticationError> {
        let data =
            jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)
                .map_err(|e| {
                    tracing::debug!(
                        token = %fingerprint(token),
                        error = %e,
                        "access token verification failed"
                    );
                    AuthenticationError::new(describe(e.kind()))
                })?;

        ValidatedToken::from_claims(data.claims)
    }
}

/// Client-facing message; never echoes token content.
fn describe(kind: &ErrorKind) -> &'static str {
    match kind {
        ErrorKind::ExpiredSignature => "Access token has expired",
        ErrorKind::ImmatureSignature => "Access token is not yet valid",
        ErrorKind::InvalidSignature => "Access token could not be verified",
        ErrorKind::InvalidIssuer => "Access token has an invalid issuer",
        ErrorKind::InvalidAudience => "Access token has an invalid audience",
        ErrorKind::InvalidAlgorithm => "Access token uses an unexpected algorithm",
        ErrorKind::MissingRequiredClaim(_) => "Access token is missing a required claim",
        _ => "Access token is malformed",
    }
}

#[async_trait]
impl TokenValidator for JwtTokenValidator {
    async fn validate(&self, headers: &HeaderMap) -> Result<HeaderMap, AuthenticationError> {
        let token = extract_bearer(headers)
            .ok_or_else(|| AuthenticationError::with_code("Missing \"Authorization\" header", 401))?;

        let verified = self.verify(token)?;

        tracing::debug!(
            token = %fingerprint(token),
            client_id = %verified.client_id,
            user = verified.user_id.is_some(),
            expires_at = ?verified.expires_at,
            "access token verified"
        );

        let mut enriched = headers.clone();
        verified.apply_to(&mut enriched)?;
        Ok(enriched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{self, TokenSpec};
    use axum::http::header;

    fn bearer(token: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert(
            header::AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).unwrap(),
        );
        h
    }

    #[tokio::test]
    async fn valid_token_is_turned_into_headers() {
        let validator = test_support::validator();
        let token = test_support::mint(&TokenSpec::member("user@example.com"));

        let enriched = validator.validate(&bearer(&token)).await.unwrap();

        assert_eq!(headers::get_str(&enriched, &headers::OAUTH_CLIENT_ID), Some("webapp-1"));
        assert_eq!(
            headers::get_str(&enriched, &headers::OAUTH_USER_ID),
            Some("user@example.com")
        );
        assert_eq!(headers::get_str(&enriched, &headers::OAUTH_SCOPES), Some("members"));
        assert!(headers::get_str(&enriched, &headers::OAUTH_ACCESS_TOKEN_ID).is_some());
        assert!(enriched.get(header::AUTHORIZATION).is_some());
    }

    #[tokio::test]
    async fn spoofed_headers_are_replaced() {
        let validator = test_support::validator();
        let token = test_support::mint(&TokenSpec::client_only());
        let mut h = bearer(&token);
        h.insert(headers::OAUTH_USER_ID, HeaderValue::from_static("admin@example.com"));
        h.insert(headers::OAUTH_SCOPES, HeaderValue::from_static("admin"));

        let enriched = validator.validate(&h).await.unwrap();

        assert_eq!(headers::get_str(&enriched, &headers::OAUTH_USER_ID), None);
        assert_eq!(headers::get_str(&enriched, &headers::OAUTH_SCOPES), None);
        assert_eq!(headers::get_str(&enriched, &headers::OAUTH_CLIENT_ID), Some("webapp-1"));
    }

    #[tokio::test]
    async fn expired_token_has_no_code() {
        let validator = test_support::validator();
        let token = test_support::mint(&TokenSpec {
            expires_in_seconds: -3600,
            ..TokenSpec::member("user@example.com")
        });

        let err = validator.validate(&bearer(&token)).await.unwrap_err();
        assert_eq!(err.message, "Access token has expired");
        assert_eq!(err.code, None);
    }

    #[tokio::test]
    async fn tampered_token_is_rejected() {
        let validator = test_support::validator();
        let token = test_support::mint(&TokenSpec::member("user@example.com"));
        let forged = test_support::forge_payload(r#"{"sub":"admin@example.com"}"#);
        let mut parts: Vec<&str> = token.split('.').collect();
        parts[1] = &forged;
        let tampered = parts.join(".");

        let err = validator.validate(&bearer(&tampered)).await.unwrap_err();
        assert_eq!(err.code, None);
    }

    #[tokio::test]
    async fn missing_authorization_carries_401() {
        let validator = test_support::validator();
        let err = validator.validate(&HeaderMap::new()).await.unwrap_err();
        assert_eq!(err.code, Some(401));
    }

    #[test]
    fn client_id_falls_back_to_single_audience() {
        let claims: AccessTokenClaims = serde_json::from_value(serde_json::json!({
            "aud": "webapp-2",
            "sub": "",
            "exp": 4_102_444_800i64,
            "scopes": ["members", " ", "orders"],
        }))
        .unwrap();

        let token = ValidatedToken::from_claims(claims).unwrap();
        assert_eq!(token.client_id, "webapp-2");
        assert_eq!(token.user_id, None);
        assert_eq!(token.scopes, vec!["members", "orders"]);
    }

    #[test]
    fn missing_client_is_an_authentication_error() {
        let claims: AccessTokenClaims = serde_json::from_value(serde_json::json!({
            "aud": ["a", "b"],
            "exp": 4_102_444_800i64,
        }))
        .unwrap();

        let err = ValidatedToken::from_claims(claims).unwrap_err();
        assert_eq!(err.status(), axum::http::StatusCode::FORBIDDEN);
    }

    #[test]
    fn space_delimited_scope_claim_is_split() {
        let claims: AccessTokenClaims = serde_json::from_value(serde_json::json!({
            "client_id": "webapp-1",
            "exp": 4_102_444_800i64,
            "scope": "members  orders",
        }))
        .unwrap();

        let token = ValidatedToken::from_claims(claims).unwrap();
        assert_eq!(token.scopes, vec!["members", "orders"]);
    }
}
