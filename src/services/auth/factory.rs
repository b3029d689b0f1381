/// Factory: build the access-token validator from application `Config`.
use std::sync::Arc;

use crate::config::{Config, ConfigError};
use crate::services::auth::JwtTokenValidator;

pub fn build_token_validator(config: &Config) -> Result<Arc<JwtTokenValidator>, ConfigError> {
    let validator = JwtTokenValidator::from_pem(
        &config.access_jwt_public_key_pem,
        config.access_jwt_algorithm,
        config.auth_issuer.as_deref(),
        config.auth_audience.as_deref(),
        config.access_token_leeway_seconds,
    )
    .map_err(|e| {
        tracing::error!(error = %e, "failed to load access token public key");
        ConfigError::Invalid("ACCESS_JWT_PUBLIC_KEY_PEM")
    })?;

    Ok(Arc::new(validator))
}
