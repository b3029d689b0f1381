//! Failure kinds of the request → principal/context pipeline.

use axum::http::StatusCode;
use thiserror::Error;

use crate::repos::RepoError;

/// Rejection reported by a `TokenValidator`.
///
/// `code` mirrors the originating service's status hint; `None` or `Some(0)`
/// means it gave none.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct AuthenticationError {
    pub message: String,
    pub code: Option<u16>,
}

impl AuthenticationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(message: impl Into<String>, code: u16) -> Self {
        Self {
            message: message.into(),
            code: Some(code),
        }
    }

    /// Client-facing status: the originating code when it is a usable HTTP
    /// status, `403 Forbidden` otherwise.
    pub fn status(&self) -> StatusCode {
        self.code
            .filter(|code| *code != 0)
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::FORBIDDEN)
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{message}")]
    AuthenticationFailed { message: String, status: StatusCode },

    #[error("A valid client is required")]
    MissingClient,

    #[error("directory lookup failed")]
    Directory(#[from] RepoError),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::AuthenticationFailed { status, .. } => *status,
            AuthError::MissingClient => StatusCode::FORBIDDEN,
            AuthError::Directory(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AuthenticationError> for AuthError {
    fn from(e: AuthenticationError) -> Self {
        let status = e.status();
        AuthError::AuthenticationFailed {
            message: e.message,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_or_zero_code_defaults_to_forbidden() {
        assert_eq!(AuthenticationError::new("expired").status(), StatusCode::FORBIDDEN);
        assert_eq!(
            AuthenticationError::with_code("expired", 0).status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn originating_code_is_kept() {
        assert_eq!(
            AuthenticationError::with_code("missing header", 401).status(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn non_http_code_falls_back_to_forbidden() {
        assert_eq!(
            AuthenticationError::with_code("access denied", 9).status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn conversion_keeps_message_and_status() {
        let err: AuthError = AuthenticationError::new("token has expired").into();
        match err {
            AuthError::AuthenticationFailed { message, status } => {
                assert_eq!(message, "token has expired");
                assert_eq!(status, StatusCode::FORBIDDEN);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
