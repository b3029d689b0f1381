/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - HTTP status / GraphQL 形式の JSON error envelope への変換
 * - production 以外では診断情報 (code / kind / file / line / trace) を付ける
 */
use std::error::Error as StdError;
use std::panic::Location;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::config::AppEnv;
use crate::services::auth::AuthError;

/// `{"errors": [ ... ]}`, the same top-level shape GraphQL responses use.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub errors: Vec<ErrorBody>,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace: Option<Vec<String>>,
}

/// Every variant remembers where it was raised (`?` site or constructor call).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{source}")]
    Auth {
        #[source]
        source: AuthError,
        location: &'static Location<'static>,
    },
    #[error("{message}")]
    BadRequest {
        message: String,
        location: &'static Location<'static>,
    },
}

impl From<AuthError> for AppError {
    #[track_caller]
    fn from(source: AuthError) -> Self {
        Self::Auth {
            source,
            location: Location::caller(),
        }
    }
}

impl AppError {
    #[track_caller]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            location: Location::caller(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Auth { source, .. } => source.status(),
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            AppError::Auth { source, .. } => match source {
                AuthError::AuthenticationFailed { .. } => "AUTHENTICATION_FAILED",
                AuthError::MissingClient => "MISSING_CLIENT",
                AuthError::Directory(_) => "DIRECTORY_UNAVAILABLE",
            },
            AppError::BadRequest { .. } => "BAD_REQUEST",
        }
    }

    pub fn location(&self) -> &'static Location<'static> {
        match self {
            AppError::Auth { location, .. } | AppError::BadRequest { location, .. } => *location,
        }
    }

    /// Render the envelope. Diagnostics are only attached outside production,
    /// and server-side failures never leak their message in production.
    pub fn into_response_for(self, app_env: AppEnv) -> Response {
        let status = self.status();
        let location = self.location();

        if status.is_server_error() {
            tracing::error!(error = ?self, %location, "request failed");
        } else {
            tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
        }

        let body = if app_env.is_production() {
            let message = if status.is_server_error() {
                "internal server error".to_string()
            } else {
                self.to_string()
            };
            ErrorBody {
                message,
                code: None,
                kind: None,
                file: None,
                line: None,
                trace: None,
            }
        } else {
            ErrorBody {
                message: self.to_string(),
                code: Some(status.as_u16()),
                kind: Some(self.kind()),
                file: Some(location.file()),
                line: Some(location.line()),
                trace: Some(source_chain(&self)),
            }
        };

        (
            status,
            Json(ErrorResponse {
                errors: vec![body],
            }),
        )
            .into_response()
    }
}

/// Messages of every error below `err` in its `source()` chain.
fn source_chain(err: &dyn StdError) -> Vec<String> {
    let mut chain = Vec::new();
    let mut current = err.source();
    while let Some(e) = current {
        chain.push(e.to_string());
        current = e.source();
    }
    chain
}
