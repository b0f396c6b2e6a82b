//! Authentication errors

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Authentication error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingAuthorization,
    InvalidAuthorizationFormat,
    InvalidSecret,
}

impl AuthError {
    fn message(&self) -> &'static str {
        match self {
            AuthError::MissingAuthorization => "Authorization header required",
            AuthError::InvalidAuthorizationFormat => "Invalid authorization header format",
            AuthError::InvalidSecret => "Invalid admin password",
        }
    }
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for AuthError {}

impl From<AuthError> for parley_common::Error {
    fn from(err: AuthError) -> Self {
        parley_common::Error::Unauthorized(err.message().to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::warn!(reason = self.message(), "Rejected admin request");

        let body = Json(json!({
            "error": {
                "code": "UNAUTHORIZED",
                "message": self.message(),
            }
        }));

        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}
