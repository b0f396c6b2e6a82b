//! Axum extractors for admin authentication
//!
//! Generic over any state `S` where `AdminGate: FromRef<S>`.
//! This is axum's idiomatic nested-state pattern. Extraction runs before the
//! handler body, so a rejected request never reaches the conversation store.

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts, HeaderValue},
};

use crate::error::AuthError;
use crate::gate::AdminGate;

/// Proof that the request carried the admin secret
#[derive(Debug, Clone, Copy)]
pub struct AdminAuth;

impl<S> FromRequestParts<S> for AdminAuth
where
    AdminGate: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        let gate = AdminGate::from_ref(state);

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .ok_or(AuthError::MissingAuthorization)?;

        let secret = extract_bearer_secret(auth_header)?;
        gate.verify(secret)?;

        Ok(AdminAuth)
    }
}

/// Extract the secret from an `Authorization: Bearer <secret>` header
fn extract_bearer_secret(header: &HeaderValue) -> Result<&str, AuthError> {
    let header_str = header
        .to_str()
        .map_err(|_| AuthError::InvalidAuthorizationFormat)?;

    header_str
        .strip_prefix("Bearer ")
        .ok_or(AuthError::InvalidAuthorizationFormat)
}
