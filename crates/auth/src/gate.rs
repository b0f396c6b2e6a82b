//! Shared-secret gate

use std::fmt;
use std::sync::Arc;

use parley_common::secrets_match;

use crate::error::AuthError;

/// Holds the admin secret and checks candidate credentials against it
#[derive(Clone)]
pub struct AdminGate {
    secret: Arc<str>,
}

impl AdminGate {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Arc::from(secret.into()),
        }
    }

    /// Verify a candidate credential in constant time
    pub fn verify(&self, candidate: &str) -> Result<(), AuthError> {
        if secrets_match(candidate, &self.secret) {
            Ok(())
        } else {
            Err(AuthError::InvalidSecret)
        }
    }
}

impl fmt::Debug for AdminGate {
    #[mutants::skip] // Redaction only
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminGate")
            .field("secret", &"<redacted>")
            .finish()
    }
}
