//! Cryptographic utilities shared across Parley crates
//!
//! Provides shared-secret comparison that does not leak the secret's
//! contents or length through timing.

use sha2::{Digest, Sha256};

/// Compare a candidate credential against the configured secret.
///
/// Both values are hashed first so the comparison always runs over two
/// fixed-length digests, then compared in constant time.
pub fn secrets_match(candidate: &str, expected: &str) -> bool {
    let candidate_hash = Sha256::digest(candidate.as_bytes());
    let expected_hash = Sha256::digest(expected.as_bytes());

    let mut result = 0u8;
    for (a, b) in candidate_hash.iter().zip(expected_hash.iter()) {
        result |= a ^ b;
    }
    result == 0
}
