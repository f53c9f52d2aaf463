//! Hashing utilities for access tokens.

use sha2::{Digest, Sha256};

/// Number of leading characters of a token that are safe to log.
const LOGGABLE_PREFIX_LEN: usize = 6;

/// Computes SHA-256 hash of the input and returns it as a hex string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}

/// Returns a short, log-safe prefix of an access token.
pub fn token_prefix(token: &str) -> &str {
    match token.char_indices().nth(LOGGABLE_PREFIX_LEN) {
        Some((idx, _)) => &token[..idx],
        None => token,
    }
}
