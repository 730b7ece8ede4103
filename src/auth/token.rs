//! Session token derivation and verification.
//!
//! The token is HMAC-SHA256 over a fixed message, keyed by the server secret,
//! rendered as lowercase hex. It carries no per-session state: the same secret
//! always produces the same token, and rotating the secret invalidates every
//! issued cookie.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

type HmacSha256 = Hmac<Sha256>;

/// Message authenticated by the session token.
const TOKEN_MESSAGE: &[u8] = b"ok";

/// Derive the session token for `secret`.
pub fn sign(secret: &[u8]) -> String {
    let mut mac = match HmacSha256::new_from_slice(secret) {
        Ok(mac) => mac,
        Err(_) => unreachable!("HMAC-SHA256 accepts keys of any length"),
    };
    mac.update(TOKEN_MESSAGE);
    hex::encode(mac.finalize().into_bytes())
}

/// Check a presented token against the one derived from `secret`.
pub fn verify(candidate: &str, secret: &[u8]) -> bool {
    let expected = Zeroizing::new(sign(secret));
    constant_time_eq(candidate.as_bytes(), expected.as_bytes())
}

/// OR of the XOR of every byte pair. Zero iff the slices match over their
/// common length. Every pair is visited regardless of earlier differences.
pub fn xor_accumulate(a: &[u8], b: &[u8]) -> u8 {
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y))
}

/// Equality whose running time depends only on the length of the inputs.
///
/// Differing lengths are rejected up front; length is not secret.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    xor_accumulate(a, b) == 0
}

/// Token signer bound to the configured secret.
#[derive(Clone)]
pub struct TokenSigner {
    secret: Zeroizing<String>,
}

impl TokenSigner {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Zeroizing::new(secret.into()),
        }
    }

    /// The token a valid session cookie must carry.
    pub fn token(&self) -> String {
        sign(self.secret.as_bytes())
    }

    pub fn verify(&self, candidate: &str) -> bool {
        verify(candidate, self.secret.as_bytes())
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}
