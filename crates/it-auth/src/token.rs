//! API Tokens
//!
//! Token material stays inside [`SecretString`] from the moment it is read
//! until a request header is built. Logs only ever see [`ApiToken::fingerprint`].

use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};
use std::fmt;

use it_core::{ItError, ItResult};

/// Hex characters of the SHA-256 digest shown as fingerprint
const FINGERPRINT_LEN: usize = 12;

/// An opaque API token
#[derive(Clone)]
pub struct ApiToken(SecretString);

impl ApiToken {
    /// Wrap a token, rejecting blank input
    pub fn new(raw: impl Into<String>) -> ItResult<Self> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ItError::Unauthorized {
                message: "API token is empty".to_string(),
            });
        }
        if trimmed.chars().any(|c| c.is_control() || c.is_whitespace()) {
            return Err(ItError::Unauthorized {
                message: "API token contains whitespace or control characters".to_string(),
            });
        }
        Ok(Self(SecretString::from(trimmed.to_string())))
    }

    /// The raw token, for building request headers only
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Short SHA-256 prefix safe to log
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.expose().as_bytes());
        let digest = hex::encode(hasher.finalize());
        digest[..FINGERPRINT_LEN].to_string()
    }

    /// `Bearer <token>` header value
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.expose())
    }
}

impl fmt::Debug for ApiToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiToken({})", self.fingerprint())
    }
}

impl PartialEq for ApiToken {
    fn eq(&self, other: &Self) -> bool {
        constant_time_compare(self.expose(), other.expose())
    }
}

/// Constant-time string comparison
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
