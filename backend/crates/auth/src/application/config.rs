//! Application Configuration
//!
//! Configuration for the Auth application layer. Built once at startup and
//! never mutated.

use std::fmt;
use std::time::Duration;

use platform::password::HashingPolicy;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Default token lifetime (1 hour)
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(3600);

/// HMAC key for token signing
///
/// Zeroized on drop; `Debug` never prints the bytes.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningSecret")
            .field(&"[REDACTED]")
            .finish()
    }
}

/// Token issuance settings
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// HS256 signing key
    pub secret: SigningSecret,
    /// Lifetime added to the issue instant to form `exp`
    pub ttl: Duration,
}

impl TokenConfig {
    pub fn new(secret: SigningSecret, ttl: Duration) -> Self {
        Self { secret, ttl }
    }
}

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub token: TokenConfig,
    /// Argon2id work parameters
    pub hashing: HashingPolicy,
}

impl AuthConfig {
    pub fn new(secret: SigningSecret) -> Self {
        Self {
            token: TokenConfig::new(secret, DEFAULT_TOKEN_TTL),
            hashing: HashingPolicy::default(),
        }
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token.ttl = ttl;
        self
    }

    pub fn with_hashing(mut self, hashing: HashingPolicy) -> Self {
        self.hashing = hashing;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_debug_is_redacted() {
        let config = AuthConfig::new(SigningSecret::new(b"super-secret-key".to_vec()));
        let debug = format!("{:?}", config);
        assert!(!debug.contains("super-secret-key"));
        assert!(!debug.contains("115, 117, 112"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_defaults() {
        let config = AuthConfig::new(SigningSecret::new(vec![1u8; 32]));
        assert_eq!(config.token.ttl, DEFAULT_TOKEN_TTL);
        assert_eq!(config.hashing, HashingPolicy::default());
    }
}
