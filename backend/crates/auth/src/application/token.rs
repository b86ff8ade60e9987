//! Access Token Issuance
//!
//! HS256-signed JWTs carrying a [`Claims`] payload. Tokens are stateless:
//! nothing is recorded server-side and there is no refresh flow.

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};

use crate::application::config::TokenConfig;
use crate::domain::value_object::user_id::UserId;
use crate::error::{AuthError, AuthResult};

/// JWT claims embedded in every access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the repository-assigned user id
    pub sub: String,
    pub email: String,
    /// Expiration time (UTC Unix timestamp, seconds)
    pub exp: i64,
}

/// Signs access tokens with a fixed secret and lifetime
#[derive(Clone)]
pub struct TokenIssuer {
    config: TokenConfig,
    key: EncodingKey,
}

impl TokenIssuer {
    pub fn new(config: TokenConfig) -> Self {
        let key = EncodingKey::from_secret(config.secret.as_bytes());
        Self { config, key }
    }

    /// Issue a token expiring `ttl` after the current wall-clock instant.
    ///
    /// An empty secret or a lifetime that overflows the clock is a
    /// [`AuthError::Signing`] failure.
    pub fn issue(&self, user_id: &UserId, email: &str) -> AuthResult<String> {
        if self.config.secret.is_empty() {
            return Err(AuthError::Signing("signing secret is empty".to_string()));
        }

        let ttl = chrono::Duration::from_std(self.config.ttl)
            .map_err(|e| AuthError::Signing(format!("token ttl out of range: {e}")))?;
        let exp = Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| AuthError::Signing("token expiry overflows".to_string()))?
            .timestamp();

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            exp,
        };

        Ok(encode(&Header::default(), &claims, &self.key)?)
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};

    use super::*;
    use crate::application::config::SigningSecret;
    use crate::error::AuthErrorKind;

    const SECRET: &[u8] = b"test-signing-secret";

    fn issuer(secret: &[u8], ttl: Duration) -> TokenIssuer {
        TokenIssuer::new(TokenConfig::new(SigningSecret::new(secret.to_vec()), ttl))
    }

    fn decode_claims(token: &str, secret: &[u8]) -> Claims {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation)
            .unwrap()
            .claims
    }

    #[test]
    fn test_issue_claims() {
        let before = Utc::now().timestamp();
        let token = issuer(SECRET, Duration::from_secs(3600))
            .issue(&UserId::new("42"), "a@x.com")
            .unwrap();
        let after = Utc::now().timestamp();

        let claims = decode_claims(&token, SECRET);
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "a@x.com");
        assert!(claims.exp >= before + 3600 && claims.exp <= after + 3600);
    }

    #[test]
    fn test_header_is_hs256() {
        let token = issuer(SECRET, Duration::from_secs(60))
            .issue(&UserId::new("1"), "a@x.com")
            .unwrap();
        let header = jsonwebtoken::decode_header(&token).unwrap();
        assert_eq!(header.alg, Algorithm::HS256);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = issuer(SECRET, Duration::from_secs(60))
            .issue(&UserId::new("1"), "a@x.com")
            .unwrap();
        let res = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"other-secret"),
            &Validation::new(Algorithm::HS256),
        );
        assert!(res.is_err());
    }

    #[test]
    fn test_empty_secret_is_signing_error() {
        let err = issuer(b"", Duration::from_secs(60))
            .issue(&UserId::new("1"), "a@x.com")
            .unwrap_err();
        assert_eq!(err.kind(), AuthErrorKind::Signing);
    }

    #[test]
    fn test_unrepresentable_ttl_is_signing_error() {
        let err = issuer(SECRET, Duration::MAX)
            .issue(&UserId::new("1"), "a@x.com")
            .unwrap_err();
        assert_eq!(err.kind(), AuthErrorKind::Signing);
    }

    #[test]
    fn test_tokens_differ_across_instants() {
        let issuer = issuer(SECRET, Duration::from_secs(60));
        let first = issuer.issue(&UserId::new("1"), "a@x.com").unwrap();
        std::thread::sleep(Duration::from_millis(1100));
        let second = issuer.issue(&UserId::new("1"), "a@x.com").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_debug_hides_secret() {
        let debug = format!("{:?}", issuer(SECRET, Duration::from_secs(60)));
        assert!(!debug.contains("test-signing-secret"));
    }
}
