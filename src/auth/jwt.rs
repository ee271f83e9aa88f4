//! # JWT Tokens
//!
//! Signed bearer tokens carrying three claims: `authorized` (the user's
//! administrator flag), `user_id` (the user's email) and `exp`.
//!
//! ## Invariants
//! - Expiry is fixed at issuance: issue time + TTL (15 minutes)
//! - Tokens carry no secrets
//! - Issuing and verifying are split: handlers only hold a [`TokenIssuer`],
//!   the auth middleware only holds a [`TokenVerifier`]

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::errors::{AuthError, AuthResult};
use crate::models::User;

/// Token lifetime in minutes
pub const TOKEN_TTL_MINUTES: i64 = 15;

/// Claims embedded in every token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Administrator flag of the subject
    pub authorized: bool,

    /// Subject (user's email)
    pub user_id: String,

    /// Expiration timestamp (Unix epoch seconds)
    pub exp: i64,
}

/// JWT configuration
#[derive(Clone)]
pub struct JwtConfig {
    /// Symmetric signing secret
    pub secret: String,

    /// Token lifetime
    pub ttl: Duration,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            ttl: Duration::minutes(TOKEN_TTL_MINUTES),
        }
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Signs new tokens
#[derive(Clone)]
pub struct TokenIssuer {
    ttl: Duration,
    encoding_key: EncodingKey,
}

impl TokenIssuer {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            ttl: config.ttl,
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
        }
    }

    /// Issue a token for a user, expiring one TTL from now
    pub fn issue(&self, user: &User) -> AuthResult<String> {
        self.issue_at(user, Utc::now())
    }

    /// Issue a token as if the current time were `now`
    pub fn issue_at(&self, user: &User, now: DateTime<Utc>) -> AuthResult<String> {
        let claims = Claims {
            authorized: user.is_admin,
            user_id: user.email.clone(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|_| AuthError::TokenGenerationFailed)
    }
}

/// Checks signature and expiry of presented tokens
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
}

impl TokenVerifier {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
        }
    }

    /// Verify a token against the current time
    pub fn verify(&self, token: &str) -> AuthResult<Claims> {
        self.verify_at(token, Utc::now())
    }

    /// Verify a token as if the current time were `now`.
    ///
    /// A token is accepted strictly before its `exp` second.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> AuthResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                _ => AuthError::MalformedToken,
            }
        })?;

        if data.claims.exp <= now.timestamp() {
            return Err(AuthError::TokenExpired);
        }
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::crypto::hash_password;
    use chrono::TimeZone;

    fn config() -> JwtConfig {
        JwtConfig::new("test_secret_key_for_testing_only")
    }

    fn user(is_admin: bool) -> User {
        User::new(
            "a@b.com".to_string(),
            hash_password("longenough1").unwrap(),
            is_admin,
        )
    }

    fn issued_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_token_has_three_parts() {
        let token = TokenIssuer::new(&config()).issue(&user(false)).unwrap();
        assert_eq!(token.split('.').count(), 3);
    }

    #[test]
    fn test_claims_round_trip() {
        let issuer = TokenIssuer::new(&config());
        let verifier = TokenVerifier::new(&config());

        let token = issuer.issue_at(&user(true), issued_at()).unwrap();
        let claims = verifier
            .verify_at(&token, issued_at() + Duration::minutes(1))
            .unwrap();

        assert!(claims.authorized);
        assert_eq!(claims.user_id, "a@b.com");
        assert_eq!(
            claims.exp,
            (issued_at() + Duration::minutes(TOKEN_TTL_MINUTES)).timestamp()
        );
    }

    #[test]
    fn test_ttl_boundary() {
        let issuer = TokenIssuer::new(&config());
        let verifier = TokenVerifier::new(&config());
        let token = issuer.issue_at(&user(false), issued_at()).unwrap();

        assert!(verifier
            .verify_at(&token, issued_at() + Duration::minutes(14))
            .is_ok());
        assert_eq!(
            verifier.verify_at(&token, issued_at() + Duration::minutes(16)),
            Err(AuthError::TokenExpired)
        );
    }

    #[test]
    fn test_altered_signature_rejected() {
        let issuer = TokenIssuer::new(&config());
        let verifier = TokenVerifier::new(&config());
        let token = issuer.issue_at(&user(false), issued_at()).unwrap();

        let (head, sig) = token.rsplit_once('.').unwrap();
        let flipped = if sig.starts_with('A') { 'B' } else { 'A' };
        let tampered = format!("{}.{}{}", head, flipped, &sig[1..]);

        let result = verifier.verify_at(&tampered, issued_at());
        assert!(matches!(
            result,
            Err(AuthError::InvalidSignature) | Err(AuthError::MalformedToken)
        ));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = TokenIssuer::new(&JwtConfig::new("secret_one"))
            .issue(&user(false))
            .unwrap();
        let result = TokenVerifier::new(&JwtConfig::new("secret_two")).verify(&token);
        assert_eq!(result, Err(AuthError::InvalidSignature));
    }

    #[test]
    fn test_garbage_rejected() {
        let result = TokenVerifier::new(&config()).verify("invalid.token.here");
        assert!(matches!(
            result,
            Err(AuthError::MalformedToken) | Err(AuthError::InvalidSignature)
        ));
    }

    #[test]
    fn test_token_does_not_contain_secrets() {
        let u = user(false);
        let token = TokenIssuer::new(&config()).issue(&u).unwrap();
        assert!(!token.contains(u.password.as_str()));
        assert!(!format!("{:?}", config()).contains("test_secret"));
    }
}
