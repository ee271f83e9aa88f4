//! # Credential Manager
//!
//! Password hashing and token issuance for request handlers. Hashing runs
//! on the blocking thread pool so a slow hash never stalls other requests.
//! This type never verifies tokens; that is the auth middleware's job.

use tokio::task;

use super::crypto::{self, PasswordHash};
use super::errors::{AuthError, AuthResult};
use super::jwt::{JwtConfig, TokenIssuer};
use crate::models::User;

#[derive(Clone)]
pub struct CredentialManager {
    issuer: TokenIssuer,
}

impl CredentialManager {
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            issuer: TokenIssuer::new(config),
        }
    }

    /// Hash a plaintext password
    pub async fn hash(&self, password: String) -> AuthResult<PasswordHash> {
        task::spawn_blocking(move || crypto::hash_password(&password))
            .await
            .map_err(|_| AuthError::HashingFailed)?
    }

    /// Check a plaintext password against a stored hash
    pub async fn verify(&self, password: String, hash: PasswordHash) -> AuthResult<bool> {
        task::spawn_blocking(move || crypto::verify_password(&password, &hash))
            .await
            .map_err(|_| AuthError::HashingFailed)?
    }

    /// Burn one verification against a fixed hash.
    ///
    /// Used when no user matched so the response takes as long as a
    /// mismatched password would.
    pub async fn verify_unknown(&self, password: String) {
        let outcome = task::spawn_blocking(move || {
            crypto::verify_password(&password, crypto::dummy_hash())
        })
        .await;

        match outcome {
            Ok(Ok(_)) => {}
            Ok(Err(err)) => tracing::warn!(error = %err, "dummy verification failed"),
            Err(err) => tracing::warn!(error = %err, "dummy verification task did not finish"),
        }
    }

    /// Compute the dummy hash ahead of the first unknown-user login.
    pub async fn prime(&self) -> AuthResult<()> {
        task::spawn_blocking(|| {
            crypto::dummy_hash();
        })
        .await
        .map_err(|_| AuthError::HashingFailed)
    }

    /// Sign a token for the user
    pub fn issue_token(&self, user: &User) -> AuthResult<String> {
        self.issuer.issue(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::jwt::TokenVerifier;

    fn config() -> JwtConfig {
        JwtConfig::new("credential-tests")
    }

    #[tokio::test]
    async fn test_hash_then_verify() {
        let manager = CredentialManager::new(&config());
        let hash = manager.hash("longenough1".to_string()).await.unwrap();

        assert_ne!(hash.as_str(), "longenough1");
        assert!(manager
            .verify("longenough1".to_string(), hash.clone())
            .await
            .unwrap());
        assert!(!manager.verify("wrongpass1".to_string(), hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_prime_prepares_dummy_hash() {
        let manager = CredentialManager::new(&config());
        manager.prime().await.unwrap();
        assert!(crypto::dummy_hash_ready());

        // Unknown-user path completes against the ready hash
        manager.verify_unknown("longenough1".to_string()).await;
    }

    #[tokio::test]
    async fn test_issued_token_names_user() {
        let manager = CredentialManager::new(&config());
        let hash = manager.hash("longenough1".to_string()).await.unwrap();
        let user = User::new("a@b.com".to_string(), hash, false);

        let token = manager.issue_token(&user).unwrap();
        let claims = TokenVerifier::new(&config()).verify(&token).unwrap();
        assert_eq!(claims.user_id, "a@b.com");
        assert!(!claims.authorized);
    }
}
