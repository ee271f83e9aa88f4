//! Shared handler state

use std::sync::Arc;

use super::errors::ApiError;
use crate::auth::{CredentialManager, JwtConfig, TokenVerifier};
use crate::store::{Collection, MemoryStore};

/// Field that identifies a user; unique across the users collection
pub const USERNAME_FIELD: &str = "username";

/// Everything a request handler or the auth middleware needs.
///
/// Cloned per request; every member is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    pub products: Arc<dyn Collection>,
    pub users: Arc<dyn Collection>,
    pub credentials: CredentialManager,
    pub verifier: TokenVerifier,
}

impl AppState {
    pub fn new(
        products: Arc<dyn Collection>,
        users: Arc<dyn Collection>,
        jwt: &JwtConfig,
    ) -> Self {
        Self {
            products,
            users,
            credentials: CredentialManager::new(jwt),
            verifier: TokenVerifier::new(jwt),
        }
    }

    /// State backed by collections of an in-process store
    pub fn in_memory(
        store: &MemoryStore,
        database: &str,
        products: &str,
        users: &str,
        jwt: &JwtConfig,
    ) -> Self {
        Self::new(
            store.collection(database, products),
            store.collection(database, users),
            jwt,
        )
    }

    /// Declare the indexes handlers rely on and compute the unknown-user
    /// dummy hash. Run once before serving.
    pub async fn prepare(&self) -> Result<(), ApiError> {
        self.users.create_unique_index(USERNAME_FIELD).await?;
        self.credentials.prime().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::crypto;

    #[tokio::test]
    async fn test_prepare_primes_dummy_hash_and_index() {
        let store = MemoryStore::new("test");
        let state = AppState::in_memory(&store, "tronics", "products", "users", &JwtConfig::new("s"));
        state.prepare().await.unwrap();

        assert!(crypto::dummy_hash_ready());
        // Index is declared: calling again is a no-op
        state.prepare().await.unwrap();
    }
}
