//! Authentication Module
//!
//! Bearer token access on top of the persisted key-value store.

use std::sync::Arc;

use tracing::{info, warn};

use crate::storage::{KeyValueStore, StorageError};

/// Key under which the session token is persisted
pub const TOKEN_KEY: &str = "token";

/// Reads and clears the session token
#[derive(Clone)]
pub struct Credentials {
    store: Arc<dyn KeyValueStore>,
}

impl Credentials {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Current token, if one is stored.
    ///
    /// An empty token counts as absent. A store that fails to answer is
    /// logged and treated the same way.
    pub async fn get_token(&self) -> Option<String> {
        match self.store.get(TOKEN_KEY).await {
            Ok(Some(token)) if !token.is_empty() => Some(token),
            Ok(_) => None,
            Err(e) => {
                warn!("Failed to read stored token: {}", e);
                None
            }
        }
    }

    /// Persist a token obtained by the sign-in flow
    pub async fn store_token(&self, token: &str) -> Result<(), StorageError> {
        self.store.set(TOKEN_KEY, token).await?;
        info!("Session token stored");
        Ok(())
    }

    /// Remove the persisted token. Succeeds if none was stored.
    pub async fn clear_token(&self) -> Result<(), StorageError> {
        self.store.remove(TOKEN_KEY).await?;
        info!("Session token cleared");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn token_lifecycle() {
        let credentials = Credentials::new(Arc::new(MemoryStore::new()));
        assert_eq!(credentials.get_token().await, None);

        credentials.store_token("tok-1").await.unwrap();
        assert_eq!(credentials.get_token().await.as_deref(), Some("tok-1"));

        credentials.clear_token().await.unwrap();
        assert_eq!(credentials.get_token().await, None);

        // Clearing twice is fine
        credentials.clear_token().await.unwrap();
    }

    #[tokio::test]
    async fn empty_token_is_absent() {
        let store = Arc::new(MemoryStore::new());
        store.set(TOKEN_KEY, "").await.unwrap();

        let credentials = Credentials::new(store);
        assert_eq!(credentials.get_token().await, None);
    }
}
