//! Generation-guarded access to the credential store.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::debug;

use crate::auth::TokenPair;
use crate::error::StoreError;
use crate::store::CredentialStore;

/// The single gateway to the [`CredentialStore`].
///
/// Every session start (login) and end (logout, rejection) advances the
/// generation. Writes made on behalf of an earlier generation are dropped.
pub struct TokenVault {
    store: Arc<dyn CredentialStore>,
    generation: Mutex<u64>,
}

impl TokenVault {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self {
            store,
            generation: Mutex::new(0),
        }
    }

    /// Current generation.
    pub async fn generation(&self) -> u64 {
        *self.generation.lock().await
    }

    /// Read the stored pair.
    pub async fn load(&self) -> Result<Option<TokenPair>, StoreError> {
        self.store.load().await
    }

    /// Start a new session with `pair`.
    pub async fn replace(&self, pair: &TokenPair) -> Result<(), StoreError> {
        let mut generation = self.generation.lock().await;
        *generation += 1;
        self.store.save(pair).await?;
        debug!(generation = *generation, "session started");
        Ok(())
    }

    /// Store a rotated pair if the session it belongs to is still current.
    ///
    /// Returns false, writing nothing, when the session has moved on.
    pub async fn save_if_current(&self, expected: u64, pair: &TokenPair) -> Result<bool, StoreError> {
        let generation = self.generation.lock().await;
        if *generation != expected {
            debug!(expected, current = *generation, "discarding tokens from a stale session");
            return Ok(false);
        }
        self.store.save(pair).await?;
        Ok(true)
    }

    /// End the session.
    pub async fn clear(&self) -> Result<(), StoreError> {
        let mut generation = self.generation.lock().await;
        *generation += 1;
        self.store.clear().await?;
        debug!(generation = *generation, "session cleared");
        Ok(())
    }

    /// End the session only if it is still the one identified by `expected`.
    pub async fn clear_if_current(&self, expected: u64) -> Result<bool, StoreError> {
        let mut generation = self.generation.lock().await;
        if *generation != expected {
            return Ok(false);
        }
        *generation += 1;
        self.store.clear().await?;
        debug!(generation = *generation, "session cleared");
        Ok(true)
    }
}

impl std::fmt::Debug for TokenVault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenVault").finish_non_exhaustive()
    }
}
