//! In-process credential store.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use super::{ACCESS_TOKEN_KEY, CredentialStore, REFRESH_TOKEN_KEY};
use crate::auth::TokenPair;
use crate::error::StoreError;

/// A credential store that lives only as long as the process.
///
/// Useful for tests and for consumers that persist tokens elsewhere. Raw
/// key access is exposed so callers can stage partial contents.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding a pair.
    pub fn with_pair(pair: &TokenPair) -> Self {
        let store = Self::new();
        store.set(ACCESS_TOKEN_KEY, pair.access().as_str());
        store.set(REFRESH_TOKEN_KEY, pair.refresh().as_str());
        store
    }

    /// Read a raw key.
    pub fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    /// Write a raw key.
    pub fn set(&self, key: &str, value: &str) {
        self.entries().insert(key.to_string(), value.to_string());
    }

    /// Remove a raw key.
    pub fn remove(&self, key: &str) {
        self.entries().remove(key);
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A poisoned map still holds consistent strings.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn load(&self) -> Result<Option<TokenPair>, StoreError> {
        let entries = self.entries();
        Ok(TokenPair::from_parts(
            entries.get(ACCESS_TOKEN_KEY).cloned(),
            entries.get(REFRESH_TOKEN_KEY).cloned(),
        ))
    }

    async fn save(&self, pair: &TokenPair) -> Result<(), StoreError> {
        let mut entries = self.entries();
        entries.insert(ACCESS_TOKEN_KEY.to_string(), pair.access().as_str().to_string());
        entries.insert(
            REFRESH_TOKEN_KEY.to_string(),
            pair.refresh().as_str().to_string(),
        );
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut entries = self.entries();
        entries.remove(ACCESS_TOKEN_KEY);
        entries.remove(REFRESH_TOKEN_KEY);
        Ok(())
    }
}
