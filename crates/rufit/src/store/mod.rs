//! Durable storage for the token pair.
//!
//! The store is a small key-value space with two keys,
//! [`ACCESS_TOKEN_KEY`] and [`REFRESH_TOKEN_KEY`]. Callers only ever see it
//! through the pair-shaped [`CredentialStore`] trait: a load yields a
//! complete [`TokenPair`] or nothing, and a save replaces both keys at once.

mod file;
mod memory;

use async_trait::async_trait;

use crate::auth::TokenPair;
use crate::error::StoreError;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Key under which the access token is persisted.
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Key under which the refresh token is persisted.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

/// Persistence for the session's token pair.
///
/// Implementations must make [`save`](CredentialStore::save) atomic with
/// respect to [`load`](CredentialStore::load): a reader never observes the
/// new access token next to the old refresh token.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Load the stored pair.
    ///
    /// A partial or empty pair is reported as `None`.
    async fn load(&self) -> Result<Option<TokenPair>, StoreError>;

    /// Replace both tokens.
    async fn save(&self, pair: &TokenPair) -> Result<(), StoreError>;

    /// Remove both tokens.
    async fn clear(&self) -> Result<(), StoreError>;
}
