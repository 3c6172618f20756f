//! JSON-file credential store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, trace};

use super::CredentialStore;
use crate::auth::TokenPair;
use crate::error::StoreError;

#[cfg(unix)]
use std::os::unix::fs::PermissionsExt;

/// On-disk layout. Keys match [`super::ACCESS_TOKEN_KEY`] and
/// [`super::REFRESH_TOKEN_KEY`].
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredTokens {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    access_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    saved_at: Option<DateTime<Utc>>,
}

/// A credential store persisted as a single JSON file.
///
/// Saves go to a sibling temp file that is renamed over the target, so the
/// two keys always change together. On Unix the file is created `0600`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStore {
    /// Use (or later create) the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// When the current pair was written, if a pair is stored.
    pub async fn saved_at(&self) -> Result<Option<DateTime<Utc>>, StoreError> {
        Ok(self.read().await?.and_then(|stored| stored.saved_at))
    }

    async fn read(&self) -> Result<Option<StoredTokens>, StoreError> {
        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        if contents.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&contents)?))
    }

    async fn write(&self, stored: &StoredTokens) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_string_pretty(stored)?;
        let temp_path = self.path.with_extension("tmp");

        fs::write(&temp_path, json)
            .await
            .map_err(|e| self.io_error(e))?;

        #[cfg(unix)]
        fs::set_permissions(&temp_path, std::fs::Permissions::from_mode(0o600))
            .await
            .map_err(|e| self.io_error(e))?;

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        trace!(path = %self.path.display(), "credential file written");
        Ok(())
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

#[async_trait]
impl CredentialStore for FileStore {
    async fn load(&self) -> Result<Option<TokenPair>, StoreError> {
        Ok(self
            .read()
            .await?
            .and_then(|stored| TokenPair::from_parts(stored.access_token, stored.refresh_token)))
    }

    async fn save(&self, pair: &TokenPair) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let stored = StoredTokens {
            access_token: Some(pair.access().as_str().to_string()),
            refresh_token: Some(pair.refresh().as_str().to_string()),
            saved_at: Some(Utc::now()),
        };
        self.write(&stored).await?;
        debug!(path = %self.path.display(), "token pair saved");
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "token pair cleared");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}
