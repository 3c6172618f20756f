//! Session storage and client construction.

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use rufit::{Client, ClientConfig, FileStore};

use crate::cli::ClientArgs;

/// Get the session file path, creating its directory.
pub fn session_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "rufit").context("Could not determine data directory")?;

    let data_dir = dirs.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data directory")?;

    Ok(data_dir.join("session.json"))
}

/// A client backed by the on-disk session file.
pub struct Connection {
    pub client: Client,
    pub store: Arc<FileStore>,
}

/// Build a client from the shared command-line options.
pub fn connect(args: &ClientArgs) -> Result<Connection> {
    let config = ClientConfig::new(&args.api_url)
        .context("Invalid API URL")?
        .with_timeout(Duration::from_secs(args.timeout))
        .with_retry_after_refresh(args.retry_after_refresh);

    let store = Arc::new(FileStore::new(session_path()?));
    tracing::debug!(path = %store.path().display(), api = %config.api_url, "Using session file");

    let client = Client::new(config, store.clone()).context("Failed to create client")?;
    Ok(Connection { client, store })
}
