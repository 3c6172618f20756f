//! rufit - Authenticated session manager for the RU Fit API
//!
//! This library owns the client side of the RU Fit authentication flow: it
//! keeps the access/refresh token pair in a [`CredentialStore`], checks the
//! access token against the backend before authorized calls, refreshes it
//! when it has expired, and attaches the right bearer token to every
//! outgoing request.
//!
//! All consumer-facing operations flow through a [`Client`].
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use rufit::{ApiRequest, Client, ClientConfig, Credentials, MemoryStore};
//!
//! # async fn example() -> Result<(), rufit::Error> {
//! let config = ClientConfig::new("http://127.0.0.1:5000")?;
//! let client = Client::new(config, Arc::new(MemoryStore::new()))?;
//!
//! client.login(&Credentials::new("alice", "secret")).await?;
//!
//! let response = client
//!     .request(ApiRequest::get("/exercises").send_access())
//!     .await?;
//! println!("{}", response.body);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod http;
pub mod session;
pub mod store;
pub mod types;

// Re-export primary types at crate root for convenience
pub use api::{AuthApi, HttpAuthApi};
pub use auth::{AccessToken, AuthFlags, Credentials, RefreshToken, Registration, TokenPair};
pub use client::Client;
pub use config::ClientConfig;
pub use dispatch::RequestDispatcher;
pub use error::Error;
pub use http::{ApiRequest, ApiResponse};
pub use session::{RefreshOutcome, SessionGate, SessionState};
pub use store::{CredentialStore, FileStore, MemoryStore};
pub use types::ApiUrl;

/// Result type alias using the crate's Error type.
pub type Result<T> = std::result::Result<T, Error>;
