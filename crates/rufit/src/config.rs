//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Result;
use crate::types::ApiUrl;

/// Base URL of the development backend.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

/// Per-request timeout applied when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for a [`Client`](crate::Client).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL all endpoint paths are resolved against.
    pub api_url: ApiUrl,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// `User-Agent` header sent with every request.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Re-send an access-authorized request once after a 401 if a forced
    /// refresh succeeds. Off by default: a 401 is returned to the caller.
    #[serde(default)]
    pub retry_after_refresh: bool,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_user_agent() -> String {
    concat!("rufit/", env!("CARGO_PKG_VERSION")).to_string()
}

impl ClientConfig {
    /// Configuration for the given base URL with default settings.
    pub fn new(api_url: impl AsRef<str>) -> Result<Self> {
        Ok(Self {
            api_url: ApiUrl::new(api_url)?,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: default_user_agent(),
            retry_after_refresh: false,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_secs = timeout.as_secs().max(1);
        self
    }

    pub fn with_retry_after_refresh(mut self, enabled: bool) -> Self {
        self.retry_after_refresh = enabled;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: ApiUrl::new(DEFAULT_API_URL).expect("default API URL is valid"),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: default_user_agent(),
            retry_after_refresh: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_backend() {
        let config = ClientConfig::default();
        assert_eq!(config.api_url.as_str(), "http://127.0.0.1:5000/");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(!config.retry_after_refresh);
        assert!(config.user_agent.starts_with("rufit/"));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"api_url": "https://api.rufit.app"}"#).unwrap();
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(!config.retry_after_refresh);
    }

    #[test]
    fn invalid_url_is_rejected() {
        assert!(ClientConfig::new("http://api.rufit.app").is_err());
    }

    #[test]
    fn zero_timeout_is_clamped() {
        let config = ClientConfig::default().with_timeout(Duration::from_millis(10));
        assert_eq!(config.timeout_secs, 1);
    }
}
