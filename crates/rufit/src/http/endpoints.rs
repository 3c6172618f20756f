//! Endpoint paths and request/response types.

use serde::{Deserialize, Serialize};

// ============================================================================
// Endpoint Paths
// ============================================================================

/// POST, unauthenticated.
pub const REGISTER: &str = "/auth/register";

/// POST, unauthenticated.
pub const LOGIN: &str = "/auth/login";

/// POST, bearer refresh token.
pub const REFRESH: &str = "/auth/refresh";

/// POST, unauthenticated; the access token travels in the body.
pub const IS_TOKEN_EXPIRED: &str = "/auth/is-token-expired";

/// DELETE, bearer access token.
pub const ACCOUNT: &str = "/auth/account";

/// GET/POST, bearer access token.
pub const USERINFO: &str = "/userinfo";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for login.
#[derive(Debug, Serialize)]
pub(crate) struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Request body for registration.
#[derive(Debug, Serialize)]
pub(crate) struct RegisterRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub email: Option<&'a str>,
}

/// Token pair as issued by login and refresh.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
}

/// The backend's JWT error handlers answer 200 with this shape instead of
/// a 401 when the presented bearer token is unusable.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenRejection {
    #[serde(default)]
    pub expired: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Response from the refresh endpoint.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RefreshResponse {
    Tokens(TokenResponse),
    Rejected(TokenRejection),
}

/// Request body for the expiry check.
#[derive(Debug, Serialize)]
pub(crate) struct ExpiryCheckRequest<'a> {
    pub access_token: &'a str,
}

/// Response from the expiry check.
#[derive(Debug, Deserialize)]
pub(crate) struct ExpiryCheckResponse {
    pub expired: bool,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Plain `{message}` acknowledgement.
#[derive(Debug, Deserialize)]
pub(crate) struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Every field the backend has been seen to put an error reason in.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    /// First non-empty reason field.
    pub fn reason(self) -> Option<String> {
        [self.message, self.msg, self.reason, self.error]
            .into_iter()
            .flatten()
            .find(|s| !s.trim().is_empty())
    }
}
