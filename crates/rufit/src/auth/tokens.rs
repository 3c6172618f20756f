//! Bearer token types.

use std::fmt;

use crate::error::InvalidInputError;

/// A short-lived access token for authorized API calls.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Create a new access token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token value for use in authorization headers.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AccessToken").field(&"[REDACTED]").finish()
    }
}

/// A longer-lived token used only to obtain a new access token.
///
/// # Security
///
/// - Never logged or displayed in Debug output
/// - Treat as opaque; do not parse or inspect
#[derive(Clone, PartialEq, Eq)]
pub struct RefreshToken(String);

impl RefreshToken {
    /// Create a new refresh token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Returns the token value for use in refresh requests.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RefreshToken").field(&"[REDACTED]").finish()
    }
}

/// An access/refresh token pair as issued by the API.
///
/// Both members are non-empty. Anything less than a complete pair is
/// represented as "no pair" (`Option::None`) by the stores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    access: AccessToken,
    refresh: RefreshToken,
}

impl TokenPair {
    /// Build a pair, rejecting empty members.
    pub fn new(
        access: impl Into<String>,
        refresh: impl Into<String>,
    ) -> Result<Self, InvalidInputError> {
        let access = access.into();
        let refresh = refresh.into();
        if access.is_empty() || refresh.is_empty() {
            return Err(InvalidInputError::Token {
                reason: "token pair members must be non-empty".to_string(),
            });
        }
        Ok(Self {
            access: AccessToken(access),
            refresh: RefreshToken(refresh),
        })
    }

    /// Assemble a pair from two optional stored values.
    ///
    /// Returns `None` when either value is missing or empty.
    pub fn from_parts(access: Option<String>, refresh: Option<String>) -> Option<Self> {
        Self::new(access?, refresh?).ok()
    }

    pub fn access(&self) -> &AccessToken {
        &self.access
    }

    pub fn refresh(&self) -> &RefreshToken {
        &self.refresh
    }
}
