//! Per-request authorization flags.

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Declarative flags a call site sets on an outgoing request.
///
/// At most one of the two may be set. The combination is checked when the
/// request is dispatched, before any storage or network access.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthFlags {
    #[serde(default)]
    pub send_access: bool,
    #[serde(default)]
    pub send_refresh: bool,
}

impl AuthFlags {
    pub const NONE: AuthFlags = AuthFlags {
        send_access: false,
        send_refresh: false,
    };

    pub const ACCESS: AuthFlags = AuthFlags {
        send_access: true,
        send_refresh: false,
    };

    pub const REFRESH: AuthFlags = AuthFlags {
        send_access: false,
        send_refresh: true,
    };

    /// Resolve the flags to the token the request must carry.
    ///
    /// # Errors
    ///
    /// [`AuthError::ConflictingAuthFlags`] when both flags are set.
    pub fn resolve(self) -> Result<RequestAuth, AuthError> {
        match (self.send_access, self.send_refresh) {
            (false, false) => Ok(RequestAuth::None),
            (true, false) => Ok(RequestAuth::Access),
            (false, true) => Ok(RequestAuth::Refresh),
            (true, true) => Err(AuthError::ConflictingAuthFlags),
        }
    }
}

/// The resolved authorization mode of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestAuth {
    /// Sent unmodified.
    None,
    /// Validated (and refreshed if needed) access token.
    Access,
    /// Stored refresh token, unchecked.
    Refresh,
}
