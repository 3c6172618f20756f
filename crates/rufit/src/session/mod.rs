//! Session validation, refresh, and state.
//!
//! - [`TokenValidator`] decides whether the stored access token is usable,
//!   refreshing it when the backend reports it expired.
//! - [`RefreshCoordinator`] performs refreshes, at most one at a time.
//! - [`SessionGate`] caches the resulting [`SessionState`] for consumers.
//!
//! All of them reach storage through a shared [`TokenVault`], which tags
//! every session with a generation so a refresh that outlives its session
//! cannot write tokens back.

pub mod gate;
pub mod refresh;
pub mod validator;
mod vault;

use std::fmt;

pub use gate::SessionGate;
pub use refresh::{RefreshCoordinator, RefreshOutcome};
pub use validator::TokenValidator;
pub use vault::TokenVault;

/// Authentication state as seen by consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// Not yet checked, or explicitly invalidated.
    Unknown,
    Authenticated,
    NotAuthenticated,
}

impl SessionState {
    pub fn is_authenticated(self) -> bool {
        self == SessionState::Authenticated
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::Unknown => f.write_str("unknown"),
            SessionState::Authenticated => f.write_str("authenticated"),
            SessionState::NotAuthenticated => f.write_str("not authenticated"),
        }
    }
}
