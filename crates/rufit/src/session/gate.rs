//! Cached session state for navigation and UI consumers.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, instrument};

use super::SessionState;
use super::validator::TokenValidator;

/// Holds the consumer-facing [`SessionState`].
///
/// The state changes only at explicit transition points: a re-check, a
/// login, a logout, or an invalidation. Reading it never touches the
/// network. Every change is published to receivers obtained from
/// [`subscribe`](Self::subscribe).
#[derive(Debug)]
pub struct SessionGate {
    validator: Arc<TokenValidator>,
    state: watch::Sender<SessionState>,
}

impl SessionGate {
    /// A gate starting in [`SessionState::Unknown`].
    pub fn new(validator: Arc<TokenValidator>) -> Self {
        let (state, _) = watch::channel(SessionState::Unknown);
        Self { validator, state }
    }

    /// The cached state.
    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Receive every subsequent transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Re-validate the stored session and publish the result.
    ///
    /// The state passes through `Unknown` while the check runs.
    #[instrument(skip(self))]
    pub async fn check(&self) -> SessionState {
        self.set(SessionState::Unknown);
        let resolved = self.validator.is_session_valid().await;
        self.set(resolved);
        resolved
    }

    /// Login succeeded.
    pub fn mark_authenticated(&self) {
        self.set(SessionState::Authenticated);
    }

    /// Logout, account deletion, or a consumer-forced sign-out.
    pub fn mark_signed_out(&self) {
        self.set(SessionState::NotAuthenticated);
    }

    /// Forget the cached state until the next check.
    pub fn invalidate(&self) {
        self.set(SessionState::Unknown);
    }

    fn set(&self, next: SessionState) {
        let previous = self.state.send_replace(next);
        if previous != next {
            debug!(%previous, %next, "session state changed");
        }
    }
}
