//! Access token validation.

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use super::SessionState;
use super::refresh::RefreshCoordinator;
use super::vault::TokenVault;
use crate::api::AuthApi;

/// Decides whether the stored access token can be used right now.
///
/// Holds no state of its own: every call reads the store and, when a pair is
/// present, asks the backend once.
pub struct TokenValidator {
    vault: Arc<TokenVault>,
    api: Arc<dyn AuthApi>,
    refresher: Arc<RefreshCoordinator>,
}

impl TokenValidator {
    pub fn new(
        vault: Arc<TokenVault>,
        api: Arc<dyn AuthApi>,
        refresher: Arc<RefreshCoordinator>,
    ) -> Self {
        Self {
            vault,
            api,
            refresher,
        }
    }

    /// Returns [`SessionState::Authenticated`] or
    /// [`SessionState::NotAuthenticated`], never `Unknown`.
    ///
    /// - no complete pair stored: not authenticated, no network call
    /// - token not expired: authenticated
    /// - token expired: authenticated iff a refresh succeeds
    /// - the expiry check itself fails: tokens are cleared, not authenticated
    #[instrument(skip(self))]
    pub async fn is_session_valid(&self) -> SessionState {
        let generation = self.vault.generation().await;

        let pair = match self.vault.load().await {
            Ok(Some(pair)) => pair,
            Ok(None) => {
                debug!("No stored tokens");
                return SessionState::NotAuthenticated;
            }
            Err(e) => {
                warn!(error = %e, "Failed to read stored tokens");
                return SessionState::NotAuthenticated;
            }
        };

        match self.api.is_token_expired(pair.access()).await {
            Ok(false) => SessionState::Authenticated,
            Ok(true) => {
                debug!("Access token expired");
                match self.refresher.refresh_expired(pair.access()).await {
                    outcome if outcome.is_success() => SessionState::Authenticated,
                    outcome => {
                        debug!(?outcome, "Refresh did not succeed");
                        SessionState::NotAuthenticated
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Token validation failed, clearing tokens");
                if let Err(e) = self.vault.clear_if_current(generation).await {
                    warn!(error = %e, "Failed to clear tokens");
                }
                SessionState::NotAuthenticated
            }
        }
    }
}

impl std::fmt::Debug for TokenValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenValidator")
            .field("refresher", &self.refresher)
            .finish_non_exhaustive()
    }
}
