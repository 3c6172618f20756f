//! Single-flight token refresh.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, Shared};
use tracing::{debug, info, instrument, warn};

use super::vault::TokenVault;
use crate::api::AuthApi;
use crate::auth::AccessToken;
use crate::error::{AuthError, Error, TokenKind};

/// Result of one refresh cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// The store now holds a fresh pair.
    Refreshed,
    /// The refresh token is unusable; the session has been ended.
    Rejected { reason: String },
    /// A login or logout replaced the session while the refresh ran. The
    /// store was left to the newer session.
    Superseded,
    /// The refresh could not complete; the stored pair is untouched and a
    /// later attempt may succeed.
    Failed { reason: String },
}

impl RefreshOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, RefreshOutcome::Refreshed)
    }
}

type RefreshFuture = Shared<BoxFuture<'static, RefreshOutcome>>;

/// Runs refreshes against the [`AuthApi`], never more than one at a time.
///
/// The first caller starts a cycle and parks its future in `in_flight`;
/// callers arriving while it runs await the same future. The slot is emptied
/// once the cycle resolves so a later expiry starts a new one.
pub struct RefreshCoordinator {
    vault: Arc<TokenVault>,
    api: Arc<dyn AuthApi>,
    in_flight: Mutex<Option<(u64, RefreshFuture)>>,
    cycles: AtomicU64,
}

impl RefreshCoordinator {
    pub fn new(vault: Arc<TokenVault>, api: Arc<dyn AuthApi>) -> Self {
        Self {
            vault,
            api,
            in_flight: Mutex::new(None),
            cycles: AtomicU64::new(0),
        }
    }

    /// Refresh unconditionally, joining a cycle already in flight.
    pub async fn refresh(&self) -> RefreshOutcome {
        self.run(None).await
    }

    /// Refresh because `stale` was found expired.
    ///
    /// If the stored access token no longer equals `stale`, another caller
    /// has already rotated it and no request is made.
    pub async fn refresh_expired(&self, stale: &AccessToken) -> RefreshOutcome {
        self.run(Some(stale.clone())).await
    }

    /// Number of refresh cycles started so far.
    pub fn cycles_started(&self) -> u64 {
        self.cycles.load(Ordering::Relaxed)
    }

    async fn run(&self, stale: Option<AccessToken>) -> RefreshOutcome {
        let (cycle, refresh) = {
            let mut slot = self
                .in_flight
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            match slot.as_ref() {
                Some((cycle, refresh)) => {
                    debug!(cycle, "joining in-flight refresh");
                    (*cycle, refresh.clone())
                }
                None => {
                    let cycle = self.cycles.fetch_add(1, Ordering::Relaxed) + 1;
                    let refresh = refresh_cycle(
                        Arc::clone(&self.vault),
                        Arc::clone(&self.api),
                        stale,
                        cycle,
                    )
                    .boxed()
                    .shared();
                    *slot = Some((cycle, refresh.clone()));
                    (cycle, refresh)
                }
            }
        };

        let outcome = refresh.await;

        let mut slot = self
            .in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if slot.as_ref().is_some_and(|(current, _)| *current == cycle) {
            *slot = None;
        }

        outcome
    }
}

impl std::fmt::Debug for RefreshCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RefreshCoordinator")
            .field("cycles", &self.cycles_started())
            .finish_non_exhaustive()
    }
}

#[instrument(skip(vault, api, stale))]
async fn refresh_cycle(
    vault: Arc<TokenVault>,
    api: Arc<dyn AuthApi>,
    stale: Option<AccessToken>,
    cycle: u64,
) -> RefreshOutcome {
    let generation = vault.generation().await;

    let pair = match vault.load().await {
        Ok(Some(pair)) => pair,
        Ok(None) => {
            warn!("No refresh token stored");
            match vault.clear_if_current(generation).await {
                Ok(false) => return RefreshOutcome::Superseded,
                Ok(true) => {}
                Err(e) => warn!(error = %e, "Failed to clear partial credentials"),
            }
            return RefreshOutcome::Rejected {
                reason: AuthError::MissingCredential {
                    kind: TokenKind::Refresh,
                }
                .to_string(),
            };
        }
        Err(e) => {
            warn!(error = %e, "Failed to read credentials");
            return RefreshOutcome::Failed {
                reason: e.to_string(),
            };
        }
    };

    if stale.is_some_and(|stale| &stale != pair.access()) {
        debug!("Access token already rotated");
        return RefreshOutcome::Refreshed;
    }

    info!("Refreshing tokens");

    match api.refresh(pair.refresh()).await {
        Ok(rotated) => match vault.save_if_current(generation, &rotated).await {
            Ok(true) => {
                debug!("Tokens refreshed");
                RefreshOutcome::Refreshed
            }
            Ok(false) => {
                warn!("Session replaced while refresh was in flight");
                RefreshOutcome::Superseded
            }
            Err(e) => {
                warn!(error = %e, "Failed to persist refreshed tokens");
                RefreshOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        },
        Err(Error::Auth(AuthError::RefreshRejected { reason })) => {
            match vault.clear_if_current(generation).await {
                Ok(false) => {
                    debug!(%reason, "Rejected token belonged to a replaced session");
                    return RefreshOutcome::Superseded;
                }
                Ok(true) => {}
                Err(e) => warn!(error = %e, "Failed to clear rejected credentials"),
            }
            RefreshOutcome::Rejected { reason }
        }
        Err(e) => {
            warn!(error = %e, "Refresh failed, keeping tokens");
            RefreshOutcome::Failed {
                reason: e.to_string(),
            }
        }
    }
}
