//! Outgoing request authorization.
//!
//! Every API call made on behalf of a consumer passes through the
//! [`RequestDispatcher`], which reads the request's [`AuthFlags`] and decides
//! which bearer token, if any, goes out with it. A request that needs a token
//! the client cannot vouch for is never transmitted.
//!
//! [`AuthFlags`]: crate::auth::AuthFlags

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::Result;
use crate::auth::{AccessToken, RequestAuth};
use crate::error::{AuthError, Error, TokenKind};
use crate::http::{ApiRequest, ApiResponse, HttpClient};
use crate::session::{RefreshCoordinator, SessionState, TokenValidator, TokenVault};

/// Attaches tokens to outgoing requests according to their flags.
pub struct RequestDispatcher {
    http: HttpClient,
    vault: Arc<TokenVault>,
    validator: Arc<TokenValidator>,
    refresher: Arc<RefreshCoordinator>,
    retry_after_refresh: bool,
}

impl RequestDispatcher {
    pub(crate) fn new(
        http: HttpClient,
        vault: Arc<TokenVault>,
        validator: Arc<TokenValidator>,
        refresher: Arc<RefreshCoordinator>,
        retry_after_refresh: bool,
    ) -> Self {
        Self {
            http,
            vault,
            validator,
            refresher,
            retry_after_refresh,
        }
    }

    /// Authorize and send a request.
    ///
    /// # Errors
    ///
    /// - [`AuthError::ConflictingAuthFlags`] if both flags are set
    /// - [`AuthError::NotAuthenticated`] if an access-authorized request has
    ///   no valid session behind it
    /// - [`AuthError::MissingCredential`] if a refresh-authorized request has
    ///   no refresh token to send
    ///
    /// All three are raised before anything is transmitted.
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn dispatch(&self, request: &ApiRequest) -> Result<ApiResponse> {
        match request.auth.resolve()? {
            RequestAuth::None => self.http.send(request, None).await,
            RequestAuth::Access => self.dispatch_with_access(request).await,
            RequestAuth::Refresh => {
                let pair = self
                    .vault
                    .load()
                    .await?
                    .ok_or(AuthError::MissingCredential {
                        kind: TokenKind::Refresh,
                    })?;
                self.http
                    .send(request, Some(pair.refresh().as_str()))
                    .await
            }
        }
    }

    /// Validate the session and return the access token to send.
    ///
    /// The token is read back from the store after validation, so a refresh
    /// performed during validation is reflected.
    pub async fn authorize_access(&self) -> Result<AccessToken> {
        match self.validator.is_session_valid().await {
            SessionState::Authenticated => {
                let pair = self
                    .vault
                    .load()
                    .await?
                    .ok_or(AuthError::MissingCredential {
                        kind: TokenKind::Access,
                    })?;
                Ok(pair.access().clone())
            }
            _ => Err(AuthError::NotAuthenticated.into()),
        }
    }

    async fn dispatch_with_access(&self, request: &ApiRequest) -> Result<ApiResponse> {
        let token = self.authorize_access().await?;

        match self.http.send(request, Some(token.as_str())).await {
            Err(e) if e.is_unauthorized() && self.retry_after_refresh => {
                info!("Access token refused, refreshing and retrying once");
                if !self.refresher.refresh_expired(&token).await.is_success() {
                    return Err(e);
                }
                let pair = self
                    .vault
                    .load()
                    .await?
                    .ok_or(Error::Auth(AuthError::NotAuthenticated))?;
                debug!("Retrying with refreshed token");
                self.http.send(request, Some(pair.access().as_str())).await
            }
            other => other,
        }
    }
}

impl std::fmt::Debug for RequestDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestDispatcher")
            .field("api", self.http.api())
            .field("retry_after_refresh", &self.retry_after_refresh)
            .finish_non_exhaustive()
    }
}
