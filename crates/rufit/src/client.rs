//! The consumer-facing client.

use std::sync::Arc;

use serde_json::{Value, json};
use tokio::sync::watch;
use tracing::{info, instrument, warn};

use crate::Result;
use crate::api::{AuthApi, HttpAuthApi};
use crate::auth::{Credentials, Registration};
use crate::config::ClientConfig;
use crate::dispatch::RequestDispatcher;
use crate::http::{ACCOUNT, ApiRequest, ApiResponse, HttpClient, USERINFO};
use crate::session::{
    RefreshCoordinator, RefreshOutcome, SessionGate, SessionState, TokenValidator, TokenVault,
};
use crate::store::CredentialStore;

/// An RU Fit API client with a managed session.
///
/// Wires one [`CredentialStore`] and one [`AuthApi`] into the validator,
/// refresh coordinator, dispatcher, and gate. Share it behind an `Arc` when
/// several tasks need it.
pub struct Client {
    config: ClientConfig,
    vault: Arc<TokenVault>,
    api: Arc<dyn AuthApi>,
    refresher: Arc<RefreshCoordinator>,
    gate: SessionGate,
    dispatcher: RequestDispatcher,
}

impl Client {
    /// Create a client talking HTTP to the configured API.
    pub fn new(config: ClientConfig, store: Arc<dyn CredentialStore>) -> Result<Self> {
        let http = HttpClient::new(&config)?;
        let api: Arc<dyn AuthApi> = Arc::new(HttpAuthApi::from_http(http.clone()));
        Ok(Self::assemble(config, store, api, http))
    }

    /// Create a client with a custom [`AuthApi`].
    ///
    /// Non-auth requests still go over HTTP to the configured base URL.
    pub fn with_api(
        config: ClientConfig,
        store: Arc<dyn CredentialStore>,
        api: Arc<dyn AuthApi>,
    ) -> Result<Self> {
        let http = HttpClient::new(&config)?;
        Ok(Self::assemble(config, store, api, http))
    }

    fn assemble(
        config: ClientConfig,
        store: Arc<dyn CredentialStore>,
        api: Arc<dyn AuthApi>,
        http: HttpClient,
    ) -> Self {
        let vault = Arc::new(TokenVault::new(store));
        let refresher = Arc::new(RefreshCoordinator::new(Arc::clone(&vault), Arc::clone(&api)));
        let validator = Arc::new(TokenValidator::new(
            Arc::clone(&vault),
            Arc::clone(&api),
            Arc::clone(&refresher),
        ));
        let gate = SessionGate::new(Arc::clone(&validator));
        let dispatcher = RequestDispatcher::new(
            http,
            Arc::clone(&vault),
            validator,
            Arc::clone(&refresher),
            config.retry_after_refresh,
        );

        Self {
            config,
            vault,
            api,
            refresher,
            gate,
            dispatcher,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The session gate consumers read their initial state from.
    pub fn gate(&self) -> &SessionGate {
        &self.gate
    }

    /// The cached session state. Never touches the network.
    pub fn session_state(&self) -> SessionState {
        self.gate.state()
    }

    /// Re-validate the stored session.
    pub async fn check_session(&self) -> SessionState {
        self.gate.check().await
    }

    /// Receive session state transitions.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.gate.subscribe()
    }

    /// Create an account. Does not log in.
    #[instrument(skip(self, registration))]
    pub async fn register(&self, registration: &Registration) -> Result<String> {
        registration.credentials().ensure_filled()?;
        self.api.register(registration).await
    }

    /// Log in and persist the issued tokens.
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    pub async fn login(&self, credentials: &Credentials) -> Result<()> {
        credentials.ensure_filled()?;
        let pair = self.api.login(credentials).await?;
        self.vault.replace(&pair).await?;
        self.gate.mark_authenticated();
        info!("Logged in");
        Ok(())
    }

    /// End the session locally.
    ///
    /// Any refresh still in flight will find its session gone and discard
    /// the tokens it receives.
    #[instrument(skip(self))]
    pub async fn logout(&self) -> Result<()> {
        self.vault.clear().await?;
        self.gate.mark_signed_out();
        info!("Logged out");
        Ok(())
    }

    /// Delete the account on the server and end the session.
    #[instrument(skip(self))]
    pub async fn delete_account(&self) -> Result<()> {
        self.request(ApiRequest::delete(ACCOUNT).send_access())
            .await?;
        self.logout().await
    }

    /// Force a refresh of the stored tokens.
    ///
    /// The gate is signed out only when this refresh ended the session; a
    /// refresh overtaken by a login or logout leaves it alone.
    pub async fn refresh(&self) -> RefreshOutcome {
        let outcome = self.refresher.refresh().await;
        if let RefreshOutcome::Rejected { reason } = &outcome {
            warn!(%reason, "Refresh rejected, session ended");
            self.gate.mark_signed_out();
        }
        outcome
    }

    /// Send any API request through the dispatcher.
    pub async fn request(&self, request: ApiRequest) -> Result<ApiResponse> {
        self.dispatcher.dispatch(&request).await
    }

    /// Fetch the signed-in user's profile.
    pub async fn get_userinfo(&self) -> Result<Value> {
        let response = self
            .request(ApiRequest::get(USERINFO).send_access())
            .await?;
        Ok(response.body)
    }

    /// Create or update the signed-in user's profile.
    pub async fn set_userinfo(&self, user_data: Value) -> Result<()> {
        self.request(
            ApiRequest::post(USERINFO)
                .json(json!({ "user_data": user_data }))
                .send_access(),
        )
        .await?;
        Ok(())
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("api", &self.config.api_url)
            .field("state", &self.gate.state())
            .finish_non_exhaustive()
    }
}
