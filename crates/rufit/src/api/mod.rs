//! The authentication endpoints the session manager depends on.
//!
//! [`AuthApi`] is the seam between the session logic and the network.
//! [`HttpAuthApi`] is the production implementation; tests substitute mock
//! servers behind it or their own implementations of the trait.

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::auth::{AccessToken, Credentials, RefreshToken, Registration, TokenPair};
use crate::config::ClientConfig;
use crate::error::{AuthError, Error, TransportError};
use crate::http::{
    ExpiryCheckRequest, ExpiryCheckResponse, HttpClient, IS_TOKEN_EXPIRED, LOGIN,
    LoginRequest, MessageResponse, REFRESH, REGISTER, RefreshResponse, RegisterRequest,
    TokenResponse,
};
use crate::types::ApiUrl;

/// Remote authentication operations.
#[async_trait]
pub trait AuthApi: Send + Sync {
    /// Create an account. Returns the backend's acknowledgement message.
    async fn register(&self, registration: &Registration) -> Result<String>;

    /// Exchange credentials for a token pair.
    async fn login(&self, credentials: &Credentials) -> Result<TokenPair>;

    /// Exchange the refresh token for a new pair.
    ///
    /// A refused refresh token is reported as
    /// [`AuthError::RefreshRejected`]; every other error is transient.
    async fn refresh(&self, refresh_token: &RefreshToken) -> Result<TokenPair>;

    /// Ask the backend whether the access token has expired.
    async fn is_token_expired(&self, access_token: &AccessToken) -> Result<bool>;
}

/// [`AuthApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpAuthApi {
    http: HttpClient,
}

impl HttpAuthApi {
    /// Create an API client from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }

    pub(crate) fn from_http(http: HttpClient) -> Self {
        Self { http }
    }

    /// Returns the base URL.
    pub fn api(&self) -> &ApiUrl {
        self.http.api()
    }
}

fn into_pair(tokens: TokenResponse) -> Result<TokenPair> {
    TokenPair::new(tokens.access_token, tokens.refresh_token).map_err(|_| {
        Error::Transport(TransportError::Decode {
            message: "response carried an empty token".to_string(),
        })
    })
}

#[async_trait]
impl AuthApi for HttpAuthApi {
    #[instrument(skip(self, registration), fields(username = %registration.credentials().username()))]
    async fn register(&self, registration: &Registration) -> Result<String> {
        let request = RegisterRequest {
            username: registration.credentials().username(),
            password: registration.credentials().password(),
            email: registration.email(),
        };

        let response: MessageResponse = self.http.post_json(REGISTER, &request, None).await?;
        info!("Account registered");
        Ok(response
            .message
            .unwrap_or_else(|| "User registered successfully".to_string()))
    }

    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    async fn login(&self, credentials: &Credentials) -> Result<TokenPair> {
        let request = LoginRequest {
            username: credentials.username(),
            password: credentials.password(),
        };

        let tokens: TokenResponse = match self.http.post_json(LOGIN, &request, None).await {
            Ok(tokens) => tokens,
            Err(Error::Api(e)) if e.is_unauthorized() => {
                warn!(reason = %e.reason, "Login refused");
                return Err(AuthError::InvalidCredentials { reason: e.reason }.into());
            }
            Err(e) => return Err(e),
        };

        debug!("Login succeeded");
        into_pair(tokens)
    }

    #[instrument(skip(self, refresh_token))]
    async fn refresh(&self, refresh_token: &RefreshToken) -> Result<TokenPair> {
        let response = self
            .http
            .post_json::<_, RefreshResponse>(
                REFRESH,
                &serde_json::json!({}),
                Some(refresh_token.as_str()),
            )
            .await;

        match response {
            Ok(RefreshResponse::Tokens(tokens)) => into_pair(tokens),
            Ok(RefreshResponse::Rejected(rejection)) if rejection.expired => {
                let reason = rejection
                    .reason
                    .unwrap_or_else(|| "Token has expired".to_string());
                warn!(%reason, "Refresh token rejected");
                Err(AuthError::RefreshRejected { reason }.into())
            }
            Ok(RefreshResponse::Rejected(_)) => Err(TransportError::Decode {
                message: "refresh response carried no tokens".to_string(),
            }
            .into()),
            Err(Error::Api(e)) if e.is_token_rejection() => {
                warn!(status = e.status, reason = %e.reason, "Refresh token rejected");
                Err(AuthError::RefreshRejected { reason: e.reason }.into())
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, access_token))]
    async fn is_token_expired(&self, access_token: &AccessToken) -> Result<bool> {
        let request = ExpiryCheckRequest {
            access_token: access_token.as_str(),
        };
        let response: ExpiryCheckResponse = self
            .http
            .post_json(IS_TOKEN_EXPIRED, &request, None)
            .await?;

        debug!(expired = response.expired, reason = ?response.reason, "Expiry check");
        Ok(response.expired)
    }
}
