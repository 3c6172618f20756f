//! reqwest-backed HTTP client.

use reqwest::header::CONTENT_TYPE;
use reqwest::{Method, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{debug, instrument, trace};

use crate::config::ClientConfig;
use crate::error::{ApiError, Error, TransportError};
use crate::types::ApiUrl;

use super::endpoints::ErrorBody;
use super::request::{ApiRequest, ApiResponse};

/// HTTP client bound to one API base URL.
///
/// The client never decides which token to send; callers pass the bearer
/// value explicitly.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    api: ApiUrl,
}

impl HttpClient {
    /// Create a client from configuration.
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout())
            .build()
            .map_err(TransportError::from)?;

        Ok(Self {
            client,
            api: config.api_url.clone(),
        })
    }

    /// Returns the base URL this client is configured for.
    pub fn api(&self) -> &ApiUrl {
        &self.api
    }

    /// Send a request envelope with an optional bearer token.
    #[instrument(skip(self, request, bearer), fields(method = %request.method, path = %request.path, authed = bearer.is_some()))]
    pub async fn send(
        &self,
        request: &ApiRequest,
        bearer: Option<&str>,
    ) -> Result<ApiResponse, Error> {
        let url = self.api.endpoint_url(&request.path);
        debug!("API request");

        let mut builder = self.client.request(request.method.clone(), &url);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        trace!(status = %status, "API response");

        if !status.is_success() {
            return Err(Error::Api(Self::parse_error_response(response).await));
        }

        let bytes = response.bytes().await?;
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode {
                message: e.to_string(),
            })?
        };

        Ok(ApiResponse {
            status: status.as_u16(),
            body,
        })
    }

    /// POST a JSON body and decode a typed JSON response.
    #[instrument(skip(self, body, bearer), fields(authed = bearer.is_some()))]
    pub async fn post_json<B, R>(
        &self,
        path: &str,
        body: &B,
        bearer: Option<&str>,
    ) -> Result<R, Error>
    where
        B: Serialize + std::fmt::Debug,
        R: DeserializeOwned,
    {
        self.typed(Method::POST, path, Some(body), bearer).await
    }

    async fn typed<B, R>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        bearer: Option<&str>,
    ) -> Result<R, Error>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.api.endpoint_url(path);
        debug!(%method, %url, "API call");

        let mut builder = self
            .client
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            builder = builder.json(body);
        }
        if let Some(token) = bearer {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        trace!(status = %status, "API response");

        if status.is_success() {
            Ok(response.json::<R>().await?)
        } else {
            Err(Error::Api(Self::parse_error_response(response).await))
        }
    }

    /// Normalize an error response into a single reason string.
    async fn parse_error_response(response: reqwest::Response) -> ApiError {
        let status = response.status();
        let body = response.json::<ErrorBody>().await.unwrap_or_default();
        ApiError::new(status.as_u16(), body.reason().unwrap_or_else(|| status_reason(status)))
    }
}

fn status_reason(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Unknown error occurred")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let config = ClientConfig::new("http://localhost:5000").unwrap();
        let client = HttpClient::new(&config).unwrap();
        assert_eq!(client.api(), &config.api_url);
    }

    #[test]
    fn status_reason_falls_back() {
        assert_eq!(status_reason(StatusCode::UNAUTHORIZED), "Unauthorized");
        assert_eq!(
            status_reason(StatusCode::from_u16(599).unwrap()),
            "Unknown error occurred"
        );
    }
}
