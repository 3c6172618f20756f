//! Request and response envelopes.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::auth::AuthFlags;
use crate::error::{Error, InvalidInputError, TransportError};

/// An outgoing API call, described before any token is attached.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub auth: AuthFlags,
}

impl ApiRequest {
    /// Create a request from a method name.
    ///
    /// # Errors
    ///
    /// Returns an error if the method is not one the API uses.
    pub fn new(method: &str, path: impl Into<String>) -> Result<Self, Error> {
        let method = match method.to_ascii_uppercase().as_str() {
            "GET" => Method::GET,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "PATCH" => Method::PATCH,
            "DELETE" => Method::DELETE,
            _ => {
                return Err(InvalidInputError::Method {
                    value: method.to_string(),
                }
                .into());
            }
        };
        Ok(Self::with_method(method, path))
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::with_method(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::with_method(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::with_method(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::with_method(Method::DELETE, path)
    }

    fn with_method(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            auth: AuthFlags::NONE,
        }
    }

    /// Attach a JSON body.
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Authorize with the validated access token.
    pub fn send_access(mut self) -> Self {
        self.auth.send_access = true;
        self
    }

    /// Authorize with the stored refresh token.
    pub fn send_refresh(mut self) -> Self {
        self.auth.send_refresh = true;
        self
    }

    /// Replace the authorization flags wholesale.
    pub fn with_auth(mut self, auth: AuthFlags) -> Self {
        self.auth = auth;
        self
    }
}

/// A successful API response.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Parsed JSON body; `Value::Null` when the body was empty.
    pub body: Value,
}

impl ApiResponse {
    /// Deserialize the body into a typed value.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, Error> {
        serde_json::from_value(self.body.clone()).map_err(|e| {
            TransportError::Decode {
                message: e.to_string(),
            }
            .into()
        })
    }
}
