//! Error types for the rufit library.
//!
//! This module provides a unified error type with explicit variants for
//! transport, authentication, API, storage, and input validation errors.

use std::fmt;
use thiserror::Error;

/// The unified error type for rufit operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Network transport errors (connection, timeout, generic HTTP).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Authentication errors raised by the client before or after a call.
    #[error("authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Non-success responses from the API.
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// Credential store failures.
    #[error("credential store error: {0}")]
    Store(#[from] StoreError),

    /// Input validation errors (bad URL, empty token, bad method).
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInputError),
}

impl Error {
    /// Returns true if the error is the API answering 401.
    ///
    /// Consumers treat this as the signal to force a logout.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Error::Api(e) if e.is_unauthorized())
    }
}

/// Transport-level errors.
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    /// Network connection failed.
    #[error("connection failed: {message}")]
    Connection { message: String },

    /// Request timed out.
    #[error("request timed out")]
    Timeout,

    /// Response body could not be decoded.
    #[error("failed to decode response: {message}")]
    Decode { message: String },

    /// Generic HTTP error.
    #[error("HTTP error: {message}")]
    Http { message: String },
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
        } else if err.is_decode() {
            TransportError::Decode {
                message: err.to_string(),
            }
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Error::Transport(TransportError::from(err))
    }
}

/// Which stored token an operation needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Access => f.write_str("access token"),
            TokenKind::Refresh => f.write_str("refresh token"),
        }
    }
}

/// Authentication-related errors.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// A request asked for both the access and the refresh token.
    #[error("request cannot send both the access and the refresh token")]
    ConflictingAuthFlags,

    /// A token the request depends on is not in the store.
    #[error("no {kind} stored")]
    MissingCredential { kind: TokenKind },

    /// The session could not be validated or refreshed.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Login was refused by the API.
    #[error("invalid credentials: {reason}")]
    InvalidCredentials { reason: String },

    /// The refresh token was rejected; the user must log in again.
    #[error("refresh token rejected: {reason}")]
    RefreshRejected { reason: String },

    /// Username or password left blank.
    #[error("username and password are required")]
    EmptyFields,
}

/// A non-success response from the API with a normalized reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status code.
    pub status: u16,
    /// Human-readable reason extracted from the response.
    pub reason: String,
}

impl ApiError {
    /// Create a new API error.
    pub fn new(status: u16, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
        }
    }

    /// 401 from the API.
    pub fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Statuses the backend uses when a bearer token itself is unusable.
    pub fn is_token_rejection(&self) -> bool {
        matches!(self.status, 401 | 422)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP {}: {}", self.status, self.reason)
    }
}

impl std::error::Error for ApiError {}

/// Credential store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The stored data could not be (de)serialized.
    #[error("malformed credential data: {0}")]
    Format(#[from] serde_json::Error),
}

/// Input validation errors.
#[derive(Debug, Error)]
pub enum InvalidInputError {
    /// Invalid API base URL.
    #[error("invalid API URL '{value}': {reason}")]
    ApiUrl { value: String, reason: String },

    /// Token value is empty or not usable as a header value.
    #[error("invalid token: {reason}")]
    Token { reason: String },

    /// Unsupported HTTP method.
    #[error("unsupported HTTP method '{value}'")]
    Method { value: String },
}
