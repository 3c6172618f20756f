//! HTTP transport for the RU Fit API.
//!
//! This module provides the reqwest-backed client, the endpoint catalogue,
//! and the request/response envelope the dispatcher works with.

mod client;
mod endpoints;
mod request;

pub(crate) use client::HttpClient;
pub use endpoints::{ACCOUNT, IS_TOKEN_EXPIRED, LOGIN, REFRESH, REGISTER, USERINFO};
pub(crate) use endpoints::{
    ExpiryCheckRequest, ExpiryCheckResponse, LoginRequest, MessageResponse, RefreshResponse,
    RegisterRequest, TokenResponse,
};
pub use request::{ApiRequest, ApiResponse};
