//! Request command implementation.

use anyhow::{Context, Result};
use clap::Args;
use rufit::{ApiRequest, AuthFlags};
use serde_json::Value;

use crate::cli::ClientArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// HTTP method (GET, POST, PUT, PATCH, DELETE)
    pub method: String,

    /// Path relative to the API base URL, e.g. /exercises
    pub path: String,

    /// JSON request body
    #[arg(long, value_name = "JSON")]
    pub data: Option<String>,

    /// Authorize with the access token
    #[arg(long)]
    pub access: bool,

    /// Authorize with the refresh token
    #[arg(long)]
    pub refresh: bool,
}

pub async fn run(args: RequestArgs, client: &ClientArgs) -> Result<()> {
    let conn = session::connect(client)?;

    let mut request = ApiRequest::new(&args.method, &args.path)?.with_auth(AuthFlags {
        send_access: args.access,
        send_refresh: args.refresh,
    });
    if let Some(raw) = &args.data {
        let body: Value = serde_json::from_str(raw).context("Invalid JSON for --data")?;
        request = request.json(body);
    }

    let response = conn
        .client
        .request(request)
        .await
        .with_context(|| format!("{} {} failed", args.method.to_uppercase(), args.path))?;

    output::json_pretty(&response.body)
}
