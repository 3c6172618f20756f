//! Status command implementation.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::json;

use crate::cli::ClientArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run(args: StatusArgs, client: &ClientArgs) -> Result<()> {
    let conn = session::connect(client)?;

    let state = conn.client.check_session().await;
    let saved_at = conn
        .store
        .saved_at()
        .await
        .context("Failed to read session file")?;

    if args.json {
        return output::json_pretty(&json!({
            "state": state.to_string(),
            "api": conn.client.config().api_url.as_str(),
            "saved_at": saved_at,
        }));
    }

    output::state(state);
    output::field("API", conn.client.config().api_url.as_str());
    if let Some(saved_at) = saved_at {
        output::field("Saved", &saved_at.to_rfc3339());
    }

    Ok(())
}
