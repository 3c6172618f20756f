//! Userinfo command implementation.

use anyhow::{Context, Result};
use clap::Args;
use serde_json::Value;

use crate::cli::ClientArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct UserinfoArgs {
    /// Replace profile fields with this JSON object
    #[arg(long, value_name = "JSON")]
    pub set: Option<String>,
}

pub async fn run(args: UserinfoArgs, client: &ClientArgs) -> Result<()> {
    let conn = session::connect(client)?;

    if let Some(raw) = &args.set {
        let user_data: Value = serde_json::from_str(raw).context("Invalid JSON for --set")?;
        conn.client
            .set_userinfo(user_data)
            .await
            .context("Failed to update user info")?;
        output::success("User info updated");
        return Ok(());
    }

    let info = conn
        .client
        .get_userinfo()
        .await
        .context("Failed to fetch user info")?;
    output::json_pretty(&info)
}
