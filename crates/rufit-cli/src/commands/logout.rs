//! Logout command implementation.

use anyhow::{Context, Result};
use clap::Args;

use crate::cli::ClientArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub async fn run(_args: LogoutArgs, client: &ClientArgs) -> Result<()> {
    let conn = session::connect(client)?;

    conn.client
        .logout()
        .await
        .context("Failed to clear session")?;

    output::success("Logged out");
    Ok(())
}
