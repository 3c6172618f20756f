//! Refresh command implementation.

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;
use rufit::RefreshOutcome;

use crate::cli::ClientArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct RefreshArgs {}

pub async fn run(_args: RefreshArgs, client: &ClientArgs) -> Result<()> {
    let conn = session::connect(client)?;

    eprintln!("{}", "Refreshing session...".dimmed());

    match conn.client.refresh().await {
        RefreshOutcome::Refreshed => {
            output::success("Session refreshed successfully");
            Ok(())
        }
        RefreshOutcome::Rejected { reason } => {
            bail!("Session ended: {reason}. Run 'rufit login' again.")
        }
        RefreshOutcome::Superseded => {
            output::warning("Session changed while refreshing; nothing was stored");
            Ok(())
        }
        RefreshOutcome::Failed { reason } => {
            output::warning("Stored tokens were kept");
            bail!("Failed to refresh session: {reason}")
        }
    }
}
