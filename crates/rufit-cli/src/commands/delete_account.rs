//! Delete account command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;

use crate::cli::ClientArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct DeleteAccountArgs {
    /// Confirm the deletion
    #[arg(long)]
    pub yes: bool,
}

pub async fn run(args: DeleteAccountArgs, client: &ClientArgs) -> Result<()> {
    if !args.yes {
        bail!("Refusing to delete the account without --yes");
    }

    let conn = session::connect(client)?;

    conn.client
        .delete_account()
        .await
        .context("Failed to delete account")?;

    output::success("Account deleted");
    Ok(())
}
