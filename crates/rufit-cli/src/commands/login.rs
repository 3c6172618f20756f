//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use rufit::Credentials;

use crate::cli::ClientArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account username
    #[arg(long)]
    pub username: String,

    /// Account password
    #[arg(long)]
    pub password: String,
}

pub async fn run(args: LoginArgs, client: &ClientArgs) -> Result<()> {
    let conn = session::connect(client)?;
    let credentials = Credentials::new(&args.username, &args.password);

    eprintln!("{}", "Logging in...".dimmed());

    conn.client
        .login(&credentials)
        .await
        .context("Failed to login")?;

    output::success("Logged in successfully");
    println!();
    output::field("Username", &args.username);
    output::field("API", conn.client.config().api_url.as_str());
    output::field("Session file", &conn.store.path().display().to_string());

    Ok(())
}
