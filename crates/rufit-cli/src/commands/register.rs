//! Register command implementation.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use rufit::Registration;

use crate::cli::ClientArgs;
use crate::output;
use crate::session;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Account username
    #[arg(long)]
    pub username: String,

    /// Account password
    #[arg(long)]
    pub password: String,

    /// Contact email
    #[arg(long)]
    pub email: Option<String>,
}

pub async fn run(args: RegisterArgs, client: &ClientArgs) -> Result<()> {
    let conn = session::connect(client)?;

    let mut registration = Registration::new(&args.username, &args.password);
    if let Some(email) = &args.email {
        registration = registration.with_email(email);
    }

    eprintln!("{}", "Registering...".dimmed());

    let message = conn
        .client
        .register(&registration)
        .await
        .context("Failed to register")?;

    output::success(&message);
    output::field("Username", &args.username);

    Ok(())
}
