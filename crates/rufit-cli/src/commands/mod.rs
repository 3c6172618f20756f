//! Subcommand implementations.

mod delete_account;
mod login;
mod logout;
mod refresh;
mod register;
mod request;
mod status;
mod userinfo;

use anyhow::Result;
use clap::Subcommand;

use crate::cli::ClientArgs;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new account
    Register(register::RegisterArgs),

    /// Log in and store the session
    Login(login::LoginArgs),

    /// Forget the stored session
    Logout(logout::LogoutArgs),

    /// Validate the stored session
    Status(status::StatusArgs),

    /// Exchange the refresh token for a new pair
    Refresh(refresh::RefreshArgs),

    /// Delete the account and end the session
    DeleteAccount(delete_account::DeleteAccountArgs),

    /// Show or update the user profile
    Userinfo(userinfo::UserinfoArgs),

    /// Send an arbitrary API request
    Request(request::RequestArgs),
}

pub async fn handle(cmd: Commands, client: &ClientArgs) -> Result<()> {
    match cmd {
        Commands::Register(args) => register::run(args, client).await,
        Commands::Login(args) => login::run(args, client).await,
        Commands::Logout(args) => logout::run(args, client).await,
        Commands::Status(args) => status::run(args, client).await,
        Commands::Refresh(args) => refresh::run(args, client).await,
        Commands::DeleteAccount(args) => delete_account::run(args, client).await,
        Commands::Userinfo(args) => userinfo::run(args, client).await,
        Commands::Request(args) => request::run(args, client).await,
    }
}
