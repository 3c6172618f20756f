//! CLI argument definitions.

use clap::{Args, Parser};
use rufit::config::{DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};

use crate::commands::Commands;

/// Command-line client for the RU Fit API.
#[derive(Parser, Debug)]
#[command(name = "rufit")]
#[command(author, version = env!("RUFIT_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub client: ClientArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct ClientArgs {
    /// API base URL
    #[arg(long, env = "RUFIT_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS, global = true)]
    pub timeout: u64,

    /// Refresh and resend once when the API refuses an access token
    #[arg(long, global = true)]
    pub retry_after_refresh: bool,
}
