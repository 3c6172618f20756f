//! Output formatting helpers.

use anyhow::Result;
use colored::Colorize;
use rufit::SessionState;
use serde::Serialize;

/// Print a success message.
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message.
pub fn warning(msg: &str) {
    eprintln!("{} {}", "!".yellow(), msg);
}

/// Print a labeled field.
pub fn field(label: &str, value: &str) {
    println!("{}: {}", label.dimmed(), value);
}

/// Print a session state, colored by outcome.
pub fn state(state: SessionState) {
    let text = state.to_string();
    let text = match state {
        SessionState::Authenticated => text.green(),
        SessionState::NotAuthenticated => text.red(),
        SessionState::Unknown => text.yellow(),
    };
    field("Session", &text.to_string());
}

/// Print a value as pretty-printed JSON.
pub fn json_pretty<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}
