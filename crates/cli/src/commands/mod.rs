//! Subcommand implementations. Each prints the server's response as pretty
//! JSON on stdout.

pub mod auth;
pub mod comments;
pub mod questions;
pub mod users;

use serde::Serialize;

/// Boxed error returned by every command.
pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Write `value` to stdout as pretty JSON.
///
/// # Errors
///
/// Returns an error if `value` cannot be serialized.
#[allow(clippy::print_stdout)]
pub fn print_json<T: Serialize>(value: &T) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
